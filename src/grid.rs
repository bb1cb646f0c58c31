use core::fmt;
use std::str::FromStr;

use log::info;
use petgraph::unionfind::UnionFind;

use crate::coord::Coord;
use crate::error::GridParseError;

/// Marker stored in each grid cell. The search only distinguishes [CellState::Wall] from
/// everything else; the frontier and path states are annotations painted by callers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CellState {
    #[default]
    Empty,
    Wall,
    Start,
    End,
    OpenFrontier,
    ClosedFrontier,
    Path,
}

impl CellState {
    pub fn glyph(self) -> char {
        match self {
            CellState::Empty => '.',
            CellState::Wall => '#',
            CellState::Start => 'S',
            CellState::End => 'E',
            CellState::OpenFrontier => 'o',
            CellState::ClosedFrontier => 'x',
            CellState::Path => '*',
        }
    }

    pub fn from_glyph(glyph: char) -> Option<CellState> {
        Some(match glyph {
            '.' => CellState::Empty,
            '#' => CellState::Wall,
            'S' => CellState::Start,
            'E' => CellState::End,
            'o' => CellState::OpenFrontier,
            'x' => CellState::ClosedFrontier,
            '*' => CellState::Path,
            _ => return None,
        })
    }

    /// Open, closed and path markers left behind by a previous search.
    pub fn is_annotation(self) -> bool {
        matches!(
            self,
            CellState::OpenFrontier | CellState::ClosedFrontier | CellState::Path
        )
    }
}

/// Square N×N grid of [CellState] stored row-major.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Grid {
    size: usize,
    cells: Vec<CellState>,
}

impl Grid {
    pub fn new(size: usize) -> Grid {
        Grid {
            size,
            cells: vec![CellState::Empty; size * size],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn in_bounds(&self, coord: Coord) -> bool {
        coord.row >= 0
            && coord.col >= 0
            && (coord.row as usize) < self.size
            && (coord.col as usize) < self.size
    }

    fn ix(&self, coord: Coord) -> Option<usize> {
        self.in_bounds(coord)
            .then(|| coord.row as usize * self.size + coord.col as usize)
    }

    pub fn get(&self, coord: Coord) -> Option<CellState> {
        self.ix(coord).map(|ix| self.cells[ix])
    }

    /// Writes a cell. Returns false (and leaves the grid untouched) when out of bounds.
    pub fn set(&mut self, coord: Coord, state: CellState) -> bool {
        match self.ix(coord) {
            Some(ix) => {
                self.cells[ix] = state;
                true
            }
            None => false,
        }
    }

    /// In bounds and not a wall.
    pub fn is_passable(&self, coord: Coord) -> bool {
        self.get(coord).is_some_and(|state| state != CellState::Wall)
    }

    /// First cell in row-major order holding `state`.
    pub fn find(&self, state: CellState) -> Option<Coord> {
        self.cells
            .iter()
            .position(|&s| s == state)
            .map(|ix| Coord::new((ix / self.size) as i32, (ix % self.size) as i32))
    }

    pub fn wall_count(&self) -> usize {
        self.cells.iter().filter(|&&s| s == CellState::Wall).count()
    }

    /// Resets open, closed and path annotations to empty. Start, end and walls stay.
    pub fn clear_annotations(&mut self) {
        for cell in self.cells.iter_mut().filter(|s| s.is_annotation()) {
            *cell = CellState::Empty;
        }
    }

    pub fn coords(&self) -> impl Iterator<Item = Coord> + '_ {
        let n = self.size as i32;
        (0..n).flat_map(move |row| (0..n).map(move |col| Coord::new(row, col)))
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in self.cells.chunks(self.size.max(1)) {
            let line: String = row.iter().map(|s| s.glyph()).collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

impl FromStr for Grid {
    type Err = GridParseError;

    /// Parses one line per row using the glyphs of [CellState::glyph]. Blank lines and
    /// surrounding whitespace are ignored.
    fn from_str(s: &str) -> Result<Grid, GridParseError> {
        let rows: Vec<&str> = s
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();
        let size = rows.len();
        let mut grid = Grid::new(size);
        for (row, line) in rows.iter().enumerate() {
            let width = line.chars().count();
            if width != size {
                return Err(GridParseError::NotSquare {
                    rows: size,
                    row,
                    width,
                });
            }
            for (col, glyph) in line.chars().enumerate() {
                let state = CellState::from_glyph(glyph)
                    .ok_or(GridParseError::UnknownGlyph { glyph, row, col })?;
                grid.cells[row * size + col] = state;
            }
        }
        Ok(grid)
    }
}

/// Connected components of the passable cells under 4-directional movement, kept in a
/// [UnionFind] structure. Lets callers tell in near-constant time whether two cells can
/// reach each other, without flood-filling the grid.
#[derive(Clone, Debug)]
pub struct Components {
    size: usize,
    sets: UnionFind<usize>,
}

impl Components {
    /// Links every passable cell with its passable right and lower neighbours.
    pub fn generate(grid: &Grid) -> Components {
        info!("Generating connected components");
        let mut sets = UnionFind::new(grid.size * grid.size);
        for coord in grid.coords().filter(|c| grid.is_passable(*c)) {
            let Some(parent_ix) = grid.ix(coord) else {
                continue;
            };
            for n in [
                Coord::new(coord.row + 1, coord.col),
                Coord::new(coord.row, coord.col + 1),
            ] {
                if grid.is_passable(n) {
                    if let Some(ix) = grid.ix(n) {
                        sets.union(parent_ix, ix);
                    }
                }
            }
        }
        Components {
            size: grid.size,
            sets,
        }
    }

    fn ix(&self, coord: Coord) -> Option<usize> {
        let in_bounds = coord.row >= 0
            && coord.col >= 0
            && (coord.row as usize) < self.size
            && (coord.col as usize) < self.size;
        in_bounds.then(|| coord.row as usize * self.size + coord.col as usize)
    }

    /// Retrieves the component id a given [Coord] belongs to.
    pub fn component(&self, coord: Coord) -> Option<usize> {
        self.ix(coord).map(|ix| self.sets.find(ix))
    }

    /// Checks if start and goal are on the same component.
    pub fn reachable(&self, start: Coord, goal: Coord) -> bool {
        !self.unreachable(start, goal)
    }

    /// Checks if start and goal are not on the same component. Out-of-bounds points are
    /// unreachable.
    pub fn unreachable(&self, start: Coord, goal: Coord) -> bool {
        match (self.ix(start), self.ix(goal)) {
            (Some(a), Some(b)) => !self.sets.equiv(a, b),
            _ => true,
        }
    }
}
