use core::fmt;
use smallvec::SmallVec;

/// Offsets of the 4-neighbourhood in enumeration order: up, down, left, right.
const NEUMANN_OFFSETS: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// A cell address on the grid, 0-indexed by row and column. Signed so that neighbours of
/// border cells can be generated first and bounds-checked afterwards.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    pub row: i32,
    pub col: i32,
}

impl Coord {
    pub const fn new(row: i32, col: i32) -> Coord {
        Coord { row, col }
    }

    /// Sum of absolute row and column differences.
    pub fn manhattan_distance(&self, other: &Coord) -> u32 {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }

    /// The four axis-aligned neighbours in the fixed order up, down, left, right. No bounds
    /// checking is done here.
    pub fn neumann_neighborhood(&self) -> SmallVec<[Coord; 4]> {
        NEUMANN_OFFSETS
            .iter()
            .map(|&(dr, dc)| Coord::new(self.row + dr, self.col + dc))
            .collect()
    }

    /// Whether `other` is exactly one unit step away along exactly one axis.
    pub fn is_adjacent(&self, other: &Coord) -> bool {
        self.manhattan_distance(other) == 1
    }
}

impl From<(i32, i32)> for Coord {
    fn from((row, col): (i32, i32)) -> Coord {
        Coord::new(row, col)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}
