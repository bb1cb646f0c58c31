//! The editable maze that sits in front of the engine: placing walls and endpoints, wiping
//! stale search annotations, and painting a search's progress back onto the cells.
use core::fmt;
use log::debug;
use std::time::{Duration, Instant};

use crate::astar::SearchOutcome;
use crate::coord::Coord;
use crate::engine::PathSearchEngine;
use crate::error::{SearchError, SearchResult};
use crate::grid::{CellState, Grid};
use crate::observer::{NodeKind, SearchObserver};
use crate::DEFAULT_GRID_SIZE;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Tool {
    Start,
    End,
    #[default]
    Wall,
    Erase,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MazeStats {
    pub nodes_explored: usize,
    /// Moves along the last path found, zero when none was found.
    pub path_length: usize,
    pub algorithm_time: Duration,
    pub walls_placed: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Maze {
    grid: Grid,
    start: Option<Coord>,
    end: Option<Coord>,
    stats: MazeStats,
}

impl Default for Maze {
    fn default() -> Maze {
        Maze::new(DEFAULT_GRID_SIZE)
    }
}

impl Maze {
    pub fn new(size: usize) -> Maze {
        Maze {
            grid: Grid::new(size),
            start: None,
            end: None,
            stats: MazeStats::default(),
        }
    }

    /// Adopts a grid, picking up its start and end markers and wall count.
    pub fn from_grid(grid: Grid) -> Maze {
        let start = grid.find(CellState::Start);
        let end = grid.find(CellState::End);
        let stats = MazeStats {
            walls_placed: grid.wall_count(),
            ..MazeStats::default()
        };
        Maze {
            grid,
            start,
            end,
            stats,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn start(&self) -> Option<Coord> {
        self.start
    }

    pub fn end(&self) -> Option<Coord> {
        self.end
    }

    pub fn stats(&self) -> &MazeStats {
        &self.stats
    }

    /// Starts over with an empty grid of the given size.
    pub fn resize(&mut self, size: usize) {
        *self = Maze::new(size);
    }

    pub fn clear(&mut self) {
        self.resize(self.grid.size());
    }

    /// Removes the open, closed and path markers of the last search and resets its stats.
    pub fn clear_path(&mut self) {
        self.grid.clear_annotations();
        if let Some(start) = self.start {
            self.grid.set(start, CellState::Start);
        }
        if let Some(end) = self.end {
            self.grid.set(end, CellState::End);
        }
        self.stats.nodes_explored = 0;
        self.stats.path_length = 0;
        self.stats.algorithm_time = Duration::ZERO;
    }

    /// Applies an editing tool to a cell and clears any previous search. Returns whether the
    /// maze changed: out-of-bounds cells, walls on non-empty cells, and placing the start on
    /// the end (or the reverse) are ignored.
    pub fn apply_tool(&mut self, coord: Coord, tool: Tool) -> bool {
        self.clear_path();
        let Some(current) = self.grid.get(coord) else {
            return false;
        };
        match tool {
            Tool::Start => {
                if current == CellState::End {
                    return false;
                }
                self.place_endpoint(coord, current, CellState::Start);
            }
            Tool::End => {
                if current == CellState::Start {
                    return false;
                }
                self.place_endpoint(coord, current, CellState::End);
            }
            Tool::Wall => {
                if current != CellState::Empty {
                    return false;
                }
                self.grid.set(coord, CellState::Wall);
                self.stats.walls_placed += 1;
            }
            Tool::Erase => {
                match current {
                    CellState::Empty => return false,
                    CellState::Wall => {
                        self.stats.walls_placed = self.stats.walls_placed.saturating_sub(1)
                    }
                    CellState::Start => self.start = None,
                    CellState::End => self.end = None,
                    _ => {}
                }
                self.grid.set(coord, CellState::Empty);
            }
        }
        true
    }

    fn place_endpoint(&mut self, coord: Coord, current: CellState, marker: CellState) {
        if current == CellState::Wall {
            self.stats.walls_placed = self.stats.walls_placed.saturating_sub(1);
        }
        let slot = if marker == CellState::Start {
            &mut self.start
        } else {
            &mut self.end
        };
        if let Some(previous) = slot.replace(coord) {
            self.grid.set(previous, CellState::Empty);
        }
        self.grid.set(coord, marker);
    }

    /// Searches from start to end, painting open, closed and path cells as the engine reports
    /// them. The engine works on a snapshot, so painting never feeds back into the search.
    pub fn solve(&mut self, engine: &PathSearchEngine) -> SearchResult<SearchOutcome> {
        let (Some(start), Some(end)) = (self.start, self.end) else {
            return Err(SearchError::MissingEndpoint);
        };
        self.clear_path();
        let snapshot = self.grid.clone();
        let timer = Instant::now();
        let outcome = engine.find_path(
            &snapshot,
            start,
            end,
            Painter {
                grid: &mut self.grid,
            },
        )?;
        self.record(&outcome, timer.elapsed());
        Ok(outcome)
    }

    fn record(&mut self, outcome: &SearchOutcome, algorithm_time: Duration) {
        self.stats.algorithm_time = algorithm_time;
        match outcome {
            SearchOutcome::Found(found) => {
                self.stats.nodes_explored = found.nodes_explored;
                self.stats.path_length = found.moves();
            }
            _ => {
                self.stats.nodes_explored = 0;
                self.stats.path_length = 0;
            }
        }
        debug!("Search stats: {:?}", self.stats);
    }
}

impl fmt::Display for Maze {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.grid)
    }
}

/// Paints search progress onto the live grid.
struct Painter<'a> {
    grid: &'a mut Grid,
}

impl SearchObserver for Painter<'_> {
    fn on_node_settled(&mut self, coord: Coord, kind: NodeKind) {
        let state = match kind {
            NodeKind::Opened => CellState::OpenFrontier,
            NodeKind::Closed => CellState::ClosedFrontier,
        };
        self.grid.set(coord, state);
    }

    fn on_path_found(&mut self, path: &[Coord]) {
        let interior = path.len().saturating_sub(2);
        for &coord in path.iter().skip(1).take(interior) {
            self.grid.set(coord, CellState::Path);
        }
    }
}
