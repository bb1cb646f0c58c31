//! # maze_pathfinding
//!
//! Shortest-path search on square maze grids, built to be watched. Implements
//! [A*](https://en.wikipedia.org/wiki/A*_search_algorithm) with 4-directional unit-cost moves
//! and the [Manhattan distance](https://en.wikipedia.org/wiki/Taxicab_geometry) as heuristic,
//! reporting every node it opens or settles so a caller can animate the exploration.
//!
//! The search is deterministic: neighbours are enumerated up, down, left, right and frontier
//! ties on `f` go to the node discovered first. Running the same search twice gives the same
//! events and the same path.
//!
//! [PathSearch] is the raw event stream over a borrowed [Grid]. [PathSearchEngine] validates
//! input, paces the search with an optional per-step delay and forwards events to a
//! [SearchObserver]. [Maze] is an editable maze that paints a search onto its cells.
mod astar;
mod coord;
mod engine;
mod error;
mod grid;
mod maze;
mod observer;

pub use crate::astar::{FoundPath, Heuristic, PathSearch, SearchEvent, SearchOutcome};
pub use crate::coord::Coord;
pub use crate::engine::{step_delay_for_speed, PathSearchEngine, SearchOptions};
pub use crate::error::{GridParseError, SearchError, SearchResult};
pub use crate::grid::{CellState, Components, Grid};
pub use crate::maze::{Maze, MazeStats, Tool};
pub use crate::observer::{NoOpObserver, NodeKind, SearchObserver};

use itertools::Itertools;

pub const DEFAULT_GRID_SIZE: usize = 50;
/// Percent; see [step_delay_for_speed].
pub const DEFAULT_ANIMATION_SPEED: u8 = 50;

/// Checks that a path runs from `start` to `end` through passable cells, moving exactly one
/// step along one axis at a time.
pub fn is_valid_path(grid: &Grid, path: &[Coord], start: Coord, end: Coord) -> bool {
    path.first() == Some(&start)
        && path.last() == Some(&end)
        && path.iter().all(|c| grid.is_passable(*c))
        && path.iter().tuple_windows().all(|(a, b)| a.is_adjacent(b))
}
