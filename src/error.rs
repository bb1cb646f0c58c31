use thiserror::Error;

use crate::coord::Coord;

/// Input-contract violations, reported before the search emits any callback. A maze with
/// no route between its endpoints is not an error, see [SearchOutcome](crate::SearchOutcome).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("{coord} lies outside the {size}x{size} grid")]
    OutOfBounds { coord: Coord, size: usize },

    #[error("{coord} is a wall")]
    Blocked { coord: Coord },

    #[error("both a start and an end cell must be placed before searching")]
    MissingEndpoint,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridParseError {
    #[error("row {row} has width {width}, expected {rows} for a square grid")]
    NotSquare {
        rows: usize,
        row: usize,
        width: usize,
    },

    #[error("unknown glyph {glyph:?} at ({row}, {col})")]
    UnknownGlyph { glyph: char, row: usize, col: usize },
}

pub type SearchResult<T> = Result<T, SearchError>;
