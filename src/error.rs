use thiserror::Error;

/// Fatal problems found while setting up a game.
///
/// Blocked moves, out-of-bounds clicks and repeated transitions are not
/// errors; the engine absorbs them silently.
#[derive(Debug, Error, PartialEq)]
pub enum GameError {
    #[error("grid dimensions {width}x{height} must both be at least 1")]
    InvalidDimensions { width: i32, height: i32 },
    #[error("grid has {available} cells but setup needs {needed}")]
    GridTooSmall { needed: usize, available: usize },
    #[error("no free cell left while placing {placing}")]
    NoFreeCell { placing: &'static str },
    #[error("{name} must be between 0.0 and 1.0, got {value}")]
    InvalidProbability { name: &'static str, value: f64 },
}
