use thiserror::Error;

/// Errors surfaced by the environment and its collaborators.
///
/// A battle template that does not match is not an error; classification
/// simply yields `None`.
#[derive(Debug, Error)]
pub enum Error {
    #[error("RAM mirror is {actual} bytes, expected at least {expected}")]
    MirrorTooShort { expected: usize, actual: usize },

    #[error("tile grid of {rows}x{cols} is too small for the battle menu slice")]
    TileGridShape { rows: usize, cols: usize },

    #[error("action index {0} is outside the button set")]
    InvalidAction(u8),

    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),

    #[error("checkpoint: {0}")]
    Checkpoint(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("emulator: {0}")]
    Emulator(String),
}

pub type Result<T> = std::result::Result<T, Error>;
