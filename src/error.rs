use thiserror::Error;

/// Grid access outside `[0, width) x [0, height)`.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageError {
    #[error("position ({x}, {y}) is outside the {width}x{height} stage")]
    OutOfBounds {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),
}

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("expected {expected} rows of map text, got {found}")]
    ShortInput { expected: usize, found: usize },

    #[error("image size {width}x{height} does not fit a TGA header")]
    TooLarge { width: usize, height: usize },

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
