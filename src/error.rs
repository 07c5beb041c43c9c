use thiserror::Error;

/// Errors surfaced by the game library.
#[derive(Error, Debug)]
pub enum GameError {
    #[error("console I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0} is not a valid integer")]
    InvalidBound(String),

    #[error("invalid choice: {0}. (choose from x2d, d2x, both)")]
    InvalidMode(String),

    #[error("a round was requested before the session was configured")]
    NotConfigured,

    #[error("could not install the interrupt handler: {0}")]
    SignalHandler(String),
}

impl From<ctrlc::Error> for GameError {
    fn from(e: ctrlc::Error) -> Self {
        GameError::SignalHandler(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GameError>;
