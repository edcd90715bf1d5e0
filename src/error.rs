#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The line source has no more input to give.
    #[error("end of input")]
    Eof,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unterminated quoted string")]
    UnterminatedQuotedString,

    #[error("invalid quoted string")]
    InvalidQuotedString,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T = ()> = std::result::Result<T, Error>;

impl Error {
    /// True when the error is the end-of-input signal rather than a failure.
    pub fn is_eof(&self) -> bool {
        matches!(self, Error::Eof)
    }
}
