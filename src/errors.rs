use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CollyError {
    #[error("File collection failed: {0}")]
    CollectionError(String),

    #[error("Skipped {}: {reason}", path.display())]
    FileSkipError { path: PathBuf, reason: String },

    #[error("No clipboard mechanism available: {0}")]
    ClipboardUnavailableError(String),

    #[error("Clipboard write failed: {0}")]
    ClipboardWriteError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Tokenizer Error: {0}")]
    TokenizerError(String),

    #[error("IO Error: {0}")]
    IoError(String),

    #[error("Invalid pattern: {0}")]
    PatternError(String),
}

impl From<std::io::Error> for CollyError {
    fn from(err: std::io::Error) -> Self {
        CollyError::IoError(err.to_string())
    }
}

impl From<glob::PatternError> for CollyError {
    fn from(err: glob::PatternError) -> Self {
        CollyError::PatternError(err.to_string())
    }
}
