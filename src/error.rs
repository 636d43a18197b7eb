use thiserror::Error;

#[derive(Error, Debug)]
pub enum WeeklogError {
    #[error("No log database found. Run 'weeklog init' first.")]
    NotInitialized,

    #[error("Log database already exists at {0}.")]
    AlreadyInitialized(String),

    #[error("Entry not found: {0}")]
    EntryNotFound(String),

    #[error("Invalid entry: {0}")]
    InvalidEntry(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Generate error: {0}")]
    Generate(String),
}

pub type Result<T> = std::result::Result<T, WeeklogError>;
