use thiserror::Error;

#[derive(Error, Debug)]
pub enum LitterboxError {
    #[error("Invalid program: {0}")]
    InvalidProgram(String),

    #[error("Search error: {0}")]
    Search(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LitterboxError>;
