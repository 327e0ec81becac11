use thiserror::Error;

#[derive(Error, Debug)]
pub enum CapgenError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Audio extraction error: {0}")]
    Extraction(String),

    #[error("Speech API error: {0}")]
    Speech(String),

    #[error("Translation error: {0}")]
    Translation(String),

    #[error("Audio storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, CapgenError>;
