#[derive(Debug, thiserror::Error)]
pub enum CorpusError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Corpus is empty")]
    Empty,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
