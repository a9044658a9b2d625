use thiserror::Error;

#[derive(Error, Debug)]
pub enum OutlineError {
    #[error("Path not found: {0}")]
    PathNotFound(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Unsupported file extension: {0}")]
    UnsupportedExtension(String),

    #[error("No file extension found for path: {0}")]
    NoExtension(String),

    #[error("Failed to read {path}: {source}")]
    ReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid ESTree AST: {0}")]
    Ast(#[source] serde_json::Error),

    #[error("Serialization error")]
    Serialization(#[from] serde_json::Error),

    #[error("Outline range violation: {0}")]
    RangeViolation(String),

    #[error("File watcher error: {0}")]
    Watch(#[from] notify::Error),
}
