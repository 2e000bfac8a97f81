use thiserror::Error;

/// Kiln error types
#[derive(Error, Debug)]
pub enum KilnError {
    /// A required input was missing or empty
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Input could not be read as a gzip-compressed tar stream
    #[error("Malformed archive: {0}")]
    MalformedArchive(String),

    /// An archive entry failed the path or mode policy
    #[error("Policy violation for {path}: {reason}")]
    PolicyViolation { path: String, reason: String },

    /// The external build capability failed
    #[error("Build failed: {0}")]
    BuildFailure(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for KilnError {
    fn from(err: serde_json::Error) -> Self {
        KilnError::Config(err.to_string())
    }
}

/// Result type alias for Kiln operations
pub type Result<T> = std::result::Result<T, KilnError>;
