//! Error types for the anime organizer.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the anime organizer.
#[derive(Error, Debug)]
pub enum Error {
    // File system errors
    #[error("Path not found: {0}")]
    PathNotFound(String),

    #[error("Not a directory: {0}")]
    NotADirectory(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("File already exists: {0}")]
    FileAlreadyExists(String),

    #[error("Source and target are on different filesystems: {0}")]
    DifferentFilesystems(String),

    // Parse errors
    #[error("Failed to parse filename: {0}")]
    ParseError(String),

    // Metadata errors
    #[error("Metadata search failed: {0}")]
    MetadataSearchError(String),

    #[error("No metadata candidate at index {index} ({available} available)")]
    CandidateOutOfRange { index: usize, available: usize },

    // Plan/Apply errors
    #[error("Invalid plan file: {0}")]
    InvalidPlanFile(String),

    #[error("File is not part of the plan: {0}")]
    NotInPlan(String),

    #[error("Materialization failed: {0}")]
    MaterializeError(String),

    // Config errors
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // HTTP errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    // JSON errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // TOML errors
    #[error("TOML parse error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    // Generic errors
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a generic error from a string.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Error::Other(msg.into())
    }
}
