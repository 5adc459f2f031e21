use std::path::PathBuf;

use thiserror::Error;

/// The main error type for devops operations
#[derive(Debug, Error)]
pub enum DevopsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Error processing {}: {message}", path.display())]
    ManifestParse { path: PathBuf, message: String },

    #[error("Error in {}: {message}", path.display())]
    MalformedRequirementsFile { path: PathBuf, message: String },

    #[error("{} does not exist", .0.display())]
    FileNotFound(PathBuf),

    #[error("Service '{service}' has a port that is not a valid port number: {value}")]
    UnknownServicePort { service: String, value: String },

    #[error("Environment file error: {0}")]
    EnvFile(String),

    #[error("Path error: {0}")]
    Path(String),

    #[error("Project error: {0}")]
    Project(String),

    #[error("Script error: {0}")]
    Script(String),

    #[error("Execution error: {0}")]
    Execution(String),
}

/// Result type alias for devops operations
pub type DevopsResult<T> = Result<T, DevopsError>;
