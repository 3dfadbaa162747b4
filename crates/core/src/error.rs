use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("unreadable artifact {path}: {reason}")]
    UnreadableArtifact { path: PathBuf, reason: String },
    #[error("duplicate provider for class {0} under strict conflict policy")]
    DuplicateProvider(String),
    #[error("duplicate module name {0} under strict conflict policy")]
    DuplicateModuleName(String),
    #[error("entry point {0} is not present in any scanned artifact")]
    PlanConstruction(String),
    #[error("resolution timed out after {0:?}")]
    ResolutionTimeout(Duration),
    #[error("failed to launch: {0}")]
    Launch(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LaunchError>;
