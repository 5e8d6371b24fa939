//! Errors surfaced by the session runner.

use anchorline_core::{ConfigError, SceneError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Script error: {0}")]
    Script(#[from] serde_json::Error),
    #[error("Step {step} failed: {source}")]
    Step {
        step: usize,
        #[source]
        source: SceneError,
    },
    #[error("Unknown key: {0}")]
    UnknownKey(String),
}
