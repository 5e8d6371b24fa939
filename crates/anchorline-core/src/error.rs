//! Error types for the constraint engine.

use crate::anchor::LineId;
use crate::shape::ShapeId;
use thiserror::Error;

/// Errors returned by scene commands and by-id operations.
#[derive(Debug, Error, PartialEq)]
pub enum SceneError {
    #[error("Unknown shape: {0}")]
    UnknownShape(ShapeId),
    #[error("Unknown line: {0}")]
    UnknownLine(LineId),
    #[error("Degenerate shape: {width}x{height}")]
    DegenerateShape { width: f64, height: f64 },
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),
    #[error("Line {0} has dependents and cannot switch direction")]
    LineHasDependents(LineId),
}

/// Result type for scene operations.
pub type SceneResult<T> = Result<T, SceneError>;

/// Errors raised while loading an [`EngineConfig`](crate::config::EngineConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
