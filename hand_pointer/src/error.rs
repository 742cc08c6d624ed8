//! Error types for configuration and frame providers.
//!
//! Per-frame processing has no error path: anything wrong with a frame
//! degrades to "no hand visible" inside the session.

use thiserror::Error;

/// A tuning value that would make the pipeline misbehave.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("pinch band must satisfy press_below < release_above (got {press_below} / {release_above})")]
    PinchBand { press_below: f64, release_above: f64 },

    #[error("{name} = {value} is outside {min}..={max}")]
    OutOfRange { name: &'static str, value: f64, min: f64, max: f64 },

    #[error("landmark index {index} for {role} is not part of the 21-point hand model")]
    LandmarkIndex { role: &'static str, index: usize },

    #[error("viewport must have a positive size (got {width}x{height})")]
    Viewport { width: f64, height: f64 },
}

/// Failure to bring a frame provider up.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    #[error("frame provider unavailable: {0}")]
    Unavailable(String),

    #[error("frame provider stopped before it was ready")]
    Disconnected,
}
