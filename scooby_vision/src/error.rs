//! Error types for the tracking core.

use std::path::PathBuf;

/// Everything that can go wrong while calibrating or tracking.
///
/// Only `OutOfBounds` and the ambient kinds ever reach a caller of the session. `NoBlobDetected`
/// is absorbed per frame and `DegenerateRatio` is folded into a `Stop` classification.
#[derive(Debug, thiserror::Error)]
pub enum TrackingError {
    #[error("selection ({x}, {y}) lies outside the {width}x{height} frame")]
    OutOfBounds {
        x: i64,
        y: i64,
        width: u32,
        height: u32,
    },

    #[error("no blob matching the target color was detected")]
    NoBlobDetected,

    #[error("relative change is not a finite number")]
    DegenerateRatio,

    #[error("frame buffer holds {actual} bytes, expected {expected}")]
    InvalidFrame { expected: usize, actual: usize },

    #[error("no frame has been received yet")]
    NoFrame,

    #[error("tracking session is no longer running")]
    SessionClosed,

    #[error("configuration error: {message}")]
    Config { message: String },

    #[error("config file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result alias used across the crate.
pub type TrackingResult<T> = Result<T, TrackingError>;

impl TrackingError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }
}
