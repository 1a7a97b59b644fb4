//! Error type for construction-time validation.
//!
//! Runtime paths never fail: a missing target is a silent no-op and bad form
//! input becomes field errors. Only configuration and data loading return
//! [`FolioError`].

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FolioError {
    #[error("typing sequencer needs at least one phrase")]
    EmptyPhrases,

    #[error("{0} must be at least 1ms")]
    ZeroDelay(&'static str),

    #[error("visibility threshold must be in (0, 1], got {0}")]
    InvalidThreshold(f32),

    #[error("page layout failed: {0}")]
    Layout(String),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, FolioError>;
