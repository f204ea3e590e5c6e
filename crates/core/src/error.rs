//! Error types for the Taleweaver domain.
//!
//! Uses `thiserror` for ergonomic error definitions. Configuration has its
//! own error type in `taleweaver-config`.

use thiserror::Error;

/// The top-level error type for Taleweaver operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Boundary / precondition errors ---
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- I/O ---
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;
