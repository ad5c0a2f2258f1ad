//! Error types for the layout engine.
//!
//! The runtime kinds (`ConfigurationNotFound`, `InvalidRange`,
//! `ArithmeticDegeneracy`, `TooltipInputInconsistency`) are only surfaced by the
//! strict `try_*` entry points. The render-path operations degrade to an empty
//! or default value and log instead.

/// Result type for engine operations
pub type LayoutResult<T> = Result<T, LayoutError>;

/// Error type for engine operations
#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    #[error("Zoom level not found: {0}")]
    ConfigurationNotFound(String),

    #[error("Invalid date range: {start} > {end}")]
    InvalidRange {
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    },

    #[error("Degenerate day width: {0}")]
    ArithmeticDegeneracy(f64),

    #[error("Inconsistent tooltip input: {0}")]
    TooltipInputInconsistency(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
