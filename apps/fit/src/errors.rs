use thiserror::Error;

/// Fitting-engine error type.
///
/// Content variance (missing fields, empty sections, over-budget results) is never an
/// error. Only malformed configuration and unreadable input are rejected, each with
/// its own variant so callers can tell them apart without matching on messages.
#[derive(Debug, Error)]
pub enum FitError {
    #[error("Invalid configuration: usable page height must be positive, got {0}pt")]
    NonPositiveBudget(f32),

    #[error("Invalid configuration: {field} must be positive, got {value}")]
    NonPositiveCalibration { field: &'static str, value: f32 },

    #[error("Invalid configuration: skills chars_per_line must be at least 1")]
    ZeroCharsPerLine,

    #[error("Invalid configuration: max_iterations must be at least 1")]
    ZeroIterations,

    #[error("Invalid configuration: {field} ({ceiling}) is below min_bullets_per_item ({floor})")]
    CeilingBelowFloor {
        field: &'static str,
        ceiling: usize,
        floor: usize,
    },

    #[error("Invalid configuration: target reduction must be a non-negative number, got {0}pt")]
    NegativeTarget(f32),

    #[error("Failed to read document: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed document: {0}")]
    MalformedDocument(#[from] serde_json::Error),
}

impl FitError {
    /// True for the precondition failures raised before any fitting work starts.
    pub fn is_invalid_configuration(&self) -> bool {
        !matches!(self, FitError::Io(_) | FitError::MalformedDocument(_))
    }
}
