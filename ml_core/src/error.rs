use std::fmt;

/// Errors produced by the regression toolkit when inputs are invalid.
#[derive(Debug, Clone, PartialEq)]
pub enum MlError {
    /// An input is invalid for semantic or domain reasons.
    InvalidInput(&'static str),

    /// A shape invariant was violated (e.g. mismatched lengths).
    ShapeMismatch {
        /// Human-readable context for the mismatch (e.g. "features", "targets").
        what: &'static str,
        /// Observed value.
        got: usize,
        /// Expected value.
        expected: usize,
    },

    /// `predict` or `transform` was called before `fit`.
    NotFitted(&'static str),

    /// A fit was attempted over zero samples.
    EmptyDataset,
}

impl fmt::Display for MlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MlError::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            MlError::ShapeMismatch { what, got, expected } => {
                write!(f, "shape mismatch for {what}: got {got}, expected {expected}")
            }
            MlError::NotFitted(what) => write!(f, "{what} must be fitted before use"),
            MlError::EmptyDataset => write!(f, "cannot fit over an empty dataset"),
        }
    }
}

impl std::error::Error for MlError {}
