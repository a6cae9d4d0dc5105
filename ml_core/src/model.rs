use ndarray::{Array1, ArrayView1, ArrayView2};

use crate::MlError;

/// A single-output regression estimator.
///
/// A `Regressor` learns a mapping from feature rows to one scalar target.
/// It does not:
/// - scale its inputs,
/// - split datasets,
/// - handle more than one target (see `MultiOutputRegressor`).
pub trait Regressor: Send + Sync {
    /// Fits the estimator over `x` (one row per sample) and the matching targets `y`.
    ///
    /// Fitting an already fitted estimator discards the previous fit.
    ///
    /// # Errors
    /// Returns `MlError` if `x` is empty or its rows don't match `y`.
    fn fit(&mut self, x: ArrayView2<f64>, y: ArrayView1<f64>) -> Result<(), MlError>;

    /// Predicts one value per row of `x`.
    ///
    /// # Errors
    /// Returns `MlError::NotFitted` before `fit`, or `MlError::ShapeMismatch` if the number of
    /// features differs from the one seen during `fit`.
    fn predict(&self, x: ArrayView2<f64>) -> Result<Array1<f64>, MlError>;
}

/// Checks the shared preconditions of every `Regressor::fit`.
pub(crate) fn check_fit_input(x: ArrayView2<f64>, y: ArrayView1<f64>) -> Result<(), MlError> {
    if x.nrows() == 0 {
        return Err(MlError::EmptyDataset);
    }

    if x.ncols() == 0 {
        return Err(MlError::InvalidInput("at least one feature column is required"));
    }

    if x.nrows() != y.len() {
        return Err(MlError::ShapeMismatch {
            what: "targets",
            got: y.len(),
            expected: x.nrows(),
        });
    }

    Ok(())
}
