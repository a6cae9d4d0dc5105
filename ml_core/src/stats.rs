use ndarray::ArrayView1;

use crate::MlError;

fn check_lengths(y_true: ArrayView1<f64>, y_pred: ArrayView1<f64>) -> Result<(), MlError> {
    if y_true.is_empty() {
        return Err(MlError::EmptyDataset);
    }

    if y_true.len() != y_pred.len() {
        return Err(MlError::ShapeMismatch {
            what: "predictions",
            got: y_pred.len(),
            expected: y_true.len(),
        });
    }

    Ok(())
}

/// Mean squared error between the observed and predicted values.
///
/// # Errors
/// Returns `MlError` if the inputs are empty or their lengths differ.
pub fn mean_squared_error(y_true: ArrayView1<f64>, y_pred: ArrayView1<f64>) -> Result<f64, MlError> {
    check_lengths(y_true, y_pred)?;

    let sse: f64 = y_true
        .iter()
        .zip(y_pred.iter())
        .map(|(t, p)| (t - p).powi(2))
        .sum();

    Ok(sse / y_true.len() as f64)
}

/// Coefficient of determination (R²) of `y_pred` against `y_true`.
///
/// A constant `y_true` has no variance to explain and scores `0.0`.
///
/// # Errors
/// Returns `MlError` if the inputs are empty or their lengths differ.
pub fn r2_score(y_true: ArrayView1<f64>, y_pred: ArrayView1<f64>) -> Result<f64, MlError> {
    check_lengths(y_true, y_pred)?;

    let mean = y_true.sum() / y_true.len() as f64;
    let ss_tot: f64 = y_true.iter().map(|t| (t - mean).powi(2)).sum();
    let ss_res: f64 = y_true
        .iter()
        .zip(y_pred.iter())
        .map(|(t, p)| (t - p).powi(2))
        .sum();

    if ss_tot == 0.0 {
        return Ok(0.0);
    }

    Ok(1.0 - ss_res / ss_tot)
}
