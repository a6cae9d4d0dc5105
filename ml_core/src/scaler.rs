use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

use crate::MlError;

/// Standardizes features to zero mean and unit variance, column by column.
///
/// The standard deviation is the population one (`ddof = 0`). Columns with no variance are
/// only centered.
#[derive(Debug, Clone, Default)]
pub struct StandardScaler {
    params: Option<ScaleParams>,
}

#[derive(Debug, Clone)]
struct ScaleParams {
    mean: Array1<f64>,
    scale: Array1<f64>,
}

impl StandardScaler {
    /// Returns a new unfitted `StandardScaler`.
    pub fn new() -> Self {
        Self { params: None }
    }

    /// Learns the per-column mean and standard deviation of `x`.
    ///
    /// # Errors
    /// Returns `MlError::EmptyDataset` if `x` has no rows.
    pub fn fit(&mut self, x: ArrayView2<f64>) -> Result<(), MlError> {
        let mean = x.mean_axis(Axis(0)).ok_or(MlError::EmptyDataset)?;
        let scale = x
            .std_axis(Axis(0), 0.0)
            .mapv(|s| if s < f64::EPSILON { 1.0 } else { s });

        self.params = Some(ScaleParams { mean, scale });
        Ok(())
    }

    /// Scales `x` with the fitted parameters.
    ///
    /// # Errors
    /// Returns `MlError::NotFitted` before `fit`, or `MlError::ShapeMismatch` if the number of
    /// columns differs from the fitted one.
    pub fn transform(&self, x: ArrayView2<f64>) -> Result<Array2<f64>, MlError> {
        let params = self.params.as_ref().ok_or(MlError::NotFitted("scaler"))?;

        if x.ncols() != params.mean.len() {
            return Err(MlError::ShapeMismatch {
                what: "scaler columns",
                got: x.ncols(),
                expected: params.mean.len(),
            });
        }

        Ok((&x - &params.mean) / &params.scale)
    }

    /// Scales a single feature row.
    ///
    /// # Errors
    /// Same as [`StandardScaler::transform`].
    pub fn transform_row(&self, row: ArrayView1<f64>) -> Result<Array1<f64>, MlError> {
        let x = row.insert_axis(Axis(0));
        Ok(self.transform(x)?.row(0).to_owned())
    }

    /// Fits over `x` and returns it scaled.
    ///
    /// # Errors
    /// Same as [`StandardScaler::fit`].
    pub fn fit_transform(&mut self, x: ArrayView2<f64>) -> Result<Array2<f64>, MlError> {
        self.fit(x)?;
        self.transform(x)
    }
}
