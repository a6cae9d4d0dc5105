use ndarray::{Array2, ArrayView1, ArrayView2, Axis};

use crate::MlError;

/// An in-memory supervised dataset: one feature row and one target row per sample.
///
/// A `Dataset` only *holds* samples. It does not define:
/// - how features were derived,
/// - whether they are scaled,
/// - which model consumes them.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    x: Array2<f64>,
    y: Array2<f64>,
}

impl Dataset {
    /// Creates a new dataset from a feature matrix and a target matrix.
    ///
    /// # Args
    /// * `x` - Features, shape `(n_samples, n_features)`.
    /// * `y` - Targets, shape `(n_samples, n_targets)`.
    ///
    /// # Errors
    /// Returns `MlError::ShapeMismatch` if both matrices don't have the same number of rows.
    pub fn new(x: Array2<f64>, y: Array2<f64>) -> Result<Self, MlError> {
        if x.nrows() != y.nrows() {
            return Err(MlError::ShapeMismatch {
                what: "target rows",
                got: y.nrows(),
                expected: x.nrows(),
            });
        }

        Ok(Self { x, y })
    }

    #[inline]
    pub fn n_samples(&self) -> usize {
        self.x.nrows()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.n_samples() == 0
    }

    #[inline]
    pub fn n_features(&self) -> usize {
        self.x.ncols()
    }

    #[inline]
    pub fn n_targets(&self) -> usize {
        self.y.ncols()
    }

    #[inline]
    pub fn features(&self) -> ArrayView2<'_, f64> {
        self.x.view()
    }

    #[inline]
    pub fn targets(&self) -> ArrayView2<'_, f64> {
        self.y.view()
    }

    /// Returns the `j`-th target column.
    ///
    /// # Errors
    /// Returns `MlError::ShapeMismatch` if `j` is not a valid target column.
    pub fn target(&self, j: usize) -> Result<ArrayView1<'_, f64>, MlError> {
        if j >= self.n_targets() {
            return Err(MlError::ShapeMismatch {
                what: "target column",
                got: j,
                expected: self.n_targets(),
            });
        }

        Ok(self.y.column(j))
    }

    /// Builds a new dataset with the rows at `indices`, in that order.
    ///
    /// Indices may repeat (bootstrap samples do).
    ///
    /// # Panics
    /// If any index is out of bounds.
    pub fn select(&self, indices: &[usize]) -> Self {
        Self {
            x: self.x.select(Axis(0), indices),
            y: self.y.select(Axis(0), indices),
        }
    }
}
