use ndarray::{Array2, ArrayView2};

use crate::{r2_score, Dataset, MlError, Regressor};

/// Fits one independent clone of a single-output regressor per target column.
///
/// Every clone starts from the same template, seed included.
#[derive(Debug, Clone)]
pub struct MultiOutputRegressor<R> {
    template: R,
    estimators: Vec<R>,
}

impl<R: Regressor + Clone> MultiOutputRegressor<R> {
    /// Returns a new unfitted `MultiOutputRegressor` built from `template`.
    pub fn new(template: R) -> Self {
        Self {
            template,
            estimators: Vec::new(),
        }
    }

    /// Returns the number of targets seen on `fit`, `0` if unfitted.
    pub fn n_outputs(&self) -> usize {
        self.estimators.len()
    }

    /// Fits one estimator per column of `y`.
    ///
    /// # Errors
    /// Returns `MlError` if `y` has no columns, its rows don't match `x`, or any per-target fit
    /// fails.
    pub fn fit(&mut self, x: ArrayView2<f64>, y: ArrayView2<f64>) -> Result<(), MlError> {
        if y.ncols() == 0 {
            return Err(MlError::InvalidInput("at least one target column is required"));
        }

        if x.nrows() != y.nrows() {
            return Err(MlError::ShapeMismatch {
                what: "target rows",
                got: y.nrows(),
                expected: x.nrows(),
            });
        }

        self.estimators = y
            .columns()
            .into_iter()
            .map(|column| {
                let mut estimator = self.template.clone();
                estimator.fit(x, column)?;
                Ok(estimator)
            })
            .collect::<Result<Vec<_>, MlError>>()?;

        Ok(())
    }

    /// Fits over the features and targets of `dataset`.
    ///
    /// # Errors
    /// Same as [`MultiOutputRegressor::fit`].
    pub fn fit_dataset(&mut self, dataset: &Dataset) -> Result<(), MlError> {
        self.fit(dataset.features(), dataset.targets())
    }

    /// Predicts one row of `n_outputs` values per row of `x`.
    ///
    /// # Errors
    /// Returns `MlError::NotFitted` before `fit`, or the first per-target prediction error.
    pub fn predict(&self, x: ArrayView2<f64>) -> Result<Array2<f64>, MlError> {
        if self.estimators.is_empty() {
            return Err(MlError::NotFitted("multi-output regressor"));
        }

        let mut out = Array2::<f64>::zeros((x.nrows(), self.estimators.len()));
        for (mut column, estimator) in out.columns_mut().into_iter().zip(&self.estimators) {
            column.assign(&estimator.predict(x)?);
        }

        Ok(out)
    }

    /// Returns the R² of each target over `dataset`, in target order.
    ///
    /// # Errors
    /// Returns `MlError` if unfitted or `dataset` has a different number of targets.
    pub fn score(&self, dataset: &Dataset) -> Result<Vec<f64>, MlError> {
        if dataset.n_targets() != self.n_outputs() {
            return Err(MlError::ShapeMismatch {
                what: "targets",
                got: dataset.n_targets(),
                expected: self.n_outputs(),
            });
        }

        let pred = self.predict(dataset.features())?;
        pred.columns()
            .into_iter()
            .zip(dataset.targets().columns())
            .map(|(p, t)| r2_score(t, p))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use ndarray::{array, Array2};

    use super::*;
    use crate::{DecisionTreeRegressor, TreeConfig};

    fn tree() -> MultiOutputRegressor<DecisionTreeRegressor> {
        MultiOutputRegressor::new(DecisionTreeRegressor::new(TreeConfig::default()))
    }

    #[test]
    fn one_estimator_per_target() {
        let x = array![[0.0], [1.0], [2.0], [3.0]];
        let y = array![[1.0, 10.0], [2.0, 20.0], [3.0, 30.0], [4.0, 40.0]];

        let mut model = tree();
        model.fit(x.view(), y.view()).unwrap();

        assert_eq!(model.n_outputs(), 2);
        assert_eq!(model.predict(x.view()).unwrap(), y);
    }

    #[test]
    fn score_per_target() {
        let x = array![[0.0], [1.0], [2.0], [3.0]];
        let y = array![[1.0, 5.0], [2.0, 5.0], [3.0, 5.0], [4.0, 5.0]];
        let ds = Dataset::new(x, y).unwrap();

        let mut model = tree();
        model.fit_dataset(&ds).unwrap();

        // The second target is constant, R² is defined as 0 there.
        assert_eq!(model.score(&ds).unwrap(), vec![1.0, 0.0]);
    }

    #[test]
    fn errors() {
        let model = tree();
        assert_eq!(
            model.predict(array![[1.0]].view()),
            Err(MlError::NotFitted("multi-output regressor"))
        );

        let mut model = tree();
        let no_targets = Array2::<f64>::zeros((2, 0));
        assert!(model.fit(array![[1.0], [2.0]].view(), no_targets.view()).is_err());
        assert!(model
            .fit(array![[1.0], [2.0]].view(), array![[1.0]].view())
            .is_err());
    }
}
