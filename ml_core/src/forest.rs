use log::debug;
use ndarray::{Array1, ArrayView1, ArrayView2, Axis};
use rand::{rngs::StdRng, Rng, SeedableRng};
use rayon::prelude::*;
use serde::Deserialize;

use crate::{model::check_fit_input, DecisionTreeRegressor, MlError, Regressor, TreeConfig};

/// Random forest configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ForestConfig {
    /// Number of trees in the forest.
    pub n_trees: usize,
    /// Maximum depth of each tree, `None` grows them fully.
    pub max_depth: Option<usize>,
    /// Minimum samples to split a node.
    pub min_samples_split: usize,
    /// Minimum samples in a leaf.
    pub min_samples_leaf: usize,
    /// Features considered per split, `None` uses all of them.
    pub max_features: Option<usize>,
    /// Fit each tree over a bootstrap sample instead of the full data.
    pub bootstrap: bool,
    /// Seed every per-tree generator derives from.
    pub seed: u64,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: None,
            bootstrap: true,
            seed: 42,
        }
    }
}

/// An averaging ensemble of [`DecisionTreeRegressor`]s.
///
/// Tree `i` draws its bootstrap sample and its own split seed from a generator seeded with
/// `seed + i`, so a fit is reproducible regardless of how the trees are scheduled across
/// threads.
#[derive(Debug, Clone)]
pub struct RandomForestRegressor {
    config: ForestConfig,
    trees: Vec<DecisionTreeRegressor>,
}

impl RandomForestRegressor {
    /// Returns a new unfitted forest.
    pub fn new(config: ForestConfig) -> Self {
        Self {
            config,
            trees: Vec::new(),
        }
    }

    pub fn trees(&self) -> &[DecisionTreeRegressor] {
        &self.trees
    }

    fn fit_tree(
        &self,
        i: usize,
        x: ArrayView2<f64>,
        y: ArrayView1<f64>,
    ) -> Result<DecisionTreeRegressor, MlError> {
        let mut rng = StdRng::seed_from_u64(self.config.seed.wrapping_add(i as u64));
        let n = x.nrows();

        let sample: Option<Vec<usize>> = self
            .config
            .bootstrap
            .then(|| (0..n).map(|_| rng.random_range(0..n)).collect());

        let mut tree = DecisionTreeRegressor::new(TreeConfig {
            max_depth: self.config.max_depth,
            min_samples_split: self.config.min_samples_split,
            min_samples_leaf: self.config.min_samples_leaf,
            max_features: self.config.max_features,
            seed: rng.random(),
        });

        match sample {
            Some(indices) => {
                let xs = x.select(Axis(0), &indices);
                let ys = y.select(Axis(0), &indices);
                tree.fit(xs.view(), ys.view())?;
            }
            None => tree.fit(x, y)?,
        }

        Ok(tree)
    }
}

impl Regressor for RandomForestRegressor {
    fn fit(&mut self, x: ArrayView2<f64>, y: ArrayView1<f64>) -> Result<(), MlError> {
        check_fit_input(x, y)?;

        if self.config.n_trees == 0 {
            return Err(MlError::InvalidInput("a forest needs at least one tree"));
        }

        let trees = (0..self.config.n_trees)
            .into_par_iter()
            .map(|i| self.fit_tree(i, x, y))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            "fitted {} trees over {} samples, mean depth {:.1}",
            trees.len(),
            x.nrows(),
            trees.iter().map(|t| t.depth()).sum::<usize>() as f64 / trees.len() as f64
        );

        self.trees = trees;
        Ok(())
    }

    fn predict(&self, x: ArrayView2<f64>) -> Result<Array1<f64>, MlError> {
        if self.trees.is_empty() {
            return Err(MlError::NotFitted("random forest"));
        }

        let mut sum = Array1::<f64>::zeros(x.nrows());
        for tree in &self.trees {
            sum += &tree.predict(x)?;
        }

        Ok(sum / self.trees.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use ndarray::{array, Array1, Array2};
    use ndarray_rand::{rand_distr::Uniform, RandomExt};

    use super::*;
    use crate::r2_score;

    fn small_forest() -> ForestConfig {
        ForestConfig {
            n_trees: 20,
            ..Default::default()
        }
    }

    #[test]
    fn fits_a_smooth_function() {
        let mut rng = StdRng::seed_from_u64(42);
        let x = Array2::random_using((200, 2), Uniform::new(0.0, 10.0).unwrap(), &mut rng);
        let y: Array1<f64> = x.rows().into_iter().map(|r| 3.0 * r[0] - r[1]).collect();

        let mut forest = RandomForestRegressor::new(small_forest());
        forest.fit(x.view(), y.view()).unwrap();

        let pred = forest.predict(x.view()).unwrap();
        assert!(r2_score(y.view(), pred.view()).unwrap() > 0.9);
    }

    #[test]
    fn same_seed_same_predictions() {
        let mut rng = StdRng::seed_from_u64(1);
        let x = Array2::random_using((60, 3), Uniform::new(-1.0, 1.0).unwrap(), &mut rng);
        let y = Array1::random_using(60, Uniform::new(0.0, 69.0).unwrap(), &mut rng);

        let mut a = RandomForestRegressor::new(small_forest());
        let mut b = RandomForestRegressor::new(small_forest());
        a.fit(x.view(), y.view()).unwrap();
        b.fit(x.view(), y.view()).unwrap();

        assert_eq!(a.predict(x.view()).unwrap(), b.predict(x.view()).unwrap());
    }

    #[test]
    fn without_bootstrap_every_tree_sees_everything() {
        let x = array![[0.0], [1.0], [2.0], [3.0]];
        let y = array![1.0, 2.0, 3.0, 4.0];

        let config = ForestConfig {
            n_trees: 5,
            bootstrap: false,
            ..Default::default()
        };
        let mut forest = RandomForestRegressor::new(config);
        forest.fit(x.view(), y.view()).unwrap();

        assert_eq!(forest.trees().len(), 5);
        assert_eq!(forest.predict(x.view()).unwrap(), y);
    }

    #[test]
    fn predictions_stay_within_target_range() {
        let mut rng = StdRng::seed_from_u64(9);
        let x = Array2::random_using((80, 4), Uniform::new(0.0, 1.0).unwrap(), &mut rng);
        let y = Array1::random_using(80, Uniform::new(1.0, 26.0).unwrap(), &mut rng);

        let mut forest = RandomForestRegressor::new(small_forest());
        forest.fit(x.view(), y.view()).unwrap();

        let probe = Array2::random_using((10, 4), Uniform::new(-5.0, 5.0).unwrap(), &mut rng);
        for p in forest.predict(probe.view()).unwrap() {
            assert!((1.0..=26.0).contains(&p), "prediction {p} out of range");
        }
    }

    #[test]
    fn errors() {
        let forest = RandomForestRegressor::new(ForestConfig::default());
        assert_eq!(
            forest.predict(array![[1.0]].view()),
            Err(MlError::NotFitted("random forest"))
        );

        let mut forest = RandomForestRegressor::new(ForestConfig {
            n_trees: 0,
            ..Default::default()
        });
        assert!(forest.fit(array![[1.0]].view(), array![1.0].view()).is_err());
    }
}
