use ndarray::{Array1, ArrayView1, ArrayView2};
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

use crate::{model::check_fit_input, MlError, Regressor};

/// Impurity decreases below this are treated as no improvement.
const MIN_GAIN: f64 = 1e-12;

/// Growth limits for a [`DecisionTreeRegressor`].
#[derive(Debug, Clone, PartialEq)]
pub struct TreeConfig {
    /// Maximum depth of the tree, `None` grows until leaves are pure or too small.
    pub max_depth: Option<usize>,
    /// Minimum samples a node needs to be split.
    pub min_samples_split: usize,
    /// Minimum samples each child of a split must keep.
    pub min_samples_leaf: usize,
    /// Features drawn per split, `None` considers all of them.
    pub max_features: Option<usize>,
    /// Seed for the per-split feature draw.
    pub seed: u64,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: None,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone)]
enum Node {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    fn depth(&self) -> usize {
        match self {
            Node::Leaf { .. } => 1,
            Node::Split { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    fn n_leaves(&self) -> usize {
        match self {
            Node::Leaf { .. } => 1,
            Node::Split { left, right, .. } => left.n_leaves() + right.n_leaves(),
        }
    }

    fn predict_row(&self, row: ArrayView1<f64>) -> f64 {
        let mut node = self;
        loop {
            match node {
                Node::Leaf { value } => return *value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if row[*feature] <= *threshold { &**left } else { &**right };
                }
            }
        }
    }
}

/// Running sums of a set of targets, enough to get their mean and squared error.
#[derive(Debug, Clone, Copy, Default)]
struct Moments {
    n: usize,
    sum: f64,
    sum_sq: f64,
}

impl Moments {
    fn push(&mut self, v: f64) {
        self.n += 1;
        self.sum += v;
        self.sum_sq += v * v;
    }

    fn minus(self, other: Moments) -> Moments {
        Moments {
            n: self.n - other.n,
            sum: self.sum - other.sum,
            sum_sq: self.sum_sq - other.sum_sq,
        }
    }

    fn mean(&self) -> f64 {
        self.sum / self.n as f64
    }

    /// Sum of squared deviations from the mean.
    fn sse(&self) -> f64 {
        (self.sum_sq - self.sum * self.sum / self.n as f64).max(0.0)
    }
}

/// A CART regression tree splitting on mean squared error.
///
/// Thresholds are midpoints between consecutive distinct feature values; a row goes left when
/// its value is `<=` the threshold.
#[derive(Debug, Clone)]
pub struct DecisionTreeRegressor {
    config: TreeConfig,
    root: Option<Node>,
    n_features: usize,
}

impl DecisionTreeRegressor {
    /// Returns a new unfitted tree.
    pub fn new(config: TreeConfig) -> Self {
        Self {
            config,
            root: None,
            n_features: 0,
        }
    }

    /// Returns the depth of the fitted tree, `0` if unfitted.
    pub fn depth(&self) -> usize {
        self.root.as_ref().map_or(0, Node::depth)
    }

    /// Returns the number of leaves of the fitted tree, `0` if unfitted.
    pub fn n_leaves(&self) -> usize {
        self.root.as_ref().map_or(0, Node::n_leaves)
    }

    fn build(
        &self,
        x: ArrayView2<f64>,
        y: ArrayView1<f64>,
        indices: Vec<usize>,
        depth: usize,
        rng: &mut StdRng,
    ) -> Node {
        let mut moments = Moments::default();
        for &i in &indices {
            moments.push(y[i]);
        }

        let leaf = Node::Leaf {
            value: moments.mean(),
        };

        let n = indices.len();
        let too_deep = self.config.max_depth.is_some_and(|max| depth >= max);
        if too_deep
            || n < self.config.min_samples_split
            || n < 2 * self.config.min_samples_leaf
            || moments.sse() <= MIN_GAIN
        {
            return leaf;
        }

        let Some((feature, threshold)) = self.best_split(x, y, &indices, moments, rng) else {
            return leaf;
        };

        let (left, right): (Vec<usize>, Vec<usize>) = indices
            .into_iter()
            .partition(|&i| x[[i, feature]] <= threshold);

        Node::Split {
            feature,
            threshold,
            left: Box::new(self.build(x, y, left, depth + 1, rng)),
            right: Box::new(self.build(x, y, right, depth + 1, rng)),
        }
    }

    /// Finds the `(feature, threshold)` pair with the lowest summed child error.
    fn best_split(
        &self,
        x: ArrayView2<f64>,
        y: ArrayView1<f64>,
        indices: &[usize],
        parent: Moments,
        rng: &mut StdRng,
    ) -> Option<(usize, f64)> {
        let n_features = x.ncols();
        let max_features = self
            .config
            .max_features
            .unwrap_or(n_features)
            .clamp(1, n_features);

        let mut features: Vec<usize> = (0..n_features).collect();
        features.shuffle(rng);
        features.truncate(max_features);

        let min_leaf = self.config.min_samples_leaf.max(1);
        let n = indices.len();
        let mut best: Option<(usize, f64)> = None;
        let mut best_err = parent.sse() - MIN_GAIN;
        let mut pairs: Vec<(f64, f64)> = Vec::with_capacity(n);

        for feature in features {
            pairs.clear();
            pairs.extend(indices.iter().map(|&i| (x[[i, feature]], y[i])));
            pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

            let mut left = Moments::default();
            for k in 1..n {
                let (prev, target) = pairs[k - 1];
                left.push(target);

                let next = pairs[k].0;
                if prev == next || k < min_leaf || n - k < min_leaf {
                    continue;
                }

                let err = left.sse() + parent.minus(left).sse();
                if err < best_err {
                    best_err = err;
                    let mid = (prev + next) / 2.0;
                    let threshold = if mid >= next { prev } else { mid };
                    best = Some((feature, threshold));
                }
            }
        }

        best
    }
}

impl Regressor for DecisionTreeRegressor {
    fn fit(&mut self, x: ArrayView2<f64>, y: ArrayView1<f64>) -> Result<(), MlError> {
        check_fit_input(x, y)?;

        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let indices: Vec<usize> = (0..x.nrows()).collect();

        self.n_features = x.ncols();
        self.root = Some(self.build(x, y, indices, 0, &mut rng));
        Ok(())
    }

    fn predict(&self, x: ArrayView2<f64>) -> Result<Array1<f64>, MlError> {
        let root = self.root.as_ref().ok_or(MlError::NotFitted("decision tree"))?;

        if x.ncols() != self.n_features {
            return Err(MlError::ShapeMismatch {
                what: "features",
                got: x.ncols(),
                expected: self.n_features,
            });
        }

        Ok(x.rows().into_iter().map(|row| root.predict_row(row)).collect())
    }
}
