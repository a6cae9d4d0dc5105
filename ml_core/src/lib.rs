//! Regression toolkit: tabular datasets, feature scaling, train/test splitting and tree-based
//! regressors.

mod data;
mod error;
mod forest;
mod model;
mod multi_output;
mod scaler;
mod split;
mod stats;
mod tree;

pub use data::Dataset;
pub use error::MlError;
pub use forest::{ForestConfig, RandomForestRegressor};
pub use model::Regressor;
pub use multi_output::MultiOutputRegressor;
pub use scaler::StandardScaler;
pub use split::train_test_split;
pub use stats::{mean_squared_error, r2_score};
pub use tree::{DecisionTreeRegressor, TreeConfig};
