mod forest;
mod linear;

use ndarray::{Array1, ArrayView2};

use crate::{ArtifactErr, Result};

pub use forest::{DecisionTree, RandomForest};
pub use linear::LinearRegression;

/// A pre-trained regression function over fixed-width feature rows.
///
/// Implementations are immutable after construction and are shared between
/// requests without locking.
pub trait Regressor: Send + Sync {
    /// Returns the number of feature columns the model was trained on.
    fn n_features(&self) -> usize;

    /// Predicts one value per row of `x`.
    ///
    /// # Arguments
    /// * `x` - A `(n_samples, n_features)` matrix.
    ///
    /// # Returns
    /// The predictions in row order or a shape error if `x` has the wrong width.
    fn predict(&self, x: ArrayView2<f64>) -> Result<Array1<f64>>;
}

/// Any of the regressors an artifact file can describe.
#[derive(Debug, Clone)]
pub enum AnyRegressor {
    RandomForest(RandomForest),
    Linear(LinearRegression),
}

impl Regressor for AnyRegressor {
    fn n_features(&self) -> usize {
        match self {
            AnyRegressor::RandomForest(m) => m.n_features(),
            AnyRegressor::Linear(m) => m.n_features(),
        }
    }

    fn predict(&self, x: ArrayView2<f64>) -> Result<Array1<f64>> {
        match self {
            AnyRegressor::RandomForest(m) => m.predict(x),
            AnyRegressor::Linear(m) => m.predict(x),
        }
    }
}

fn check_width(x: ArrayView2<f64>, expected: usize) -> Result<()> {
    if x.ncols() != expected {
        return Err(ArtifactErr::ShapeMismatch {
            what: "model input",
            got: x.ncols(),
            expected,
        });
    }
    Ok(())
}
