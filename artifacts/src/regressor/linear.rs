use ndarray::{Array1, ArrayView2};

use super::{Regressor, check_width};
use crate::{ArtifactErr, Result};

/// Ordinary least squares: `y = x · coefficients + intercept`.
#[derive(Debug, Clone)]
pub struct LinearRegression {
    coefficients: Array1<f64>,
    intercept: f64,
}

impl LinearRegression {
    /// Creates a new `LinearRegression`.
    ///
    /// # Arguments
    /// * `coefficients` - One weight per feature column.
    /// * `intercept` - The bias term.
    ///
    /// # Returns
    /// A new `LinearRegression` or an error if the parameters are unusable.
    pub fn new(coefficients: Vec<f64>, intercept: f64) -> Result<Self> {
        if coefficients.is_empty() {
            return Err(ArtifactErr::InvalidModel(
                "linear model has no coefficients".into(),
            ));
        }
        if let Some(i) = coefficients.iter().position(|c| !c.is_finite()) {
            return Err(ArtifactErr::InvalidModel(format!("coefficients[{i}] is not finite")));
        }
        if !intercept.is_finite() {
            return Err(ArtifactErr::InvalidModel("intercept is not finite".into()));
        }

        Ok(Self {
            coefficients: Array1::from(coefficients),
            intercept,
        })
    }
}

impl Regressor for LinearRegression {
    fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    fn predict(&self, x: ArrayView2<f64>) -> Result<Array1<f64>> {
        check_width(x, self.n_features())?;
        Ok(x.dot(&self.coefficients) + self.intercept)
    }
}
