use log::debug;

use crate::{
    Result,
    regressor::{AnyRegressor, LinearRegression, RandomForest},
    scaler::{AnyScaler, MinMaxScaler, StandardScaler},
    specs::{RegressorSpec, ScalerSpec},
};

/// Turns deserialized specifications into validated runtime artifacts.
pub struct ArtifactBuilder;

impl ArtifactBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Builds a scaler from its specification.
    ///
    /// # Arguments
    /// * `spec` - The scaler's specification.
    ///
    /// # Returns
    /// A new `AnyScaler` or an error if the parameters are inconsistent.
    pub fn build_scaler(&self, spec: ScalerSpec) -> Result<AnyScaler> {
        let scaler = match spec {
            ScalerSpec::Standard { mean, scale } => {
                AnyScaler::Standard(StandardScaler::new(mean, scale)?)
            }
            ScalerSpec::MinMax { min, scale } => AnyScaler::MinMax(MinMaxScaler::new(min, scale)?),
        };

        debug!("built scaler {scaler:?}");
        Ok(scaler)
    }

    /// Builds a regressor from its specification.
    ///
    /// # Arguments
    /// * `spec` - The regressor's specification.
    ///
    /// # Returns
    /// A new `AnyRegressor` or an error if the parameters are inconsistent.
    pub fn build_regressor(&self, spec: RegressorSpec) -> Result<AnyRegressor> {
        let regressor = match spec {
            RegressorSpec::RandomForest { n_features, trees } => {
                let forest = RandomForest::new(n_features, &trees)?;
                debug!(n_features = n_features, trees = forest.len(); "built random forest");
                AnyRegressor::RandomForest(forest)
            }
            RegressorSpec::Linear {
                coefficients,
                intercept,
            } => {
                debug!(n_features = coefficients.len(); "built linear regression");
                AnyRegressor::Linear(LinearRegression::new(coefficients, intercept)?)
            }
        };

        Ok(regressor)
    }
}

impl Default for ArtifactBuilder {
    fn default() -> Self {
        Self::new()
    }
}
