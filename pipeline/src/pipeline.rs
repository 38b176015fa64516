use artifacts::{AnyRegressor, AnyScaler, ArtifactStore, Regressor, Scaler};
use log::debug;
use ndarray::aview2;

use crate::{Applicant, FeatureRow, PipelineErr, Result};

/// Encodes, normalizes and scores applicants against a fixed pair of artifacts.
///
/// A `Pipeline` is immutable once built; share it behind an `Arc` to serve
/// concurrent requests.
#[derive(Debug, Clone)]
pub struct Pipeline<S = AnyScaler, R = AnyRegressor> {
    store: ArtifactStore<S, R>,
}

impl<S: Scaler, R: Regressor> Pipeline<S, R> {
    /// Creates a new `Pipeline`.
    ///
    /// # Arguments
    /// * `store` - The loaded scaler and model.
    ///
    /// # Returns
    /// A new `Pipeline` or a shape error if the artifacts were not fit on this
    /// feature layout.
    pub fn new(store: ArtifactStore<S, R>) -> Result<Self> {
        let numeric = FeatureRow::NUMERIC.len();
        if store.scaler().width() != numeric {
            return Err(PipelineErr::FeatureShapeMismatch {
                what: "scaler width",
                got: store.scaler().width(),
                expected: numeric,
            });
        }
        if store.regressor().n_features() != FeatureRow::WIDTH {
            return Err(PipelineErr::FeatureShapeMismatch {
                what: "model width",
                got: store.regressor().n_features(),
                expected: FeatureRow::WIDTH,
            });
        }

        Ok(Self { store })
    }

    /// Passes the numeric columns of `row` through the scaler.
    ///
    /// # Arguments
    /// * `row` - An encoded, unscaled row.
    ///
    /// # Returns
    /// A copy of `row` with `age`, `bmi` and `children` normalized.
    pub fn normalize(&self, row: &FeatureRow) -> Result<FeatureRow> {
        let numeric = [row.numeric()];
        let scaled = self.store.scaler().transform(aview2(&numeric))?;

        let values: [f64; 3] = scaled
            .as_slice()
            .and_then(|s| s.try_into().ok())
            .ok_or(PipelineErr::FeatureShapeMismatch {
                what: "scaler output",
                got: scaled.len(),
                expected: FeatureRow::NUMERIC.len(),
            })?;

        let mut normalized = *row;
        normalized.set_numeric(values);
        Ok(normalized)
    }

    /// Scores a single normalized row.
    ///
    /// # Arguments
    /// * `row` - An encoded and normalized row.
    ///
    /// # Returns
    /// The model's first (and only) output.
    pub fn predict(&self, row: &FeatureRow) -> Result<f64> {
        let x = [*row.values()];
        let y = self.store.regressor().predict(aview2(&x))?;

        let &value = y.first().ok_or(PipelineErr::FeatureShapeMismatch {
            what: "model output",
            got: 0,
            expected: 1,
        })?;

        if !value.is_finite() {
            return Err(PipelineErr::NonFinite(value));
        }
        Ok(value)
    }

    /// Runs encode, normalize and predict for one applicant.
    ///
    /// # Arguments
    /// * `applicant` - The raw form fields.
    ///
    /// # Returns
    /// The estimated annual charge or the first error of any stage.
    pub fn estimate(&self, applicant: &Applicant) -> Result<f64> {
        let raw = applicant.encode()?;
        let normalized = self.normalize(&raw)?;
        debug!(
            "encoded row {:?} normalized to {:?}",
            raw.values(),
            normalized.values()
        );

        let value = self.predict(&normalized)?;
        debug!(estimate = value; "prediction computed");
        Ok(value)
    }
}
