use std::{fs::File, io::BufReader, path::Path};

use log::info;
use serde::de::DeserializeOwned;

use crate::{
    ArtifactErr, Regressor, Result, Scaler,
    builder::ArtifactBuilder,
    regressor::AnyRegressor,
    scaler::AnyScaler,
    specs::{RegressorSpec, ScalerSpec},
};

/// Loads and validates a scaler artifact.
///
/// # Arguments
/// * `path` - The location of a serialized `ScalerSpec`.
///
/// # Returns
/// The scaler or an error if the file is missing, corrupt or inconsistent.
pub fn load_scaler(path: &Path) -> Result<AnyScaler> {
    let spec: ScalerSpec = read_spec(path)?;
    let scaler = ArtifactBuilder::new().build_scaler(spec)?;
    info!("loaded scaler from {} ({} columns)", path.display(), scaler.width());
    Ok(scaler)
}

/// Loads and validates a regression model artifact.
///
/// # Arguments
/// * `path` - The location of a serialized `RegressorSpec`.
///
/// # Returns
/// The model or an error if the file is missing, corrupt or inconsistent.
pub fn load_regressor(path: &Path) -> Result<AnyRegressor> {
    let spec: RegressorSpec = read_spec(path)?;
    let regressor = ArtifactBuilder::new().build_regressor(spec)?;
    info!(
        "loaded model from {} ({} features)",
        path.display(),
        regressor.n_features()
    );
    Ok(regressor)
}

fn read_spec<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).map_err(|source| ArtifactErr::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_reader(BufReader::new(file)).map_err(|source| ArtifactErr::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// The pre-fit scaler and model, loaded once and shared read-only afterwards.
#[derive(Debug, Clone)]
pub struct ArtifactStore<S = AnyScaler, R = AnyRegressor> {
    scaler: S,
    regressor: R,
}

impl ArtifactStore {
    /// Loads both artifacts from a directory.
    ///
    /// # Arguments
    /// * `dir` - The directory holding the artifact files.
    /// * `scaler_file` - The scaler's file name inside `dir`.
    /// * `model_file` - The model's file name inside `dir`.
    ///
    /// # Returns
    /// A new `ArtifactStore` or the first loading error.
    pub fn open<P: AsRef<Path>>(dir: P, scaler_file: &str, model_file: &str) -> Result<Self> {
        let dir = dir.as_ref();
        let scaler = load_scaler(&dir.join(scaler_file))?;
        let regressor = load_regressor(&dir.join(model_file))?;
        Ok(Self { scaler, regressor })
    }
}

impl<S: Scaler, R: Regressor> ArtifactStore<S, R> {
    /// Creates a store from already built artifacts.
    pub fn new(scaler: S, regressor: R) -> Self {
        Self { scaler, regressor }
    }

    pub fn scaler(&self) -> &S {
        &self.scaler
    }

    pub fn regressor(&self) -> &R {
        &self.regressor
    }
}
