pub mod builder;
pub mod error;
pub mod regressor;
pub mod scaler;
pub mod specs;
mod store;

pub use builder::ArtifactBuilder;
pub use error::{ArtifactErr, Result};
pub use regressor::{AnyRegressor, Regressor};
pub use scaler::{AnyScaler, Scaler};
pub use store::{ArtifactStore, load_regressor, load_scaler};
