pub mod error;
pub mod features;
mod pipeline;

pub use error::{PipelineErr, Result};
pub use features::{Applicant, Category, FeatureRow, Region, Sex, Smoker, encode};
pub use pipeline::Pipeline;
