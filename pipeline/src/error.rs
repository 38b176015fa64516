use std::{
    error::Error,
    fmt::{self, Display},
};

use artifacts::ArtifactErr;

/// The pipeline module's result type.
pub type Result<T> = std::result::Result<T, PipelineErr>;

/// Failures while turning raw inputs into an estimate.
///
/// Every variant is terminal for the request that produced it.
#[derive(Debug)]
pub enum PipelineErr {
    /// A categorical field holds a value outside its enumeration.
    InvalidCategory { field: &'static str, value: String },
    /// A numeric field lies outside its declared domain.
    OutOfRange {
        field: &'static str,
        value: String,
        range: &'static str,
    },
    /// An artifact consumed or produced a row of the wrong width.
    FeatureShapeMismatch {
        what: &'static str,
        got: usize,
        expected: usize,
    },
    /// The model produced a value that cannot be displayed as an amount.
    NonFinite(f64),
    Artifact(ArtifactErr),
}

impl Display for PipelineErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineErr::InvalidCategory { field, value } => {
                write!(f, "invalid {field}: '{value}' is not a known category")
            }
            PipelineErr::OutOfRange {
                field,
                value,
                range,
            } => write!(f, "{field} {value} is out of range {range}"),
            PipelineErr::FeatureShapeMismatch {
                what,
                got,
                expected,
            } => write!(
                f,
                "feature shape mismatch for {what}: got {got}, expected {expected}"
            ),
            PipelineErr::NonFinite(v) => write!(f, "model produced a non-finite value: {v}"),
            PipelineErr::Artifact(e) => write!(f, "artifact error: {e}"),
        }
    }
}

impl Error for PipelineErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PipelineErr::Artifact(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ArtifactErr> for PipelineErr {
    fn from(value: ArtifactErr) -> Self {
        match value {
            ArtifactErr::ShapeMismatch {
                what,
                got,
                expected,
            } => PipelineErr::FeatureShapeMismatch {
                what,
                got,
                expected,
            },
            other => PipelineErr::Artifact(other),
        }
    }
}

/// Boundary conversion for binaries / I/O APIs.
impl From<PipelineErr> for std::io::Error {
    fn from(value: PipelineErr) -> Self {
        match value {
            PipelineErr::Artifact(e) => e.into(),
            other => std::io::Error::new(std::io::ErrorKind::InvalidData, other),
        }
    }
}
