use std::{
    error::Error,
    fmt::{self, Display},
    io,
    path::PathBuf,
};

/// The artifacts module's result type.
pub type Result<T> = std::result::Result<T, ArtifactErr>;

/// Failures while loading or evaluating a pre-fit artifact.
#[derive(Debug)]
pub enum ArtifactErr {
    /// The artifact file could not be opened or read.
    Io { path: PathBuf, source: io::Error },
    /// The artifact file is not a valid serialized artifact.
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    /// The scaler parameters are inconsistent.
    InvalidScaler(String),
    /// The regression model parameters are inconsistent.
    InvalidModel(String),
    /// An input matrix does not have the width the artifact was fit against.
    ShapeMismatch {
        what: &'static str,
        got: usize,
        expected: usize,
    },
}

impl Display for ArtifactErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactErr::Io { path, source } => {
                write!(f, "cannot read artifact '{}': {source}", path.display())
            }
            ArtifactErr::Parse { path, source } => {
                write!(f, "corrupt artifact '{}': {source}", path.display())
            }
            ArtifactErr::InvalidScaler(msg) => write!(f, "invalid scaler: {msg}"),
            ArtifactErr::InvalidModel(msg) => write!(f, "invalid model: {msg}"),
            ArtifactErr::ShapeMismatch {
                what,
                got,
                expected,
            } => write!(
                f,
                "shape mismatch for {what}: got {got} columns, expected {expected}"
            ),
        }
    }
}

impl Error for ArtifactErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ArtifactErr::Io { source, .. } => Some(source),
            ArtifactErr::Parse { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Boundary conversion for binaries / I/O APIs.
impl From<ArtifactErr> for io::Error {
    fn from(value: ArtifactErr) -> Self {
        let kind = match &value {
            ArtifactErr::Io { source, .. } => source.kind(),
            _ => io::ErrorKind::InvalidData,
        };
        io::Error::new(kind, value)
    }
}
