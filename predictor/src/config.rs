use std::{env, io, path::PathBuf};

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8501;
pub const DEFAULT_SCALER_FILE: &str = "scaler.json";
pub const DEFAULT_MODEL_FILE: &str = "rf_model.json";

/// Startup settings, read once from the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub artifacts_dir: PathBuf,
    pub scaler_file: String,
    pub model_file: String,
}

impl ServerConfig {
    /// Reads `HOST`, `PORT`, `ARTIFACTS_DIR`, `SCALER_FILE` and `MODEL_FILE`.
    ///
    /// # Returns
    /// The configuration or an io error if `PORT` is not a valid port number.
    pub fn from_env() -> io::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary variable source.
    ///
    /// # Arguments
    /// * `lookup` - Returns the value of a variable, if set.
    ///
    /// # Returns
    /// The configuration or an io error if a value cannot be used.
    pub fn from_lookup<F>(lookup: F) -> io::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT") {
            Some(port) => port.parse().map_err(|e| {
                io::Error::new(io::ErrorKind::InvalidInput, format!("PORT '{port}': {e}"))
            })?,
            None => DEFAULT_PORT,
        };

        let artifacts_dir = match lookup("ARTIFACTS_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => executable_dir()?,
        };

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            artifacts_dir,
            scaler_file: lookup("SCALER_FILE").unwrap_or_else(|| DEFAULT_SCALER_FILE.to_string()),
            model_file: lookup("MODEL_FILE").unwrap_or_else(|| DEFAULT_MODEL_FILE.to_string()),
        })
    }

    /// Returns the `host:port` pair to listen on.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// The directory holding the running executable; artifacts ship next to it.
fn executable_dir() -> io::Result<PathBuf> {
    let exe = env::current_exe()?;
    exe.parent().map(|p| p.to_path_buf()).ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::NotFound,
            format!("executable '{}' has no parent directory", exe.display()),
        )
    })
}
