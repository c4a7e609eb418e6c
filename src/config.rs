use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

/// Application-level constants
pub const APP_NAME: &str = "MediVision";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Download name of the rendered report.
pub const REPORT_FILENAME: &str = "MediVision_Report.pdf";

/// Local-only by default.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8501";

pub const ENV_DATA_DIR: &str = "MEDIVISION_DATA_DIR";
pub const ENV_RESOURCES_DIR: &str = "MEDIVISION_RESOURCES_DIR";
pub const ENV_BIND_ADDR: &str = "MEDIVISION_BIND";

/// Filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "medivision=info,medivision_lib=info,tower_http=info"
}

/// Get the application data directory
/// ~/MediVision/ on all platforms
pub fn app_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Get the default resources directory (vocabulary, model, precautions, logo)
pub fn resources_dir() -> PathBuf {
    app_data_dir().join("resources")
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid bind address '{value}': {reason}")]
    InvalidBindAddr { value: String, reason: String },
}

/// Paths and addresses injected at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub resources_dir: PathBuf,
    pub bind_addr: SocketAddr,
}

impl AppConfig {
    /// Resolve configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let data_dir = lookup(ENV_DATA_DIR)
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(app_data_dir);

        let resources_dir = lookup(ENV_RESOURCES_DIR)
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(resources_dir);

        let bind_raw = lookup(ENV_BIND_ADDR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw
            .trim()
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidBindAddr {
                value: bind_raw.clone(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            data_dir,
            resources_dir,
            bind_addr,
        })
    }

    /// SQLite file holding the prediction history.
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("history.db")
    }

    /// Optional branding image drawn at the top of each report.
    pub fn logo_path(&self) -> PathBuf {
        self.resources_dir.join("logo.png")
    }

    /// Scratch directory for report artifacts before they are read back.
    pub fn scratch_dir(&self) -> PathBuf {
        self.data_dir.join("tmp")
    }
}
