use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

/// Application-level constants
pub const APP_NAME: &str = "ClinicRecords";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// How far ahead list and dashboard views project recurring series.
pub const PROJECTION_HORIZON_DAYS: i64 = 90;

/// Portal dashboard "coming up" window.
pub const DASHBOARD_WINDOW_DAYS: i64 = 7;

/// Upper bound on generated occurrences for a single series in one call.
/// A weekly series anchored fifty years back stays well under this.
pub const MAX_OCCURRENCES_PER_SERIES: usize = 4096;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value}")]
    InvalidValue { var: &'static str, value: String },

    #[error("Cannot determine home directory")]
    NoHomeDirectory,
}

/// Get the application data directory (~/ClinicRecords/)
pub fn app_data_dir() -> Result<PathBuf, ConfigError> {
    let home = dirs::home_dir().ok_or(ConfigError::NoHomeDirectory)?;
    Ok(home.join(APP_NAME))
}

/// Default SQLite file location inside the data directory
pub fn default_database_path() -> Result<PathBuf, ConfigError> {
    Ok(app_data_dir()?.join("clinic.db"))
}

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "clinic_lib=info,tower_http=info,warn"
}

/// Runtime settings for the HTTP service, read from the environment.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub database_path: PathBuf,
    /// Optional JSON seed file loaded once at startup.
    pub seed_file: Option<PathBuf>,
}

impl ServerConfig {
    /// `CLINIC_BIND_ADDR`, `CLINIC_DB_PATH`, `CLINIC_SEED_FILE`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind_raw = lookup("CLINIC_BIND_ADDR")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw
            .trim()
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidValue {
                var: "CLINIC_BIND_ADDR",
                value: bind_raw.clone(),
            })?;

        let database_path = match lookup("CLINIC_DB_PATH").filter(|v| !v.trim().is_empty()) {
            Some(path) => PathBuf::from(path),
            None => default_database_path()?,
        };

        let seed_file = lookup("CLINIC_SEED_FILE")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            bind_addr,
            database_path,
            seed_file,
        })
    }
}
