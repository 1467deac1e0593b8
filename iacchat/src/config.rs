use std::env;
use std::path::PathBuf;

use tracing::info;

const DEFAULT_DB_PATH: &str = "iacchat.db";
const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database_path: PathBuf,
    /// Directory for the rolling log file; stderr only when unset
    pub log_dir: Option<PathBuf>,
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(DEFAULT_DB_PATH),
            log_dir: None,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl Config {
    /// Priority: process env -> `.env` file -> defaults
    pub fn from_env() -> Self {
        if let Ok(path) = dotenvy::dotenv() {
            info!(path = %path.display(), "Loaded .env");
        }
        Self::from_vars(|key| env::var(key).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| var(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        Self {
            database_path: non_empty("IACCHAT_DB_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.database_path),
            log_dir: non_empty("IACCHAT_LOG_DIR").map(PathBuf::from),
            log_filter: non_empty("RUST_LOG").unwrap_or(defaults.log_filter),
        }
    }
}
