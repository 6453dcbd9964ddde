use std::env;
use std::path::PathBuf;

pub const SERVER_NAME: &str = "fear-greed-index";

const DEFAULT_VERSION: &str = "0.0.1";
const DEFAULT_LOG_LEVEL: &str = "info";

/// Process configuration, read once from the environment at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Version reported to the host during `initialize`
    pub version: String,
    /// Fallback filter when `RUST_LOG` is unset
    pub log_level: String,
    /// Append logs here instead of stderr
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: DEFAULT_VERSION.to_string(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            log_file: None,
        }
    }
}

impl Config {
    /// Reads `VERSION` and `FEAR_GREED_LOG_FILE`; empty values count as unset
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();
        Self {
            version: non_empty("VERSION").unwrap_or(defaults.version),
            log_level: defaults.log_level,
            log_file: non_empty("FEAR_GREED_LOG_FILE").map(PathBuf::from),
        }
    }
}
