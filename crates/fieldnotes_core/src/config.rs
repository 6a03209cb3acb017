//! Runtime configuration for the note store and the remote mirror.
//!
//! Values come from `FIELDNOTES_*` environment variables layered over
//! defaults. Unparseable values are ignored in favor of the default.

use crate::logging::default_log_level;
use std::path::PathBuf;

pub const DEFAULT_DB_FILE_NAME: &str = "fieldnotes.sqlite3";
pub const DEFAULT_MIRROR_BASE_URL: &str = "https://jsonplaceholder.typicode.com";
pub const DEFAULT_SEED_LIMIT: u32 = 5;
pub const DEFAULT_MIRROR_TIMEOUT_SECS: u64 = 10;

const ENV_DB_PATH: &str = "FIELDNOTES_DB_PATH";
const ENV_LOG_LEVEL: &str = "FIELDNOTES_LOG_LEVEL";
const ENV_LOG_DIR: &str = "FIELDNOTES_LOG_DIR";
const ENV_MIRROR_ENABLED: &str = "FIELDNOTES_MIRROR_ENABLED";
const ENV_MIRROR_URL: &str = "FIELDNOTES_MIRROR_URL";
const ENV_MIRROR_SEED_LIMIT: &str = "FIELDNOTES_MIRROR_SEED_LIMIT";
const ENV_MIRROR_TIMEOUT_SECS: &str = "FIELDNOTES_MIRROR_TIMEOUT_SECS";

/// Remote mirror settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorConfig {
    /// When false, no remote request is ever issued.
    pub enabled: bool,
    /// API root, without the `/posts` suffix.
    pub base_url: String,
    /// Number of remote posts requested for the seed page.
    pub seed_limit: u32,
    /// Per-request timeout in seconds. Never zero.
    pub timeout_secs: u64,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: DEFAULT_MIRROR_BASE_URL.to_string(),
            seed_limit: DEFAULT_SEED_LIMIT,
            timeout_secs: DEFAULT_MIRROR_TIMEOUT_SECS,
        }
    }
}

impl MirrorConfig {
    /// Config pointing at a test server with a short timeout.
    pub fn for_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs: 2,
            ..Self::default()
        }
    }

    fn apply(&mut self, lookup: &impl Fn(&str) -> Option<String>) {
        if let Some(enabled) = lookup(ENV_MIRROR_ENABLED).and_then(|value| parse_bool(&value)) {
            self.enabled = enabled;
        }
        if let Some(url) = lookup(ENV_MIRROR_URL).filter(|value| !value.trim().is_empty()) {
            self.base_url = url.trim().to_string();
        }
        if let Some(limit) =
            lookup(ENV_MIRROR_SEED_LIMIT).and_then(|value| value.trim().parse::<u32>().ok())
        {
            self.seed_limit = limit;
        }
        if let Some(secs) =
            lookup(ENV_MIRROR_TIMEOUT_SECS)
                .and_then(|value| value.trim().parse::<u64>().ok())
                .filter(|secs| *secs > 0)
        {
            self.timeout_secs = secs;
        }
    }
}

/// Process-level settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub log_level: String,
    /// Absolute directory for rolling log files. Logging stays off when unset.
    pub log_dir: Option<PathBuf>,
    pub mirror: MirrorConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_FILE_NAME),
            log_level: default_log_level().to_string(),
            log_dir: None,
            mirror: MirrorConfig::default(),
        }
    }
}

impl AppConfig {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, which maps a variable name to
    /// its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(path) = lookup(ENV_DB_PATH).filter(|value| !value.trim().is_empty()) {
            config.db_path = PathBuf::from(path.trim());
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL).filter(|value| !value.trim().is_empty()) {
            config.log_level = level.trim().to_string();
        }
        if let Some(dir) = lookup(ENV_LOG_DIR).filter(|value| !value.trim().is_empty()) {
            config.log_dir = Some(PathBuf::from(dir.trim()));
        }
        config.mirror.apply(&lookup);

        config
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
