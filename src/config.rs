use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{MembankError, Result};

/// Name of the configuration file stored inside the `.membank` directory.
pub const CONFIG_FILENAME: &str = "config.json";

/// Name of the hidden directory used to store membank metadata.
pub const MEMBANK_DIR: &str = ".membank";

/// Environment variable naming the project root the server operates in.
pub const PROJECT_PATH_ENV: &str = "PROJECT_PATH";

/// Configuration for a membank server instance.
///
/// Controls how the knowledge bridge is invoked and the admission limits
/// applied to inbound requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MembankConfig {
    /// Schema version of the configuration.
    pub version: u32,
    /// Interpreter used to run the bridge script (e.g. `python3`).
    pub bridge_command: String,
    /// Path to the bridge script, relative to the project root.
    pub bridge_script: String,
    /// Maximum serialized request size in bytes; larger requests are rejected.
    pub max_request_bytes: usize,
    /// Maximum accepted requests per client within one rate window.
    pub rate_limit_max_requests: u32,
    /// Length of the rate window in seconds.
    pub rate_limit_window_secs: u64,
}

impl Default for MembankConfig {
    fn default() -> Self {
        Self {
            version: 1,
            bridge_command: "python3".to_string(),
            bridge_script: ".membank/bridge.py".to_string(),
            max_request_bytes: 10 * 1024,
            rate_limit_max_requests: 100,
            rate_limit_window_secs: 60,
        }
    }
}

/// Returns the path to the `.membank` directory within the given project root.
pub fn get_membank_dir(project_root: &Path) -> PathBuf {
    project_root.join(MEMBANK_DIR)
}

/// Returns the path to the configuration file (`config.json`) within the `.membank` directory.
pub fn get_config_path(project_root: &Path) -> PathBuf {
    get_membank_dir(project_root).join(CONFIG_FILENAME)
}

/// Resolves the project root from an optional explicit path.
///
/// Falls back to the `PROJECT_PATH` environment variable, then to the
/// current working directory.
pub fn resolve_project_root(path: Option<String>) -> PathBuf {
    match path {
        Some(p) => PathBuf::from(p),
        None => match std::env::var(PROJECT_PATH_ENV) {
            Ok(p) if !p.is_empty() => PathBuf::from(p),
            _ => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        },
    }
}

/// Loads the configuration from disk.
///
/// If the configuration file does not exist, returns the default
/// configuration.
pub fn load_config(project_root: &Path) -> Result<MembankConfig> {
    let config_path = get_config_path(project_root);

    if !config_path.exists() {
        return Ok(MembankConfig::default());
    }

    let contents = fs::read_to_string(&config_path).map_err(|e| MembankError::Config {
        message: format!(
            "failed to read config file '{}': {}",
            config_path.display(),
            e
        ),
    })?;

    let config: MembankConfig =
        serde_json::from_str(&contents).map_err(|e| MembankError::Config {
            message: format!(
                "failed to parse config file '{}': {}",
                config_path.display(),
                e
            ),
        })?;

    Ok(config)
}

/// Saves the configuration to disk using an atomic write.
///
/// Writes to a temporary file first and then renames it to the final location,
/// ensuring that a partial write never corrupts the configuration.
pub fn save_config(project_root: &Path, config: &MembankConfig) -> Result<()> {
    let membank_dir = get_membank_dir(project_root);
    fs::create_dir_all(&membank_dir).map_err(|e| MembankError::Config {
        message: format!(
            "failed to create membank directory '{}': {}",
            membank_dir.display(),
            e
        ),
    })?;

    let config_path = get_config_path(project_root);
    let tmp_path = config_path.with_extension("tmp");

    let json = serde_json::to_string_pretty(config).map_err(|e| MembankError::Config {
        message: format!("failed to serialize config: {}", e),
    })?;

    fs::write(&tmp_path, &json).map_err(|e| MembankError::Config {
        message: format!(
            "failed to write temporary config file '{}': {}",
            tmp_path.display(),
            e
        ),
    })?;

    fs::rename(&tmp_path, &config_path).map_err(|e| MembankError::Config {
        message: format!(
            "failed to rename temporary config file '{}' to '{}': {}",
            tmp_path.display(),
            config_path.display(),
            e
        ),
    })?;

    Ok(())
}
