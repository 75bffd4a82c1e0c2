use std::path::PathBuf;

use netcheck_common::error::RegistryError;

const APP_DIR: &str = "network-checker";
const CONFIG_FILE: &str = "config.json";
const LOG_FILE: &str = "app.log";

/// `<Documents>/network-checker`, falling back to `<home>/Documents`.
pub fn app_dir() -> Result<PathBuf, RegistryError> {
    dirs::document_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("Documents")))
        .map(|documents| documents.join(APP_DIR))
        .ok_or(RegistryError::HomeDirUnavailable)
}

pub fn default_config_path() -> Result<PathBuf, RegistryError> {
    Ok(app_dir()?.join(CONFIG_FILE))
}

pub fn default_log_path() -> Result<PathBuf, RegistryError> {
    Ok(app_dir()?.join(LOG_FILE))
}
