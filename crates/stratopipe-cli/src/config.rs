use std::path::{Path, PathBuf};

use anyhow::Result;
use stratopipe_core::ClientConfig;

/// `~/.config/stratopipe/config.json` or the platform equivalent
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("stratopipe").join("config.json"))
}

/// Session cookies saved by `stratopipe login`, next to the config file
pub fn default_session_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("stratopipe").join("session.json"))
}

/// Explicit path must exist; the default path is optional.
/// `base_url` from the command line wins over the file.
pub fn load_config(explicit: Option<&Path>, base_url: Option<String>) -> Result<ClientConfig> {
    let mut config = match explicit {
        Some(path) => ClientConfig::load(path)?,
        None => match default_config_path().filter(|path| path.exists()) {
            Some(path) => ClientConfig::load(&path)?,
            None => ClientConfig::default(),
        },
    };

    if let Some(base_url) = base_url {
        config = config.with_base_url(base_url);
    }
    Ok(config)
}
