//! Application configuration management.
//!
//! Configuration is stored at `~/.config/vaultgate/config.json` and is
//! entirely optional. The credential and session timeout are compile-time
//! constants in `vaultgate-core` and cannot be changed here.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Application name used for config/cache directory paths
const APP_NAME: &str = "vaultgate";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Environment variable overriding `content_file`
pub const CONTENT_ENV: &str = "VAULTGATE_CONTENT";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// Text file shown once the vault is unlocked
    pub content_file: Option<PathBuf>,
    /// Where the session record lives (defaults to the cache directory)
    pub session_dir: Option<PathBuf>,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config file {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    fn cache_dir() -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    pub fn session_dir(&self) -> Result<PathBuf> {
        match self.session_dir {
            Some(ref dir) => Ok(dir.clone()),
            None => Self::cache_dir(),
        }
    }

    pub fn log_dir() -> Result<PathBuf> {
        Ok(Self::cache_dir()?.join("logs"))
    }

    /// The content file, with `VAULTGATE_CONTENT` taking precedence
    pub fn content_path(&self) -> Option<PathBuf> {
        std::env::var_os(CONTENT_ENV)
            .map(PathBuf::from)
            .or_else(|| self.content_file.clone())
    }
}
