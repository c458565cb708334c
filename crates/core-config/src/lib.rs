//! Configuration loading and parsing.
//!
//! `kiln.toml` is looked up in the working directory first, then the
//! platform config dir. Unknown fields are ignored and a parse error falls
//! back to defaults so a broken config never prevents startup; the fallback
//! is logged instead.

use anyhow::Result;
use serde::Deserialize;
use std::{fs, path::PathBuf};
use tracing::{info, warn};

#[derive(Debug, Deserialize, Clone)]
pub struct EditorConfig {
    /// How many extra Ctrl-Q presses a dirty buffer demands before quitting.
    #[serde(default = "EditorConfig::default_quit_warnings")]
    pub quit_warnings: u8,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            quit_warnings: Self::default_quit_warnings(),
        }
    }
}

impl EditorConfig {
    const fn default_quit_warnings() -> u8 {
        2
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct Config {
    #[serde(default)]
    pub editor: EditorConfig,
}

/// Best-effort config path following platform conventions.
pub fn discover() -> PathBuf {
    let local = PathBuf::from("kiln.toml");
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("kiln").join("kiln.toml");
    }
    PathBuf::from("kiln.toml")
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    if let Ok(content) = fs::read_to_string(&path) {
        match toml::from_str::<Config>(&content) {
            Ok(config) => {
                info!(target: "config", file = %path.display(), "config_loaded");
                Ok(config)
            }
            Err(error) => {
                warn!(target: "config", file = %path.display(), %error, "config_parse_failed_using_defaults");
                Ok(Config::default())
            }
        }
    } else {
        Ok(Config::default())
    }
}
