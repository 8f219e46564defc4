use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Readline configuration, loaded from `~/.config/<app>/readline.toml`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReadlineConfig {
    #[serde(default = "default_max_history")]
    pub max_history_size: usize,

    #[serde(default = "default_true")]
    pub enable_completion: bool,
}

impl Default for ReadlineConfig {
    fn default() -> Self {
        Self {
            max_history_size: default_max_history(),
            enable_completion: default_true(),
        }
    }
}

impl ReadlineConfig {
    /// Load configuration for the named application. Missing or unparsable
    /// files fall back to defaults.
    pub fn load(app: &str) -> Self {
        let config_path = std::env::var_os("HOME")
            .map(PathBuf::from)
            .or_else(dirs::home_dir)
            .map(|h| h.join(".config").join(app).join("readline.toml"));

        if let Some(path) = config_path {
            if let Ok(content) = std::fs::read_to_string(&path) {
                if let Ok(config) = toml::from_str::<ReadlineConfig>(&content) {
                    return config;
                }
            }
        }

        Self::default()
    }
}

// Default functions for serde
fn default_max_history() -> usize {
    1000
}

fn default_true() -> bool {
    true
}
