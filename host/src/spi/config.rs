use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level config file structure (`~/.config/devsh/config.toml`).
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct DevshConfig {
    #[serde(default)]
    pub prompt: PromptConfig,
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

/// `[prompt]` section of the config.
#[derive(Debug, Serialize, Deserialize)]
pub struct PromptConfig {
    /// Prompt template. Supports `%h`, `%t`, `%c`, `%T` and named color
    /// tokens like `%GREEN`.
    #[serde(default = "default_template")]
    pub template: String,
    /// Hostname shown by `%h`. Default: the `HOSTNAME` env var, else
    /// `localhost`.
    #[serde(default = "default_hostname")]
    pub hostname: String,
    /// Path shown by `%c`.
    #[serde(default)]
    pub current_path: String,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            template: default_template(),
            hostname: default_hostname(),
            current_path: String::new(),
        }
    }
}

fn default_template() -> String {
    "%GREEN%h %MAGENTA%t %c %T%CLEAR# ".to_string()
}

fn default_hostname() -> String {
    std::env::var("HOSTNAME").unwrap_or_else(|_| "localhost".to_string())
}

/// `[history]` section of the config.
#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// History file path (supports `~` expansion). Overridden by the
    /// `DEVSH_HISTORY` env var.
    #[serde(default = "default_history_file")]
    pub file: String,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            file: default_history_file(),
        }
    }
}

fn default_history_file() -> String {
    "~/.local/state/devsh/history".to_string()
}

impl HistoryConfig {
    /// Resolve the history file path, honoring the env override.
    pub fn resolved_path(&self) -> PathBuf {
        match std::env::var("DEVSH_HISTORY") {
            Ok(path) if !path.is_empty() => expand_tilde(&path),
            _ => expand_tilde(&self.file),
        }
    }
}

/// `[session]` section of the config.
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct SessionConfig {
    /// Run as a scripted one-shot session: history is neither loaded nor
    /// saved.
    #[serde(default)]
    pub exec_on_startup: bool,
    /// Print the prompt plainly instead of letting the line editor render
    /// it, for terminals that mangle escape-laden prompts.
    #[serde(default)]
    pub broken_readline: bool,
}

fn expand_tilde(raw: &str) -> PathBuf {
    if raw == "~" {
        dirs::home_dir().unwrap_or_else(|| PathBuf::from(raw))
    } else if let Some(rest) = raw.strip_prefix("~/") {
        dirs::home_dir()
            .map(|h| h.join(rest))
            .unwrap_or_else(|| PathBuf::from(raw))
    } else {
        PathBuf::from(raw)
    }
}

/// Load the config file from `~/.config/devsh/config.toml`.
/// Returns the default config if the file is missing or malformed.
pub fn load_config() -> DevshConfig {
    let config_path = dirs::home_dir()
        .map(|h| h.join(".config").join("devsh").join("config.toml"))
        .unwrap_or_else(|| PathBuf::from(".config/devsh/config.toml"));

    match std::fs::read_to_string(&config_path) {
        Ok(contents) => match toml::from_str::<DevshConfig>(&contents) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("warning: failed to parse {}: {e}", config_path.display());
                DevshConfig::default()
            }
        },
        Err(_) => DevshConfig::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_template_has_prompt_tokens() {
        let config = DevshConfig::default();
        assert!(config.prompt.template.contains("%h"));
        assert!(config.prompt.template.contains("%T"));
    }

    #[test]
    fn test_parse_partial_config() {
        let config: DevshConfig = toml::from_str(
            r#"
            [prompt]
            hostname = "192.168.209.1"

            [session]
            broken_readline = true
            "#,
        )
        .unwrap();
        assert_eq!(config.prompt.hostname, "192.168.209.1");
        assert!(config.session.broken_readline);
        assert!(!config.session.exec_on_startup);
        assert_eq!(config.history.file, "~/.local/state/devsh/history");
    }

    #[test]
    fn test_expand_tilde() {
        let expanded = expand_tilde("~/x/y");
        assert!(expanded.ends_with("x/y"));
        assert_eq!(expand_tilde("/abs/path"), PathBuf::from("/abs/path"));
    }
}
