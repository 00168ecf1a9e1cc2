//! Configuration management for the checklist server
//!
//! Layers, lowest to highest precedence: built-in defaults, a TOML file
//! (`~/.config/checklist-mcp/config.toml` or `--config`), environment
//! variables, then command-line flags applied by the binary.

use crate::error::ChecklistError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

const APP_DIR: &str = "checklist-mcp";
const CONFIG_FILE: &str = "config.toml";
const LOG_FILE: &str = "checklist-mcp.log";

pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

pub const ENV_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_API_BASE: &str = "OPENAI_BASE_URL";
pub const ENV_MODEL: &str = "CHECKLIST_MODEL";
pub const ENV_OUTPUT_DIR: &str = "CHECKLIST_OUTPUT_DIR";
pub const ENV_LOG_FILE: &str = "CHECKLIST_LOG_FILE";

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Completion provider key. Absence is reported per request, not at startup.
    pub api_key: Option<String>,
    pub model: String,
    pub api_base: String,
    /// Directory checklist files are written to
    pub output_dir: PathBuf,
    pub log_file: Option<PathBuf>,
    pub request_timeout_secs: u64,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            output_dir: PathBuf::from("."),
            log_file: default_log_file(),
            request_timeout_secs: 120,
            max_tokens: 2000,
            temperature: 0.7,
        }
    }
}

// Keeps the key out of logs.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .field("output_dir", &self.output_dir)
            .field("log_file", &self.log_file)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .finish()
    }
}

fn default_log_file() -> Option<PathBuf> {
    dirs::data_local_dir().map(|p| p.join(APP_DIR).join(LOG_FILE))
}

impl Config {
    /// Get the config file path
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Load file and environment layers.
    ///
    /// An explicit `path` must exist. The default location is optional, and a
    /// file that fails to parse only produces a warning.
    pub fn load(path: Option<&Path>) -> Result<Self, ChecklistError> {
        let mut config = match path {
            Some(path) => {
                let content = fs::read_to_string(path).map_err(|e| {
                    ChecklistError::Config(format!("cannot read {}: {}", path.display(), e))
                })?;
                Self::parse_or_default(path, &content)
            }
            None => Self::default_path()
                .and_then(|p| fs::read_to_string(&p).ok().map(|c| (p, c)))
                .map(|(p, c)| Self::parse_or_default(&p, &c))
                .unwrap_or_default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    fn parse_or_default(path: &Path, content: &str) -> Self {
        match toml::from_str(content) {
            Ok(config) => config,
            Err(err) => {
                warn!(
                    path = %path.display(),
                    "Config file could not be parsed ({}). Defaults were loaded.",
                    err
                );
                Self::default()
            }
        }
    }

    /// Overlay environment values. Empty values count as unset.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(key) = get(ENV_API_KEY) {
            self.api_key = Some(key);
        }
        if let Some(base) = get(ENV_API_BASE) {
            self.api_base = base;
        }
        if let Some(model) = get(ENV_MODEL) {
            self.model = model;
        }
        if let Some(dir) = get(ENV_OUTPUT_DIR) {
            self.output_dir = PathBuf::from(dir);
        }
        if let Some(file) = get(ENV_LOG_FILE) {
            self.log_file = Some(PathBuf::from(file));
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }

    /// Where a checklist with this file name is written.
    pub fn output_path(&self, filename: &str) -> PathBuf {
        self.output_dir.join(filename)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.output_dir, PathBuf::from("."));
        assert!(!config.has_api_key());
    }

    #[test]
    fn test_env_overrides_and_empty_values() {
        let mut config = Config::default();
        config.apply_env(env(&[
            (ENV_API_KEY, "sk-test"),
            (ENV_MODEL, "gpt-4o-mini"),
            (ENV_OUTPUT_DIR, "/tmp/lists"),
            (ENV_API_BASE, "  "),
        ]));
        assert_eq!(config.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.output_dir, PathBuf::from("/tmp/lists"));
        assert_eq!(config.api_base, DEFAULT_API_BASE);
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "model = \"local-model\"\nmax_tokens = 512\n").unwrap();

        let mut config = Config::parse_or_default(&path, &fs::read_to_string(&path).unwrap());
        assert_eq!(config.model, "local-model");
        assert_eq!(config.max_tokens, 512);
        assert_eq!(config.api_base, DEFAULT_API_BASE);

        config.apply_env(env(&[(ENV_MODEL, "from-env")]));
        assert_eq!(config.model, "from-env");
    }

    #[test]
    fn test_load_missing_explicit_file_is_error() {
        let dir = TempDir::new().unwrap();
        let err = Config::load(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(err, ChecklistError::Config(_)));
    }

    #[test]
    fn test_corrupt_file_falls_back_to_defaults() {
        let config = Config::parse_or_default(Path::new("bad.toml"), "model = [unclosed");
        assert_eq!(config.model, DEFAULT_MODEL);
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = Config {
            api_key: Some("sk-very-secret".to_string()),
            ..Config::default()
        };
        let printed = format!("{:?}", config);
        assert!(!printed.contains("sk-very-secret"));
        assert!(printed.contains("<redacted>"));
    }

    #[test]
    fn test_output_path() {
        let config = Config {
            output_dir: PathBuf::from("/work"),
            ..Config::default()
        };
        assert_eq!(
            config.output_path("web-app-checklist.md"),
            PathBuf::from("/work/web-app-checklist.md")
        );
    }
}
