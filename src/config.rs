use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;

pub const DEFAULT_PROMPT: &str = "tern> ";
pub const DEFAULT_HISTORY_SIZE: usize = 100;

/// Interpreter settings.
///
/// Read from `$XDG_CONFIG_HOME/tern/config.toml` when it exists, then
/// overridden by `TERN_PROMPT`, `TERN_HISTORY_SIZE` and `TERN_HISTORY_FILE`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub prompt: String,
    /// Maximum number of lines kept by `history`.
    pub history_size: usize,
    /// Persist history here. In-memory only when unset.
    pub history_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            prompt: DEFAULT_PROMPT.to_string(),
            history_size: DEFAULT_HISTORY_SIZE,
            history_file: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match Self::default_path() {
            Some(path) if path.is_file() => Self::from_file(&path)?,
            _ => Config::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Apply overrides looked up through `lookup`, normally the process
    /// environment.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if let Some(prompt) = lookup("TERN_PROMPT") {
            self.prompt = prompt;
        }
        if let Some(size) = lookup("TERN_HISTORY_SIZE") {
            self.history_size = size.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: "TERN_HISTORY_SIZE",
                value: size.clone(),
            })?;
        }
        if let Some(file) = lookup("TERN_HISTORY_FILE") {
            self.history_file = if file.is_empty() { None } else { Some(PathBuf::from(file)) };
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.history_size == 0 {
            return Err(ConfigError::ZeroHistorySize);
        }
        Ok(())
    }

    fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("tern").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_empty_file_gives_defaults() {
        assert_eq!(Config::from_toml("").unwrap(), Config::default());
    }

    #[test]
    fn test_partial_file() {
        let config = Config::from_toml("prompt = \"$ \"\nhistory_file = \"/tmp/h\"").unwrap();
        assert_eq!(config.prompt, "$ ");
        assert_eq!(config.history_size, DEFAULT_HISTORY_SIZE);
        assert_eq!(config.history_file, Some(PathBuf::from("/tmp/h")));
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        assert!(matches!(Config::from_toml("colour = 1"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::from_toml("history_size = 5").unwrap();
        config
            .apply_env(env(&[("TERN_PROMPT", "% "), ("TERN_HISTORY_SIZE", " 42 ")]))
            .unwrap();
        assert_eq!(config.prompt, "% ");
        assert_eq!(config.history_size, 42);
        assert_eq!(config.history_file, None);
    }

    #[test]
    fn test_bad_env_value() {
        let mut config = Config::default();
        let err = config.apply_env(env(&[("TERN_HISTORY_SIZE", "lots")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: "TERN_HISTORY_SIZE", .. }));
    }

    #[test]
    fn test_zero_history_size_is_invalid() {
        let config = Config::from_toml("history_size = 0").unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::ZeroHistorySize)));
    }

    #[test]
    fn test_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::from_file(&dir.path().join("config.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
