use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StudyError};
use crate::storage::read_optional;

/// File name of the configuration inside the base directory
pub const CONFIG_FILE: &str = "config.toml";

/// Environment variable consulted when no API key file exists
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Application configuration (`<base>/config.toml`)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StudyConfig {
    pub generator: GeneratorConfig,
}

/// Settings for the external text generator
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GeneratorConfig {
    /// OpenAI-compatible API root, without the trailing `/chat/completions`
    pub base_url: String,
    pub model: String,
    pub temperature: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    pub timeout_secs: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4.1-nano".to_string(),
            temperature: 0.3,
            max_tokens: None,
            timeout_secs: 120,
        }
    }
}

impl StudyConfig {
    /// Load the configuration from a base directory; defaults when absent
    pub fn load(base_path: &Path) -> Result<Self> {
        let path = base_path.join(CONFIG_FILE);
        match read_optional(&path)? {
            Some(content) => toml::from_str(&content).map_err(|e| StudyError::corrupt(&path, e)),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_when_missing() {
        let temp = TempDir::new().unwrap();
        let config = StudyConfig::load(temp.path()).unwrap();
        assert_eq!(config, StudyConfig::default());
        assert_eq!(config.generator.model, "gpt-4.1-nano");
    }

    #[test]
    fn test_partial_override() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(CONFIG_FILE),
            "[generator]\nmodel = \"gpt-4o-mini\"\nmax_tokens = 2048\n",
        )
        .unwrap();

        let config = StudyConfig::load(temp.path()).unwrap();
        assert_eq!(config.generator.model, "gpt-4o-mini");
        assert_eq!(config.generator.max_tokens, Some(2048));
        assert_eq!(config.generator.temperature, 0.3);
        assert_eq!(config.generator.base_url, "https://api.openai.com/v1");
    }

    #[test]
    fn test_invalid_config() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(CONFIG_FILE), "[generator\nmodel = 1").unwrap();
        assert!(matches!(
            StudyConfig::load(temp.path()),
            Err(StudyError::CorruptData { .. })
        ));
    }
}
