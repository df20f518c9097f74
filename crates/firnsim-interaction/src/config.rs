//! Configuration file management for FIRNSIM.
//!
//! Supports reading secrets from `~/.config/firnsim/secret.json`.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Root configuration structure for secret.json
#[derive(Debug, Clone, Deserialize)]
pub struct SecretConfig {
    #[serde(default)]
    pub gemini: Option<GeminiConfig>,
}

/// Gemini API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct GeminiConfig {
    pub api_key: String,
    #[serde(default)]
    pub model_name: Option<String>,
}

/// Loads the secret configuration file from ~/.config/firnsim/secret.json
pub fn load_secret_config() -> Result<SecretConfig, String> {
    let config_path = get_config_path()?;
    load_secret_config_from(&config_path)
}

/// Loads a secret configuration file from an explicit path.
pub fn load_secret_config_from(config_path: &Path) -> Result<SecretConfig, String> {
    if !config_path.exists() {
        return Err(format!(
            "Configuration file not found at: {}",
            config_path.display()
        ));
    }

    let content = fs::read_to_string(config_path).map_err(|e| {
        format!(
            "Failed to read configuration file at {}: {}",
            config_path.display(),
            e
        )
    })?;

    serde_json::from_str(&content).map_err(|e| {
        format!(
            "Failed to parse configuration file at {}: {}",
            config_path.display(),
            e
        )
    })
}

/// Returns the path to the configuration file: ~/.config/firnsim/secret.json
fn get_config_path() -> Result<PathBuf, String> {
    let home = dirs::home_dir().ok_or_else(|| "Could not determine home directory".to_string())?;
    Ok(home.join(".config").join("firnsim").join("secret.json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_secret_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secret.json");
        let mut file = fs::File::create(&path).unwrap();
        write!(
            file,
            r#"{{"gemini": {{"api_key": "test-key", "model_name": "gemini-2.5-pro"}}}}"#
        )
        .unwrap();

        let config = load_secret_config_from(&path).unwrap();
        let gemini = config.gemini.unwrap();
        assert_eq!(gemini.api_key, "test-key");
        assert_eq!(gemini.model_name.as_deref(), Some("gemini-2.5-pro"));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        assert!(load_secret_config_from(&path).is_err());
    }

    #[test]
    fn test_missing_gemini_section_is_allowed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secret.json");
        fs::write(&path, "{}").unwrap();

        let config = load_secret_config_from(&path).unwrap();
        assert!(config.gemini.is_none());
    }
}
