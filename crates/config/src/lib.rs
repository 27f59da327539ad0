//! Configuration loading for mailcodec
//!
//! Provides utilities for loading configuration files from the shared
//! mailcodec config directory (~/.config/mailcodec/).

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

/// Get the mailcodec config directory (~/.config/mailcodec/)
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("mailcodec"))
}

/// Get the path to a config file within the mailcodec config directory
pub fn config_path(filename: &str) -> Option<PathBuf> {
    config_dir().map(|p| p.join(filename))
}

/// Load and parse a JSON config file from the mailcodec config directory
pub fn load_json<T: DeserializeOwned>(filename: &str) -> Result<T> {
    let path = config_path(filename).context("Could not determine config directory")?;
    load_json_file(&path)
}

/// Load and parse a JSON file from an arbitrary path
pub fn load_json_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Check if a config file exists in the mailcodec config directory
pub fn config_exists(filename: &str) -> bool {
    config_path(filename).is_some_and(|p| p.exists())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Sample {
        name: String,
    }

    #[test]
    fn test_config_path() {
        if let Some(path) = config_path("codec.json") {
            assert!(path.ends_with("mailcodec/codec.json"));
        }
    }

    #[test]
    fn test_load_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.json");
        std::fs::write(&path, r#"{ "name": "mailcodec" }"#).unwrap();

        let sample: Sample = load_json_file(&path).unwrap();
        assert_eq!(sample.name, "mailcodec");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result: Result<Sample> = load_json_file(&dir.path().join("missing.json"));
        let err = result.err().unwrap();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
