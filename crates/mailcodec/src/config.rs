//! Codec configuration
//!
//! Every tunable lives in an explicit struct with named defaults. Loading
//! order for [`CodecConfig::load`]:
//! 1. JSON file (`~/.config/mailcodec/codec.json`)
//! 2. Built-in defaults

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config filename in the mailcodec config directory
const CONFIG_FILE: &str = "codec.json";

/// Gmail's hard limit on a single attachment
pub const DEFAULT_MAX_ATTACHMENT_BYTES: usize = 25 * 1024 * 1024;

/// Top-level configuration for decoders, composer and batch dispatch
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CodecConfig {
    pub decode: DecodeOptions,
    pub compose: ComposeOptions,
    pub batch: BatchOptions,
    pub scopes: ProviderScopes,
}

/// Inbound decoding options
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DecodeOptions {
    /// Deepest part nesting walked before subtrees are skipped
    pub max_part_depth: usize,
    /// Label marking a message unread (`is_read` is its negation)
    pub unread_label: String,
    pub starred_label: String,
    pub draft_label: String,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            max_part_depth: 64,
            unread_label: "UNREAD".to_string(),
            starred_label: "STARRED".to_string(),
            draft_label: "DRAFT".to_string(),
        }
    }
}

/// Outbound composition options
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ComposeOptions {
    /// `From` header value; Gmail substitutes the authenticated account for `me`
    pub sender: String,
    /// Host part of generated Message-IDs
    pub message_id_host: String,
    pub max_attachment_bytes: usize,
}

impl Default for ComposeOptions {
    fn default() -> Self {
        Self {
            sender: "me".to_string(),
            message_id_host: "mailcodec.local".to_string(),
            max_attachment_bytes: DEFAULT_MAX_ATTACHMENT_BYTES,
        }
    }
}

/// Batch dispatch options
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct BatchOptions {
    /// 1 dispatches sequentially; larger values use a bounded worker pool
    pub workers: usize,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self { workers: 1 }
    }
}

/// OAuth scopes each provider's transport should request
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ProviderScopes {
    pub gmail: Vec<String>,
    pub graph: Vec<String>,
}

impl ProviderScopes {
    pub fn gmail_default() -> Vec<String> {
        [
            "https://www.googleapis.com/auth/gmail.readonly",
            "https://www.googleapis.com/auth/gmail.send",
            "https://www.googleapis.com/auth/gmail.modify",
        ]
        .map(String::from)
        .to_vec()
    }

    pub fn graph_default() -> Vec<String> {
        [
            "https://graph.microsoft.com/Mail.ReadWrite",
            "https://graph.microsoft.com/Mail.Send",
            "offline_access",
        ]
        .map(String::from)
        .to_vec()
    }
}

impl Default for ProviderScopes {
    fn default() -> Self {
        Self {
            gmail: Self::gmail_default(),
            graph: Self::graph_default(),
        }
    }
}

impl CodecConfig {
    /// Load from the config directory when the file exists, otherwise defaults
    pub fn load() -> Result<Self> {
        if config::config_exists(CONFIG_FILE) {
            return config::load_json(CONFIG_FILE);
        }
        Ok(Self::default())
    }

    /// Load from a specific JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        config::load_json_file(path)
    }

    /// Parse from a JSON string; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse codec config JSON")
    }

    /// Get the default config file path (~/.config/mailcodec/codec.json)
    pub fn default_config_path() -> Option<PathBuf> {
        config::config_path(CONFIG_FILE)
    }
}
