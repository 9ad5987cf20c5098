//! TOML configuration.
//!
//! Every field has a default, so an absent file or an empty table yields a
//! working setup.

use crate::error::UnreadError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_CONFIG_PATH: &str = ".unread/config.toml";
pub const DEFAULT_META_PATH: &str = ".unread/usermeta.jsonl";
pub const DEFAULT_FORUM_PATH: &str = ".unread/forum.jsonl";
pub const DEFAULT_META_KEY: &str = "unread_read_map";
pub const DEFAULT_LOCK_STALE_SECS: u64 = 30;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnreadConfig {
    pub store: StoreConfig,
    pub display: DisplayConfig,
    pub links: LinkConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Per-user metadata JSONL.
    pub meta_path: String,
    /// Forum topics/replies JSONL.
    pub forum_path: String,
    /// Metadata key holding the encoded read map.
    pub meta_key: String,
    /// Age after which a leftover metadata lock file is reclaimed.
    pub lock_stale_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            meta_path: DEFAULT_META_PATH.to_string(),
            forum_path: DEFAULT_FORUM_PATH.to_string(),
            meta_key: DEFAULT_META_KEY.to_string(),
            lock_stale_secs: DEFAULT_LOCK_STALE_SECS,
        }
    }
}

/// Names attached to rendered topics and replies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub unread_topic_class: String,
    pub unread_replies_class: String,
    pub first_unread_anchor: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            unread_topic_class: "unread-topic".to_string(),
            unread_replies_class: "unread-replies".to_string(),
            first_unread_anchor: "first_unread_reply".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    /// Prefix for topic permalinks, without a trailing slash.
    pub base_url: String,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            base_url: "https://forum.invalid".to_string(),
        }
    }
}

impl UnreadConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, UnreadError> {
        toml::from_str(text).map_err(|e| UnreadError::Config(e.to_string()))
    }

    /// Load from `path`; a missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, UnreadError> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "config file absent, using defaults");
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path)
            .map_err(|e| UnreadError::Config(format!("{}: {e}", path.display())))?;
        toml::from_str(&text).map_err(|e| UnreadError::Config(format!("{}: {e}", path.display())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_yields_defaults() {
        let config = UnreadConfig::from_toml_str("").expect("empty config parses");
        assert_eq!(config, UnreadConfig::default());
        assert_eq!(config.store.meta_key, DEFAULT_META_KEY);
        assert_eq!(config.display.unread_topic_class, "unread-topic");
    }

    #[test]
    fn partial_tables_keep_other_defaults() {
        let config = UnreadConfig::from_toml_str(
            r#"
            [display]
            unread_replies_class = "has-new"

            [links]
            base_url = "https://bikes.example"
            "#,
        )
        .expect("partial config parses");

        assert_eq!(config.display.unread_replies_class, "has-new");
        assert_eq!(config.display.unread_topic_class, "unread-topic");
        assert_eq!(config.links.base_url, "https://bikes.example");
        assert_eq!(config.store.forum_path, DEFAULT_FORUM_PATH);
        assert_eq!(config.store.lock_stale_secs, DEFAULT_LOCK_STALE_SECS);
    }

    #[test]
    fn lock_timeout_is_configurable() {
        let config = UnreadConfig::from_toml_str("[store]\nlock_stale_secs = 5\n")
            .expect("store table parses");
        assert_eq!(config.store.lock_stale_secs, 5);
        assert_eq!(config.store.meta_key, DEFAULT_META_KEY);
    }

    #[test]
    fn malformed_toml_is_a_config_error() {
        let err = UnreadConfig::from_toml_str("[display\n").expect_err("must reject");
        assert!(matches!(err, UnreadError::Config(_)));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let config = UnreadConfig::load("/nonexistent/unread/config.toml")
            .expect("missing file falls back");
        assert_eq!(config, UnreadConfig::default());
    }
}
