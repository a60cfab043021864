//! Application configuration
//!
//! This module contains the configuration structures loaded from YAML, the
//! environment overrides applied on top, and the validation run afterwards.

use crate::error::{Error, Result};
use crate::feed::DuplicatePolicy;
use crate::http::RateLimiterConfig;
use crate::likes::FileStorage;
use crate::media::{CloudinaryResolver, MediaResolver, PassthroughResolver};
use crate::store::FirestoreConfig;
use crate::trigger::TriggerConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Config file read when no path is given, if present
pub const DEFAULT_CONFIG_FILE: &str = "quiet-thoughts.yaml";

/// Env var overriding `store.project_id`
pub const ENV_FIRESTORE_PROJECT: &str = "QUIET_THOUGHTS_FIRESTORE_PROJECT";

/// Env var overriding `store.api_key`
pub const ENV_FIRESTORE_API_KEY: &str = "QUIET_THOUGHTS_FIRESTORE_API_KEY";

/// Env var overriding `media.cloud_name`
pub const ENV_CLOUDINARY_CLOUD_NAME: &str = "QUIET_THOUGHTS_CLOUDINARY_CLOUD_NAME";

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Post store connection
    pub store: StoreConfig,
    /// Feed paging
    pub feed: FeedConfig,
    /// Scroll trigger
    pub trigger: TriggerConfig,
    /// Media URL generation
    pub media: MediaConfig,
    /// Local like state
    pub storage: StorageConfig,
}

impl AppConfig {
    /// Load config from `path`, or from [`DEFAULT_CONFIG_FILE`] if it exists,
    /// then apply environment overrides and validate
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::read_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::read_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => {
                debug!("No config file, using defaults");
                Self::default()
            }
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate YAML, without environment overrides
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    fn read_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read config file {}: {e}", path.display()))
        })?;
        debug!("Loaded config from {}", path.display());
        serde_yaml::from_str(&contents).map_err(Error::from)
    }

    /// Apply overrides, looking each variable up through `lookup`
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(project) = lookup(ENV_FIRESTORE_PROJECT) {
            self.store.project_id = Some(project);
        }
        if let Some(key) = lookup(ENV_FIRESTORE_API_KEY) {
            self.store.api_key = Some(key);
        }
        if let Some(cloud) = lookup(ENV_CLOUDINARY_CLOUD_NAME) {
            self.media.cloud_name = Some(cloud);
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.feed.page_size == 0 {
            return Err(Error::invalid_value(
                "feed.page_size",
                "must be at least 1",
            ));
        }

        let threshold = self.trigger.threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(Error::invalid_value(
                "trigger.threshold",
                format!("{threshold} is outside [0, 1]"),
            ));
        }

        if self.trigger.root_margin_px < 0.0 {
            return Err(Error::invalid_value(
                "trigger.root_margin_px",
                "must not be negative",
            ));
        }

        if self.store.kind == StoreKind::Firestore
            && self.store.project_id.as_deref().map_or(true, str::is_empty)
        {
            return Err(Error::missing_field("store.project_id"));
        }

        if self.store.timeout_secs == 0 {
            return Err(Error::invalid_value(
                "store.timeout_secs",
                "must be at least 1",
            ));
        }

        if self.media.provider == MediaProvider::Cloudinary
            && self.media.cloud_name.as_deref().map_or(true, str::is_empty)
        {
            return Err(Error::missing_field("media.cloud_name"));
        }

        Ok(())
    }

    /// Build the media resolver
    pub fn media_resolver(&self) -> Arc<dyn MediaResolver> {
        match (self.media.provider, self.media.cloud_name.as_deref()) {
            (MediaProvider::Cloudinary, Some(cloud)) => Arc::new(CloudinaryResolver::new(cloud)),
            _ => Arc::new(PassthroughResolver),
        }
    }

    /// Build the Firestore adapter settings
    pub fn firestore_config(&self) -> Result<FirestoreConfig> {
        let project = self
            .store
            .project_id
            .clone()
            .ok_or_else(|| Error::missing_field("store.project_id"))?;

        let mut config = FirestoreConfig::new(project)
            .with_base_url(self.store.base_url.clone())
            .with_collection(self.store.collection.clone());
        config.database = self.store.database.clone();
        config.api_key = self.store.api_key.clone();
        config.timeout = Duration::from_secs(self.store.timeout_secs);
        config.rate_limit = self.store.rate_limit.clone();
        Ok(config)
    }

    /// Open the local like-state file
    pub fn open_storage(&self) -> Result<FileStorage> {
        FileStorage::open(&self.storage.path)
    }
}

// ============================================================================
// Store
// ============================================================================

/// Which post store backs the feed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    /// Firestore REST API
    Firestore,
    /// Generated in-memory posts
    #[default]
    Memory,
}

/// Post store connection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Store backend
    pub kind: StoreKind,
    /// Google Cloud project id
    pub project_id: Option<String>,
    /// Web API key
    pub api_key: Option<String>,
    /// Database id
    pub database: String,
    /// Collection holding posts
    pub collection: String,
    /// REST endpoint
    pub base_url: String,
    /// Transport timeout in seconds
    pub timeout_secs: u64,
    /// Optional client-side rate limit
    pub rate_limit: Option<RateLimiterConfig>,
    /// Posts generated for the memory store
    pub seed_posts: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            kind: StoreKind::default(),
            project_id: None,
            api_key: None,
            database: "(default)".to_string(),
            collection: "posts".to_string(),
            base_url: crate::store::DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
            rate_limit: None,
            seed_posts: 25,
        }
    }
}

// ============================================================================
// Feed / Media / Storage
// ============================================================================

/// Feed paging
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Posts per page
    pub page_size: u32,
    /// Handling of ids repeated across pages
    pub duplicate_policy: DuplicatePolicy,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            page_size: 10,
            duplicate_policy: DuplicatePolicy::default(),
        }
    }
}

/// Media URL provider
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaProvider {
    /// References are already URLs
    #[default]
    Passthrough,
    /// Cloudinary public ids
    Cloudinary,
}

/// Media URL generation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaConfig {
    /// URL provider
    pub provider: MediaProvider,
    /// Cloudinary cloud name
    pub cloud_name: Option<String>,
}

/// Local like state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// JSON file holding the key-value side table
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("quiet-thoughts-local.json"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.store.kind, StoreKind::Memory);
        assert_eq!(config.feed.page_size, 10);
        assert_eq!(config.trigger, TriggerConfig::default());
        assert_eq!(config.media.provider, MediaProvider::Passthrough);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let yaml = r#"
store:
  kind: firestore
  project_id: vent-app
  api_key: web-key
  collection: posts
  timeout_secs: 10
  rate_limit:
    requests_per_second: 5
    burst_size: 2
feed:
  page_size: 20
  duplicate_policy: drop
trigger:
  root_margin_px: 300
  threshold: 0.25
media:
  provider: cloudinary
  cloud_name: demo
storage:
  path: /tmp/likes.json
"#;

        let config = AppConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.store.kind, StoreKind::Firestore);
        assert_eq!(config.store.project_id.as_deref(), Some("vent-app"));
        assert_eq!(config.store.database, "(default)");
        assert_eq!(config.store.rate_limit, Some(RateLimiterConfig::new(5, 2)));
        assert_eq!(config.feed.page_size, 20);
        assert_eq!(config.feed.duplicate_policy, DuplicatePolicy::Drop);
        assert_eq!(config.trigger, TriggerConfig::new(300.0, 0.25));
        assert_eq!(config.storage.path, PathBuf::from("/tmp/likes.json"));

        let firestore = config.firestore_config().unwrap();
        assert_eq!(firestore.project_id, "vent-app");
        assert_eq!(firestore.api_key.as_deref(), Some("web-key"));
        assert_eq!(firestore.timeout, Duration::from_secs(10));
        assert_eq!(firestore.rate_limit, Some(RateLimiterConfig::new(5, 2)));
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let err = AppConfig::from_yaml("feed:\n  page_size: 0\n").unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidConfigValue { ref field, .. } if field == "feed.page_size"
        ));
    }

    #[test]
    fn test_threshold_out_of_range_rejected() {
        let err = AppConfig::from_yaml("trigger:\n  threshold: 1.5\n").unwrap_err();
        assert!(err.to_string().contains("trigger.threshold"));
    }

    #[test]
    fn test_firestore_requires_project() {
        let err = AppConfig::from_yaml("store:\n  kind: firestore\n").unwrap_err();
        assert!(matches!(
            err,
            Error::MissingConfigField { ref field } if field == "store.project_id"
        ));
    }

    #[test]
    fn test_cloudinary_requires_cloud_name() {
        let err = AppConfig::from_yaml("media:\n  provider: cloudinary\n").unwrap_err();
        assert!(matches!(
            err,
            Error::MissingConfigField { ref field } if field == "media.cloud_name"
        ));
    }

    #[test]
    fn test_invalid_yaml() {
        let err = AppConfig::from_yaml("feed: [").unwrap_err();
        assert!(matches!(err, Error::YamlParse(_)));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            (ENV_FIRESTORE_PROJECT, "from-env"),
            (ENV_FIRESTORE_API_KEY, ""),
            (ENV_CLOUDINARY_CLOUD_NAME, "env-cloud"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config.store.api_key = Some("from-file".to_string());
        config.apply_overrides(|key| env.get(key).map(ToString::to_string));

        assert_eq!(config.store.project_id.as_deref(), Some("from-env"));
        // Empty values do not override
        assert_eq!(config.store.api_key.as_deref(), Some("from-file"));
        assert_eq!(config.media.cloud_name.as_deref(), Some("env-cloud"));
    }

    #[test]
    fn test_media_resolver_selection() {
        let mut config = AppConfig::default();
        assert!(format!("{:?}", config.media_resolver()).contains("Passthrough"));

        config.media.provider = MediaProvider::Cloudinary;
        config.media.cloud_name = Some("demo".to_string());
        assert!(format!("{:?}", config.media_resolver()).contains("Cloudinary"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "feed:\n  page_size: 7").unwrap();

        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.feed.page_size, 7);
    }

    #[test]
    fn test_load_missing_file() {
        let err = AppConfig::load(Some(Path::new("/nonexistent/quiet.yaml"))).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }
}
