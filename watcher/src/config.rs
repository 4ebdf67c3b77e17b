use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

pub const DEFAULT_CONFIG_PATH: &str = "floorwatch.json";
pub const DEFAULT_STARGAZE_API_URL: &str = "https://constellations-api.mainnet.stargaze-apis.com";
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 300;
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_SHUTDOWN_GRACE_SECS: u64 = 5;

/// One tracked collection. Immutable for the lifetime of the process.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct CollectionConfig {
    /// Marketplace collection identifier.
    pub name: String,

    /// Seconds to sleep between refresh passes. Must be > 0.
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval: u64,

    /// Keep the full trait → value → listings map for trait floor queries.
    ///
    /// Off by default: most collections only need the floor scalar.
    #[serde(default)]
    pub enable_trait_query: bool,

    /// Reject a fetch outright when any ask fails validation.
    #[serde(default = "default_strict_validation")]
    pub strict_validation: bool,
}

fn default_refresh_interval() -> u64 {
    DEFAULT_REFRESH_INTERVAL_SECS
}

fn default_strict_validation() -> bool {
    true
}

impl CollectionConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            refresh_interval: DEFAULT_REFRESH_INTERVAL_SECS,
            enable_trait_query: false,
            strict_validation: true,
        }
    }

    pub fn with_refresh_interval(mut self, secs: u64) -> Self {
        self.refresh_interval = secs;
        self
    }

    pub fn with_trait_query(mut self, enabled: bool) -> Self {
        self.enable_trait_query = enabled;
        self
    }

    pub fn with_strict_validation(mut self, strict: bool) -> Self {
        self.strict_validation = strict;
        self
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval)
    }
}

/// On-disk collections file.
///
/// ```json
/// { "collections": [ { "name": "stars1...", "refresh_interval": 60, "enable_trait_query": true } ] }
/// ```
#[derive(Debug, Deserialize)]
pub struct CollectionsFile {
    pub collections: Vec<CollectionConfig>,
}

impl CollectionsFile {
    pub fn load(path: &Path) -> Result<Vec<CollectionConfig>, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::parse(&raw)
    }

    pub fn parse(raw: &str) -> Result<Vec<CollectionConfig>, ConfigError> {
        let file: CollectionsFile = serde_json::from_str(raw)?;
        validate(&file.collections)?;
        Ok(file.collections)
    }
}

/// Rejects empty names, zero intervals and duplicate names.
pub fn validate(collections: &[CollectionConfig]) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();

    for c in collections {
        if c.name.trim().is_empty() {
            return Err(ConfigError::Invalid("collection name must not be empty".into()));
        }
        if c.refresh_interval == 0 {
            return Err(ConfigError::Invalid(format!(
                "collection '{}': refresh_interval must be > 0",
                c.name
            )));
        }
        if !seen.insert(c.name.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "collection '{}' is configured more than once",
                c.name
            )));
        }
    }

    Ok(())
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Path of the collections JSON file.
    pub collections_path: PathBuf,

    /// Base URL of the Stargaze marketplace API.
    pub stargaze_api_url: String,

    /// Per-request HTTP timeout for ask fetches.
    ///
    /// The refresh loop itself never times out a fetch; this bounds how long
    /// a stuck request can stall one collection.
    pub fetch_timeout: Duration,

    /// How long shutdown waits for refresh tasks before aborting them.
    pub shutdown_grace: Duration,

    /// Emit JSON logs.
    pub json_logs: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let collections_path = std::env::var("FLOORWATCH_CONFIG")
            .unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string())
            .into();

        let stargaze_api_url = std::env::var("STARGAZE_API_URL")
            .unwrap_or_else(|_| DEFAULT_STARGAZE_API_URL.to_string());

        let fetch_timeout_secs = std::env::var("FETCH_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|v| *v > 0)
            .unwrap_or(DEFAULT_FETCH_TIMEOUT_SECS);

        Self {
            collections_path,
            stargaze_api_url,
            fetch_timeout: Duration::from_secs(fetch_timeout_secs),
            shutdown_grace: Duration::from_secs(DEFAULT_SHUTDOWN_GRACE_SECS),
            json_logs: std::env::var("APP_ENV").unwrap_or_default() == "production",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_applies_defaults() {
        let cols = CollectionsFile::parse(r#"{ "collections": [ { "name": "alpha" } ] }"#).unwrap();

        assert_eq!(cols.len(), 1);
        assert_eq!(cols[0], CollectionConfig::new("alpha"));
        assert_eq!(cols[0].interval(), Duration::from_secs(300));
    }

    #[test]
    fn parse_reads_all_fields() {
        let cols = CollectionsFile::parse(
            r#"{ "collections": [
                { "name": "alpha", "refresh_interval": 60, "enable_trait_query": true, "strict_validation": false }
            ] }"#,
        )
        .unwrap();

        assert_eq!(
            cols[0],
            CollectionConfig::new("alpha")
                .with_refresh_interval(60)
                .with_trait_query(true)
                .with_strict_validation(false)
        );
    }

    #[test]
    fn zero_interval_is_rejected() {
        let err = CollectionsFile::parse(
            r#"{ "collections": [ { "name": "alpha", "refresh_interval": 0 } ] }"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn duplicate_and_empty_names_are_rejected() {
        let dup = vec![CollectionConfig::new("a"), CollectionConfig::new("a")];
        assert!(matches!(validate(&dup), Err(ConfigError::Invalid(_))));

        let empty = vec![CollectionConfig::new("  ")];
        assert!(matches!(validate(&empty), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = CollectionsFile::parse("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
