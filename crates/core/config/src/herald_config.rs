use crate::config_loader::{LoadConfigError, load_from_file, load_from_file_sync, load_from_str};
use herald_types_events::RecordSource;
use serde::Deserialize;
use std::collections::HashSet;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;
use strum_macros::Display;
use thiserror::Error;

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("no feeds configured")]
    NoFeeds,
    #[error("duplicate feed name '{0}'")]
    DuplicateFeed(String),
    #[error("feed '{0}' has an empty name or url")]
    IncompleteFeed(String),
    #[error("{0} must be greater than zero")]
    Zero(&'static str),
    #[error("twitter.{0} is empty")]
    MissingCredential(&'static str),
    #[error("twitter.{0} still contains an unexpanded ${{..}} placeholder")]
    UnexpandedCredential(&'static str),
}

/// How the orchestrator picks records out of a fetched feed
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Display)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FeedSelection {
    /// Last element is the only one considered
    #[default]
    Latest,
    /// Newest-first feed, the leading `scan_depth` elements are inspected
    Scan,
}

/// Polling and rendering settings
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct HeraldSettings {
    pub poll_interval_secs: u64,
    /// Used when a 429 carries no rate limit headers
    pub rate_limit_backoff_secs: u64,
    pub scan_depth: usize,
    pub ledger_path: PathBuf,
    /// Weighted like the platform counts, links are 23 and emojis 2
    pub max_message_len: usize,
    pub fetch_timeout_secs: u64,
    /// Slot link prefix, `{}` is replaced by the slot when present
    pub slot_url: String,
    pub tx_url: String,
}

impl Default for HeraldSettings {
    fn default() -> Self {
        HeraldSettings {
            poll_interval_secs: 300,
            rate_limit_backoff_secs: 60,
            scan_depth: 6,
            ledger_path: PathBuf::from("data/last_blocks.json"),
            max_message_len: 280,
            fetch_timeout_secs: 10,
            slot_url: "https://beaconcha.in/slot/".to_string(),
            tx_url: "https://etherscan.io/tx/".to_string(),
        }
    }
}

impl HeraldSettings {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn rate_limit_backoff(&self) -> Duration {
        Duration::from_secs(self.rate_limit_backoff_secs)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

/// OAuth 1.0a user context credentials. Omitted fields fall back to the
/// `CONSUMER_KEY`, `CONSUMER_SECRET`, `ACCESS_TOKEN` and `ACCESS_TOKEN_SECRET` environment variables.
#[derive(Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TwitterConfig {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub access_token: String,
    pub access_token_secret: String,
    pub api_url: String,
}

impl Default for TwitterConfig {
    fn default() -> Self {
        TwitterConfig {
            consumer_key: env::var("CONSUMER_KEY").unwrap_or_default(),
            consumer_secret: env::var("CONSUMER_SECRET").unwrap_or_default(),
            access_token: env::var("ACCESS_TOKEN").unwrap_or_default(),
            access_token_secret: env::var("ACCESS_TOKEN_SECRET").unwrap_or_default(),
            api_url: "https://api.twitter.com".to_string(),
        }
    }
}

impl std::fmt::Debug for TwitterConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwitterConfig").field("consumer_key", &self.consumer_key).field("api_url", &self.api_url).finish_non_exhaustive()
    }
}

impl TwitterConfig {
    fn credentials(&self) -> [(&'static str, &str); 4] {
        [
            ("consumer_key", self.consumer_key.as_str()),
            ("consumer_secret", self.consumer_secret.as_str()),
            ("access_token", self.access_token.as_str()),
            ("access_token_secret", self.access_token_secret.as_str()),
        ]
    }

    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        for (name, value) in self.credentials() {
            if value.trim().is_empty() {
                return Err(ConfigValidationError::MissingCredential(name));
            }
            if value.contains("${") {
                return Err(ConfigValidationError::UnexpandedCredential(name));
            }
        }
        Ok(())
    }
}

/// One polled endpoint. `name` is also the ledger key.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct FeedConfig {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub source: RecordSource,
    #[serde(default)]
    pub selection: FeedSelection,
    /// Overrides `herald.scan_depth` for this feed
    pub scan_depth: Option<usize>,
}

impl FeedConfig {
    pub fn new(name: impl Into<String>, url: impl Into<String>, source: RecordSource, selection: FeedSelection) -> Self {
        Self { name: name.into(), url: url.into(), source, selection, scan_depth: None }
    }

    pub fn scan_depth_or(&self, default: usize) -> usize {
        self.scan_depth.unwrap_or(default)
    }
}

/// Main Herald configuration
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct HeraldConfig {
    #[serde(default)]
    pub herald: HeraldSettings,

    #[serde(default)]
    pub twitter: TwitterConfig,

    /// Defaults to the smoothing pool's proposed and wrong fee block feeds
    #[serde(default = "default_feeds")]
    pub feeds: Vec<FeedConfig>,
}

impl Default for HeraldConfig {
    fn default() -> Self {
        HeraldConfig { herald: HeraldSettings::default(), twitter: TwitterConfig::default(), feeds: default_feeds() }
    }
}

fn default_feeds() -> Vec<FeedConfig> {
    vec![
        FeedConfig::new("proposed_blocks", "https://sp-api.dappnode.io/memory/proposedblocks", RecordSource::Oracle, FeedSelection::Latest),
        FeedConfig::new("wrong_fee_blocks", "https://sp-api.dappnode.io/memory/wrongfeeblocks", RecordSource::Oracle, FeedSelection::Latest),
    ]
}

impl HeraldConfig {
    /// Load configuration from file (sync version)
    pub fn load_from_file(file_name: impl AsRef<Path>) -> Result<HeraldConfig, LoadConfigError> {
        load_from_file_sync(file_name)
    }

    /// Load configuration from file (async version)
    pub async fn load_from_file_async(file_name: impl AsRef<Path>) -> Result<HeraldConfig, LoadConfigError> {
        load_from_file(file_name).await
    }

    pub fn from_toml(contents: &str) -> Result<HeraldConfig, LoadConfigError> {
        load_from_str(contents)
    }

    /// Startup checks. Credentials are only required when something will actually be posted.
    pub fn validate(&self, require_credentials: bool) -> Result<(), ConfigValidationError> {
        if self.herald.poll_interval_secs == 0 {
            return Err(ConfigValidationError::Zero("herald.poll_interval_secs"));
        }
        if self.herald.fetch_timeout_secs == 0 {
            return Err(ConfigValidationError::Zero("herald.fetch_timeout_secs"));
        }
        if self.herald.max_message_len == 0 {
            return Err(ConfigValidationError::Zero("herald.max_message_len"));
        }
        if self.feeds.is_empty() {
            return Err(ConfigValidationError::NoFeeds);
        }

        let mut names = HashSet::new();
        for feed in &self.feeds {
            if feed.name.trim().is_empty() || feed.url.trim().is_empty() {
                return Err(ConfigValidationError::IncompleteFeed(feed.name.clone()));
            }
            if !names.insert(feed.name.as_str()) {
                return Err(ConfigValidationError::DuplicateFeed(feed.name.clone()));
            }
            if feed.selection == FeedSelection::Scan && feed.scan_depth_or(self.herald.scan_depth) == 0 {
                return Err(ConfigValidationError::Zero("scan_depth"));
            }
        }

        if require_credentials {
            self.twitter.validate()?;
        }
        Ok(())
    }
}
