use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Query template used when no `catalog.query_url` is configured. `{id}` is
/// replaced by the escaped, lower-cased package identifier.
pub const DEFAULT_CATALOG_QUERY_URL: &str = "https://community.chocolatey.org/api/v2/Packages()?$filter=(tolower(Id)%20eq%20%27{id}%27)%20and%20IsLatestVersion";

pub const IDENTIFIER_PLACEHOLDER: &str = "{id}";

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub download: DownloadConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogConfig {
    #[serde(default = "default_query_url")]
    pub query_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl CatalogConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            query_url: default_query_url(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DownloadConfig {
    /// Maximum time to wait for the next piece of a download before giving up.
    #[serde(default = "default_read_timeout_secs")]
    pub read_timeout_secs: u64,
}

impl DownloadConfig {
    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            read_timeout_secs: default_read_timeout_secs(),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Root directory for packages whose input line names no destination.
    pub path: Option<PathBuf>,
}

fn default_query_url() -> String {
    DEFAULT_CATALOG_QUERY_URL.to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_read_timeout_secs() -> u64 {
    20
}
