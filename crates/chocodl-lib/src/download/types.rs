use super::error::DownloadError;
use crate::config::DownloadConfig;
use crate::error::ChocoDlError;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

#[derive(Clone, Copy, Debug)]
pub struct DownloadOptions {
    /// Upper bound on waiting for the response and for each body chunk.
    pub read_timeout: Duration,
}

impl Default for DownloadOptions {
    fn default() -> Self {
        Self {
            read_timeout: Duration::from_secs(20),
        }
    }
}

impl From<&DownloadConfig> for DownloadOptions {
    fn from(download_config: &DownloadConfig) -> Self {
        Self {
            read_timeout: download_config.read_timeout(),
        }
    }
}

/// Terminal result of downloading one package.
#[derive(Debug)]
pub struct DownloadOutcome {
    pub identifier: Arc<str>,
    pub url: Url,
    pub file_path: PathBuf,
    pub failure: Option<DownloadError>,
}

impl DownloadOutcome {
    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }
}

/// Outcomes of a download run, keyed by package identifier.
#[derive(Debug, Default)]
pub struct DownloadReport {
    pub outcomes: BTreeMap<Arc<str>, DownloadOutcome>,
}

impl DownloadReport {
    pub fn insert(&mut self, outcome: DownloadOutcome) {
        self.outcomes.insert(outcome.identifier.clone(), outcome);
    }

    pub fn get(&self, identifier: &str) -> Option<&DownloadOutcome> {
        self.outcomes.get(identifier)
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn succeeded(&self) -> impl Iterator<Item = &DownloadOutcome> {
        self.outcomes.values().filter(|outcome| outcome.is_success())
    }

    pub fn failures(&self) -> impl Iterator<Item = &DownloadOutcome> {
        self.outcomes.values().filter(|outcome| !outcome.is_success())
    }

    pub fn all_succeeded(&self) -> bool {
        self.failures().next().is_none()
    }

    /// Collapses the report into a single process-level verdict.
    pub fn into_result(self) -> Result<(), ChocoDlError> {
        let failed = self.failures().count();
        if failed == 0 {
            Ok(())
        } else {
            Err(ChocoDlError::DownloadsFailed {
                failed,
                total: self.len(),
            })
        }
    }
}
