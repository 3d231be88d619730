use crate::verification::Sha512Digest;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use url::Url;

#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("Download directory creation failed at {path}: {source}")]
    DirectoryCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Request to {url} failed: {source}")]
    Network {
        url: Url,
        #[source]
        source: reqwest::Error,
    },

    #[error("Server returned HTTP {status} for {url}")]
    Status { url: Url, status: reqwest::StatusCode },

    #[error("Timed out after {timeout:?} waiting for data from {url}")]
    Timeout { url: Url, timeout: Duration },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "SHA512 hash mismatch for the package '{identifier}' from {url}: \
         expected {expected}, got {actual}"
    )]
    IntegrityMismatch {
        identifier: Arc<str>,
        url: Url,
        expected: Sha512Digest,
        actual: Sha512Digest,
    },

    #[error("Download task for '{identifier}' did not complete: {reason}")]
    TaskAborted { identifier: Arc<str>, reason: String },
}

impl DownloadError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, DownloadError::Timeout { .. })
    }

    pub fn is_integrity_mismatch(&self) -> bool {
        matches!(self, DownloadError::IntegrityMismatch { .. })
    }
}
