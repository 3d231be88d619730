use super::error::DownloadError;
use super::types::{DownloadOptions, DownloadOutcome};
use crate::catalog::USER_AGENT;
use crate::error::ChocoDlError;
use crate::selection::SelectedDownload;
use crate::verification::{ContentDigestVerifier, VerificationError};
use std::path::Path;
use tokio::io::AsyncWriteExt;
use tokio::time::timeout;
use tracing::{info, warn};

/// Fetches a selected artifact to disk and checks it against its digest.
#[derive(Clone, Debug)]
pub struct Downloader {
    http: reqwest::Client,
    options: DownloadOptions,
}

impl Downloader {
    pub fn new(options: DownloadOptions) -> Result<Self, ChocoDlError> {
        let http = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self::with_client(http, options))
    }

    pub fn with_client(http: reqwest::Client, options: DownloadOptions) -> Self {
        Self { http, options }
    }

    pub fn options(&self) -> &DownloadOptions {
        &self.options
    }

    /// Never fails: every error ends up in the returned outcome. A file that
    /// fails verification is left where it was written.
    pub async fn fetch(&self, selected: &SelectedDownload) -> DownloadOutcome {
        let file_path = selected.file_path();

        let failure = match self.fetch_and_verify(selected, &file_path).await {
            Ok(()) => {
                info!(
                    package = %selected.identifier,
                    output = %file_path.display(),
                    "Downloaded and verified"
                );
                None
            }
            Err(err) => {
                warn!(package = %selected.identifier, "Download failed: {}", err);
                Some(err)
            }
        };

        DownloadOutcome {
            identifier: selected.identifier.clone(),
            url: selected.url.clone(),
            file_path,
            failure,
        }
    }

    async fn fetch_and_verify(
        &self,
        selected: &SelectedDownload,
        file_path: &Path,
    ) -> Result<(), DownloadError> {
        tokio::fs::create_dir_all(&selected.destination)
            .await
            .map_err(|source| DownloadError::DirectoryCreation {
                path: selected.destination.clone(),
                source,
            })?;

        // Every task writes to its own part file, so packages that share a
        // destination and file name never interleave their bytes.
        let prefix = format!(".{}.", selected.file_name);
        let (part_file, part_path) = tempfile::Builder::new()
            .prefix(&prefix)
            .suffix(".part")
            .tempfile_in(&selected.destination)
            .map_err(|source| DownloadError::Io {
                path: selected.destination.clone(),
                source,
            })?
            .into_parts();

        info!(
            package = %selected.identifier,
            url = %selected.url,
            output = %file_path.display(),
            expected_digest = %selected.digest,
            "Downloading"
        );
        let written = self
            .stream_to_file(selected, tokio::fs::File::from_std(part_file), &part_path)
            .await?;
        tracing::debug!(
            package = %selected.identifier,
            bytes = written,
            "Download complete, verifying"
        );

        // Hash what actually landed on disk, not what went over the wire.
        let mut verifier = ContentDigestVerifier::new(selected.digest);
        verifier
            .update_from_file(&part_path)
            .await
            .map_err(|source| DownloadError::Io {
                path: part_path.to_path_buf(),
                source,
            })?;
        let verified = verifier.verify();

        // A file that fails verification is kept under its final name as well.
        part_path
            .persist(file_path)
            .map_err(|err| DownloadError::Io {
                path: file_path.to_path_buf(),
                source: err.error,
            })?;

        match verified {
            Ok(_) => Ok(()),
            Err(VerificationError::VerificationFailed { expected, actual }) => {
                Err(DownloadError::IntegrityMismatch {
                    identifier: selected.identifier.clone(),
                    url: selected.url.clone(),
                    expected,
                    actual,
                })
            }
        }
    }

    async fn stream_to_file(
        &self,
        selected: &SelectedDownload,
        file: tokio::fs::File,
        part_path: &Path,
    ) -> Result<u64, DownloadError> {
        let read_timeout = self.options.read_timeout;
        let url = &selected.url;

        let timed_out = || DownloadError::Timeout {
            url: url.clone(),
            timeout: read_timeout,
        };
        let network = |source: reqwest::Error| {
            if source.is_timeout() {
                timed_out()
            } else {
                DownloadError::Network {
                    url: url.clone(),
                    source,
                }
            }
        };
        let io_error = |source: std::io::Error| DownloadError::Io {
            path: part_path.to_path_buf(),
            source,
        };

        let mut response = timeout(read_timeout, self.http.get(url.clone()).send())
            .await
            .map_err(|_| timed_out())?
            .map_err(network)?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::Status {
                url: url.clone(),
                status,
            });
        }

        let mut writer = tokio::io::BufWriter::new(file);
        let mut written = 0u64;

        while let Some(chunk) = timeout(read_timeout, response.chunk())
            .await
            .map_err(|_| timed_out())?
            .map_err(network)?
        {
            writer.write_all(&chunk).await.map_err(io_error)?;
            written += chunk.len() as u64;
        }

        writer.flush().await.map_err(io_error)?;
        Ok(written)
    }
}
