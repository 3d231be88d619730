use super::download::Downloader;
use super::error::DownloadError;
use super::types::{DownloadOutcome, DownloadReport};
use crate::selection::SelectedDownload;
use futures::stream::{FuturesUnordered, StreamExt};
use tracing::instrument::WithSubscriber;
use tracing::{info, warn};

/// Downloads and verifies every selection concurrently.
///
/// Each selection runs in its own task; a failure in one never cancels the
/// others. Returns once every task has finished, with one outcome per
/// identifier.
pub async fn download_and_check_all(
    downloader: &Downloader,
    selections: Vec<SelectedDownload>,
) -> DownloadReport {
    let mut report = DownloadReport::default();
    if selections.is_empty() {
        return report;
    }

    info!("Downloading {} packages...", selections.len());

    let mut futs = FuturesUnordered::new();
    for selected in selections {
        let downloader = downloader.clone();
        let task_selected = selected.clone();
        let handle = tokio::spawn(
            async move { downloader.fetch(&task_selected).await }.with_current_subscriber(),
        );
        futs.push(async move { (selected, handle.await) });
    }

    info!("Waiting for downloads to finish...");

    while let Some((selected, joined)) = futs.next().await {
        let outcome = match joined {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(package = %selected.identifier, "Download task failed: {}", err);
                DownloadOutcome {
                    identifier: selected.identifier.clone(),
                    url: selected.url.clone(),
                    file_path: selected.file_path(),
                    failure: Some(DownloadError::TaskAborted {
                        identifier: selected.identifier.clone(),
                        reason: err.to_string(),
                    }),
                }
            }
        };
        report.insert(outcome);
    }

    info!(
        succeeded = report.succeeded().count(),
        failed = report.failures().count(),
        "Downloads finished"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::download::DownloadOptions;

    #[tokio::test]
    async fn test_empty_selection_dispatches_nothing() {
        let downloader = Downloader::new(DownloadOptions::default()).unwrap();

        let report = download_and_check_all(&downloader, Vec::new()).await;

        assert!(report.is_empty());
        assert!(report.all_succeeded());
        assert!(report.into_result().is_ok());
    }
}
