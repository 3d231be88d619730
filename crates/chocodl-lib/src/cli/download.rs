use crate::cli::RunParams;
use crate::cli::commands::resolve_and_select;
use crate::download::{DownloadOptions, DownloadReport, Downloader, download_and_check_all};
use crate::error::ChocoDlError;

/// Resolves, selects, then downloads and verifies every selected package.
///
/// Per-package failures are recorded in the report, not returned as errors.
pub async fn run_download(params: RunParams) -> Result<DownloadReport, ChocoDlError> {
    let selections = resolve_and_select(&params).await?;

    let downloader = Downloader::new(DownloadOptions::from(&params.app_config.download))?;
    let report = download_and_check_all(&downloader, selections).await;

    if report.all_succeeded() {
        tracing::info!("Download completed successfully");
    } else {
        tracing::warn!(
            "{} of {} downloads failed",
            report.failures().count(),
            report.len()
        );
    }
    Ok(report)
}
