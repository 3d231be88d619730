#[allow(clippy::module_inception)]
mod download;
mod error;
mod orchestrator;
mod types;

pub use download::Downloader;
pub use error::DownloadError;
pub use orchestrator::download_and_check_all;
pub use types::{DownloadOptions, DownloadOutcome, DownloadReport};
