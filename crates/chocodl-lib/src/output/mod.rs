mod report;

pub use report::{write_download_urls, write_failure_report};
