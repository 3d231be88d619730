use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Catalog request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Catalog returned HTTP {status} for {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },

    #[error("Malformed catalog response: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Catalog response is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("Catalog response contains an invalid escape sequence: {0}")]
    Escape(#[from] quick_xml::escape::EscapeError),

    #[error("Invalid download cache entry '{entry}': {reason}")]
    InvalidDownloadCacheEntry { entry: String, reason: String },
}
