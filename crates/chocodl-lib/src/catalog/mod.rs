mod client;
mod error;
mod response;
mod types;

pub use client::{CatalogClient, USER_AGENT, escape_identifier};
pub use error::CatalogError;
pub use response::{parse_catalog_response, parse_download_cache, parse_download_cache_entry};
pub use types::{Architecture, CatalogEntry, DownloadVariant, Variants};
