mod loader;
mod model;

pub use loader::{load_config, validate_config};
pub use model::{
    CatalogConfig, Config, DEFAULT_CATALOG_QUERY_URL, DownloadConfig, IDENTIFIER_PLACEHOLDER,
    OutputConfig,
};
