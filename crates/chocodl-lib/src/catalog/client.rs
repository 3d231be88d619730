use super::error::CatalogError;
use super::response::parse_catalog_response;
use super::types::CatalogEntry;
use crate::config::{CatalogConfig, IDENTIFIER_PLACEHOLDER};
use crate::error::ChocoDlError;
use crate::request::PackageRequest;
use crate::resolve::{PackageStatus, ResolvedPackage};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use std::sync::Arc;

pub const USER_AGENT: &str = concat!("chocodl/", env!("CARGO_PKG_VERSION"));

// Characters left as-is in the filter expression; everything else is escaped.
const IDENTIFIER_ESCAPE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'.')
    .remove(b'-')
    .remove(b'_')
    .remove(b'~');

/// Lower-cases the identifier, doubles OData quotes and percent-encodes the result.
pub fn escape_identifier(identifier: &str) -> String {
    let quoted = identifier.trim().to_lowercase().replace('\'', "''");
    utf8_percent_encode(&quoted, IDENTIFIER_ESCAPE_SET).to_string()
}

#[derive(Clone, Debug)]
pub struct CatalogClient {
    http: reqwest::Client,
    query_url: Arc<str>,
}

impl CatalogClient {
    pub fn new(catalog_config: &CatalogConfig) -> Result<Self, ChocoDlError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(catalog_config.request_timeout())
            .build()?;
        Ok(Self::with_client(http, &catalog_config.query_url))
    }

    pub fn with_client(http: reqwest::Client, query_url: &str) -> Self {
        Self {
            http,
            query_url: Arc::from(query_url),
        }
    }

    pub fn query_url(&self, identifier: &str) -> String {
        self.query_url
            .replace(IDENTIFIER_PLACEHOLDER, &escape_identifier(identifier))
    }

    /// Issues the catalog query for `identifier` and parses the response.
    pub async fn fetch_entry(&self, identifier: &str) -> Result<CatalogEntry, CatalogError> {
        let url = self.query_url(identifier);
        tracing::debug!(package = identifier, url = %url, "Querying catalog");

        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status { status, url });
        }

        let body = response.text().await?;
        parse_catalog_response(&body)
    }

    /// Resolves one request. Failures never propagate: they are logged and the
    /// package comes back as not found or without binaries.
    pub async fn resolve(&self, request: PackageRequest) -> ResolvedPackage {
        let entry = match self.fetch_entry(&request.identifier).await {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!(
                    "Package '{}' could not be resolved: {}",
                    request.identifier,
                    err
                );
                return ResolvedPackage::unresolved(request);
            }
        };

        let resolved = ResolvedPackage::from_parts(request, entry);
        match resolved.status() {
            PackageStatus::NotFound => {
                tracing::warn!("Package '{}' is not found", resolved.identifier);
            }
            PackageStatus::NoBinaries => {
                tracing::warn!(
                    "Package '{}' (titled '{}') does not have any download link",
                    resolved.identifier,
                    resolved.display_name
                );
            }
            PackageStatus::Available => {
                tracing::debug!(
                    package = %resolved.identifier,
                    title = %resolved.display_name,
                    version = resolved.version.as_deref().unwrap_or(""),
                    variants = resolved.variants.len(),
                    "Resolved package"
                );
            }
        }
        resolved
    }
}
