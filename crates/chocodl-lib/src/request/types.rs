use std::path::PathBuf;
use std::sync::Arc;

/// One line of the package list: which package to fetch, and where to put it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageRequest {
    pub identifier: Arc<str>,
    pub destination: PathBuf,
}

impl PackageRequest {
    pub fn new(identifier: impl Into<Arc<str>>, destination: impl Into<PathBuf>) -> Self {
        Self {
            identifier: identifier.into(),
            destination: destination.into(),
        }
    }

    /// Catalog identifiers are case-insensitive.
    pub fn key(&self) -> String {
        self.identifier.to_lowercase()
    }
}
