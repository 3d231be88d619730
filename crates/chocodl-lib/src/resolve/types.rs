use crate::catalog::{CatalogEntry, Variants};
use crate::request::PackageRequest;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PackageStatus {
    /// The catalog has no entry for the identifier.
    NotFound,
    /// The entry exists but offers nothing to download.
    NoBinaries,
    Available,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedPackage {
    pub identifier: Arc<str>,
    pub destination: PathBuf,
    /// Catalog title; empty when the package was not found.
    pub display_name: String,
    pub version: Option<String>,
    pub variants: Variants,
}

impl ResolvedPackage {
    /// Merges a request with what the catalog returned for it. The catalog
    /// supplies name, version and variants; the request supplies identifier
    /// and destination.
    pub fn from_parts(request: PackageRequest, entry: CatalogEntry) -> Self {
        let PackageRequest {
            identifier,
            destination,
        } = request;
        let display_name = entry.title.unwrap_or_default();

        // Without a title there is no package to speak of.
        let (version, variants) = if display_name.is_empty() {
            (None, Variants::new())
        } else {
            (entry.version, entry.variants)
        };

        Self {
            identifier,
            destination,
            display_name,
            version,
            variants,
        }
    }

    pub fn unresolved(request: PackageRequest) -> Self {
        Self::from_parts(request, CatalogEntry::default())
    }

    pub fn status(&self) -> PackageStatus {
        if self.display_name.is_empty() {
            PackageStatus::NotFound
        } else if self.variants.is_empty() {
            PackageStatus::NoBinaries
        } else {
            PackageStatus::Available
        }
    }
}

/// Resolution results keyed by identifier, iterated in input order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResolvedPackages {
    packages: Vec<ResolvedPackage>,
}

impl ResolvedPackages {
    pub(crate) fn from_ordered(packages: Vec<ResolvedPackage>) -> Self {
        Self { packages }
    }

    pub fn get(&self, identifier: &str) -> Option<&ResolvedPackage> {
        let key = identifier.to_lowercase();
        self.packages
            .iter()
            .find(|package| package.identifier.to_lowercase() == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResolvedPackage> {
        self.packages.iter()
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

impl<'a> IntoIterator for &'a ResolvedPackages {
    type Item = &'a ResolvedPackage;
    type IntoIter = std::slice::Iter<'a, ResolvedPackage>;

    fn into_iter(self) -> Self::IntoIter {
        self.packages.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Architecture, DownloadVariant};
    use crate::verification::Sha512Digest;

    fn variant(architecture: Architecture) -> DownloadVariant {
        DownloadVariant {
            architecture,
            url: "https://cdn.example.com/setup.exe".parse().unwrap(),
            file_name: "setup.exe".to_string(),
            digest: Sha512Digest::from_hex(&"ab".repeat(64)).unwrap(),
        }
    }

    #[test]
    fn test_merge_takes_destination_from_request() {
        let request = PackageRequest::new("foo", "/custom");
        let mut variants = Variants::new();
        variants.insert(Architecture::X64, variant(Architecture::X64));
        let entry = CatalogEntry {
            title: Some("Foo".to_string()),
            version: Some("1.0".to_string()),
            variants: variants.clone(),
        };

        let resolved = ResolvedPackage::from_parts(request, entry);

        assert_eq!(resolved.identifier.as_ref(), "foo");
        assert_eq!(resolved.destination, PathBuf::from("/custom"));
        assert_eq!(resolved.display_name, "Foo");
        assert_eq!(resolved.version.as_deref(), Some("1.0"));
        assert_eq!(resolved.variants, variants);
        assert_eq!(resolved.status(), PackageStatus::Available);
    }

    #[test]
    fn test_untitled_entry_is_not_found_even_with_variants() {
        let mut variants = Variants::new();
        variants.insert(Architecture::X64, variant(Architecture::X64));
        let entry = CatalogEntry {
            title: None,
            version: Some("1.0".to_string()),
            variants,
        };

        let resolved = ResolvedPackage::from_parts(PackageRequest::new("bar", "/out"), entry);

        assert_eq!(resolved.status(), PackageStatus::NotFound);
        assert!(resolved.variants.is_empty());
    }

    #[test]
    fn test_titled_entry_without_variants_has_no_binaries() {
        let entry = CatalogEntry {
            title: Some("Baz".to_string()),
            ..Default::default()
        };

        let resolved = ResolvedPackage::from_parts(PackageRequest::new("baz", "/out"), entry);

        assert_eq!(resolved.status(), PackageStatus::NoBinaries);
    }

    #[test]
    fn test_get_is_case_insensitive() {
        let packages = ResolvedPackages::from_ordered(vec![ResolvedPackage::unresolved(
            PackageRequest::new("Firefox", "/out"),
        )]);

        assert!(packages.get("firefox").is_some());
        assert!(packages.get("chrome").is_none());
    }
}
