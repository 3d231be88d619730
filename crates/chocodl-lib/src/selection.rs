use crate::catalog::{Architecture, DownloadVariant};
use crate::resolve::{PackageStatus, ResolvedPackage, ResolvedPackages};
use crate::verification::Sha512Digest;
use itertools::Itertools;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use url::Url;

/// Architectures eligible for download, most preferred first.
pub const ARCHITECTURE_PRIORITY: [Architecture; 2] = [Architecture::X64, Architecture::X86];

/// The one artifact chosen for a package.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectedDownload {
    pub identifier: Arc<str>,
    pub destination: PathBuf,
    pub architecture: Architecture,
    pub url: Url,
    pub file_name: String,
    pub digest: Sha512Digest,
}

impl SelectedDownload {
    pub fn file_path(&self) -> PathBuf {
        self.destination.join(&self.file_name)
    }
}

pub fn select_download(package: &ResolvedPackage) -> Option<SelectedDownload> {
    if package.display_name.is_empty() {
        return None;
    }

    let variant = ARCHITECTURE_PRIORITY
        .iter()
        .find_map(|architecture| package.variants.get(architecture))?;

    Some(SelectedDownload {
        identifier: package.identifier.clone(),
        destination: package.destination.clone(),
        architecture: variant.architecture.clone(),
        url: variant.url.clone(),
        file_name: local_file_name(&package.identifier, variant),
        digest: variant.digest,
    })
}

/// Applies [`select_download`] to every resolved package, in resolution order.
///
/// Not-found and binary-less packages were already reported during resolution;
/// packages offering only unsupported architectures are reported here, as are
/// packages whose downloads land on the same file.
pub fn select_downloads(packages: &ResolvedPackages) -> Vec<SelectedDownload> {
    let mut selections = Vec::new();
    let mut claimed_paths: HashMap<PathBuf, Arc<str>> = HashMap::new();

    for package in packages {
        match select_download(package) {
            Some(selected) => {
                tracing::debug!(
                    package = %selected.identifier,
                    architecture = %selected.architecture,
                    url = %selected.url,
                    "Selected download"
                );
                let file_path = selected.file_path();
                if let Some(previous) = claimed_paths.get(&file_path) {
                    tracing::warn!(
                        "Packages '{}' and '{}' both download to '{}', only one copy will be kept",
                        previous,
                        selected.identifier,
                        file_path.display()
                    );
                } else {
                    claimed_paths.insert(file_path, selected.identifier.clone());
                }
                selections.push(selected);
            }
            None if package.status() == PackageStatus::Available => {
                tracing::warn!(
                    "Package '{}' (titled '{}') only offers unsupported architectures: {}",
                    package.identifier,
                    package.display_name,
                    package.variants.keys().join(", ")
                );
            }
            None => {}
        }
    }

    selections
}

// Only the final path component of the catalog's file name is used so the
// download cannot land outside its destination directory.
fn local_file_name(identifier: &str, variant: &DownloadVariant) -> String {
    let from_catalog = Path::new(&variant.file_name)
        .file_name()
        .and_then(|name| name.to_str())
        .filter(|name| !name.is_empty());

    let from_url = || {
        variant
            .url
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .filter(|segment| !segment.is_empty())
    };

    from_catalog
        .or_else(from_url)
        .unwrap_or(identifier)
        .to_string()
}
