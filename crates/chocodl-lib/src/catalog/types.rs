use crate::verification::Sha512Digest;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use url::Url;

#[derive(Clone, Debug, Hash, Ord, PartialOrd, Eq, PartialEq)]
pub enum Architecture {
    X64,
    X86,
    Other(String),
}

impl Architecture {
    pub fn parse(name: &str) -> Self {
        let name = name.trim().to_lowercase();
        match name.as_str() {
            "x64" => Architecture::X64,
            "x86" => Architecture::X86,
            _ => Architecture::Other(name),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Architecture::X64 => "x64",
            Architecture::X86 => "x86",
            Architecture::Other(name) => name,
        }
    }
}

impl Display for Architecture {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One architecture-specific artifact offered by the catalog.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DownloadVariant {
    pub architecture: Architecture,
    pub url: Url,
    pub file_name: String,
    pub digest: Sha512Digest,
}

pub type Variants = BTreeMap<Architecture, DownloadVariant>;

/// What a single catalog response says about one package.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CatalogEntry {
    pub title: Option<String>,
    pub version: Option<String>,
    pub variants: Variants,
}
