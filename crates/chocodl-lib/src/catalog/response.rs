use super::error::CatalogError;
use super::types::{Architecture, CatalogEntry, DownloadVariant, Variants};
use crate::verification::Sha512Digest;
use quick_xml::Reader;
use quick_xml::escape::unescape;
use quick_xml::events::Event;
use url::Url;

const ENTRY_SEPARATOR: char = '|';
const FIELD_SEPARATOR: char = '^';
const ARCHITECTURE_SEPARATOR: char = '/';

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Field {
    Title,
    Version,
    DownloadCache,
}

impl Field {
    fn from_element_name(name: &[u8]) -> Option<Self> {
        match name {
            b"d:Title" => Some(Field::Title),
            b"d:Version" => Some(Field::Version),
            b"d:DownloadCache" => Some(Field::DownloadCache),
            _ => None,
        }
    }
}

#[derive(Default)]
struct FieldValues {
    title: Vec<String>,
    version: Vec<String>,
    download_cache: Vec<String>,
}

impl FieldValues {
    fn push(&mut self, field: Field, value: String) {
        let value = value.trim();
        if value.is_empty() {
            return;
        }
        let values = match field {
            Field::Title => &mut self.title,
            Field::Version => &mut self.version,
            Field::DownloadCache => &mut self.download_cache,
        };
        values.push(value.to_string());
    }
}

/// A field is only trusted when the response carries exactly one value for it.
fn single(mut values: Vec<String>) -> Option<String> {
    if values.len() == 1 { values.pop() } else { None }
}

/// Parses the catalog's Atom/OData response for a single package.
pub fn parse_catalog_response(xml: &str) -> Result<CatalogEntry, CatalogError> {
    let mut reader = Reader::from_str(xml);
    let mut fields = FieldValues::default();
    let mut current: Option<(Field, String)> = None;

    loop {
        match reader.read_event()? {
            Event::Start(element) => {
                current = Field::from_element_name(element.name().as_ref())
                    .map(|field| (field, String::new()));
            }
            Event::Text(text) => {
                if let Some((_, value)) = current.as_mut() {
                    value.push_str(&unescape(std::str::from_utf8(&text)?)?);
                }
            }
            Event::CData(data) => {
                if let Some((_, value)) = current.as_mut() {
                    value.push_str(std::str::from_utf8(&data)?);
                }
            }
            Event::GeneralRef(reference) => {
                if let Some((_, value)) = current.as_mut() {
                    let reference = format!("&{};", std::str::from_utf8(&reference)?);
                    value.push_str(&unescape(&reference)?);
                }
            }
            Event::End(_) => {
                if let Some((field, value)) = current.take() {
                    fields.push(field, value);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    let variants = single(fields.download_cache)
        .map(|download_cache| parse_download_cache(&download_cache))
        .unwrap_or_default();

    Ok(CatalogEntry {
        title: single(fields.title),
        version: single(fields.version),
        variants,
    })
}

/// Parses `url^architecture/fileName^digest` entries separated by `|`.
/// Malformed entries are skipped; a repeated architecture keeps the last entry.
pub fn parse_download_cache(download_cache: &str) -> Variants {
    let mut variants = Variants::new();

    for entry in download_cache
        .split(ENTRY_SEPARATOR)
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
    {
        match parse_download_cache_entry(entry) {
            Ok(variant) => {
                variants.insert(variant.architecture.clone(), variant);
            }
            Err(err) => tracing::warn!("Skipping download cache entry: {}", err),
        }
    }

    variants
}

pub fn parse_download_cache_entry(entry: &str) -> Result<DownloadVariant, CatalogError> {
    let invalid = |reason: String| CatalogError::InvalidDownloadCacheEntry {
        entry: entry.to_string(),
        reason,
    };

    let fields: Vec<&str> = entry.split(FIELD_SEPARATOR).collect();
    let [url, architecture_and_file, digest] = fields.as_slice() else {
        return Err(invalid(format!(
            "expected 3 '{}'-separated fields, found {}",
            FIELD_SEPARATOR,
            fields.len()
        )));
    };

    let (architecture, file_name) = architecture_and_file
        .split_once(ARCHITECTURE_SEPARATOR)
        .ok_or_else(|| {
            invalid(format!(
                "architecture and file name must be separated by '{}'",
                ARCHITECTURE_SEPARATOR
            ))
        })?;

    let url = Url::parse(url.trim()).map_err(|e| invalid(format!("invalid URL: {}", e)))?;
    let digest = Sha512Digest::from_hex(digest).map_err(|e| invalid(e.to_string()))?;

    Ok(DownloadVariant {
        architecture: Architecture::parse(architecture),
        url,
        file_name: file_name.trim().to_string(),
        digest,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIGEST_A: &str = "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
    const DIGEST_B: &str = "BBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBB";

    fn feed(properties: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="utf-8"?>
<feed xml:base="https://community.chocolatey.org/api/v2/" xmlns="http://www.w3.org/2005/Atom" xmlns:d="http://schemas.microsoft.com/ado/2007/08/dataservices" xmlns:m="http://schemas.microsoft.com/ado/2007/08/dataservices/metadata">
  <title type="text">Packages</title>
  <entry>
    <title type="text">ignored</title>
    <m:properties>{properties}</m:properties>
  </entry>
</feed>"#
        )
    }

    #[test]
    fn test_parse_title_version_and_variants() {
        let xml = feed(&format!(
            "<d:Title>Foo</d:Title><d:Version>1.2.3</d:Version>\
             <d:DownloadCache>https://cdn.example.com/foo-x64.exe^X64/foo-x64.exe^{DIGEST_A}|https://cdn.example.com/foo-x86.exe^x86/foo-x86.exe^{DIGEST_B}</d:DownloadCache>"
        ));

        let entry = parse_catalog_response(&xml).unwrap();

        assert_eq!(entry.title.as_deref(), Some("Foo"));
        assert_eq!(entry.version.as_deref(), Some("1.2.3"));
        assert_eq!(entry.variants.len(), 2);

        let x64 = &entry.variants[&Architecture::X64];
        assert_eq!(x64.url.as_str(), "https://cdn.example.com/foo-x64.exe");
        assert_eq!(x64.file_name, "foo-x64.exe");
        assert_eq!(x64.digest.to_string(), DIGEST_A);

        let x86 = &entry.variants[&Architecture::X86];
        assert_eq!(x86.digest.to_string(), DIGEST_B.to_lowercase());
    }

    #[test]
    fn test_missing_title_means_not_found() {
        let entry = parse_catalog_response(&feed("")).unwrap();

        assert_eq!(entry, CatalogEntry::default());
    }

    #[test]
    fn test_null_download_cache_yields_no_variants() {
        let xml = feed(
            r#"<d:Title>Baz</d:Title><d:Version>2.0</d:Version><d:DownloadCache m:null="true" />"#,
        );

        let entry = parse_catalog_response(&xml).unwrap();

        assert_eq!(entry.title.as_deref(), Some("Baz"));
        assert!(entry.variants.is_empty());
    }

    #[test]
    fn test_repeated_field_is_treated_as_absent() {
        let xml = feed("<d:Title>One</d:Title><d:Title>Two</d:Title>");

        let entry = parse_catalog_response(&xml).unwrap();

        assert_eq!(entry.title, None);
    }

    #[test]
    fn test_entities_in_download_url_are_decoded() {
        let xml = feed(&format!(
            "<d:Title>Query &amp; Co</d:Title>\
             <d:DownloadCache>https://cdn.example.com/get?file=a.exe&amp;v=2^x64/a.exe^{DIGEST_A}</d:DownloadCache>"
        ));

        let entry = parse_catalog_response(&xml).unwrap();

        assert_eq!(entry.title.as_deref(), Some("Query & Co"));
        assert_eq!(
            entry.variants[&Architecture::X64].url.as_str(),
            "https://cdn.example.com/get?file=a.exe&v=2"
        );
    }

    #[test]
    fn test_malformed_xml_is_an_error() {
        let result = parse_catalog_response("<feed><d:Title>Foo</d:Version></feed>");

        assert!(matches!(result, Err(CatalogError::Xml(_))));
    }

    #[test]
    fn test_parse_is_deterministic() {
        let xml = feed(&format!(
            "<d:Title>Foo</d:Title><d:DownloadCache>https://cdn.example.com/f.exe^x64/f.exe^{DIGEST_A}</d:DownloadCache>"
        ));

        assert_eq!(
            parse_catalog_response(&xml).unwrap(),
            parse_catalog_response(&xml).unwrap()
        );
    }

    #[test]
    fn test_download_cache_skips_malformed_entries() {
        let cache = format!(
            "https://cdn.example.com/ok.exe^x64/ok.exe^{DIGEST_A}|not-enough-fields|https://cdn.example.com/bad.exe^x86/bad.exe^deadbeef"
        );

        let variants = parse_download_cache(&cache);

        assert_eq!(variants.len(), 1);
        assert!(variants.contains_key(&Architecture::X64));
    }

    #[test]
    fn test_download_cache_last_duplicate_architecture_wins() {
        let cache = format!(
            "https://cdn.example.com/old.exe^x64/old.exe^{DIGEST_A}|https://cdn.example.com/new.exe^x64/new.exe^{DIGEST_B}"
        );

        let variants = parse_download_cache(&cache);

        assert_eq!(variants[&Architecture::X64].file_name, "new.exe");
    }

    #[test]
    fn test_download_cache_keeps_unknown_architectures() {
        let cache = format!("https://cdn.example.com/arm.exe^ARM64/arm.exe^{DIGEST_A}");

        let variants = parse_download_cache(&cache);

        assert!(variants.contains_key(&Architecture::Other("arm64".to_string())));
    }

    #[test]
    fn test_entry_without_architecture_separator_is_rejected() {
        let entry = format!("https://cdn.example.com/f.exe^x64-f.exe^{DIGEST_A}");

        assert!(matches!(
            parse_download_cache_entry(&entry),
            Err(CatalogError::InvalidDownloadCacheEntry { .. })
        ));
    }

    #[test]
    fn test_entry_with_invalid_url_is_rejected() {
        let entry = format!("not a url^x64/f.exe^{DIGEST_A}");

        let err = parse_download_cache_entry(&entry).unwrap_err();
        assert!(err.to_string().contains("invalid URL"));
    }
}
