use crate::test_server::{Route, TestServer};
use chocodl_lib::config::Config;
use eyre::Result;
use sha2::{Digest, Sha512};
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

pub const CATALOG_PATH: &str = "/catalog";

pub fn sha512_hex(data: &[u8]) -> String {
    hex::encode(Sha512::digest(data))
}

/// Request target the catalog client produces for an (unescaped, simple) id.
pub fn catalog_target(identifier: &str) -> String {
    format!("{}?id={}", CATALOG_PATH, identifier.to_lowercase())
}

/// Builds a catalog response in the shape of the Chocolatey OData feed.
pub fn catalog_feed(
    title: Option<&str>,
    version: Option<&str>,
    download_cache: Option<&str>,
) -> String {
    let mut properties = String::new();
    if let Some(title) = title {
        properties.push_str(&format!("<d:Title>{}</d:Title>", title));
    }
    if let Some(version) = version {
        properties.push_str(&format!("<d:Version>{}</d:Version>", version));
    }
    match download_cache {
        Some(download_cache) => properties.push_str(&format!(
            "<d:DownloadCache>{}</d:DownloadCache>",
            download_cache
        )),
        None => properties.push_str(r#"<d:DownloadCache m:null="true" />"#),
    }

    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<feed xml:base="https://community.chocolatey.org/api/v2/" xmlns="http://www.w3.org/2005/Atom" xmlns:d="http://schemas.microsoft.com/ado/2007/08/dataservices" xmlns:m="http://schemas.microsoft.com/ado/2007/08/dataservices/metadata">
  <id>https://community.chocolatey.org/api/v2/Packages</id>
  <title type="text">Packages</title>
  {entry}
</feed>"#,
        entry = if title.is_some() {
            format!(
                "<entry><title type=\"text\">pkg</title><m:properties>{}</m:properties></entry>",
                properties
            )
        } else {
            String::new()
        }
    )
}

/// One `url^architecture/fileName^digest` download cache entry.
pub fn cache_entry(url: &str, architecture: &str, file_name: &str, digest_hex: &str) -> String {
    format!("{}^{}/{}^{}", url, architecture, file_name, digest_hex)
}

/// Routes the catalog query for `identifier` to `feed`.
pub fn catalog_route(routes: &mut HashMap<String, Route>, identifier: &str, feed: String) {
    routes.insert(catalog_target(identifier), Route::xml(feed));
}

pub fn create_test_config(
    server: &TestServer,
    output_dir: &Path,
    read_timeout_secs: u64,
) -> Config {
    let mut config = Config::default();
    config.catalog.query_url = format!("{}{}?id={{id}}", server.base_url(), CATALOG_PATH);
    config.catalog.request_timeout_secs = 10;
    config.download.read_timeout_secs = read_timeout_secs;
    config.output.path = Some(output_dir.to_path_buf());
    config
}

pub fn write_config_file(dir: &Path, config: &Config) -> Result<PathBuf> {
    let config_path = dir.join("config.json");
    std::fs::write(&config_path, serde_json::to_string_pretty(config)?)?;
    Ok(config_path)
}

pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter("chocodl_lib=debug,chocodl_e2e_tests=debug")
        .with_test_writer()
        .try_init()
        .ok();
}

/// Log output captured by a subscriber from [`capturing_subscriber`].
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// A plain-text subscriber writing into the returned buffer. Attach it to a
/// future with `tracing::instrument::WithSubscriber::with_subscriber`.
pub fn capturing_subscriber() -> (impl tracing::Subscriber + Send + Sync + 'static, CapturedLogs)
{
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();
    (subscriber, logs)
}
