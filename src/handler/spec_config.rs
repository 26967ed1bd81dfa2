//! Swagger UI configuration endpoints
//!
//! `/.swagger-config.yaml` tells the UI which documents exist and which to
//! open first. In directory mode the directory is walked on every request,
//! so newly added files show up on reload.

use async_trait::async_trait;
use hyper::body::Bytes;
use hyper::header::REFERER;
use hyper::{Request, StatusCode};
use serde::Serialize;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::validate::VALIDATE_PATH;
use super::Handler;
use crate::http::{self, mime, HttpResponse};
use crate::logger::Logger;

pub const CONFIG_PATH: &str = "/.swagger-config.yaml";

/// Where a single-file target is published
pub const SPEC_FILE_PATH: &str = "/swagger.yml";

pub const SPEC_EXTENSIONS: [&str; 3] = ["json", "yml", "yaml"];

const YAML_CONTENT_TYPE: &str = "text/yaml; charset=utf-8";

/// A document offered in the UI's selector
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpecEntry {
    pub name: String,
    pub url: String,
}

impl SpecEntry {
    fn from_relative(relative: &Path) -> Self {
        let parts: Vec<String> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        let path = format!("/{}", parts.join("/"));
        Self {
            name: path.clone(),
            url: path,
        }
    }
}

/// The document Swagger UI fetches through `configUrl`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SwaggerConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub urls: Option<Vec<SpecEntry>>,
    #[serde(rename = "urls.primaryName", skip_serializing_if = "Option::is_none")]
    pub primary_name: Option<String>,
    #[serde(rename = "validatorUrl")]
    pub validator_url: String,
}

impl SwaggerConfig {
    /// Single `url` when nothing was discovered, otherwise the `urls` list
    /// with `default` as the preselected entry when set.
    pub fn synthesize(entries: Vec<SpecEntry>, default: String) -> Self {
        if entries.is_empty() {
            return Self {
                url: Some(default),
                urls: None,
                primary_name: None,
                validator_url: VALIDATE_PATH.to_string(),
            };
        }

        Self {
            url: None,
            urls: Some(entries),
            primary_name: (!default.is_empty()).then_some(default),
            validator_url: VALIDATE_PATH.to_string(),
        }
    }
}

fn is_spec_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| SPEC_EXTENSIONS.contains(&ext))
}

/// Walk `root` depth-first in file-name order and collect specification
/// files. Entries that cannot be read are skipped with a warning.
pub fn discover_specs(root: &Path, logger: &Logger) -> Vec<SpecEntry> {
    let mut entries = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                logger.warn(&format!("skipping unreadable entry while listing specs: {e}"));
                continue;
            }
        };

        if entry.file_type().is_dir() || !is_spec_file(entry.path()) || !entry.path().is_file() {
            continue;
        }

        if let Ok(relative) = entry.path().strip_prefix(root) {
            entries.push(SpecEntry::from_relative(relative));
        }
    }

    entries
}

/// The `url` query parameter of the page that requested the config
pub fn default_from_referer(referer: Option<&str>) -> String {
    referer
        .and_then(|r| url::Url::parse(r).ok())
        .and_then(|page| {
            page.query_pairs()
                .find(|(key, _)| key == "url")
                .map(|(_, value)| value.into_owned())
        })
        .unwrap_or_default()
}

/// `GET /.swagger-config.yaml`
pub struct SpecConfig {
    root: Option<PathBuf>,
    logger: Logger,
}

impl SpecConfig {
    /// Config listing every spec below `root`
    pub const fn for_directory(root: PathBuf, logger: Logger) -> Self {
        Self {
            root: Some(root),
            logger,
        }
    }

    /// Config for single-file mode, where the UI gets its document from the
    /// page's `url` parameter
    pub const fn for_single_file(logger: Logger) -> Self {
        Self { root: None, logger }
    }
}

#[async_trait]
impl Handler for SpecConfig {
    async fn handle(&self, req: &Request<()>) -> HttpResponse {
        let entries = match &self.root {
            Some(root) => {
                let root = root.clone();
                let logger = self.logger.clone();
                tokio::task::spawn_blocking(move || discover_specs(&root, &logger))
                    .await
                    .unwrap_or_default()
            }
            None => Vec::new(),
        };

        let referer = req.headers().get(REFERER).and_then(|v| v.to_str().ok());
        let default = default_from_referer(referer);
        self.logger.debug(&format!(
            "config: {} spec(s), default '{default}'",
            entries.len()
        ));

        match serde_yaml::to_string(&SwaggerConfig::synthesize(entries, default)) {
            Ok(document) => http::build_content_response(Bytes::from(document), YAML_CONTENT_TYPE),
            Err(e) => {
                self.logger.error(&format!("cannot encode swagger config: {e}"));
                http::build_error_response(&e)
            }
        }
    }
}

/// `GET /swagger.yml`: the raw bytes of the single-file target
pub struct SpecFile {
    path: PathBuf,
}

impl SpecFile {
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl Handler for SpecFile {
    async fn handle(&self, _req: &Request<()>) -> HttpResponse {
        match tokio::fs::read(&self.path).await {
            Ok(data) => http::build_content_response(
                Bytes::from(data),
                mime::content_type_for_path(&self.path),
            ),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => http::build_404_response(),
            Err(e) => http::build_text_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
        }
    }
}
