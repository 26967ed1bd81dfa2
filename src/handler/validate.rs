//! Validation forwarding endpoint
//!
//! `/validate` streams the previewed document to a remote validator and
//! returns the validator's verdict, pretty-printed. The validator's reply is
//! treated as an opaque JSON document.

use async_trait::async_trait;
use hyper::body::Bytes;
use hyper::header::CONTENT_TYPE;
use hyper::Request;
use std::path::PathBuf;
use tokio_util::io::ReaderStream;

use super::static_files::clean_request_path;
use super::{query_param, Handler};
use crate::config::Target;
use crate::error::{PreviewError, Result};
use crate::http::{self, HttpResponse};
use crate::logger::Logger;

pub const VALIDATE_PATH: &str = "/validate";

pub struct Validate {
    target: Target,
    validator_url: String,
    client: reqwest::Client,
    logger: Logger,
}

impl Validate {
    pub fn new(target: Target, validator_url: impl Into<String>, logger: Logger) -> Self {
        Self {
            target,
            validator_url: validator_url.into(),
            client: reqwest::Client::new(),
            logger,
        }
    }

    /// The file to validate. A directory target needs the request's `url`
    /// parameter (an absolute URL or a path) to pick one of its files.
    fn spec_path(&self, req: &Request<()>) -> Result<PathBuf> {
        match &self.target {
            Target::File(path) => Ok(path.clone()),
            Target::Directory(root) => {
                let selected = query_param(req, "url")
                    .filter(|u| !u.is_empty())
                    .ok_or(PreviewError::NoSpecSelected)?;
                let uri_path = match url::Url::parse(&selected) {
                    Ok(absolute) => absolute.path().to_string(),
                    Err(_) => selected,
                };
                let relative = clean_request_path(&uri_path)
                    .filter(|p| !p.as_os_str().is_empty())
                    .ok_or(PreviewError::NoSpecSelected)?;
                Ok(root.join(relative))
            }
        }
    }

    async fn forward(&self, req: &Request<()>) -> Result<String> {
        let path = self.spec_path(req)?;
        let file = tokio::fs::File::open(&path).await?;
        self.logger.debug(&format!(
            "validating {} with {}",
            path.display(),
            self.validator_url
        ));

        let response = self
            .client
            .post(&self.validator_url)
            .header(CONTENT_TYPE, "application/json")
            .body(reqwest::Body::wrap_stream(ReaderStream::new(file)))
            .send()
            .await?;

        let raw = response.bytes().await?;
        let verdict: serde_json::Value = serde_json::from_slice(&raw)?;
        let mut pretty = serde_json::to_string_pretty(&verdict)?;
        pretty.push('\n');
        Ok(pretty)
    }
}

#[async_trait]
impl Handler for Validate {
    async fn handle(&self, req: &Request<()>) -> HttpResponse {
        match self.forward(req).await {
            Ok(body) => http::build_content_response(Bytes::from(body), "application/json"),
            Err(e) => {
                self.logger.error(&format!("validation failed: {e}"));
                http::build_error_response(&e)
            }
        }
    }
}
