//! Request handler module
//!
//! Every endpoint and every middleware implements [`Handler`]; middleware
//! wraps another handler, so a route is a chain such as
//! `NoCache(RewriteHtml(FileServer))`.
//!
//! Request bodies are never read by this server, so handlers see a
//! `Request<()>` built from the incoming request's head.

pub mod middleware;
pub mod rewrite;
pub mod router;
pub mod spec_config;
pub mod static_files;
pub mod validate;

use async_trait::async_trait;
use hyper::Request;
use std::sync::Arc;

use crate::http::HttpResponse;

// Re-export main entry point
pub use router::{build, Router};

#[async_trait]
pub trait Handler: Send + Sync {
    async fn handle(&self, req: &Request<()>) -> HttpResponse;
}

#[async_trait]
impl<H: Handler + ?Sized> Handler for Box<H> {
    async fn handle(&self, req: &Request<()>) -> HttpResponse {
        (**self).handle(req).await
    }
}

#[async_trait]
impl<H: Handler + ?Sized> Handler for Arc<H> {
    async fn handle(&self, req: &Request<()>) -> HttpResponse {
        (**self).handle(req).await
    }
}

/// Value of the query parameter `name` in the request target, if any
pub fn query_param(req: &Request<()>, name: &str) -> Option<String> {
    let query = req.uri().query()?;
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}
