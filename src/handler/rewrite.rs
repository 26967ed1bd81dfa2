//! HTML rewriting middleware
//!
//! Swagger UI's bootstrap page hardcodes the petstore demo document. The
//! page is rewritten in flight so the UI loads `/.swagger-config.yaml`
//! instead. The wrapped handler's response is fully buffered first: the body
//! length changes, and headers can only be forwarded once it is known.

use async_trait::async_trait;
use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::header::{HeaderValue, CONTENT_LENGTH};
use hyper::{Method, Request, Response};

use super::spec_config::CONFIG_PATH;
use super::Handler;
use crate::http::{sniff, HttpResponse};

/// Demo document assignments removed from the page
pub const DEMO_URL_LINES: [&str; 2] = [
    r#"url: "http://petstore.swagger.io/v2/swagger.json","#,
    r#"url: "https://petstore.swagger.io/v2/swagger.json","#,
];

/// Line of the `SwaggerUIBundle({...})` call the config URL is injected after
pub const ANCHOR_LINE: &str = "dom_id: '#swagger-ui',";

pub struct RewriteHtml<H> {
    inner: H,
    injected_line: String,
}

impl<H: Handler> RewriteHtml<H> {
    pub fn new(inner: H) -> Self {
        Self {
            inner,
            injected_line: format!("configUrl: '{CONFIG_PATH}',"),
        }
    }
}

/// Apply the substitutions in order: drop the demo URL, then inject the
/// config URL after every anchor line.
pub fn rewrite_document(document: &str, injected_line: &str) -> String {
    let mut output = document.to_string();
    for line in DEMO_URL_LINES {
        output = output.replace(line, "");
    }
    output.replace(ANCHOR_LINE, &format!("{ANCHOR_LINE}\n{injected_line}"))
}

/// `HEAD` is answered from a `GET` of the same target, so its
/// `Content-Length` describes the rewritten page.
fn as_get(req: &Request<()>) -> Request<()> {
    let mut get = Request::new(());
    *get.method_mut() = Method::GET;
    *get.uri_mut() = req.uri().clone();
    *get.version_mut() = req.version();
    *get.headers_mut() = req.headers().clone();
    get
}

#[async_trait]
impl<H: Handler> Handler for RewriteHtml<H> {
    async fn handle(&self, req: &Request<()>) -> HttpResponse {
        let is_head = req.method() == Method::HEAD;
        let recorded = if is_head {
            self.inner.handle(&as_get(req)).await
        } else {
            self.inner.handle(req).await
        };
        let (mut parts, body) = recorded.into_parts();
        let body = body
            .collect()
            .await
            .map_or_else(|never| match never {}, http_body_util::Collected::to_bytes);

        let body = match std::str::from_utf8(&body) {
            Ok(document) if sniff::is_html(&body) => {
                let rewritten = Bytes::from(rewrite_document(document, &self.injected_line));
                parts.headers.insert(CONTENT_LENGTH, HeaderValue::from(rewritten.len()));
                rewritten
            }
            _ => body,
        };

        if is_head {
            return Response::from_parts(parts, Full::new(Bytes::new()));
        }
        Response::from_parts(parts, Full::new(body))
    }
}
