//! Cross-cutting middleware: cache control, access logging, and the
//! single-file redirect that points the UI at `/swagger.yml`.

use async_trait::async_trait;
use hyper::header::HOST;
use hyper::Request;

use super::spec_config::SPEC_FILE_PATH;
use super::{query_param, Handler};
use crate::http::{self, cache, HttpResponse};
use crate::logger::Logger;

/// Marks every response `Cache-Control: no-cache`
pub struct NoCache<H> {
    inner: H,
}

impl<H: Handler> NoCache<H> {
    pub const fn new(inner: H) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<H: Handler> Handler for NoCache<H> {
    async fn handle(&self, req: &Request<()>) -> HttpResponse {
        let mut response = self.inner.handle(req).await;
        cache::set_no_cache(response.headers_mut());
        response
    }
}

/// Logs the request line before delegating
pub struct RequestLog<H> {
    inner: H,
    logger: Logger,
}

impl<H: Handler> RequestLog<H> {
    pub const fn new(inner: H, logger: Logger) -> Self {
        Self { inner, logger }
    }
}

#[async_trait]
impl<H: Handler> Handler for RequestLog<H> {
    async fn handle(&self, req: &Request<()>) -> HttpResponse {
        self.logger.request(req.method(), req.uri(), req.version());
        self.inner.handle(req).await
    }
}

/// In single-file mode, sends a bare `/` to `/?url=http://HOST/swagger.yml`
/// so the UI (and the config endpoint, through the referer) know which
/// document to load.
pub struct SpecUrlRedirect<H> {
    inner: H,
}

impl<H: Handler> SpecUrlRedirect<H> {
    pub const fn new(inner: H) -> Self {
        Self { inner }
    }
}

fn request_host(req: &Request<()>) -> String {
    req.headers()
        .get(HOST)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
        .or_else(|| req.uri().authority().map(ToString::to_string))
        .unwrap_or_else(|| "localhost".to_string())
}

/// `/` with `url` pointing at the spec endpoint on the requesting host,
/// keeping any other query parameters
pub fn spec_url_location(req: &Request<()>) -> String {
    let spec_url = format!("http://{}{SPEC_FILE_PATH}", request_host(req));

    let mut query = url::form_urlencoded::Serializer::new(String::new());
    if let Some(existing) = req.uri().query() {
        for (key, value) in url::form_urlencoded::parse(existing.as_bytes()) {
            if key != "url" {
                query.append_pair(&key, &value);
            }
        }
    }
    query.append_pair("url", &spec_url);

    format!("{}?{}", req.uri().path(), query.finish())
}

#[async_trait]
impl<H: Handler> Handler for SpecUrlRedirect<H> {
    async fn handle(&self, req: &Request<()>) -> HttpResponse {
        let has_url = query_param(req, "url").is_some_and(|u| !u.is_empty());
        if req.uri().path() == "/" && !has_url {
            return http::build_redirect_response(&spec_url_location(req));
        }
        self.inner.handle(req).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::test_support::{body_string, get};
    use crate::http::build_text_response;
    use hyper::header::{CACHE_CONTROL, LOCATION};
    use hyper::StatusCode;

    struct Ok200;

    #[async_trait]
    impl Handler for Ok200 {
        async fn handle(&self, req: &Request<()>) -> HttpResponse {
            build_text_response(StatusCode::OK, req.uri().to_string())
        }
    }

    fn with_host(target: &str, host: &str) -> Request<()> {
        Request::builder()
            .uri(target)
            .header(HOST, host)
            .body(())
            .unwrap()
    }

    #[tokio::test]
    async fn test_no_cache_header() {
        let response = NoCache::new(Ok200).handle(&get("/")).await;
        assert_eq!(response.headers()[CACHE_CONTROL], "no-cache");
    }

    #[tokio::test]
    async fn test_request_log_records_request_line() {
        let logger = Logger::memory();
        let handler = RequestLog::new(Ok200, logger.clone());

        let response = handler.handle(&get("/a.json?x=1")).await;
        assert_eq!(body_string(response).await, "/a.json?x=1");
        assert!(logger.captured()[0].ends_with("GET /a.json?x=1 HTTP/1.1"));
    }

    #[tokio::test]
    async fn test_root_redirects_to_spec_url() {
        let handler = SpecUrlRedirect::new(Ok200);
        let response = handler.handle(&with_host("/", "localhost:8080")).await;

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            response.headers()[LOCATION],
            "/?url=http%3A%2F%2Flocalhost%3A8080%2Fswagger.yml"
        );
    }

    #[tokio::test]
    async fn test_redirect_keeps_other_parameters() {
        let handler = SpecUrlRedirect::new(Ok200);
        let response = handler
            .handle(&with_host("/?deepLinking=true&url=", "127.0.0.1:9000"))
            .await;

        assert_eq!(
            response.headers()[LOCATION],
            "/?deepLinking=true&url=http%3A%2F%2F127.0.0.1%3A9000%2Fswagger.yml"
        );
    }

    #[tokio::test]
    async fn test_no_redirect_when_url_present_or_not_root() {
        let handler = SpecUrlRedirect::new(Ok200);

        let response = handler
            .handle(&with_host("/?url=http://h/swagger.yml", "h"))
            .await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = handler.handle(&with_host("/swagger-ui.css", "h")).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_missing_host_falls_back_to_localhost() {
        assert_eq!(
            spec_url_location(&get("/")),
            "/?url=http%3A%2F%2Flocalhost%2Fswagger.yml"
        );
    }
}
