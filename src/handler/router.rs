//! Request routing dispatch module
//!
//! Exact-path routes with a fallback, and the wiring of every route's
//! handler chain for the chosen [`Target`].

use async_trait::async_trait;
use hyper::Request;
use std::path::PathBuf;

use super::middleware::{NoCache, RequestLog, SpecUrlRedirect};
use super::rewrite::RewriteHtml;
use super::spec_config::{SpecConfig, SpecFile, CONFIG_PATH, SPEC_FILE_PATH};
use super::static_files::{FallbackResolver, FileServer};
use super::validate::{Validate, VALIDATE_PATH};
use super::Handler;
use crate::config::Target;
use crate::http::HttpResponse;
use crate::logger::Logger;

/// Dispatches on the exact request path, everything else goes to the
/// fallback handler
pub struct Router {
    routes: Vec<(String, Box<dyn Handler>)>,
    fallback: Box<dyn Handler>,
}

impl Router {
    pub fn new(fallback: impl Handler + 'static) -> Self {
        Self {
            routes: Vec::new(),
            fallback: Box::new(fallback),
        }
    }

    #[must_use]
    pub fn route(mut self, path: &str, handler: impl Handler + 'static) -> Self {
        self.routes.push((path.to_string(), Box::new(handler)));
        self
    }

    fn find(&self, path: &str) -> &dyn Handler {
        self.routes
            .iter()
            .find(|(route, _)| route == path)
            .map_or(self.fallback.as_ref(), |(_, handler)| handler.as_ref())
    }
}

#[async_trait]
impl Handler for Router {
    async fn handle(&self, req: &Request<()>) -> HttpResponse {
        self.find(req.uri().path()).handle(req).await
    }
}

/// Build the complete handler tree.
///
/// Files are looked up in the UI bundle first and in the target's directory
/// second. HTML from either is rewritten to load the synthesized config.
pub fn build(
    target: &Target,
    ui_dist: PathBuf,
    validator_url: &str,
    logger: &Logger,
) -> RequestLog<Router> {
    let resolver = FallbackResolver::new(vec![ui_dist, target.content_root()], logger.clone());
    let files = RewriteHtml::new(FileServer::new(resolver));
    let validate = Validate::new(target.clone(), validator_url, logger.clone());

    let router = match target {
        Target::Directory(root) => Router::new(NoCache::new(files)).route(
            CONFIG_PATH,
            NoCache::new(SpecConfig::for_directory(root.clone(), logger.clone())),
        ),
        Target::File(path) => Router::new(NoCache::new(SpecUrlRedirect::new(files)))
            .route(
                CONFIG_PATH,
                NoCache::new(SpecConfig::for_single_file(logger.clone())),
            )
            .route(SPEC_FILE_PATH, NoCache::new(SpecFile::new(path.clone()))),
    };

    RequestLog::new(router.route(VALIDATE_PATH, validate), logger.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::test_support::{body_string, get};
    use hyper::header::{CACHE_CONTROL, HOST, LOCATION, REFERER};
    use hyper::StatusCode;
    use std::fs;

    const INDEX_HTML: &str = "<!DOCTYPE html>\n<html>\n<script>\nSwaggerUIBundle({\n  url: \"http://petstore.swagger.io/v2/swagger.json\",\n  dom_id: '#swagger-ui',\n})\n</script>\n</html>\n";

    struct Fixture {
        ui: tempfile::TempDir,
        user: tempfile::TempDir,
        logger: Logger,
    }

    impl Fixture {
        fn new() -> Self {
            let ui = tempfile::tempdir().unwrap();
            fs::write(ui.path().join("index.html"), INDEX_HTML).unwrap();
            fs::write(ui.path().join("swagger-ui.css"), "body{}").unwrap();

            let user = tempfile::tempdir().unwrap();
            fs::write(user.path().join("api.yaml"), "openapi: 3.0.0\n").unwrap();

            Self {
                ui,
                user,
                logger: Logger::memory(),
            }
        }

        fn directory_app(&self) -> RequestLog<Router> {
            build(
                &Target::Directory(self.user.path().to_path_buf()),
                self.ui.path().to_path_buf(),
                "http://127.0.0.1:9/validator/debug",
                &self.logger,
            )
        }

        fn single_file_app(&self) -> RequestLog<Router> {
            build(
                &Target::File(self.user.path().join("api.yaml")),
                self.ui.path().to_path_buf(),
                "http://127.0.0.1:9/validator/debug",
                &self.logger,
            )
        }
    }

    fn with_host(target: &str) -> Request<()> {
        Request::builder()
            .uri(target)
            .header(HOST, "localhost:8080")
            .body(())
            .unwrap()
    }

    #[tokio::test]
    async fn test_head_index_length_matches_get() {
        let fixture = Fixture::new();
        let app = fixture.directory_app();

        let get_body = body_string(app.handle(&get("/")).await).await;
        let head = Request::builder().method("HEAD").uri("/").body(()).unwrap();
        let response = app.handle(&head).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[hyper::header::CONTENT_LENGTH],
            get_body.len().to_string().as_str()
        );
        assert!(body_string(response).await.is_empty());
    }

    #[tokio::test]
    async fn test_index_is_rewritten_and_uncached() {
        let fixture = Fixture::new();
        let app = fixture.directory_app();

        let response = app.handle(&get("/")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[CACHE_CONTROL], "no-cache");

        let body = body_string(response).await;
        assert!(body.contains("dom_id: '#swagger-ui',\nconfigUrl: '/.swagger-config.yaml',"));
        assert!(!body.contains("petstore"));
        assert!(fixture.logger.captured()[0].ends_with("GET / HTTP/1.1"));
    }

    #[tokio::test]
    async fn test_user_files_served_after_bundle() {
        let fixture = Fixture::new();
        let app = fixture.directory_app();

        let css = app.handle(&get("/swagger-ui.css")).await;
        assert_eq!(body_string(css).await, "body{}");

        let spec = app.handle(&get("/api.yaml")).await;
        assert_eq!(body_string(spec).await, "openapi: 3.0.0\n");
    }

    #[tokio::test]
    async fn test_config_route_in_directory_mode() {
        let fixture = Fixture::new();
        let app = fixture.directory_app();

        let req = Request::builder()
            .uri(CONFIG_PATH)
            .header(REFERER, "http://localhost:8080/?url=/api.yaml")
            .body(())
            .unwrap();
        let response = app.handle(&req).await;
        assert_eq!(response.headers()[CACHE_CONTROL], "no-cache");

        let doc: serde_yaml::Value = serde_yaml::from_str(&body_string(response).await).unwrap();
        assert_eq!(doc["urls"][0]["url"], "/api.yaml");
        assert_eq!(doc["urls.primaryName"], "/api.yaml");
    }

    #[tokio::test]
    async fn test_single_file_mode_redirects_then_serves() {
        let fixture = Fixture::new();
        let app = fixture.single_file_app();

        let response = app.handle(&with_host("/")).await;
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            response.headers()[LOCATION],
            "/?url=http%3A%2F%2Flocalhost%3A8080%2Fswagger.yml"
        );

        let response = app
            .handle(&with_host("/?url=http%3A%2F%2Flocalhost%3A8080%2Fswagger.yml"))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_string(response).await.contains("configUrl:"));

        let spec = app.handle(&with_host(SPEC_FILE_PATH)).await;
        assert_eq!(spec.headers()[CACHE_CONTROL], "no-cache");
        assert_eq!(body_string(spec).await, "openapi: 3.0.0\n");
    }

    #[tokio::test]
    async fn test_spec_file_route_only_in_single_file_mode() {
        let fixture = Fixture::new();
        let app = fixture.directory_app();

        let response = app.handle(&get(SPEC_FILE_PATH)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_validate_route_reports_failures() {
        let fixture = Fixture::new();
        let app = fixture.directory_app();

        let response = app.handle(&get(VALIDATE_PATH)).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.headers().get(CACHE_CONTROL).is_none());
    }
}
