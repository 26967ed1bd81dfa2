//! HTTP response building module
//!
//! Provides builders for the responses the preview server sends, decoupled
//! from specific handlers.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{CONTENT_TYPE, ETAG, LOCATION};
use hyper::{Response, StatusCode};

pub type HttpResponse = Response<Full<Bytes>>;

fn fallback(status: StatusCode, body: Bytes) -> HttpResponse {
    let mut response = Response::new(Full::new(body));
    *response.status_mut() = status;
    response
}

/// Plain-text response with the given status
pub fn build_text_response(status: StatusCode, message: impl Into<String>) -> HttpResponse {
    let body = Bytes::from(message.into());
    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "text/plain; charset=utf-8")
        .body(Full::new(body.clone()))
        .unwrap_or_else(|_| fallback(status, body))
}

/// Build 404 Not Found response
pub fn build_404_response() -> HttpResponse {
    build_text_response(StatusCode::NOT_FOUND, "404 page not found\n")
}

/// Build 500 response carrying the error's description
pub fn build_error_response(error: &impl std::fmt::Display) -> HttpResponse {
    build_text_response(StatusCode::INTERNAL_SERVER_ERROR, format!("{error}\n"))
}

/// Build 304 Not Modified response
pub fn build_304_response(etag: &str) -> HttpResponse {
    Response::builder()
        .status(StatusCode::NOT_MODIFIED)
        .header(ETAG, etag)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|_| fallback(StatusCode::NOT_MODIFIED, Bytes::new()))
}

/// Build 302 redirect response
pub fn build_redirect_response(target: &str) -> HttpResponse {
    Response::builder()
        .status(StatusCode::FOUND)
        .header(LOCATION, target)
        .header(CONTENT_TYPE, "text/plain; charset=utf-8")
        .body(Full::new(Bytes::from("Redirecting...")))
        .unwrap_or_else(|_| build_text_response(StatusCode::BAD_REQUEST, "invalid redirect target"))
}

/// Build 200 response with a body of the given type
pub fn build_content_response(data: Bytes, content_type: &str) -> HttpResponse {
    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, content_type)
        .body(Full::new(data.clone()))
        .unwrap_or_else(|_| fallback(StatusCode::OK, data))
}

/// Build 200 response for a file, tagged for revalidation.
/// `HEAD` requests get the headers and an empty body.
pub fn build_file_response(data: Bytes, content_type: &str, etag: &str, is_head: bool) -> HttpResponse {
    let content_length = data.len();
    let body = if is_head { Bytes::new() } else { data };

    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, content_type)
        .header(hyper::header::CONTENT_LENGTH, content_length)
        .header(ETAG, etag)
        .body(Full::new(body.clone()))
        .unwrap_or_else(|_| fallback(StatusCode::OK, body))
}
