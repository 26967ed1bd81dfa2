//! HTTP cache validation module
//!
//! Everything this server returns is marked `no-cache`, so browsers always
//! revalidate; an `ETag` keeps those revalidations cheap for the UI bundle.

use hyper::header::{HeaderMap, HeaderValue, CACHE_CONTROL, IF_NONE_MATCH};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

pub const NO_CACHE: &str = "no-cache";

/// Quoted `ETag` for a response body, e.g. `"9f3a01c2"`
pub fn etag_for(content: &[u8]) -> String {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    format!("\"{:x}\"", hasher.finish())
}

/// Whether the request's `If-None-Match` lists `etag` (or `*`)
pub fn is_not_modified(request_headers: &HeaderMap, etag: &str) -> bool {
    request_headers
        .get_all(IF_NONE_MATCH)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .any(|candidate| {
            let candidate = candidate.trim();
            candidate == "*" || candidate.trim_start_matches("W/") == etag
        })
}

/// Force revalidation on every load
pub fn set_no_cache(response_headers: &mut HeaderMap) {
    response_headers.insert(CACHE_CONTROL, HeaderValue::from_static(NO_CACHE));
}
