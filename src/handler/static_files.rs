//! Static file serving module
//!
//! Serves files from an ordered list of root directories: the cached Swagger
//! UI bundle first, then the user's specification directory. The first root
//! holding the requested path wins.

use async_trait::async_trait;
use hyper::body::Bytes;
use hyper::{Method, Request};
use percent_encoding::percent_decode_str;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::AsyncReadExt;

use super::Handler;
use crate::http::{self, cache, mime, HttpResponse};
use crate::logger::Logger;

const INDEX_FILE: &str = "index.html";

/// An opened file and where it was found
#[derive(Debug)]
pub struct ResolvedFile {
    pub path: PathBuf,
    pub file: File,
    pub metadata: std::fs::Metadata,
}

/// Layered file lookup over several roots in priority order
#[derive(Debug, Clone)]
pub struct FallbackResolver {
    roots: Vec<PathBuf>,
    logger: Logger,
}

impl FallbackResolver {
    pub const fn new(roots: Vec<PathBuf>, logger: Logger) -> Self {
        Self { roots, logger }
    }

    /// Open `relative` from the first root that has it.
    ///
    /// A missing file moves on to the next root. Any other I/O error ends
    /// the search and counts as not found.
    pub async fn open(&self, relative: &Path) -> Option<ResolvedFile> {
        for root in &self.roots {
            let path = root.join(relative);
            match File::open(&path).await {
                Ok(file) => {
                    return match file.metadata().await {
                        Ok(metadata) => Some(ResolvedFile {
                            path,
                            file,
                            metadata,
                        }),
                        Err(e) => {
                            self.logger
                                .debug(&format!("cannot stat {}: {e}", path.display()));
                            None
                        }
                    };
                }
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => {
                    self.logger
                        .debug(&format!("cannot open {}: {e}", path.display()));
                    return None;
                }
            }
        }
        None
    }
}

/// Turn a URI path into a path relative to a root.
///
/// The path is percent-decoded and cleaned as if rooted at `/`: empty and
/// `.` segments vanish and `..` never climbs above the root. Returns `None`
/// for paths that cannot name a file (bad UTF-8, backslashes, NUL).
pub fn clean_request_path(uri_path: &str) -> Option<PathBuf> {
    let decoded = percent_decode_str(uri_path).decode_utf8().ok()?;
    let mut segments: Vec<&str> = Vec::new();

    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s if s.contains('\\') || s.contains('\0') => return None,
            s => segments.push(s),
        }
    }

    Some(segments.iter().collect())
}

/// File endpoint on top of a [`FallbackResolver`]
pub struct FileServer {
    resolver: FallbackResolver,
}

impl FileServer {
    pub const fn new(resolver: FallbackResolver) -> Self {
        Self { resolver }
    }

    async fn serve(&self, req: &Request<()>, resolved: ResolvedFile) -> HttpResponse {
        let ResolvedFile {
            path,
            mut file,
            metadata,
        } = resolved;

        let capacity = usize::try_from(metadata.len()).unwrap_or(0);
        let mut data = Vec::with_capacity(capacity);
        if let Err(e) = file.read_to_end(&mut data).await {
            return http::build_error_response(&e);
        }

        let etag = cache::etag_for(&data);
        if cache::is_not_modified(req.headers(), &etag) {
            return http::build_304_response(&etag);
        }

        http::build_file_response(
            Bytes::from(data),
            mime::content_type_for_path(&path),
            &etag,
            req.method() == Method::HEAD,
        )
    }
}

#[async_trait]
impl Handler for FileServer {
    async fn handle(&self, req: &Request<()>) -> HttpResponse {
        let uri_path = req.uri().path();
        let Some(relative) = clean_request_path(uri_path) else {
            return http::build_404_response();
        };

        let wants_index = uri_path.ends_with('/');
        let lookup = if wants_index {
            relative.join(INDEX_FILE)
        } else {
            relative.clone()
        };

        let Some(resolved) = self.resolver.open(&lookup).await else {
            return http::build_404_response();
        };

        if !resolved.metadata.is_dir() {
            return self.serve(req, resolved).await;
        }

        // Directories are only served through their index, at a path with a
        // trailing slash so relative asset links resolve.
        if !wants_index {
            let target = match req.uri().query() {
                Some(query) => format!("{uri_path}/?{query}"),
                None => format!("{uri_path}/"),
            };
            return http::build_redirect_response(&target);
        }

        match self.resolver.open(&lookup.join(INDEX_FILE)).await {
            Some(index) if !index.metadata.is_dir() => self.serve(req, index).await,
            _ => http::build_404_response(),
        }
    }
}
