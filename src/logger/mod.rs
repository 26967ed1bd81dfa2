//! Logger module
//!
//! Provides the logging handle used throughout the server:
//! - Startup and bootstrap progress
//! - Access logging (one line per request)
//! - Error and warning logging
//! - Optional file-based logging
//!
//! A `Logger` is created once in `main` and handed to every component that
//! logs; there is no global logger state.

mod format;
pub mod writer;

pub use format::{format_line, request_line, Level};
pub use writer::LogTarget;

use crate::config::LoggingConfig;
use chrono::Local;
use hyper::{Method, Uri, Version};
use std::io::IsTerminal;
use std::sync::Arc;

/// Cloneable logging handle
#[derive(Clone)]
pub struct Logger {
    inner: Arc<Inner>,
}

struct Inner {
    level: Level,
    color: bool,
    target: LogTarget,
}

impl Logger {
    pub fn new(level: Level, color: bool, target: LogTarget) -> Self {
        Self {
            inner: Arc::new(Inner {
                level,
                color,
                target,
            }),
        }
    }

    /// Build the logger described by the configuration.
    ///
    /// Colour is enabled only when writing to stderr and stderr is an
    /// interactive terminal, unless `logging.color` forces it either way.
    pub fn from_config(config: &LoggingConfig) -> std::io::Result<Self> {
        let level = if config.verbose {
            Level::Debug
        } else {
            Level::Info
        };

        let (target, is_tty) = match config.file.as_deref() {
            Some(path) => (LogTarget::file(path)?, false),
            None => (LogTarget::Stderr, std::io::stderr().is_terminal()),
        };

        let color = config.color.unwrap_or(is_tty);
        Ok(Self::new(level, color, target))
    }

    /// In-memory logger at debug level; see [`Logger::captured`]
    pub fn memory() -> Self {
        Self::new(Level::Debug, false, LogTarget::memory())
    }

    pub fn enabled(&self, level: Level) -> bool {
        level <= self.inner.level
    }

    pub fn log(&self, level: Level, message: &str) {
        if !self.enabled(level) {
            return;
        }
        let line = format_line(&Local::now(), level, message, self.inner.color);
        self.inner.target.write_line(&line);
    }

    pub fn error(&self, message: &str) {
        self.log(Level::Error, message);
    }

    pub fn warn(&self, message: &str) {
        self.log(Level::Warn, message);
    }

    pub fn info(&self, message: &str) {
        self.log(Level::Info, message);
    }

    pub fn debug(&self, message: &str) {
        self.log(Level::Debug, message);
    }

    /// Access log entry for an incoming request
    pub fn request(&self, method: &Method, uri: &Uri, version: Version) {
        if self.enabled(Level::Info) {
            self.info(&request_line(method, uri, version));
        }
    }

    pub fn connection_error(&self, err: &impl std::fmt::Display) {
        self.debug(&format!("failed to serve connection: {err}"));
    }

    /// Lines written so far by a [`Logger::memory`] logger
    pub fn captured(&self) -> Vec<String> {
        self.inner.target.captured()
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("level", &self.inner.level)
            .field("color", &self.inner.color)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_filtering() {
        let logger = Logger::new(Level::Info, false, LogTarget::memory());
        logger.debug("hidden");
        logger.info("shown");
        logger.error("also shown");

        let lines = logger.captured();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("INFO  shown"));
        assert!(lines[1].ends_with("ERROR also shown"));
    }

    #[test]
    fn test_verbose_config_enables_debug() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preview.log");
        let config = LoggingConfig {
            verbose: true,
            color: None,
            file: Some(path.to_string_lossy().into_owned()),
        };

        let logger = Logger::from_config(&config).unwrap();
        assert!(logger.enabled(Level::Debug));
        logger.debug("walking /tmp/specs");

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("DEBUG walking /tmp/specs"));
        assert!(!content.contains('\x1b'));
    }

    #[test]
    fn test_request_logging() {
        let logger = Logger::memory();
        let uri: Uri = "/index.html".parse().unwrap();
        logger.request(&Method::GET, &uri, Version::HTTP_11);
        assert!(logger.captured()[0].ends_with("GET /index.html HTTP/1.1"));
    }
}
