//! Error type shared by startup code and request handlers

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PreviewError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid JSON document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("invalid listen address '{0}'")]
    ListenAddr(String),

    #[error("unexpected response from {url}: {status}\n{body}")]
    UnexpectedStatus {
        url: String,
        status: u16,
        body: String,
    },

    #[error("unable to determine the user's cache directory")]
    NoCacheDir,

    #[error("specification path not found: {}", .0.display())]
    TargetNotFound(PathBuf),

    #[error("no specification selected: pass ?url=<spec> to validate a file from the directory")]
    NoSpecSelected,
}

pub type Result<T> = std::result::Result<T, PreviewError>;
