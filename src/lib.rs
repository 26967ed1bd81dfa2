//! Local Swagger UI previewer
//!
//! Serves a cached Swagger UI bundle together with the OpenAPI documents of
//! a directory (or a single document) and points the UI at them.

pub mod cli;
pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;
pub mod ui_bundle;
