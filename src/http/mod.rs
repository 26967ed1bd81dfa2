//! HTTP protocol layer module
//!
//! Provides HTTP protocol-related base functionality, decoupled from the
//! preview handlers: response builders, content types, sniffing and cache
//! validation.

pub mod cache;
pub mod mime;
pub mod response;
pub mod sniff;

// Re-export commonly used types
pub use response::{
    build_304_response, build_404_response, build_content_response, build_error_response,
    build_file_response, build_redirect_response, build_text_response, HttpResponse,
};
