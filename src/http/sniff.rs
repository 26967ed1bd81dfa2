//! Content sniffing module
//!
//! Decides whether a response body is HTML by looking at the bytes, the way
//! browsers do, rather than trusting the declared Content-Type.

/// Tags that mark the start of an HTML document. Each must be followed by a
/// space or `>` to count.
const HTML_SIGNATURES: &[&[u8]] = &[
    b"<!DOCTYPE HTML",
    b"<HTML",
    b"<HEAD",
    b"<SCRIPT",
    b"<IFRAME",
    b"<H1",
    b"<DIV",
    b"<FONT",
    b"<TABLE",
    b"<A",
    b"<STYLE",
    b"<TITLE",
    b"<B",
    b"<BODY",
    b"<BR",
    b"<P",
    b"<!--",
];

/// Only the beginning of the body is inspected
const SNIFF_LEN: usize = 512;

fn is_whitespace(b: u8) -> bool {
    matches!(b, b'\t' | b'\n' | b'\x0c' | b'\r' | b' ')
}

pub fn is_html(body: &[u8]) -> bool {
    let head = &body[..body.len().min(SNIFF_LEN)];
    let start = head.iter().position(|&b| !is_whitespace(b)).unwrap_or(head.len());
    let data = &head[start..];

    HTML_SIGNATURES.iter().any(|sig| {
        data.len() > sig.len()
            && data[..sig.len()].eq_ignore_ascii_case(sig)
            && matches!(data[sig.len()], b' ' | b'>')
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_documents() {
        assert!(is_html(b"<!DOCTYPE html>\n<html lang=\"en\"></html>"));
        assert!(is_html(b"\n\n  <html><body></body></html>"));
        assert!(is_html(b"<!-- Swagger UI -->\n<html>"));
        assert!(is_html(b"<HEAD>"));
    }

    #[test]
    fn test_non_html() {
        assert!(!is_html(b""));
        assert!(!is_html(b"{\"swagger\": \"2.0\"}"));
        assert!(!is_html(b"swagger: '2.0'\ninfo:\n  title: Demo\n"));
        assert!(!is_html(b"window.onload = function() {}"));
        // tag name must be terminated
        assert!(!is_html(b"<htmlx>"));
        assert!(!is_html(b"<html"));
    }

    #[test]
    fn test_only_prefix_is_inspected() {
        let mut body = vec![b' '; SNIFF_LEN];
        body.extend_from_slice(b"<html>");
        assert!(!is_html(&body));
    }
}
