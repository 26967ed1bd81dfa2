//! Log line format module
//!
//! `<timestamp> <LEVEL> <message>`, with the level optionally ANSI-coloured.

use chrono::{DateTime, Local, SecondsFormat};
use hyper::{Method, Uri, Version};
use std::fmt;

/// Log severity, ordered from least to most verbose
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Error,
    Warn,
    Info,
    Debug,
}

impl Level {
    const fn label(self) -> &'static str {
        match self {
            Self::Error => "ERROR",
            Self::Warn => "WARN ",
            Self::Info => "INFO ",
            Self::Debug => "DEBUG",
        }
    }

    const fn ansi_color(self) -> &'static str {
        match self {
            Self::Error => "31",
            Self::Warn => "33",
            Self::Info => "36",
            Self::Debug => "37",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label().trim_end())
    }
}

/// Format one log line
pub fn format_line(time: &DateTime<Local>, level: Level, message: &str, color: bool) -> String {
    let timestamp = time.to_rfc3339_opts(SecondsFormat::Millis, false);
    if color {
        format!(
            "{timestamp} \x1b[{}m{}\x1b[0m {message}",
            level.ansi_color(),
            level.label()
        )
    } else {
        format!("{timestamp} {} {message}", level.label())
    }
}

/// Request line as seen by the access log: `GET /path?query HTTP/1.1`
pub fn request_line(method: &Method, uri: &Uri, version: Version) -> String {
    format!("{method} {uri} {version:?}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap()
    }

    #[test]
    fn test_plain_line() {
        let line = format_line(&fixed_time(), Level::Info, "listening :8080", false);
        assert!(line.starts_with("2024-05-01T12:30:00.000"));
        assert!(line.ends_with(" INFO  listening :8080"));
        assert!(!line.contains('\x1b'));
    }

    #[test]
    fn test_colored_line() {
        let line = format_line(&fixed_time(), Level::Error, "boom", true);
        assert!(line.contains("\x1b[31mERROR\x1b[0m boom"));
    }

    #[test]
    fn test_request_line() {
        let uri: Uri = "/docs/api.yaml?x=1".parse().unwrap();
        let line = request_line(&Method::GET, &uri, Version::HTTP_11);
        assert_eq!(line, "GET /docs/api.yaml?x=1 HTTP/1.1");
    }

    #[test]
    fn test_level_ordering() {
        assert!(Level::Error < Level::Warn);
        assert!(Level::Info < Level::Debug);
        assert_eq!(Level::Warn.to_string(), "WARN");
    }
}
