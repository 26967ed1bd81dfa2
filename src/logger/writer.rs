//! Log writer module
//!
//! Thread-safe sinks for formatted log lines.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;

/// Log output target
pub enum LogTarget {
    /// Write to stderr
    Stderr,
    /// Append to a file
    File(Mutex<File>),
    /// Keep lines in memory, used by tests to inspect what was logged
    Memory(Mutex<Vec<String>>),
}

impl LogTarget {
    /// Open or create a log file for appending
    pub fn file(path: &str) -> io::Result<Self> {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self::File(Mutex::new(file)))
    }

    pub const fn memory() -> Self {
        Self::Memory(Mutex::new(Vec::new()))
    }

    /// Write a single line. Failures to write a log line are dropped.
    pub fn write_line(&self, line: &str) {
        match self {
            Self::Stderr => {
                eprintln!("{line}");
            }
            Self::File(file) => {
                if let Ok(mut f) = file.lock() {
                    let _ = writeln!(f, "{line}");
                }
            }
            Self::Memory(lines) => {
                if let Ok(mut lines) = lines.lock() {
                    lines.push(line.to_string());
                }
            }
        }
    }

    /// Lines captured so far; empty for stderr and file targets
    pub fn captured(&self) -> Vec<String> {
        match self {
            Self::Memory(lines) => lines.lock().map(|l| l.clone()).unwrap_or_default(),
            Self::Stderr | Self::File(_) => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_target_keeps_lines_in_order() {
        let target = LogTarget::memory();
        target.write_line("first");
        target.write_line("second");
        assert_eq!(target.captured(), vec!["first", "second"]);
    }

    #[test]
    fn test_file_target_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/logs/preview.log");
        let target = LogTarget::file(path.to_str().unwrap()).unwrap();
        target.write_line("hello");
        drop(target);

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "hello\n");
    }
}
