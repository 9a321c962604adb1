use std::fmt;
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

use serde::Serialize;

/// Where a report is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Stdout,
    File(PathBuf),
}

impl From<&str> for Destination {
    fn from(value: &str) -> Self {
        match value {
            "" | "-" | "php://stdout" | "/dev/stdout" => Destination::Stdout,
            path => Destination::File(PathBuf::from(path)),
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Destination::Stdout => f.write_str("standard output"),
            Destination::File(path) => write!(f, "{}", path.display()),
        }
    }
}

impl Destination {
    /// Writes `bytes` in full and returns how many were written.
    pub fn write(&self, bytes: &[u8]) -> io::Result<usize> {
        match self {
            Destination::Stdout => {
                let mut out = io::stdout().lock();
                out.write_all(bytes)?;
                out.flush()?;
            }
            Destination::File(path) => {
                let mut fd = File::create(path)?;
                fd.write_all(bytes)?;
                fd.flush()?;
            }
        }

        Ok(bytes.len())
    }
}

/// Encodes a report as JSON, indented when `pretty` is set.
pub fn to_json<T: Serialize>(report: &T, pretty: bool) -> serde_json::Result<Vec<u8>> {
    if pretty {
        serde_json::to_vec_pretty(report)
    } else {
        serde_json::to_vec(report)
    }
}
