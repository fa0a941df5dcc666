//! Error types for loading route datasets.

use std::path::PathBuf;

/// Failure to produce a [`crate::loader::RouteTable`] from an input file.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("route data file not found: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read route data: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed route data at line {line}: {message}")]
    Malformed { line: u64, message: String },
}

impl LoadError {
    pub(crate) fn from_csv(err: csv::Error) -> Self {
        let line = err.position().map(|p| p.line()).unwrap_or(0);
        let message = err.to_string();
        match err.into_kind() {
            csv::ErrorKind::Io(io) => LoadError::Io(io),
            _ => LoadError::Malformed { line, message },
        }
    }
}

/// A command-line or config value that names no known metric, direction or priority.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}' (expected one of: {expected})")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
    pub expected: &'static str,
}
