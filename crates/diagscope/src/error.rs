//! Error types for Diagscope operations.
//!
//! This module provides the main error type [`DiagscopeError`] which wraps
//! the error conditions that can occur while processing a release.

use std::{
    io,
    path::{Path, PathBuf},
};

use thiserror::Error;

use diagscope_parser::error::ParseError;

use crate::graph::GraphError;

/// The main error type for Diagscope operations.
///
/// # Diagnostic Variants
///
/// The `Parse` variant carries every loader diagnostic together with the
/// name of the dump it came from, so each offending record can be reported.
#[derive(Debug, Error)]
pub enum DiagscopeError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("I/O error on `{}`: {source}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{err}")]
    Parse { err: ParseError, origin: String },

    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Release `{version}` failed: {source}")]
    Release {
        version: String,
        #[source]
        source: Box<DiagscopeError>,
    },
}

impl DiagscopeError {
    /// Create a new `Parse` error with the name of the dump it came from.
    pub fn new_parse_error(err: ParseError, origin: impl Into<String>) -> Self {
        Self::Parse {
            err,
            origin: origin.into(),
        }
    }

    /// Create a new `File` error for an I/O failure on `path`.
    pub fn file(path: impl AsRef<Path>, source: io::Error) -> Self {
        Self::File {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Wrap an error raised while processing `version`.
    pub fn in_release(self, version: impl Into<String>) -> Self {
        Self::Release {
            version: version.into(),
            source: Box::new(self),
        }
    }

    /// Returns the innermost error, unwrapping release context.
    pub fn root(&self) -> &DiagscopeError {
        match self {
            DiagscopeError::Release { source, .. } => source.root(),
            other => other,
        }
    }
}
