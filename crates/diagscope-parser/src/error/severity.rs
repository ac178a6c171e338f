//! Severity levels for loader diagnostics.
//!
//! Not to be confused with [`DefaultSeverity`](diagscope_core::severity::DefaultSeverity),
//! which is a property of the loaded records. This severity describes the
//! loader's own findings about the dump.

use std::fmt;

/// The severity level of a diagnostic.
///
/// - [`Severity::Error`] rejects the dump
/// - [`Severity::Warning`] is logged and loading continues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// A fatal problem; the release cannot be loaded.
    Error,

    /// A recoverable oddity in the dump.
    Warning,
}

impl Severity {
    /// Returns `true` if this is an error severity.
    pub fn is_error(&self) -> bool {
        matches!(self, Severity::Error)
    }

    /// Returns `true` if this is a warning severity.
    pub fn is_warning(&self) -> bool {
        matches!(self, Severity::Warning)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}
