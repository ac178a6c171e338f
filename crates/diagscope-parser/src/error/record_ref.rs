//! Record locators for diagnostic messages.
//!
//! A dump has no meaningful source positions once parsed, so diagnostics
//! point at records instead: the record kind, its name, and its position in
//! the dump's index list for that kind.

use std::fmt;

/// The kind of a record in a diagnostic definition dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    /// A `Diagnostic` record.
    Diagnostic,
    /// A `DiagGroup` record.
    Group,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Diagnostic => write!(f, "diagnostic"),
            RecordKind::Group => write!(f, "group"),
        }
    }
}

/// Locates one record of a dump.
///
/// # Example
///
/// ```
/// # use diagscope_parser::error::{RecordKind, RecordRef};
///
/// let record = RecordRef::new(RecordKind::Group, "Unused", 3);
/// assert_eq!(record.to_string(), "group `Unused` (#3)");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordRef {
    kind: RecordKind,
    name: String,
    index: usize,
}

impl RecordRef {
    /// Create a new record locator.
    pub fn new(kind: RecordKind, name: impl Into<String>, index: usize) -> Self {
        Self {
            kind,
            name: name.into(),
            index,
        }
    }

    /// Get the record kind.
    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    /// Get the record name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the position of the record within the index list of its kind.
    pub fn index(&self) -> usize {
        self.index
    }
}

impl fmt::Display for RecordRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} `{}` (#{})", self.kind, self.name, self.index)
    }
}
