//! Error codes for the Diagscope diagnostic system.
//!
//! Error codes are organized by phase:
//! - `E0xx` - Document errors (the dump as a whole)
//! - `E1xx` - Record errors (a single malformed record)

use std::fmt;

/// Error codes for categorizing diagnostic errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Document Errors (E0xx)
    // =========================================================================
    /// Invalid JSON.
    ///
    /// The input could not be parsed as JSON at all.
    E001,

    /// Missing record index.
    ///
    /// The top-level `!instanceof` object, or one of its `DiagGroup` /
    /// `Diagnostic` name lists, is absent or has the wrong shape.
    E002,

    // =========================================================================
    // Record Errors (E1xx)
    // =========================================================================
    /// Missing record.
    ///
    /// A name listed in the record index has no record object in the dump.
    E100,

    /// Missing required field.
    ///
    /// A record lacks a field every record of its kind must carry.
    E101,

    /// Field has the wrong shape.
    ///
    /// A field is present but its JSON type or structure is not the one the
    /// record kind expects (e.g. a string where a `{ "def": ... }` reference
    /// is required).
    E102,

    /// Unknown severity constant.
    ///
    /// A `DefaultSeverity` or `DefaultMapping` field names a constant that is
    /// not a known severity.
    E103,

    /// Duplicate record.
    ///
    /// The same record name is listed more than once for one record kind.
    E104,

    /// Repeated subgroup reference.
    ///
    /// A group lists the same subgroup more than once. Reported as a warning;
    /// the repeated entry is dropped.
    E105,
}

impl ErrorCode {
    /// Returns the numeric code as a string (e.g., "E001").
    pub fn as_str(&self) -> &'static str {
        match self {
            // Document errors
            ErrorCode::E001 => "E001",
            ErrorCode::E002 => "E002",
            // Record errors
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E102 => "E102",
            ErrorCode::E103 => "E103",
            ErrorCode::E104 => "E104",
            ErrorCode::E105 => "E105",
        }
    }

    /// Returns a short description of what this error code means.
    pub fn description(&self) -> &'static str {
        match self {
            // Document errors
            ErrorCode::E001 => "invalid JSON",
            ErrorCode::E002 => "missing record index",
            // Record errors
            ErrorCode::E100 => "missing record",
            ErrorCode::E101 => "missing required field",
            ErrorCode::E102 => "field has the wrong shape",
            ErrorCode::E103 => "unknown severity constant",
            ErrorCode::E104 => "duplicate record",
            ErrorCode::E105 => "repeated subgroup reference",
        }
    }

    /// Returns `true` for codes describing a single malformed record.
    pub fn is_record_error(&self) -> bool {
        self.as_str().starts_with("E1")
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
