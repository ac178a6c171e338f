//! Error and diagnostic system for the Diagscope loader.
//!
//! This module provides an error handling system with:
//! - Error codes for documentation and searchability
//! - Record locators naming the offending record and its position
//! - Severity levels
//! - Diagnostic collector for accumulating multiple errors
//!
//! # Overview
//!
//! The error system is built around the [`Diagnostic`] type, which represents
//! a single error or warning message with an optional error code, an optional
//! [`RecordRef`], and help text. Multiple diagnostics are wrapped in
//! [`ParseError`] for returning from [`load`](crate::load).
//!
//! # Example
//!
//! ```
//! # use diagscope_parser::error::{Diagnostic, ErrorCode, RecordKind, RecordRef};
//!
//! let record = RecordRef::new(RecordKind::Diagnostic, "warn_unused_variable", 12);
//!
//! let diag = Diagnostic::error("diagnostic `warn_unused_variable` is missing field `Text`")
//!     .with_code(ErrorCode::E101)
//!     .with_record(record)
//!     .with_help("every diagnostic record must carry its message text");
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod parse_error;
mod record_ref;
mod severity;

pub(crate) use collector::DiagnosticCollector;
pub(crate) use parse_error::Result;

pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use parse_error::ParseError;
pub use record_ref::{RecordKind, RecordRef};
pub use severity::Severity;
