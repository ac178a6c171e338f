//! The core diagnostic type for the Diagscope error system.
//!
//! A [`Diagnostic`] represents a single error or warning with optional
//! error code, the record it concerns, and help text.

use std::fmt;

use crate::error::{RecordRef, Severity, error_code::ErrorCode};

/// A diagnostic message about a definition dump.
///
/// Diagnostics provide detailed information about load failures,
/// including:
/// - A severity level
/// - An optional error code for documentation and searchability
/// - A primary message describing the issue
/// - The record the issue was found in, if it concerns a single record
/// - Optional help text with suggestions
///
/// # Example
///
/// ```text
/// error[E103]: diagnostic `warn_foo` (#12) has unknown severity `SEV_Loud`
///   = help: expected one of SEV_Ignored, SEV_Remark, SEV_Warning, SEV_Error, SEV_Fatal
/// ```
#[derive(Debug, Clone)]
pub struct Diagnostic {
    severity: Severity,
    code: Option<ErrorCode>,
    message: String,
    record: Option<RecordRef>,
    help: Option<String>,
}

impl Diagnostic {
    /// Create an error diagnostic.
    ///
    /// # Example
    ///
    /// ```
    /// # use diagscope_parser::error::{Diagnostic, ErrorCode};
    ///
    /// let diag = Diagnostic::error("input is not valid JSON")
    ///     .with_code(ErrorCode::E001)
    ///     .with_help("pass the output of `llvm-tblgen -dump-json`");
    /// ```
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    /// Create a warning diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    /// Get the severity of this diagnostic.
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Get the error code, if any.
    pub fn code(&self) -> Option<ErrorCode> {
        self.code
    }

    /// Get the primary message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the record this diagnostic concerns, if any.
    pub fn record(&self) -> Option<&RecordRef> {
        self.record.as_ref()
    }

    /// Get the help text, if any.
    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// Set the error code.
    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    /// Attach the offending record.
    pub fn with_record(mut self, record: RecordRef) -> Self {
        self.record = Some(record);
        self
    }

    /// Set the help text.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Create a new diagnostic with the given severity and message.
    fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            code: None,
            message: message.into(),
            record: None,
            help: None,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Format: "error[E001]: message" or "error: message"
        write!(f, "{}", self.severity)?;
        if let Some(code) = self.code {
            write!(f, "[{}]", code)?;
        }
        write!(f, ": {}", self.message)
    }
}

impl std::error::Error for Diagnostic {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RecordKind;

    #[test]
    fn test_diagnostic_new() {
        let diag = Diagnostic::new(Severity::Error, "test error");

        assert!(diag.severity().is_error());
        assert!(!diag.severity().is_warning());
        assert_eq!(diag.message(), "test error");
        assert!(diag.code().is_none());
        assert!(diag.record().is_none());
        assert!(diag.help().is_none());
    }

    #[test]
    fn test_diagnostic_with_record() {
        let diag = Diagnostic::error("missing field")
            .with_record(RecordRef::new(RecordKind::Diagnostic, "warn_x", 4));

        let record = diag.record().expect("record should be attached");
        assert_eq!(record.kind(), RecordKind::Diagnostic);
        assert_eq!(record.name(), "warn_x");
        assert_eq!(record.index(), 4);
    }

    #[test]
    fn test_diagnostic_display_with_code() {
        let diag = Diagnostic::error("group `Foo` (#0) is listed more than once")
            .with_code(ErrorCode::E104);

        assert_eq!(
            diag.to_string(),
            "error[E104]: group `Foo` (#0) is listed more than once"
        );
    }

    #[test]
    fn test_diagnostic_display_without_code() {
        let diag = Diagnostic::warning("repeated subgroup");

        assert_eq!(diag.to_string(), "warning: repeated subgroup");
    }

    #[test]
    fn test_diagnostic_builder_chain() {
        let diag = Diagnostic::error("diagnostic `warn_x` (#2) is missing field `Text`")
            .with_code(ErrorCode::E101)
            .with_record(RecordRef::new(RecordKind::Diagnostic, "warn_x", 2))
            .with_help("every diagnostic record carries its message text");

        assert!(diag.severity().is_error());
        assert_eq!(diag.code(), Some(ErrorCode::E101));
        assert_eq!(
            diag.help(),
            Some("every diagnostic record carries its message text")
        );
    }
}
