//! Error adapter for converting DiagscopeError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI.
//!
//! # Multi-Error Support
//!
//! When a [`diagscope_parser::error::ParseError`] contains multiple diagnostics, each
//! diagnostic is rendered independently, prefixed with the dump it came from.

use std::fmt;

use miette::{
    Diagnostic as MietteDiagnostic, GraphicalReportHandler, Severity as MietteSeverity,
};

use diagscope::{DiagscopeError, graph::GraphError};
use diagscope_parser::error::{Diagnostic, Severity};

/// Adapter for a single loader diagnostic.
pub struct DiagnosticAdapter<'a> {
    diag: &'a Diagnostic,
    /// Name of the dump the diagnostic was found in
    origin: &'a str,
}

impl<'a> DiagnosticAdapter<'a> {
    /// Create a new diagnostic adapter.
    pub fn new(diag: &'a Diagnostic, origin: &'a str) -> Self {
        Self { diag, origin }
    }
}

impl fmt::Debug for DiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagnosticAdapter")
            .field("diag", &self.diag)
            .field("origin", &self.origin)
            .finish()
    }
}

impl fmt::Display for DiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.origin, self.diag.message())
    }
}

impl std::error::Error for DiagnosticAdapter<'_> {}

impl MietteDiagnostic for DiagnosticAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diag
            .code()
            .map(|c| Box::new(c) as Box<dyn fmt::Display>)
    }

    fn severity(&self) -> Option<MietteSeverity> {
        match self.diag.severity() {
            Severity::Error => Some(MietteSeverity::Error),
            Severity::Warning => Some(MietteSeverity::Warning),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match (self.diag.help(), self.diag.code()) {
            (Some(help), _) => Some(Box::new(help) as Box<dyn fmt::Display>),
            (None, Some(code)) => Some(Box::new(code.description()) as Box<dyn fmt::Display>),
            (None, None) => None,
        }
    }
}

/// Adapter for non-diagnostic [`DiagscopeError`] variants.
///
/// This adapter handles errors that don't carry loader diagnostics, such as
/// I/O errors, graph errors and configuration errors.
pub struct ErrorAdapter<'a>(pub &'a DiagscopeError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

// No `source`: every `DiagscopeError` message already embeds its source,
// and miette would print the cause a second time.
impl std::error::Error for ErrorAdapter<'_> {}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match self.0.root() {
            DiagscopeError::Io(_) | DiagscopeError::File { .. } => "diagscope::io",
            DiagscopeError::Parse { .. } => "diagscope::parse",
            DiagscopeError::Graph(_) => "diagscope::graph",
            DiagscopeError::Config(_) => "diagscope::config",
            DiagscopeError::Release { .. } => return None,
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match self.0.root() {
            DiagscopeError::Graph(GraphError::UnknownReference { .. }) => {
                "every referenced group must be listed under `DiagGroup` in the record index"
            }
            DiagscopeError::Graph(GraphError::CycleDetected { .. }) => {
                "a group may not contain itself through its subgroups"
            }
            DiagscopeError::Config(_) => "see `[view]` and `[pipeline]` in the configuration file",
            _ => return None,
        };
        Some(Box::new(help))
    }
}

/// A reportable error that can be rendered by miette.
///
/// This enum wraps either a single diagnostic or a non-diagnostic error,
/// providing a uniform interface for error rendering.
#[derive(Debug)]
pub enum Reportable<'a> {
    /// A loader diagnostic naming the offending record.
    Diagnostic(DiagnosticAdapter<'a>),
    /// An error without loader diagnostics.
    Error(ErrorAdapter<'a>),
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reportable::Diagnostic(d) => fmt::Display::fmt(d, f),
            Reportable::Error(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Reportable::Diagnostic(_) => None,
            Reportable::Error(e) => std::error::Error::source(e),
        }
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Diagnostic(d) => d.code(),
            Reportable::Error(e) => e.code(),
        }
    }

    fn severity(&self) -> Option<MietteSeverity> {
        match self {
            Reportable::Diagnostic(d) => d.severity(),
            Reportable::Error(e) => e.severity(),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Diagnostic(d) => d.help(),
            Reportable::Error(e) => e.help(),
        }
    }
}

/// Convert a [`DiagscopeError`] into a list of reportable errors.
///
/// For a parse error, possibly wrapped in release context, this returns one
/// [`Reportable`] for each diagnostic in the error. For other error variants,
/// this returns a single [`Reportable`].
pub fn to_reportables(err: &DiagscopeError) -> Vec<Reportable<'_>> {
    match err.root() {
        DiagscopeError::Parse {
            err: parse_err,
            origin,
        } => parse_err
            .diagnostics()
            .iter()
            .map(|d| Reportable::Diagnostic(DiagnosticAdapter::new(d, origin)))
            .collect(),
        _ => vec![Reportable::Error(ErrorAdapter(err))],
    }
}

/// Render every reportable of `err` with miette's graphical handler.
pub fn render_report(err: &DiagscopeError) -> String {
    let reporter = GraphicalReportHandler::new();

    // Render each diagnostic independently
    let mut out = String::new();
    for reportable in to_reportables(err) {
        reporter
            .render_report(&mut out, &reportable)
            .expect("Writing to String buffer is infallible");
    }
    out
}
