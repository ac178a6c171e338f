//! Typed records loaded from a compiler's diagnostic definition dump.
//!
//! A release snapshot consists of two record kinds:
//!
//! - [`DiagnosticRecord`] - one diagnostic (warning, error, remark) definition
//! - [`DiagnosticGroupRecord`] - one named group controlled by a `-W` switch
//!
//! Both are collected in a [`RecordSet`], keyed by record name. References
//! between records are kept as plain names here; resolving them is the job
//! of the group graph.

use indexmap::IndexMap;

use crate::severity::DefaultSeverity;

/// A single diagnostic definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticRecord {
    name: String,
    group: Option<String>,
    severity: DefaultSeverity,
    text: String,
}

impl DiagnosticRecord {
    /// Creates a new diagnostic record.
    ///
    /// # Arguments
    ///
    /// * `name` - Unique record name, e.g. `warn_unused_variable`.
    /// * `group` - Name of the group controlling this diagnostic, if any.
    /// * `severity` - Severity the diagnostic is emitted with by default.
    /// * `text` - Message text (format string) of the diagnostic.
    pub fn new(
        name: impl Into<String>,
        group: Option<String>,
        severity: DefaultSeverity,
        text: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            group,
            severity,
            text: text.into(),
        }
    }

    /// Returns the record name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the name of the group this diagnostic belongs to.
    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    /// Returns the default severity.
    pub fn severity(&self) -> DefaultSeverity {
        self.severity
    }

    /// Returns the message text.
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// A diagnostic group definition.
///
/// Groups nest: `subgroups` lists the names of the groups this group turns on
/// together with its own diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticGroupRecord {
    name: String,
    switch_name: Option<String>,
    subgroups: Vec<String>,
}

impl DiagnosticGroupRecord {
    /// Creates a new group record.
    ///
    /// # Arguments
    ///
    /// * `name` - Unique record name, e.g. `UnusedVariable`.
    /// * `switch_name` - Command-line spelling without the `-W` prefix, e.g. `unused-variable`.
    /// * `subgroups` - Names of nested groups, in declaration order.
    pub fn new(
        name: impl Into<String>,
        switch_name: Option<String>,
        subgroups: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            switch_name,
            subgroups,
        }
    }

    /// Returns the record name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the switch spelling (without `-W`), if the dump declares one.
    pub fn switch_name(&self) -> Option<&str> {
        self.switch_name.as_deref()
    }

    /// Returns the names of nested groups in declaration order.
    pub fn subgroups(&self) -> &[String] {
        &self.subgroups
    }
}

/// All records of one release snapshot.
///
/// Keys are record names and are unique per kind. Insertion order is the
/// order records appeared in the dump.
#[derive(Debug, Clone, Default)]
pub struct RecordSet {
    diagnostics: IndexMap<String, DiagnosticRecord>,
    groups: IndexMap<String, DiagnosticGroupRecord>,
}

impl RecordSet {
    /// Creates an empty record set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a diagnostic record.
    ///
    /// Returns the previously stored record if the name was already present.
    pub fn insert_diagnostic(&mut self, record: DiagnosticRecord) -> Option<DiagnosticRecord> {
        self.diagnostics.insert(record.name.clone(), record)
    }

    /// Inserts a group record.
    ///
    /// Returns the previously stored record if the name was already present.
    pub fn insert_group(&mut self, record: DiagnosticGroupRecord) -> Option<DiagnosticGroupRecord> {
        self.groups.insert(record.name.clone(), record)
    }

    /// Returns the diagnostics keyed by name, in dump order.
    pub fn diagnostics(&self) -> &IndexMap<String, DiagnosticRecord> {
        &self.diagnostics
    }

    /// Returns the groups keyed by name, in dump order.
    pub fn groups(&self) -> &IndexMap<String, DiagnosticGroupRecord> {
        &self.groups
    }

    /// Returns the diagnostic with the given name.
    pub fn diagnostic(&self, name: &str) -> Option<&DiagnosticRecord> {
        self.diagnostics.get(name)
    }

    /// Returns the group with the given name.
    pub fn group(&self, name: &str) -> Option<&DiagnosticGroupRecord> {
        self.groups.get(name)
    }
}
