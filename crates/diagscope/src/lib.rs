//! Diagscope - tracking compiler warning catalogs across releases.
//!
//! Loads a release's diagnostic definitions from an `llvm-tblgen -dump-json`
//! dump, resolves the group hierarchy into closures, renders textual views and
//! compares releases.

pub mod config;
pub mod diff;
pub mod graph;
pub mod pipeline;
pub mod view;

mod error;

pub use diagscope_core::{record, severity};

pub use error::DiagscopeError;

use std::{fs, path::Path};

use log::{debug, info, trace};

use config::AppConfig;
use graph::GroupGraph;
use view::ViewKind;

/// Builder for loading diagnostic catalogs and rendering their views.
///
/// # Examples
///
/// ```rust
/// use diagscope::{CatalogBuilder, config::AppConfig, view::ViewKind};
///
/// let source = r#"{
///     "!instanceof": { "DiagGroup": ["Unused"], "Diagnostic": ["warn_unused"] },
///     "Unused": { "!name": "Unused", "GroupName": "unused", "SubGroups": [] },
///     "warn_unused": {
///         "!name": "warn_unused",
///         "Text": "unused variable %0",
///         "Group": { "def": "Unused" },
///         "DefaultSeverity": { "def": "SEV_Ignored" }
///     }
/// }"#;
///
/// let builder = CatalogBuilder::new(AppConfig::default());
/// let graph = builder.build(source).expect("Failed to build");
///
/// assert_eq!(builder.render(&graph, ViewKind::Full), "Unused: [warn_unused]\n");
/// ```
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    config: AppConfig,
}

impl CatalogBuilder {
    /// Create a new catalog builder with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration the builder renders with.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Load a dump and build its group graph.
    ///
    /// # Errors
    ///
    /// Returns `DiagscopeError::Parse` if the dump is malformed and
    /// `DiagscopeError::Graph` if a reference is dangling or the subgroup
    /// relation is cyclic.
    pub fn build(&self, source: &str) -> Result<GroupGraph, DiagscopeError> {
        self.build_named(source, "<input>")
    }

    /// Read a dump from disk and build its group graph.
    ///
    /// # Errors
    ///
    /// Returns `DiagscopeError::File` if the file cannot be read, otherwise
    /// the same errors as [`CatalogBuilder::build`].
    pub fn build_file(&self, path: impl AsRef<Path>) -> Result<GroupGraph, DiagscopeError> {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Reading dump");

        let content = fs::read_to_string(path).map_err(|err| DiagscopeError::file(path, err))?;
        trace!(bytes = content.len(); "Dump read");

        self.build_named(&content, &path.display().to_string())
    }

    fn build_named(&self, source: &str, origin: &str) -> Result<GroupGraph, DiagscopeError> {
        info!(origin; "Loading records");
        let records = diagscope_parser::load(source)
            .map_err(|err| DiagscopeError::new_parse_error(err, origin))?;
        debug!(
            diagnostics = records.diagnostics().len(),
            groups = records.groups().len();
            "Records loaded"
        );

        let graph = GroupGraph::build(&records)?;
        info!(
            groups = graph.groups().count(),
            top_level = graph.top_level().count();
            "Group graph built"
        );
        Ok(graph)
    }

    /// Render one view of a built graph.
    pub fn render(&self, graph: &GroupGraph, kind: ViewKind) -> String {
        debug!(view:% = kind; "Rendering view");
        view::render(graph, kind, self.config.view())
    }
}
