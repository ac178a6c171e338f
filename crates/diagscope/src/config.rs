//! Configuration types for Diagscope.
//!
//! This module provides configuration structures that control how views are
//! rendered and which releases the pipeline processes. All types implement
//! [`serde::Deserialize`] for loading from external sources.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level application configuration combining view and pipeline settings.
//! - [`ViewConfig`] - Controls how group lines are labelled and annotated.
//! - [`PipelineConfig`] - The ordered release list and the directories the pipeline uses.
//!
//! # Example
//!
//! ```
//! # use diagscope::config::{AppConfig, GroupLabel};
//! // Use default configuration
//! let config = AppConfig::default();
//! assert_eq!(config.view().label(), GroupLabel::Record);
//! assert!(config.pipeline().versions().is_empty());
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Top-level application configuration combining view and pipeline settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// View configuration section.
    #[serde(default)]
    view: ViewConfig,

    /// Pipeline configuration section.
    #[serde(default)]
    pipeline: PipelineConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] with the specified view and pipeline configurations.
    pub fn new(view: ViewConfig, pipeline: PipelineConfig) -> Self {
        Self { view, pipeline }
    }

    /// Returns the view configuration.
    pub fn view(&self) -> &ViewConfig {
        &self.view
    }

    /// Returns the pipeline configuration.
    pub fn pipeline(&self) -> &PipelineConfig {
        &self.pipeline
    }
}

/// How a group is named on its view line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupLabel {
    /// The group's record name, e.g. `UnusedVariable`.
    #[default]
    Record,

    /// The group's command-line switch, e.g. `-Wunused-variable`.
    ///
    /// Groups without a switch name fall back to the record name.
    Switch,
}

/// View rendering options.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ViewConfig {
    /// Label used for group lines.
    #[serde(default)]
    label: GroupLabel,

    /// Append the default-enabled state to group lines in top-level views.
    #[serde(default)]
    annotate: bool,

    /// Print each group's closure in the top-level view.
    #[serde(default)]
    closures: bool,

    /// Open top-level views with the `# enabled by default:` tree.
    #[serde(default)]
    default_section: bool,
}

impl ViewConfig {
    /// Creates a new [`ViewConfig`].
    ///
    /// # Arguments
    ///
    /// * `label` - Label used for group lines.
    /// * `annotate` - Whether top-level views mark default-enabled groups.
    /// * `closures` - Whether the top-level view lists group closures.
    pub fn new(label: GroupLabel, annotate: bool, closures: bool) -> Self {
        Self {
            label,
            annotate,
            closures,
            default_section: false,
        }
    }

    /// Sets whether top-level views open with the enabled-by-default tree.
    pub fn with_default_section(mut self, default_section: bool) -> Self {
        self.default_section = default_section;
        self
    }

    /// Returns the group label.
    pub fn label(&self) -> GroupLabel {
        self.label
    }

    /// Returns whether top-level views are annotated.
    pub fn annotate(&self) -> bool {
        self.annotate
    }

    /// Returns whether the top-level view lists closures.
    pub fn closures(&self) -> bool {
        self.closures
    }

    /// Returns whether top-level views open with the enabled-by-default tree.
    pub fn default_section(&self) -> bool {
        self.default_section
    }
}

/// Release pipeline settings.
///
/// `versions` is the release order; diffs are produced for each adjacent
/// pair in this order.
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    /// Ordered release identifiers, oldest first.
    #[serde(default)]
    versions: Vec<String>,

    /// Directory holding one `<prefix>-<version>.json` dump per release.
    #[serde(default = "default_dir")]
    input_dir: PathBuf,

    /// Directory the view and diff files are written to.
    #[serde(default = "default_dir")]
    output_dir: PathBuf,

    /// File name prefix shared by dumps, views and diffs.
    #[serde(default = "default_prefix")]
    prefix: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            versions: Vec::new(),
            input_dir: default_dir(),
            output_dir: default_dir(),
            prefix: default_prefix(),
        }
    }
}

impl PipelineConfig {
    /// Creates a new [`PipelineConfig`].
    ///
    /// # Arguments
    ///
    /// * `versions` - Ordered release identifiers, oldest first.
    /// * `input_dir` - Directory holding the per-release dumps.
    /// * `output_dir` - Directory receiving view and diff files.
    /// * `prefix` - File name prefix, e.g. `warnings-clang`.
    pub fn new(
        versions: Vec<String>,
        input_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        prefix: impl Into<String>,
    ) -> Self {
        Self {
            versions,
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            prefix: prefix.into(),
        }
    }

    /// Returns the ordered release identifiers.
    pub fn versions(&self) -> &[String] {
        &self.versions
    }

    /// Returns the dump directory.
    pub fn input_dir(&self) -> &Path {
        &self.input_dir
    }

    /// Returns the output directory.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Returns the file name prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

fn default_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_prefix() -> String {
    "warnings-clang".to_string()
}
