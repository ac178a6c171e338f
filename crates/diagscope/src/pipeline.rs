//! Multi-release processing.
//!
//! [`ReleasePipeline`] walks an ordered list of release identifiers. For
//! each release it loads `<input_dir>/<prefix>-<version>.json`, builds the
//! group graph and writes the four views to `<output_dir>`:
//!
//! - `<prefix>-<version>.txt` (full)
//! - `<prefix>-unique-<version>.txt`
//! - `<prefix>-top-level-<version>.txt`
//! - `<prefix>-messages-<version>.txt`
//!
//! Once every release is rendered, each adjacent pair `(a, b)` is compared
//! through their unique views on disk, producing `<prefix>-diff-<a>-<b>.txt`.
//!
//! The first failing release stops the run. Files already written for
//! earlier releases are left in place.

use std::{
    fs,
    path::{Path, PathBuf},
};

use log::{debug, info, warn};

use crate::{
    CatalogBuilder,
    config::{AppConfig, PipelineConfig},
    diff,
    error::DiagscopeError,
    view::ViewKind,
};

/// Summary of a completed pipeline run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PipelineReport {
    releases: Vec<String>,
    view_files: Vec<PathBuf>,
    diff_files: Vec<PathBuf>,
}

impl PipelineReport {
    /// Returns the releases processed, in order.
    pub fn releases(&self) -> &[String] {
        &self.releases
    }

    /// Returns every view file written.
    pub fn view_files(&self) -> &[PathBuf] {
        &self.view_files
    }

    /// Returns every diff file written, one per adjacent release pair.
    pub fn diff_files(&self) -> &[PathBuf] {
        &self.diff_files
    }
}

/// Renders views for every configured release and diffs adjacent releases.
#[derive(Debug)]
pub struct ReleasePipeline {
    builder: CatalogBuilder,
}

impl ReleasePipeline {
    /// Create a pipeline from the application configuration.
    pub fn new(config: AppConfig) -> Self {
        Self {
            builder: CatalogBuilder::new(config),
        }
    }

    fn config(&self) -> &PipelineConfig {
        self.builder.config().pipeline()
    }

    /// Path of the dump for `version`.
    pub fn dump_path(&self, version: &str) -> PathBuf {
        let config = self.config();
        config
            .input_dir()
            .join(format!("{}-{version}.json", config.prefix()))
    }

    /// Path of the `kind` view file for `version`.
    pub fn view_path(&self, kind: ViewKind, version: &str) -> PathBuf {
        let config = self.config();
        let name = match kind.file_tag() {
            Some(tag) => format!("{}-{tag}-{version}.txt", config.prefix()),
            None => format!("{}-{version}.txt", config.prefix()),
        };
        config.output_dir().join(name)
    }

    /// Path of the diff file between `old` and `new`.
    pub fn diff_path(&self, old: &str, new: &str) -> PathBuf {
        let config = self.config();
        config
            .output_dir()
            .join(format!("{}-diff-{old}-{new}.txt", config.prefix()))
    }

    /// Run the pipeline over all configured releases.
    ///
    /// # Errors
    ///
    /// Returns [`DiagscopeError::Release`] naming the first release whose
    /// dump cannot be read, loaded or built, or whose outputs cannot be
    /// written. Diff failures are reported the same way, naming the newer
    /// release of the pair.
    pub fn run(&self) -> Result<PipelineReport, DiagscopeError> {
        let versions = self.config().versions();
        info!(
            releases = versions.len(),
            output_dir = self.config().output_dir().display().to_string();
            "Starting release pipeline"
        );

        if versions.is_empty() {
            warn!("No releases configured; nothing to do");
            return Ok(PipelineReport::default());
        }

        let output_dir = self.config().output_dir();
        fs::create_dir_all(output_dir).map_err(|err| DiagscopeError::file(output_dir, err))?;

        let mut report = PipelineReport::default();
        for version in versions {
            let written = self
                .process_release(version)
                .map_err(|err| err.in_release(version))?;
            report.releases.push(version.clone());
            report.view_files.extend(written);
        }

        for pair in versions.windows(2) {
            let (old, new) = (&pair[0], &pair[1]);
            let path = self
                .write_diff(old, new)
                .map_err(|err| err.in_release(new))?;
            report.diff_files.push(path);
        }

        info!(
            releases = report.releases.len(),
            diffs = report.diff_files.len();
            "Release pipeline finished"
        );
        Ok(report)
    }

    /// Load, build and render one release.
    fn process_release(&self, version: &str) -> Result<Vec<PathBuf>, DiagscopeError> {
        info!(version; "Processing release");

        let graph = self.builder.build_file(self.dump_path(version))?;

        let mut written = Vec::with_capacity(ViewKind::ALL.len());
        for kind in ViewKind::ALL {
            let path = self.view_path(kind, version);
            write_file(&path, &self.builder.render(&graph, kind))?;
            debug!(version, view:% = kind, path = path.display().to_string(); "View written");
            written.push(path);
        }
        Ok(written)
    }

    /// Compare the unique views of two releases already on disk.
    fn write_diff(&self, old: &str, new: &str) -> Result<PathBuf, DiagscopeError> {
        let diff = diff::diff_files(
            self.view_path(ViewKind::Unique, old),
            self.view_path(ViewKind::Unique, new),
        )?;

        let path = self.diff_path(old, new);
        write_file(&path, &diff.render())?;
        info!(
            old,
            new,
            added = diff.added().len(),
            removed = diff.removed().len();
            "Diff written"
        );
        Ok(path)
    }
}

fn write_file(path: &Path, content: &str) -> Result<(), DiagscopeError> {
    fs::write(path, content).map_err(|err| DiagscopeError::file(path, err))
}

#[cfg(test)]
mod tests {
    use crate::config::ViewConfig;

    use super::*;

    fn pipeline(versions: &[&str]) -> ReleasePipeline {
        let config = PipelineConfig::new(
            versions.iter().map(|v| v.to_string()).collect(),
            "dumps",
            "out",
            "warnings-clang",
        );
        ReleasePipeline::new(AppConfig::new(ViewConfig::default(), config))
    }

    #[test]
    fn test_file_layout() {
        let pipeline = pipeline(&["11", "12"]);

        assert_eq!(
            pipeline.dump_path("11"),
            Path::new("dumps/warnings-clang-11.json")
        );
        assert_eq!(
            pipeline.view_path(ViewKind::Full, "11"),
            Path::new("out/warnings-clang-11.txt")
        );
        assert_eq!(
            pipeline.view_path(ViewKind::Unique, "11"),
            Path::new("out/warnings-clang-unique-11.txt")
        );
        assert_eq!(
            pipeline.view_path(ViewKind::TopLevel, "NEXT"),
            Path::new("out/warnings-clang-top-level-NEXT.txt")
        );
        assert_eq!(
            pipeline.view_path(ViewKind::TopLevelText, "12"),
            Path::new("out/warnings-clang-messages-12.txt")
        );
        assert_eq!(
            pipeline.diff_path("11", "12"),
            Path::new("out/warnings-clang-diff-11-12.txt")
        );
    }

    #[test]
    fn test_no_versions_is_a_no_op() {
        let report = pipeline(&[]).run().expect("empty run should succeed");

        assert!(report.releases().is_empty());
        assert!(report.diff_files().is_empty());
    }
}
