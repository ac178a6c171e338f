//! Release-to-release comparison of unique views.
//!
//! A [`VersionDiff`] holds the lines added and removed between the unique
//! view of one release and the unique view of the next. Lines are compared
//! as whole strings; each side keeps the relative order of its input.

use std::{collections::HashSet, fmt, fs, path::Path};

use log::debug;

use crate::error::DiagscopeError;

/// Lines added and removed between two releases.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionDiff {
    removed: Vec<String>,
    added: Vec<String>,
}

impl VersionDiff {
    /// Returns lines present in the newer release only, in its order.
    pub fn added(&self) -> &[String] {
        &self.added
    }

    /// Returns lines present in the older release only, in its order.
    pub fn removed(&self) -> &[String] {
        &self.removed
    }

    /// Returns `true` if both releases hold the same lines.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }

    /// Render the diff report: removed lines as `- line`, then added lines
    /// as `+ line`.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for VersionDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.removed {
            writeln!(f, "- {line}")?;
        }
        for line in &self.added {
            writeln!(f, "+ {line}")?;
        }
        Ok(())
    }
}

/// Compare two ordered line sequences.
///
/// Repeated lines within one side are reported once.
///
/// # Examples
///
/// ```
/// # use diagscope::diff::diff_lines;
/// let diff = diff_lines(&["warn-a", "warn-b"], &["warn-b", "warn-c"]);
///
/// assert_eq!(diff.added(), ["warn-c"]);
/// assert_eq!(diff.removed(), ["warn-a"]);
/// assert_eq!(diff.render(), "- warn-a\n+ warn-c\n");
/// ```
pub fn diff_lines<S: AsRef<str>>(old: &[S], new: &[S]) -> VersionDiff {
    let old_set: HashSet<&str> = old.iter().map(|line| line.as_ref()).collect();
    let new_set: HashSet<&str> = new.iter().map(|line| line.as_ref()).collect();

    VersionDiff {
        removed: only_in(old, &new_set),
        added: only_in(new, &old_set),
    }
}

/// Read a view file as lines, skipping blank lines.
///
/// # Errors
///
/// Returns [`DiagscopeError::File`] if the file cannot be read.
pub fn read_view_lines(path: impl AsRef<Path>) -> Result<Vec<String>, DiagscopeError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|err| DiagscopeError::file(path, err))?;

    Ok(content
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// Compare two view files.
///
/// # Errors
///
/// Returns [`DiagscopeError::File`] if either file cannot be read.
pub fn diff_files(
    old: impl AsRef<Path>,
    new: impl AsRef<Path>,
) -> Result<VersionDiff, DiagscopeError> {
    let old_lines = read_view_lines(old)?;
    let new_lines = read_view_lines(new)?;

    let diff = diff_lines(&old_lines, &new_lines);
    debug!(
        added = diff.added().len(),
        removed = diff.removed().len();
        "Views compared"
    );
    Ok(diff)
}

/// Lines of `lines` absent from `other`, first occurrence only.
fn only_in<S: AsRef<str>>(lines: &[S], other: &HashSet<&str>) -> Vec<String> {
    let mut seen = HashSet::new();
    lines
        .iter()
        .map(|line| line.as_ref())
        .filter(|line| !other.contains(line) && seen.insert(*line))
        .map(str::to_string)
        .collect()
}
