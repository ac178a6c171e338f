//! Textual views of a [`GroupGraph`].
//!
//! Four projections are produced per release:
//!
//! | kind                         | content                                                     |
//! |------------------------------|-------------------------------------------------------------|
//! | [`ViewKind::Full`]           | every group with its closure, `Name: [a, b]`                |
//! | [`ViewKind::Unique`]         | every diagnostic in any closure, once, one per line         |
//! | [`ViewKind::TopLevel`]       | groups nested in no other group                             |
//! | [`ViewKind::TopLevelText`]   | top-level groups, each closure diagnostic with its message  |
//!
//! Groups and diagnostics are always emitted in lexicographic name order, so
//! rendering the same graph twice yields identical bytes. Rendering cannot
//! fail: the graph was validated when it was built.
//!
//! With [`GroupLabel::Switch`] a line stands for a `-W` switch rather than a
//! group. Groups sharing a switch collapse into one line whose closure and
//! default state cover all of them; the switch is top-level only when none
//! of its groups is nested.
//!
//! When [`ViewConfig::default_section`] is set, the top-level views open with
//! an `# enabled by default:` tree and leave fully enabled entries out of the
//! main list.

use std::{
    borrow::Cow,
    collections::{BTreeSet, HashMap},
    fmt::{self, Write},
};

use crate::{
    config::{GroupLabel, ViewConfig},
    graph::{DefaultState, DiagnosticId, GroupGraph, GroupNode},
};

/// The view to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewKind {
    /// Every group followed by its closure.
    Full,
    /// The de-duplicated inventory of diagnostic names.
    Unique,
    /// Only top-level groups.
    TopLevel,
    /// Top-level groups with the message text of each closure diagnostic.
    TopLevelText,
}

impl ViewKind {
    /// All view kinds, in the order the pipeline writes them.
    pub const ALL: [ViewKind; 4] = [
        ViewKind::Full,
        ViewKind::Unique,
        ViewKind::TopLevel,
        ViewKind::TopLevelText,
    ];

    /// Returns the tag inserted in view file names, if any.
    ///
    /// The full view carries no tag: `warnings-clang-12.txt`,
    /// `warnings-clang-unique-12.txt`, ...
    pub fn file_tag(&self) -> Option<&'static str> {
        match self {
            ViewKind::Full => None,
            ViewKind::Unique => Some("unique"),
            ViewKind::TopLevel => Some("top-level"),
            ViewKind::TopLevelText => Some("messages"),
        }
    }
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewKind::Full => write!(f, "full"),
            ViewKind::Unique => write!(f, "unique"),
            ViewKind::TopLevel => write!(f, "top-level"),
            ViewKind::TopLevelText => write!(f, "top-level-text"),
        }
    }
}

/// Render a view of the graph.
///
/// # Examples
///
/// ```
/// # use diagscope_core::{record::*, severity::DefaultSeverity};
/// # use diagscope::{config::ViewConfig, graph::GroupGraph, view::{render, ViewKind}};
/// let mut records = RecordSet::new();
/// records.insert_group(DiagnosticGroupRecord::new("A", None, vec!["B".to_string()]));
/// records.insert_group(DiagnosticGroupRecord::new("B", None, vec![]));
/// records.insert_diagnostic(DiagnosticRecord::new(
///     "warn-unused",
///     Some("B".to_string()),
///     DefaultSeverity::Warning,
///     "unused",
/// ));
///
/// let graph = GroupGraph::build(&records).unwrap();
/// let config = ViewConfig::default();
///
/// assert_eq!(render(&graph, ViewKind::Full, &config), "A: [warn-unused]\nB: [warn-unused]\n");
/// assert_eq!(render(&graph, ViewKind::Unique, &config), "warn-unused\n");
/// assert_eq!(render(&graph, ViewKind::TopLevel, &config), "A\n");
/// ```
pub fn render(graph: &GroupGraph, kind: ViewKind, config: &ViewConfig) -> String {
    let mut out = String::new();
    let result = match kind {
        ViewKind::Full => write_full(&mut out, graph, config),
        ViewKind::Unique => write_unique(&mut out, graph),
        ViewKind::TopLevel => write_top_level(&mut out, graph, config),
        ViewKind::TopLevelText => write_top_level_text(&mut out, graph, config),
    };
    result.expect("Writing to String buffer is infallible");
    out
}

fn write_full(out: &mut String, graph: &GroupGraph, config: &ViewConfig) -> fmt::Result {
    for entry in Entry::collect(graph, config.label()) {
        write_entry_with_closure(out, graph, &entry)?;
        writeln!(out)?;
    }
    Ok(())
}

fn write_unique(out: &mut String, graph: &GroupGraph) -> fmt::Result {
    for diagnostic in graph.unique_diagnostics() {
        writeln!(out, "{}", diagnostic.name())?;
    }
    Ok(())
}

fn write_top_level(out: &mut String, graph: &GroupGraph, config: &ViewConfig) -> fmt::Result {
    let entries = Entry::collect(graph, config.label());
    if config.default_section() {
        write_default_section(out, graph, &entries, false)?;
    }

    for entry in listed(&entries, config) {
        if config.closures() {
            write_entry_with_closure(out, graph, entry)?;
        } else {
            write!(out, "{}", entry.label)?;
        }
        write_annotation(out, entry, config)?;
        writeln!(out)?;
    }
    Ok(())
}

fn write_top_level_text(out: &mut String, graph: &GroupGraph, config: &ViewConfig) -> fmt::Result {
    let entries = Entry::collect(graph, config.label());
    if config.default_section() {
        write_default_section(out, graph, &entries, true)?;
    }

    for entry in listed(&entries, config) {
        write!(out, "{}", entry.label)?;
        write_annotation(out, entry, config)?;
        writeln!(out)?;
        for &id in entry.closure.iter() {
            let diagnostic = graph.diagnostic(id);
            writeln!(out, "    {}: {}", diagnostic.name(), diagnostic.text())?;
        }
    }
    Ok(())
}

/// Top-level entries, minus the fully enabled ones already shown in the
/// default section.
fn listed<'e, 'a>(
    entries: &'e [Entry<'a>],
    config: &'e ViewConfig,
) -> impl Iterator<Item = &'e Entry<'a>> {
    entries.iter().filter(move |entry| {
        entry.is_top_level()
            && !(config.default_section() && entry.default_state == DefaultState::Enabled)
    })
}

/// Writes the `# enabled by default:` tree.
///
/// Roots are the entries on by default that are not a child of another entry
/// on by default. Below each root, only children on by default are shown.
fn write_default_section(
    out: &mut String,
    graph: &GroupGraph,
    entries: &[Entry<'_>],
    text: bool,
) -> fmt::Result {
    let owner: HashMap<&str, usize> = entries
        .iter()
        .enumerate()
        .flat_map(|(idx, entry)| entry.groups.iter().map(move |node| (node.name(), idx)))
        .collect();

    let children: Vec<BTreeSet<usize>> = entries
        .iter()
        .enumerate()
        .map(|(idx, entry)| {
            entry
                .groups
                .iter()
                .flat_map(|node| graph.subgroups(node))
                .map(|subgroup| owner[subgroup.name()])
                .filter(|&child| child != idx && entries[child].is_on_by_default())
                .collect()
        })
        .collect();

    let nested: BTreeSet<usize> = (0..entries.len())
        .filter(|&idx| entries[idx].is_on_by_default())
        .flat_map(|idx| children[idx].iter().copied())
        .collect();

    writeln!(out, "# enabled by default:")?;

    // (entry, depth), popped in pre-order
    let mut stack: Vec<(usize, usize)> = (0..entries.len())
        .rev()
        .filter(|idx| entries[*idx].is_on_by_default() && !nested.contains(idx))
        .map(|idx| (idx, 1))
        .collect();
    let mut path: Vec<usize> = Vec::new();
    let mut on_path = vec![false; entries.len()];

    while let Some((idx, depth)) = stack.pop() {
        for done in path.drain(depth - 1..) {
            on_path[done] = false;
        }
        if on_path[idx] {
            continue;
        }
        path.push(idx);
        on_path[idx] = true;

        let entry = &entries[idx];
        let indent = "  ".repeat(depth);
        write!(out, "# {indent}{}", entry.label)?;
        if entry.default_state == DefaultState::Partial {
            write!(out, " (partial)")?;
        }
        writeln!(out)?;

        if text {
            for id in entry.direct() {
                let diagnostic = graph.diagnostic(id);
                if diagnostic.severity().is_enabled_by_default() {
                    writeln!(out, "# {indent}    {}: {}", diagnostic.name(), diagnostic.text())?;
                }
            }
        }

        stack.extend(children[idx].iter().rev().map(|&child| (child, depth + 1)));
    }
    Ok(())
}

fn write_entry_with_closure(out: &mut String, graph: &GroupGraph, entry: &Entry<'_>) -> fmt::Result {
    write!(out, "{}: [", entry.label)?;
    for (idx, &id) in entry.closure.iter().enumerate() {
        if idx > 0 {
            write!(out, ", ")?;
        }
        write!(out, "{}", graph.diagnostic(id).name())?;
    }
    write!(out, "]")
}

fn write_annotation(out: &mut String, entry: &Entry<'_>, config: &ViewConfig) -> fmt::Result {
    if !config.annotate() {
        return Ok(());
    }
    match entry.default_state.annotation() {
        Some(note) => write!(out, "  # {note}"),
        None => Ok(()),
    }
}

/// One view line: a single group, or with switch labels every group
/// sharing the switch.
struct Entry<'a> {
    label: Label<'a>,
    groups: Vec<&'a GroupNode>,
    closure: Cow<'a, BTreeSet<DiagnosticId>>,
    default_state: DefaultState,
}

impl<'a> Entry<'a> {
    fn collect(graph: &'a GroupGraph, label: GroupLabel) -> Vec<Self> {
        match label {
            GroupLabel::Record => graph
                .groups()
                .map(|node| Entry {
                    label: Label::Record(node.name()),
                    groups: vec![node],
                    closure: Cow::Borrowed(node.closure()),
                    default_state: node.default_state(),
                })
                .collect(),
            GroupLabel::Switch => graph
                .switches()
                .into_iter()
                .map(|switch| Entry {
                    label: if switch.is_declared() {
                        Label::Switch(switch.name())
                    } else {
                        Label::Record(switch.name())
                    },
                    groups: switch.groups().to_vec(),
                    closure: Cow::Owned(switch.closure().clone()),
                    default_state: switch.default_state(),
                })
                .collect(),
        }
    }

    fn is_top_level(&self) -> bool {
        self.groups.iter().all(|node| node.is_top_level())
    }

    fn is_on_by_default(&self) -> bool {
        matches!(
            self.default_state,
            DefaultState::Enabled | DefaultState::Partial
        )
    }

    /// Diagnostics naming one of the entry's groups directly, in name order.
    fn direct(&self) -> BTreeSet<DiagnosticId> {
        self.groups
            .iter()
            .flat_map(|node| node.direct().iter().copied())
            .collect()
    }
}

#[derive(Debug, Clone, Copy)]
enum Label<'a> {
    Record(&'a str),
    Switch(&'a str),
}

impl fmt::Display for Label<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Record(name) => write!(f, "{name}"),
            Label::Switch(switch) => write!(f, "-W{switch}"),
        }
    }
}
