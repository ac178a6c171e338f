//! Diagnostic group graph.
//!
//! This module resolves the references of a loaded [`RecordSet`] into a
//! directed graph of groups, where an edge `G -> S` means group `G` lists
//! `S` as a subgroup. For every group it derives:
//!
//! - the diagnostics that name it directly,
//! - its in-degree (how many groups nest it),
//! - its closure: every diagnostic reachable through any chain of subgroups,
//! - its [`DefaultState`], summarizing whether the closure is on by default.
//!
//! Building the graph is where the dump is validated: unresolved references
//! and subgroup cycles are rejected with a [`GraphError`]. Once built, every
//! accessor is infallible.
//!
//! Groups and diagnostics are stored in lexicographic name order, so every
//! iterator in this module yields a deterministic sequence.
//!
//! [`GroupGraph::switches`] merges groups sharing a `GroupName` into one
//! [`SwitchNode`], the unit a user turns on with `-W`.

use std::{
    collections::{BTreeMap, BTreeSet, HashMap},
    fmt,
};

use log::{debug, trace};
use petgraph::{
    Direction,
    graph::{DiGraph, NodeIndex},
};
use thiserror::Error;

use diagscope_core::record::{DiagnosticGroupRecord, DiagnosticRecord, RecordSet};

/// Errors raised while building a [`GroupGraph`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// A group reference does not name any known group.
    #[error("{referrer} references unknown group `{target}`")]
    UnknownReference { referrer: Referrer, target: String },

    /// The subgroup relation contains a cycle.
    ///
    /// `path` lists the groups along the cycle, starting and ending with the
    /// same group.
    #[error("subgroup cycle detected: {}", path.join(" -> "))]
    CycleDetected { path: Vec<String> },
}

/// The record holding an unresolved reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Referrer {
    /// A diagnostic whose group does not exist.
    Diagnostic(String),
    /// A group with a subgroup that does not exist.
    Group(String),
}

impl fmt::Display for Referrer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Referrer::Diagnostic(name) => write!(f, "diagnostic `{name}`"),
            Referrer::Group(name) => write!(f, "group `{name}`"),
        }
    }
}

/// Index of a diagnostic within a [`GroupGraph`].
///
/// Ids follow lexicographic order of diagnostic names, so sorting ids sorts
/// by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DiagnosticId(usize);

/// Whether the diagnostics controlled by a group are on by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DefaultState {
    /// The group controls no diagnostic at all.
    Dummy,
    /// Every diagnostic in the closure is enabled by default.
    Enabled,
    /// Some diagnostics in the closure are enabled by default, some are not.
    Partial,
    /// No diagnostic in the closure is enabled by default.
    Disabled,
}

impl DefaultState {
    /// Returns the comment appended to a group in annotated views.
    pub fn annotation(&self) -> Option<&'static str> {
        match self {
            DefaultState::Dummy => Some("dummy"),
            DefaultState::Enabled => Some("enabled by default"),
            DefaultState::Partial => Some("partially enabled by default"),
            DefaultState::Disabled => None,
        }
    }
}

/// A group record together with the fields derived from the graph.
#[derive(Debug, Clone)]
pub struct GroupNode {
    record: DiagnosticGroupRecord,
    index: NodeIndex,
    direct: Vec<DiagnosticId>,
    in_degree: usize,
    closure: BTreeSet<DiagnosticId>,
    default_state: DefaultState,
}

impl GroupNode {
    fn new(record: DiagnosticGroupRecord) -> Self {
        Self {
            record,
            index: NodeIndex::end(),
            direct: Vec::new(),
            in_degree: 0,
            closure: BTreeSet::new(),
            default_state: DefaultState::Dummy,
        }
    }

    /// Returns the underlying group record.
    pub fn record(&self) -> &DiagnosticGroupRecord {
        &self.record
    }

    /// Returns the group name.
    pub fn name(&self) -> &str {
        self.record.name()
    }

    /// Returns the diagnostics naming this group directly, in name order.
    pub fn direct(&self) -> &[DiagnosticId] {
        &self.direct
    }

    /// Returns how many groups list this group as a subgroup.
    pub fn in_degree(&self) -> usize {
        self.in_degree
    }

    /// Returns `true` if no other group nests this group.
    pub fn is_top_level(&self) -> bool {
        self.in_degree == 0
    }

    /// Returns every diagnostic reachable from this group, in name order.
    pub fn closure(&self) -> &BTreeSet<DiagnosticId> {
        &self.closure
    }

    /// Returns the default state of the group's closure.
    pub fn default_state(&self) -> DefaultState {
        self.default_state
    }

    /// Returns the switch controlling this group.
    ///
    /// Groups without a `GroupName` are their own switch, named after the
    /// record.
    pub fn switch(&self) -> &str {
        self.record.switch_name().unwrap_or(self.record.name())
    }
}

/// One command-line switch and every group it controls.
///
/// Several groups may share a `GroupName`; enabling the switch enables all
/// of them, so the switch's closure is the union of their closures.
#[derive(Debug, Clone)]
pub struct SwitchNode<'a> {
    name: &'a str,
    groups: Vec<&'a GroupNode>,
    closure: BTreeSet<DiagnosticId>,
    default_state: DefaultState,
}

impl<'a> SwitchNode<'a> {
    /// Returns the switch spelling, without `-W`.
    pub fn name(&self) -> &'a str {
        self.name
    }

    /// Returns `true` if the switch comes from a `GroupName` rather than a
    /// record name.
    pub fn is_declared(&self) -> bool {
        self.groups
            .iter()
            .any(|node| node.record().switch_name().is_some())
    }

    /// Returns the groups sharing this switch, in name order.
    pub fn groups(&self) -> &[&'a GroupNode] {
        &self.groups
    }

    /// Returns `true` if none of the switch's groups is nested in another group.
    pub fn is_top_level(&self) -> bool {
        self.groups.iter().all(|node| node.is_top_level())
    }

    /// Returns every diagnostic reachable from any of the switch's groups.
    pub fn closure(&self) -> &BTreeSet<DiagnosticId> {
        &self.closure
    }

    /// Returns the default state of the merged closure.
    pub fn default_state(&self) -> DefaultState {
        self.default_state
    }
}

/// Traversal mark for the cycle-checking depth-first search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    OnPath,
    Done,
}

/// The resolved group hierarchy of one release.
#[derive(Debug)]
pub struct GroupGraph {
    graph: DiGraph<GroupNode, ()>,
    by_name: HashMap<String, NodeIndex>,
    diagnostics: Vec<DiagnosticRecord>,
}

impl GroupGraph {
    /// Build the group graph for a release.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownReference`] if a diagnostic's group or a
    /// group's subgroup does not exist, and [`GraphError::CycleDetected`] if
    /// the subgroup relation is cyclic.
    pub fn build(records: &RecordSet) -> Result<Self, GraphError> {
        let mut groups: Vec<&DiagnosticGroupRecord> = records.groups().values().collect();
        groups.sort_by(|a, b| a.name().cmp(b.name()));

        let mut diagnostics: Vec<DiagnosticRecord> =
            records.diagnostics().values().cloned().collect();
        diagnostics.sort_by(|a, b| a.name().cmp(b.name()));

        let mut graph = DiGraph::with_capacity(groups.len(), 0);
        let mut by_name = HashMap::with_capacity(groups.len());
        for record in &groups {
            let index = graph.add_node(GroupNode::new((*record).clone()));
            graph[index].index = index;
            by_name.insert(record.name().to_string(), index);
        }

        let resolve = |target: &str, referrer: Referrer| {
            by_name
                .get(target)
                .copied()
                .ok_or_else(|| GraphError::UnknownReference {
                    referrer,
                    target: target.to_string(),
                })
        };

        // Subgroup edges, in declaration order per group.
        let mut children: Vec<Vec<NodeIndex>> = vec![Vec::new(); groups.len()];
        let mut edges = Vec::new();
        for record in &groups {
            let parent = by_name[record.name()];
            for subgroup in record.subgroups() {
                let child = resolve(subgroup, Referrer::Group(record.name().to_string()))?;
                children[parent.index()].push(child);
                edges.push((parent, child));
            }
        }

        let mut direct: Vec<Vec<DiagnosticId>> = vec![Vec::new(); groups.len()];
        for (id, diagnostic) in diagnostics.iter().enumerate() {
            if let Some(group) = diagnostic.group() {
                let node = resolve(group, Referrer::Diagnostic(diagnostic.name().to_string()))?;
                direct[node.index()].push(DiagnosticId(id));
            }
        }

        for (parent, child) in edges {
            graph.add_edge(parent, child, ());
            graph[child].in_degree += 1;
        }

        let closures = compute_closures(&graph, &children, &direct)?;

        for (node, (direct, closure)) in graph
            .node_weights_mut()
            .zip(direct.into_iter().zip(closures))
        {
            node.default_state = default_state(&closure, &diagnostics);
            node.direct = direct;
            node.closure = closure;
        }

        debug!(
            groups = graph.node_count(),
            edges = graph.edge_count(),
            diagnostics = diagnostics.len();
            "Group graph built"
        );

        Ok(Self {
            graph,
            by_name,
            diagnostics,
        })
    }

    /// Returns all groups in name order.
    pub fn groups(&self) -> impl Iterator<Item = &GroupNode> {
        self.graph.node_weights()
    }

    /// Returns the groups no other group nests, in name order.
    pub fn top_level(&self) -> impl Iterator<Item = &GroupNode> {
        self.groups().filter(|node| node.is_top_level())
    }

    /// Returns the group with the given name.
    pub fn group(&self, name: &str) -> Option<&GroupNode> {
        self.by_name.get(name).map(|&index| &self.graph[index])
    }

    /// Returns the direct subgroups of a group, in name order.
    pub fn subgroups(&self, node: &GroupNode) -> Vec<&GroupNode> {
        self.neighbors(node, Direction::Outgoing)
    }

    /// Returns the groups listing `node` as a subgroup, in name order.
    pub fn parents(&self, node: &GroupNode) -> Vec<&GroupNode> {
        self.neighbors(node, Direction::Incoming)
    }

    /// Returns every `(group, subgroup)` pair.
    pub fn edges(&self) -> impl Iterator<Item = (&GroupNode, &GroupNode)> {
        self.graph
            .raw_edges()
            .iter()
            .map(|edge| (&self.graph[edge.source()], &self.graph[edge.target()]))
    }

    /// Returns the diagnostic with the given id.
    pub fn diagnostic(&self, id: DiagnosticId) -> &DiagnosticRecord {
        &self.diagnostics[id.0]
    }

    /// Returns all loaded diagnostics, grouped or not, in name order.
    pub fn diagnostics(&self) -> &[DiagnosticRecord] {
        &self.diagnostics
    }

    /// Returns the diagnostics in a group's closure, in name order.
    pub fn closure<'a>(
        &'a self,
        node: &'a GroupNode,
    ) -> impl Iterator<Item = &'a DiagnosticRecord> {
        node.closure.iter().map(|&id| self.diagnostic(id))
    }

    /// Returns every diagnostic in any group's closure, once each, in name order.
    pub fn unique_diagnostics(&self) -> Vec<&DiagnosticRecord> {
        let ids: BTreeSet<DiagnosticId> = self
            .groups()
            .flat_map(|node| node.closure.iter().copied())
            .collect();
        ids.into_iter().map(|id| self.diagnostic(id)).collect()
    }

    /// Returns the groups merged by switch, ordered by switch name ignoring
    /// ASCII case.
    pub fn switches(&self) -> Vec<SwitchNode<'_>> {
        let mut by_switch: BTreeMap<&str, Vec<&GroupNode>> = BTreeMap::new();
        for node in self.groups() {
            by_switch.entry(node.switch()).or_default().push(node);
        }

        let mut switches: Vec<SwitchNode<'_>> = by_switch
            .into_iter()
            .map(|(name, groups)| {
                let closure: BTreeSet<DiagnosticId> = groups
                    .iter()
                    .flat_map(|node| node.closure.iter().copied())
                    .collect();
                let default_state = default_state(&closure, &self.diagnostics);
                SwitchNode {
                    name,
                    groups,
                    closure,
                    default_state,
                }
            })
            .collect();
        switches.sort_by(|a, b| {
            a.name
                .to_ascii_lowercase()
                .cmp(&b.name.to_ascii_lowercase())
                .then_with(|| a.name.cmp(b.name))
        });

        trace!(switches = switches.len(); "Groups merged by switch");
        switches
    }

    fn neighbors(&self, node: &GroupNode, direction: Direction) -> Vec<&GroupNode> {
        let mut neighbors: Vec<NodeIndex> = self
            .graph
            .neighbors_directed(node.index, direction)
            .collect();
        neighbors.sort();
        neighbors.dedup();
        neighbors.into_iter().map(|index| &self.graph[index]).collect()
    }
}

/// Compute the closure of every group with one iterative post-order walk.
///
/// Each group is finished exactly once; a group reached again from another
/// ancestor reuses its finished closure. Reaching a group that is still on
/// the active path means the subgroup relation has a cycle.
fn compute_closures(
    graph: &DiGraph<GroupNode, ()>,
    children: &[Vec<NodeIndex>],
    direct: &[Vec<DiagnosticId>],
) -> Result<Vec<BTreeSet<DiagnosticId>>, GraphError> {
    let count = graph.node_count();
    let mut marks = vec![Mark::Unvisited; count];
    let mut closures: Vec<BTreeSet<DiagnosticId>> = vec![BTreeSet::new(); count];

    // (node, next child position)
    let mut stack: Vec<(NodeIndex, usize)> = Vec::new();

    for root in graph.node_indices() {
        if marks[root.index()] != Mark::Unvisited {
            continue;
        }

        marks[root.index()] = Mark::OnPath;
        stack.push((root, 0));

        while let Some((node, position)) = stack.last_mut() {
            let node = *node;
            if let Some(&child) = children[node.index()].get(*position) {
                *position += 1;
                match marks[child.index()] {
                    Mark::Unvisited => {
                        marks[child.index()] = Mark::OnPath;
                        stack.push((child, 0));
                    }
                    Mark::OnPath => return Err(cycle_error(graph, &stack, child)),
                    Mark::Done => {}
                }
                continue;
            }

            stack.pop();
            let mut closure: BTreeSet<DiagnosticId> =
                direct[node.index()].iter().copied().collect();
            for child in &children[node.index()] {
                closure.extend(closures[child.index()].iter().copied());
            }
            trace!(group = graph[node].name(), size = closure.len(); "Closure computed");
            closures[node.index()] = closure;
            marks[node.index()] = Mark::Done;
        }
    }

    Ok(closures)
}

fn cycle_error(
    graph: &DiGraph<GroupNode, ()>,
    stack: &[(NodeIndex, usize)],
    repeated: NodeIndex,
) -> GraphError {
    let start = stack
        .iter()
        .position(|&(node, _)| node == repeated)
        .unwrap_or_default();

    let path = stack[start..]
        .iter()
        .map(|&(node, _)| node)
        .chain(std::iter::once(repeated))
        .map(|node| graph[node].name().to_string())
        .collect();

    GraphError::CycleDetected { path }
}

fn default_state(
    closure: &BTreeSet<DiagnosticId>,
    diagnostics: &[DiagnosticRecord],
) -> DefaultState {
    let enabled = closure
        .iter()
        .filter(|id| diagnostics[id.0].severity().is_enabled_by_default())
        .count();

    match (enabled, closure.len() - enabled) {
        (0, 0) => DefaultState::Dummy,
        (_, 0) => DefaultState::Enabled,
        (0, _) => DefaultState::Disabled,
        _ => DefaultState::Partial,
    }
}
