//! Integration tests for the CatalogBuilder and ReleasePipeline APIs.

use std::{collections::HashSet, fs, path::Path};

use proptest::prelude::*;

use diagscope::{
    CatalogBuilder, DiagscopeError,
    config::{AppConfig, PipelineConfig, ViewConfig},
    diff,
    graph::{GraphError, GroupGraph},
    pipeline::ReleasePipeline,
    record::{DiagnosticGroupRecord, DiagnosticRecord, RecordSet},
    severity::DefaultSeverity,
    view::ViewKind,
};

fn quoted<'a>(names: impl Iterator<Item = &'a str>) -> String {
    names
        .map(|name| format!("\"{name}\""))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Build a tblgen-style dump from `(group, subgroups)` and
/// `(diagnostic, group)` pairs.
fn dump(groups: &[(&str, &[&str])], diagnostics: &[(&str, &str)]) -> String {
    let mut records = Vec::new();
    for (name, subgroups) in groups {
        let subgroups = subgroups
            .iter()
            .map(|sub| format!("{{ \"def\": \"{sub}\" }}"))
            .collect::<Vec<_>>()
            .join(", ");
        records.push(format!(
            "\"{name}\": {{ \"!name\": \"{name}\", \"GroupName\": \"{}\", \"SubGroups\": [{subgroups}] }}",
            name.to_lowercase()
        ));
    }
    for (name, group) in diagnostics {
        records.push(format!(
            "\"{name}\": {{ \"!name\": \"{name}\", \"Text\": \"text of {name}\", \
             \"Group\": {{ \"def\": \"{group}\" }}, \
             \"DefaultSeverity\": {{ \"def\": \"SEV_Warning\" }} }}"
        ));
    }

    format!(
        "{{ \"!instanceof\": {{ \"DiagGroup\": [{}], \"Diagnostic\": [{}] }}, {} }}",
        quoted(groups.iter().map(|(name, _)| *name)),
        quoted(diagnostics.iter().map(|(name, _)| *name)),
        records.join(", ")
    )
}

#[test]
fn test_builder_default() {
    let builder = CatalogBuilder::default();
    assert!(builder.config().pipeline().versions().is_empty());
}

#[test]
fn test_nested_group_scenario() {
    let source = dump(&[("A", &["B"]), ("B", &[])], &[("warn-unused", "B")]);
    let builder = CatalogBuilder::default();
    let graph = builder.build(&source).expect("Failed to build catalog");

    let full = builder.render(&graph, ViewKind::Full);
    assert_eq!(full, "A: [warn-unused]\nB: [warn-unused]\n");

    let unique = builder.render(&graph, ViewKind::Unique);
    assert_eq!(unique, "warn-unused\n");

    let top_level = builder.render(&graph, ViewKind::TopLevel);
    assert_eq!(top_level, "A\n");
}

#[test]
fn test_cycle_is_rejected() {
    let source = dump(&[("X", &["Y"]), ("Y", &["X"])], &[]);
    let err = CatalogBuilder::default()
        .build(&source)
        .expect_err("cycle must be rejected");

    match err {
        DiagscopeError::Graph(GraphError::CycleDetected { path }) => {
            assert_eq!(path.first(), path.last());
            assert!(path.contains(&"X".to_string()));
            assert!(path.contains(&"Y".to_string()));
        }
        other => panic!("Expected cycle error, got {other:?}"),
    }
}

#[test]
fn test_unknown_subgroup_is_rejected() {
    let source = dump(&[("A", &["Missing"])], &[]);
    let err = CatalogBuilder::default()
        .build(&source)
        .expect_err("dangling subgroup must be rejected");

    assert!(matches!(
        err,
        DiagscopeError::Graph(GraphError::UnknownReference { ref target, .. }) if target == "Missing"
    ));
}

#[test]
fn test_malformed_dump_is_a_parse_error() {
    let err = CatalogBuilder::default()
        .build("{ \"!instanceof\": { \"DiagGroup\": [\"A\"], \"Diagnostic\": [] } }")
        .expect_err("listed group without a record must fail");

    match err {
        DiagscopeError::Parse { err, origin } => {
            assert!(err.has_malformed_record());
            assert_eq!(origin, "<input>");
        }
        other => panic!("Expected parse error, got {other:?}"),
    }
}

#[test]
fn test_build_file_reports_missing_file() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let err = CatalogBuilder::default()
        .build_file(dir.path().join("absent.json"))
        .expect_err("missing file must fail");

    assert!(matches!(err, DiagscopeError::File { .. }));
}

#[test]
fn test_views_are_deterministic_across_builds() {
    let source = dump(
        &[("Most", &["Unused", "Shadow"]), ("Unused", &[]), ("Shadow", &[])],
        &[("warn_b", "Unused"), ("warn_a", "Shadow"), ("warn_c", "Most")],
    );
    let builder = CatalogBuilder::default();
    let first = builder.build(&source).expect("Failed to build");
    let second = builder.build(&source).expect("Failed to build");

    for kind in ViewKind::ALL {
        assert_eq!(builder.render(&first, kind), builder.render(&second, kind));
    }
}

fn write_dump(dir: &Path, version: &str, content: &str) {
    fs::write(dir.join(format!("warnings-clang-{version}.json")), content)
        .expect("Failed to write dump");
}

fn pipeline_for(dir: &Path, versions: &[&str]) -> ReleasePipeline {
    let config = PipelineConfig::new(
        versions.iter().map(|v| v.to_string()).collect(),
        dir,
        dir.join("out"),
        "warnings-clang",
    );
    ReleasePipeline::new(AppConfig::new(ViewConfig::default(), config))
}

#[test]
fn test_pipeline_writes_views_and_diffs() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    write_dump(
        dir.path(),
        "11",
        &dump(&[("All", &[])], &[("warn-a", "All"), ("warn-b", "All")]),
    );
    write_dump(
        dir.path(),
        "12",
        &dump(&[("All", &[])], &[("warn-b", "All"), ("warn-c", "All")]),
    );
    write_dump(
        dir.path(),
        "NEXT",
        &dump(&[("All", &[])], &[("warn-b", "All"), ("warn-c", "All")]),
    );

    let report = pipeline_for(dir.path(), &["11", "12", "NEXT"])
        .run()
        .expect("Pipeline should succeed");

    assert_eq!(report.releases(), ["11", "12", "NEXT"]);
    assert_eq!(report.view_files().len(), 12);
    assert_eq!(report.diff_files().len(), 2);
    for path in report.view_files().iter().chain(report.diff_files()) {
        assert!(path.exists(), "{} should exist", path.display());
    }

    let out = dir.path().join("out");
    let first_diff = fs::read_to_string(out.join("warnings-clang-diff-11-12.txt"))
        .expect("Failed to read diff");
    assert_eq!(first_diff, "- warn-a\n+ warn-c\n");

    let second_diff = fs::read_to_string(out.join("warnings-clang-diff-12-NEXT.txt"))
        .expect("Failed to read diff");
    assert_eq!(second_diff, "");

    let unique = diff::read_view_lines(out.join("warnings-clang-unique-12.txt"))
        .expect("Failed to read unique view");
    assert_eq!(unique, ["warn-b", "warn-c"]);
}

#[test]
fn test_pipeline_stops_at_broken_release() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    write_dump(dir.path(), "1", &dump(&[("All", &[])], &[("warn-a", "All")]));
    write_dump(dir.path(), "2", &dump(&[("X", &["Y"]), ("Y", &["X"])], &[]));
    write_dump(dir.path(), "3", &dump(&[("All", &[])], &[("warn-a", "All")]));

    let err = pipeline_for(dir.path(), &["1", "2", "3"])
        .run()
        .expect_err("Cyclic release must stop the run");

    match &err {
        DiagscopeError::Release { version, .. } => assert_eq!(version, "2"),
        other => panic!("Expected release error, got {other:?}"),
    }
    assert!(matches!(
        err.root(),
        DiagscopeError::Graph(GraphError::CycleDetected { .. })
    ));

    let out = dir.path().join("out");
    assert!(out.join("warnings-clang-unique-1.txt").exists());
    assert!(!out.join("warnings-clang-unique-2.txt").exists());
    assert!(!out.join("warnings-clang-unique-3.txt").exists());
    assert!(!out.join("warnings-clang-diff-1-2.txt").exists());
}

#[test]
fn test_pipeline_missing_dump() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");

    let err = pipeline_for(dir.path(), &["9"])
        .run()
        .expect_err("Missing dump must fail");

    assert!(matches!(err.root(), DiagscopeError::File { .. }));
}

/// Groups `G00..Gnn`; edges only point from a lower to a higher index so the
/// subgroup relation is acyclic.
fn random_dag() -> impl Strategy<Value = RecordSet> {
    (2usize..12).prop_flat_map(|count| {
        (
            Just(count),
            prop::collection::vec((0..count, 0..count), 0..30),
            prop::collection::vec(0..count, 0..20),
        )
            .prop_map(|(count, edges, owners)| {
                let name = |idx: usize| format!("G{idx:02}");
                let mut records = RecordSet::new();
                for idx in 0..count {
                    let mut subgroups: Vec<String> = edges
                        .iter()
                        .filter(|(from, to)| *from == idx && from < to)
                        .map(|(_, to)| name(*to))
                        .collect();
                    subgroups.sort();
                    subgroups.dedup();
                    records.insert_group(DiagnosticGroupRecord::new(name(idx), None, subgroups));
                }
                for (idx, owner) in owners.into_iter().enumerate() {
                    records.insert_diagnostic(DiagnosticRecord::new(
                        format!("warn_{idx:02}"),
                        Some(name(owner)),
                        DefaultSeverity::Warning,
                        "text",
                    ));
                }
                records
            })
    })
}

proptest! {
    #[test]
    fn closure_contains_every_subgroup_closure(records in random_dag()) {
        let graph = GroupGraph::build(&records).expect("acyclic graph should build");

        for (group, subgroup) in graph.edges() {
            prop_assert!(
                subgroup.closure().is_subset(group.closure()),
                "closure({}) must contain closure({})",
                group.name(),
                subgroup.name()
            );
        }
    }

    #[test]
    fn top_level_view_lists_groups_without_parents(records in random_dag()) {
        let graph = GroupGraph::build(&records).expect("acyclic graph should build");
        let builder = CatalogBuilder::default();

        let listed: HashSet<String> = builder
            .render(&graph, ViewKind::TopLevel)
            .lines()
            .map(str::to_string)
            .collect();
        let expected: HashSet<String> = graph
            .groups()
            .filter(|node| graph.parents(node).is_empty())
            .map(|node| node.name().to_string())
            .collect();
        prop_assert_eq!(listed, expected);
    }
}
