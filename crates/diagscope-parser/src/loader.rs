//! Record extraction from a `llvm-tblgen -dump-json` document.
//!
//! The dump is one JSON object. Its `!instanceof` member maps each record
//! class to the names of the records deriving from it; every other member is
//! a record keyed by its name. Only the `DiagGroup` and `Diagnostic` classes
//! are read.
//!
//! References to other records appear as `{ "def": "Name", ... }` objects.

use std::collections::HashSet;

use log::trace;
use serde_json::{Map, Value};

use diagscope_core::{
    record::{DiagnosticGroupRecord, DiagnosticRecord, RecordSet},
    severity::DefaultSeverity,
};

use crate::error::{
    Diagnostic, DiagnosticCollector, ErrorCode, ParseError, RecordKind, RecordRef, Result,
};

const INSTANCE_INDEX: &str = "!instanceof";
const GROUP_CLASS: &str = "DiagGroup";
const DIAGNOSTIC_CLASS: &str = "Diagnostic";

const NAME_FIELD: &str = "!name";
const TEXT_FIELD: &str = "Text";
const GROUP_FIELD: &str = "Group";
const SEVERITY_FIELD: &str = "DefaultSeverity";
const MAPPING_FIELD: &str = "DefaultMapping";
const SUBGROUPS_FIELD: &str = "SubGroups";
const SWITCH_FIELD: &str = "GroupName";

/// Extract all group and diagnostic records from a parsed dump.
///
/// Groups are read before diagnostics. Every record is checked; all record
/// errors are reported together.
pub(crate) fn load_records(document: &Value) -> std::result::Result<RecordSet, ParseError> {
    let root = document.as_object().ok_or_else(|| {
        Diagnostic::error("top-level JSON value must be an object")
            .with_code(ErrorCode::E002)
            .with_help("pass the output of `llvm-tblgen -dump-json`")
    })?;

    let index = root
        .get(INSTANCE_INDEX)
        .and_then(Value::as_object)
        .ok_or_else(|| {
            Diagnostic::error(format!("dump has no `{INSTANCE_INDEX}` record index"))
                .with_code(ErrorCode::E002)
                .with_help("pass the output of `llvm-tblgen -dump-json`")
        })?;

    let group_names = instance_names(index, GROUP_CLASS)?;
    let diagnostic_names = instance_names(index, DIAGNOSTIC_CLASS)?;

    let mut collector = DiagnosticCollector::new();
    let mut records = RecordSet::new();

    let mut listed = HashSet::new();
    for (idx, name) in group_names.into_iter().enumerate() {
        let locator = RecordRef::new(RecordKind::Group, name, idx);
        if !listed.insert(name) {
            collector.emit(duplicate_record(locator));
            continue;
        }

        let parsed = record_object(root, &locator)
            .and_then(|object| parse_group(object, &locator, &mut collector));
        match parsed {
            Ok(group) => {
                trace!(group:? = group; "Group record");
                records.insert_group(group);
            }
            Err(diag) => collector.emit(diag),
        }
    }

    listed.clear();
    for (idx, name) in diagnostic_names.into_iter().enumerate() {
        let locator = RecordRef::new(RecordKind::Diagnostic, name, idx);
        if !listed.insert(name) {
            collector.emit(duplicate_record(locator));
            continue;
        }

        let parsed =
            record_object(root, &locator).and_then(|object| parse_diagnostic(object, &locator));
        match parsed {
            Ok(diagnostic) => {
                trace!(diagnostic:? = diagnostic; "Diagnostic record");
                records.insert_diagnostic(diagnostic);
            }
            Err(diag) => collector.emit(diag),
        }
    }

    collector.finish()?;
    Ok(records)
}

/// Read the names listed for `class` in the record index.
fn instance_names<'a>(index: &'a Map<String, Value>, class: &str) -> Result<Vec<&'a str>> {
    let malformed = || {
        Diagnostic::error(format!(
            "record index has no `{class}` list of record names"
        ))
        .with_code(ErrorCode::E002)
    };

    index
        .get(class)
        .and_then(Value::as_array)
        .ok_or_else(malformed)?
        .iter()
        .map(|name| name.as_str().ok_or_else(malformed))
        .collect()
}

/// Look up the record object for an index entry.
fn record_object<'a>(
    root: &'a Map<String, Value>,
    locator: &RecordRef,
) -> Result<&'a Map<String, Value>> {
    match root.get(locator.name()) {
        Some(Value::Object(object)) => Ok(object),
        Some(_) => Err(Diagnostic::error(format!("{locator} must be a JSON object"))
            .with_code(ErrorCode::E102)
            .with_record(locator.clone())),
        None => Err(
            Diagnostic::error(format!("{locator} is listed in the index but has no record"))
                .with_code(ErrorCode::E100)
                .with_record(locator.clone()),
        ),
    }
}

fn parse_group(
    object: &Map<String, Value>,
    locator: &RecordRef,
    collector: &mut DiagnosticCollector,
) -> Result<DiagnosticGroupRecord> {
    let name = record_name(object, locator)?;

    let switch_name = match object.get(SWITCH_FIELD) {
        None | Some(Value::Null) => None,
        Some(Value::String(switch)) => Some(switch.clone()),
        Some(_) => return Err(wrong_shape(locator, SWITCH_FIELD, "a string")),
    };

    let references = match object.get(SUBGROUPS_FIELD) {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| def_reference(item, SUBGROUPS_FIELD, locator))
            .collect::<Result<Vec<_>>>()?,
        Some(_) => {
            return Err(wrong_shape(
                locator,
                SUBGROUPS_FIELD,
                "an array of record references",
            ));
        }
    };

    let mut seen = HashSet::new();
    let mut subgroups = Vec::with_capacity(references.len());
    for subgroup in references {
        if seen.insert(subgroup) {
            subgroups.push(subgroup.to_string());
        } else {
            collector.emit(
                Diagnostic::warning(format!("{locator} lists subgroup `{subgroup}` more than once"))
                    .with_code(ErrorCode::E105)
                    .with_record(locator.clone()),
            );
        }
    }

    Ok(DiagnosticGroupRecord::new(name, switch_name, subgroups))
}

fn parse_diagnostic(object: &Map<String, Value>, locator: &RecordRef) -> Result<DiagnosticRecord> {
    let name = record_name(object, locator)?;
    let text = string_field(object, TEXT_FIELD, locator)?;
    let severity = parse_severity(object, locator)?;

    let group = match object.get(GROUP_FIELD) {
        None | Some(Value::Null) => None,
        Some(value) => Some(def_reference(value, GROUP_FIELD, locator)?.to_string()),
    };

    Ok(DiagnosticRecord::new(name, group, severity, text))
}

/// Read the default severity, falling back to the legacy mapping field.
fn parse_severity(object: &Map<String, Value>, locator: &RecordRef) -> Result<DefaultSeverity> {
    if let Some(value) = object.get(SEVERITY_FIELD) {
        let def = def_reference(value, SEVERITY_FIELD, locator)?;
        return DefaultSeverity::from_severity_def(def).ok_or_else(|| {
            unknown_severity(
                locator,
                def,
                "SEV_Ignored, SEV_Remark, SEV_Warning, SEV_Error, SEV_Fatal",
            )
        });
    }

    if let Some(value) = object.get(MAPPING_FIELD) {
        let def = def_reference(value, MAPPING_FIELD, locator)?;
        return DefaultSeverity::from_mapping_def(def).ok_or_else(|| {
            unknown_severity(
                locator,
                def,
                "MAP_IGNORE, MAP_REMARK, MAP_WARNING, MAP_ERROR, MAP_FATAL",
            )
        });
    }

    Err(missing_field(locator, SEVERITY_FIELD)
        .with_help(format!("dumps of older releases spell this field `{MAPPING_FIELD}`")))
}

/// Read the record's own name, which must match the key it is indexed under.
///
/// Index keys are checked for duplicates, so this keeps record names unique.
fn record_name<'a>(object: &'a Map<String, Value>, locator: &RecordRef) -> Result<&'a str> {
    let name = string_field(object, NAME_FIELD, locator)?;
    if name != locator.name() {
        return Err(Diagnostic::error(format!(
            "{locator} field `{NAME_FIELD}` is `{name}`, which does not match its index entry"
        ))
        .with_code(ErrorCode::E102)
        .with_record(locator.clone())
        .with_help("a record must be stored under its own name"));
    }
    Ok(name)
}

fn string_field<'a>(
    object: &'a Map<String, Value>,
    field: &str,
    locator: &RecordRef,
) -> Result<&'a str> {
    match object.get(field) {
        Some(Value::String(value)) => Ok(value.as_str()),
        Some(_) => Err(wrong_shape(locator, field, "a string")),
        None => Err(missing_field(locator, field)),
    }
}

/// Read a `{ "def": "Name" }` record reference.
fn def_reference<'a>(value: &'a Value, field: &str, locator: &RecordRef) -> Result<&'a str> {
    value
        .get("def")
        .and_then(Value::as_str)
        .ok_or_else(|| wrong_shape(locator, field, "a record reference `{ \"def\": ... }`"))
}

fn missing_field(locator: &RecordRef, field: &str) -> Diagnostic {
    Diagnostic::error(format!("{locator} is missing required field `{field}`"))
        .with_code(ErrorCode::E101)
        .with_record(locator.clone())
}

fn wrong_shape(locator: &RecordRef, field: &str, expected: &str) -> Diagnostic {
    Diagnostic::error(format!("{locator} field `{field}` must be {expected}"))
        .with_code(ErrorCode::E102)
        .with_record(locator.clone())
}

fn unknown_severity(locator: &RecordRef, def: &str, expected: &str) -> Diagnostic {
    Diagnostic::error(format!("{locator} has unknown severity `{def}`"))
        .with_code(ErrorCode::E103)
        .with_record(locator.clone())
        .with_help(format!("expected one of {expected}"))
}

fn duplicate_record(locator: RecordRef) -> Diagnostic {
    Diagnostic::error(format!("{locator} is listed more than once"))
        .with_code(ErrorCode::E104)
        .with_record(locator)
        .with_help("record names must be unique within their kind")
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn severity(def: &str) -> Value {
        json!({ "def": def, "kind": "def", "printable": def })
    }

    fn reference(name: &str) -> Value {
        json!({ "def": name, "kind": "def", "printable": name })
    }

    fn first_code(err: &ParseError) -> Option<ErrorCode> {
        err.diagnostics().first().and_then(Diagnostic::code)
    }

    #[test]
    fn test_load_minimal_dump() {
        let document = json!({
            "!instanceof": { "DiagGroup": ["Unused"], "Diagnostic": ["warn_unused"] },
            "Unused": { "!name": "Unused", "GroupName": "unused", "SubGroups": [] },
            "warn_unused": {
                "!name": "warn_unused",
                "Text": "unused variable %0",
                "Group": reference("Unused"),
                "DefaultSeverity": severity("SEV_Warning"),
            },
        });

        let records = load_records(&document).expect("dump should load");

        let group = records.group("Unused").expect("group should exist");
        assert_eq!(group.switch_name(), Some("unused"));
        assert!(group.subgroups().is_empty());

        let diagnostic = records.diagnostic("warn_unused").expect("diagnostic should exist");
        assert_eq!(diagnostic.group(), Some("Unused"));
        assert_eq!(diagnostic.severity(), DefaultSeverity::Warning);
        assert_eq!(diagnostic.text(), "unused variable %0");
    }

    #[test]
    fn test_null_and_absent_group_mean_ungrouped() {
        let document = json!({
            "!instanceof": { "DiagGroup": [], "Diagnostic": ["err_a", "err_b"] },
            "err_a": { "!name": "err_a", "Text": "a", "Group": null, "DefaultSeverity": severity("SEV_Error") },
            "err_b": { "!name": "err_b", "Text": "b", "DefaultSeverity": severity("SEV_Error") },
        });

        let records = load_records(&document).expect("dump should load");
        assert!(records.diagnostics().values().all(|d| d.group().is_none()));
    }

    #[test]
    fn test_legacy_default_mapping() {
        let document = json!({
            "!instanceof": { "DiagGroup": [], "Diagnostic": ["warn_old"] },
            "warn_old": { "!name": "warn_old", "Text": "old", "DefaultMapping": severity("MAP_IGNORE") },
        });

        let records = load_records(&document).expect("legacy dump should load");
        assert_eq!(
            records.diagnostic("warn_old").map(DiagnosticRecord::severity),
            Some(DefaultSeverity::Ignored)
        );
    }

    #[test]
    fn test_missing_index_is_rejected() {
        let err = load_records(&json!({ "Unused": {} })).unwrap_err();
        assert_eq!(first_code(&err), Some(ErrorCode::E002));

        let err = load_records(&json!({ "!instanceof": { "DiagGroup": [] } })).unwrap_err();
        assert_eq!(first_code(&err), Some(ErrorCode::E002));

        let err = load_records(&json!([1, 2, 3])).unwrap_err();
        assert_eq!(first_code(&err), Some(ErrorCode::E002));
    }

    #[test]
    fn test_listed_record_without_object() {
        let document = json!({
            "!instanceof": { "DiagGroup": ["Ghost"], "Diagnostic": [] },
        });

        let err = load_records(&document).unwrap_err();
        let diag = &err.diagnostics()[0];
        assert_eq!(diag.code(), Some(ErrorCode::E100));
        assert_eq!(diag.record().map(RecordRef::name), Some("Ghost"));
    }

    #[test]
    fn test_missing_text_names_record_and_index() {
        let document = json!({
            "!instanceof": { "DiagGroup": [], "Diagnostic": ["warn_ok", "warn_bad"] },
            "warn_ok": { "!name": "warn_ok", "Text": "fine", "DefaultSeverity": severity("SEV_Warning") },
            "warn_bad": { "!name": "warn_bad", "DefaultSeverity": severity("SEV_Warning") },
        });

        let err = load_records(&document).unwrap_err();
        assert_eq!(err.diagnostics().len(), 1);

        let diag = &err.diagnostics()[0];
        assert_eq!(diag.code(), Some(ErrorCode::E101));
        assert!(diag.message().contains("warn_bad"));
        assert!(diag.message().contains("#1"));
        assert!(diag.message().contains("`Text`"));

        let record = diag.record().expect("record locator");
        assert_eq!(record.kind(), RecordKind::Diagnostic);
        assert_eq!(record.index(), 1);
    }

    #[test]
    fn test_missing_severity_is_rejected() {
        let document = json!({
            "!instanceof": { "DiagGroup": [], "Diagnostic": ["warn_x"] },
            "warn_x": { "!name": "warn_x", "Text": "x" },
        });

        let err = load_records(&document).unwrap_err();
        assert_eq!(first_code(&err), Some(ErrorCode::E101));
        assert!(err.diagnostics()[0].help().is_some());
    }

    #[test]
    fn test_unknown_severity_constant() {
        let document = json!({
            "!instanceof": { "DiagGroup": [], "Diagnostic": ["warn_x"] },
            "warn_x": { "!name": "warn_x", "Text": "x", "DefaultSeverity": severity("SEV_Loud") },
        });

        let err = load_records(&document).unwrap_err();
        assert_eq!(first_code(&err), Some(ErrorCode::E103));
    }

    #[test]
    fn test_wrong_shapes_are_rejected() {
        let document = json!({
            "!instanceof": { "DiagGroup": ["A", "B"], "Diagnostic": ["warn_x", "warn_y"] },
            "A": { "!name": "A", "SubGroups": "B" },
            "B": { "!name": "B", "SubGroups": [42] },
            "warn_x": { "!name": "warn_x", "Text": 7, "DefaultSeverity": severity("SEV_Warning") },
            "warn_y": { "!name": "warn_y", "Text": "y", "Group": "A", "DefaultSeverity": severity("SEV_Warning") },
        });

        let err = load_records(&document).unwrap_err();
        let names: Vec<_> = err
            .diagnostics()
            .iter()
            .map(|diag| {
                assert_eq!(diag.code(), Some(ErrorCode::E102));
                diag.record().map(RecordRef::name).unwrap_or_default()
            })
            .collect();
        assert_eq!(names, ["A", "B", "warn_x", "warn_y"]);
    }

    #[test]
    fn test_duplicate_names_are_rejected() {
        let document = json!({
            "!instanceof": { "DiagGroup": ["A", "A"], "Diagnostic": [] },
            "A": { "!name": "A", "SubGroups": [] },
        });

        let err = load_records(&document).unwrap_err();
        let diag = &err.diagnostics()[0];
        assert_eq!(diag.code(), Some(ErrorCode::E104));
        assert_eq!(diag.record().map(RecordRef::index), Some(1));
    }

    #[test]
    fn test_records_sharing_a_name_are_rejected() {
        let document = json!({
            "!instanceof": { "DiagGroup": ["A", "B"], "Diagnostic": ["warn_1", "warn_2"] },
            "A": { "!name": "Same", "SubGroups": [] },
            "B": { "!name": "Same", "SubGroups": [] },
            "warn_1": { "!name": "warn_dup", "Text": "first", "DefaultSeverity": severity("SEV_Warning") },
            "warn_2": { "!name": "warn_dup", "Text": "second", "DefaultSeverity": severity("SEV_Warning") },
        });

        let err = load_records(&document).expect_err("colliding names must not load");
        let located: Vec<_> = err
            .diagnostics()
            .iter()
            .map(|d| (d.code(), d.record().map(|r| (r.kind(), r.name().to_string()))))
            .collect();

        assert_eq!(
            located,
            [
                (Some(ErrorCode::E102), Some((RecordKind::Group, "A".to_string()))),
                (Some(ErrorCode::E102), Some((RecordKind::Group, "B".to_string()))),
                (Some(ErrorCode::E102), Some((RecordKind::Diagnostic, "warn_1".to_string()))),
                (Some(ErrorCode::E102), Some((RecordKind::Diagnostic, "warn_2".to_string()))),
            ]
        );
        assert!(err.diagnostics()[0].message().contains("`Same`"));
    }

    #[test]
    fn test_repeated_subgroup_is_dropped_with_warning() {
        let document = json!({
            "!instanceof": { "DiagGroup": ["A", "B"], "Diagnostic": [] },
            "A": { "!name": "A", "SubGroups": [reference("B"), reference("B")] },
            "B": { "!name": "B", "SubGroups": [] },
        });

        let records = load_records(&document).expect("warnings should not reject the dump");
        assert_eq!(records.group("A").map(|g| g.subgroups().len()), Some(1));
    }

    #[test]
    fn test_references_are_not_resolved() {
        let document = json!({
            "!instanceof": { "DiagGroup": ["A"], "Diagnostic": ["warn_x"] },
            "A": { "!name": "A", "SubGroups": [reference("Missing")] },
            "warn_x": { "!name": "warn_x", "Text": "x", "Group": reference("AlsoMissing"), "DefaultSeverity": severity("SEV_Warning") },
        });

        assert!(load_records(&document).is_ok());
    }
}
