//! # Diagscope Parser
//!
//! Loader for compiler diagnostic definition dumps. This crate turns the
//! JSON emitted by `llvm-tblgen -dump-json` over clang's `Diagnostic.td`
//! into a typed [`RecordSet`].
//!
//! The loader checks the shape of every record but does not resolve
//! references between records; that happens when the group graph is built.
//!
//! ## Usage
//!
//! ```
//! # use diagscope_parser::{load, error::ParseError};
//!
//! fn main() -> Result<(), ParseError> {
//!     let source = r#"{
//!         "!instanceof": { "DiagGroup": ["Unused"], "Diagnostic": ["warn_unused"] },
//!         "Unused": { "!name": "Unused", "GroupName": "unused", "SubGroups": [] },
//!         "warn_unused": {
//!             "!name": "warn_unused",
//!             "Text": "unused variable %0",
//!             "Group": { "def": "Unused", "kind": "def", "printable": "Unused" },
//!             "DefaultSeverity": { "def": "SEV_Ignored", "kind": "def", "printable": "SEV_Ignored" }
//!         }
//!     }"#;
//!
//!     let records = load(source)?;
//!     assert_eq!(records.groups().len(), 1);
//!     Ok(())
//! }
//! ```

pub mod error;

mod loader;

use log::{debug, info};

use diagscope_core::record::RecordSet;

use error::{Diagnostic, ErrorCode, ParseError};

/// Load a definition dump into a [`RecordSet`].
///
/// # Arguments
///
/// * `source` - The JSON text of the dump
///
/// # Errors
///
/// Returns a [`ParseError`] holding every problem found:
/// - `E001` if the input is not JSON
/// - `E002` if the record index is missing
/// - `E1xx` for each malformed record, naming the record and its index
pub fn load(source: &str) -> Result<RecordSet, ParseError> {
    info!(bytes = source.len(); "Loading definition dump");

    let document: serde_json::Value = serde_json::from_str(source).map_err(|err| {
        Diagnostic::error(format!("input is not valid JSON: {err}"))
            .with_code(ErrorCode::E001)
            .with_help("pass the output of `llvm-tblgen -dump-json`")
    })?;

    let records = loader::load_records(&document)?;

    debug!(
        groups = records.groups().len(),
        diagnostics = records.diagnostics().len();
        "Records loaded"
    );

    Ok(records)
}
