//! Diagscope Core Types and Definitions
//!
//! This crate provides the foundational record types shared by the loader,
//! the group graph and the view renderers. It includes:
//!
//! - **Records**: Typed diagnostic and diagnostic-group records ([`record`] module)
//! - **Severity**: Default severity of a diagnostic ([`severity::DefaultSeverity`])

pub mod record;
pub mod severity;
