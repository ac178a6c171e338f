//! Default severity of a compiler diagnostic.
//!
//! Every diagnostic definition declares the severity it is emitted with when
//! no command-line switch overrides it. Newer dumps spell it as a
//! `DefaultSeverity` constant (`SEV_*`), older ones as a `DefaultMapping`
//! constant (`MAP_*`); both map onto [`DefaultSeverity`].

use std::fmt;

/// The severity a diagnostic is emitted with by default.
///
/// Only [`DefaultSeverity::Ignored`] diagnostics are off by default; every
/// other level is reported without any `-W` switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DefaultSeverity {
    /// Not emitted unless its group is explicitly enabled.
    Ignored,

    /// Emitted as a remark.
    Remark,

    /// Emitted as a warning.
    Warning,

    /// Emitted as an error.
    Error,

    /// Emitted as a fatal error, stopping compilation.
    Fatal,
}

impl DefaultSeverity {
    /// Parses a `DefaultSeverity` record constant such as `SEV_Warning`.
    ///
    /// # Examples
    ///
    /// ```
    /// use diagscope_core::severity::DefaultSeverity;
    ///
    /// assert_eq!(
    ///     DefaultSeverity::from_severity_def("SEV_Ignored"),
    ///     Some(DefaultSeverity::Ignored)
    /// );
    /// assert_eq!(DefaultSeverity::from_severity_def("SEV_Bogus"), None);
    /// ```
    pub fn from_severity_def(def: &str) -> Option<Self> {
        match def {
            "SEV_Ignored" => Some(Self::Ignored),
            "SEV_Remark" => Some(Self::Remark),
            "SEV_Warning" => Some(Self::Warning),
            "SEV_Error" => Some(Self::Error),
            "SEV_Fatal" => Some(Self::Fatal),
            _ => None,
        }
    }

    /// Parses a legacy `DefaultMapping` record constant such as `MAP_IGNORE`.
    ///
    /// Dumps produced before the `DefaultSeverity` field existed (clang 3.4
    /// and earlier) only carry this spelling.
    pub fn from_mapping_def(def: &str) -> Option<Self> {
        match def {
            "MAP_IGNORE" => Some(Self::Ignored),
            "MAP_REMARK" => Some(Self::Remark),
            "MAP_WARNING" => Some(Self::Warning),
            "MAP_ERROR" => Some(Self::Error),
            "MAP_FATAL" => Some(Self::Fatal),
            _ => None,
        }
    }

    /// Returns `true` if a diagnostic with this severity is reported
    /// without being explicitly enabled.
    pub fn is_enabled_by_default(&self) -> bool {
        !matches!(self, Self::Ignored)
    }
}

impl fmt::Display for DefaultSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ignored => write!(f, "ignored"),
            Self::Remark => write!(f, "remark"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
            Self::Fatal => write!(f, "fatal"),
        }
    }
}
