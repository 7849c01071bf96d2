//! Structured error types shared across the sweep crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`KgrError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable snake_case identifier, e.g. `run_exit`.
    pub code: String,
    /// One-line description for humans.
    pub message: String,
    /// Paths, indices and other values the failure is about.
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// What the user can do about it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Payload with empty context and no hint.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds or replaces one context entry.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Attaches a remediation hint.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for the sweep tooling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum KgrError {
    /// Numeric inputs outside the domain of an operation.
    #[error("domain error: {0}")]
    Domain(ErrorInfo),
    /// Serialization errors and persisted-sequence invariant violations.
    #[error("schema error: {0}")]
    Schema(ErrorInfo),
    /// Filesystem errors.
    #[error("io error: {0}")]
    Io(ErrorInfo),
    /// Failures spawning or running the external binary.
    #[error("dispatch error: {0}")]
    Dispatch(ErrorInfo),
    /// Secrets resource encoding and decoding errors.
    #[error("secrets error: {0}")]
    Secrets(ErrorInfo),
}

/// Renders as `[code] message {key=value, ...} hint: ...`.
impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        let mut pairs = self.context.iter();
        if let Some((key, value)) = pairs.next() {
            write!(f, " {{{key}={value}")?;
            for (key, value) in pairs {
                write!(f, ", {key}={value}")?;
            }
            f.write_str("}")?;
        }
        match &self.hint {
            Some(hint) => write!(f, " hint: {hint}"),
            None => Ok(()),
        }
    }
}

impl KgrError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            KgrError::Domain(info)
            | KgrError::Schema(info)
            | KgrError::Io(info)
            | KgrError::Dispatch(info)
            | KgrError::Secrets(info) => info,
        }
    }

    /// Wraps a filesystem error, recording the offending path.
    pub fn io(code: &str, path: &std::path::Path, err: impl ToString) -> Self {
        KgrError::Io(
            ErrorInfo::new(code, err.to_string()).with_context("path", path.display().to_string()),
        )
    }

    /// Shorthand for a [`KgrError::Domain`] without context.
    pub fn domain(code: &str, message: impl Into<String>) -> Self {
        KgrError::Domain(ErrorInfo::new(code, message))
    }

    /// Shorthand for a [`KgrError::Schema`] without context.
    pub fn schema(code: &str, err: impl ToString) -> Self {
        KgrError::Schema(ErrorInfo::new(code, err.to_string()))
    }
}
