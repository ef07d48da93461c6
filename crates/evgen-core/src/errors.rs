//! Structured error types shared across evgen crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`EvgenError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (table sizes, offending values, particle keys).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the caller resolve the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.context.insert(key.into(), value.to_string());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for the interaction core.
///
/// Only construction-time validation and exhausted sampling budgets surface
/// as errors. Out-of-range physics queries return zero and failed root
/// finding returns a sentinel distance instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum EvgenError {
    /// Malformed tabulated input (grids, interpolation tables, spline tables).
    #[error("table error: {0}")]
    Table(ErrorInfo),
    /// Invalid interaction model parameters or signatures.
    #[error("model error: {0}")]
    Model(ErrorInfo),
    /// Invalid density profile parameters.
    #[error("density error: {0}")]
    Density(ErrorInfo),
    /// Final-state sampling could not produce an accepted point within budget.
    #[error("sampling error: {0}")]
    Sampling(ErrorInfo),
    /// Invalid numerics configuration.
    #[error("config error: {0}")]
    Config(ErrorInfo),
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

impl EvgenError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            EvgenError::Table(info)
            | EvgenError::Model(info)
            | EvgenError::Density(info)
            | EvgenError::Sampling(info)
            | EvgenError::Config(info) => info,
        }
    }

    /// Whether the failure is local to a single event and the caller may
    /// retry with a fresh random stream or skip the event.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, EvgenError::Sampling(_))
    }

    /// Shorthand for a [`EvgenError::Model`] error.
    pub fn model(code: &str, message: impl Into<String>) -> Self {
        EvgenError::Model(ErrorInfo::new(code, message))
    }

    /// Shorthand for a [`EvgenError::Density`] error.
    pub fn density(code: &str, message: impl Into<String>) -> Self {
        EvgenError::Density(ErrorInfo::new(code, message))
    }

    /// Shorthand for a [`EvgenError::Sampling`] error.
    pub fn sampling(code: &str, message: impl Into<String>) -> Self {
        EvgenError::Sampling(ErrorInfo::new(code, message))
    }
}
