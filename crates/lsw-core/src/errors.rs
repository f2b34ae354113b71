//! Structured error types shared across the LSW crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`LswError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (potential names, temperatures, bounds).
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
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for the reference solver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum LswError {
    /// A potential was requested by a name outside the catalogue.
    #[error("unknown potential: {0}")]
    UnknownPotential(ErrorInfo),
    /// Quadrature did not reach the requested tolerance.
    #[error("integration failed: {0}")]
    IntegrationFailed(ErrorInfo),
    /// A half-line probability mass was zero or non-finite.
    #[error("degenerate mass ratio: {0}")]
    DegenerateMassRatio(ErrorInfo),
    /// Arguments outside the domain of an operation (kT, ranges, tolerances).
    #[error("invalid input: {0}")]
    InvalidInput(ErrorInfo),
    /// Filesystem errors.
    #[error("io error: {0}")]
    Io(ErrorInfo),
    /// Serialization and schema errors.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
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

impl LswError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            LswError::UnknownPotential(info)
            | LswError::IntegrationFailed(info)
            | LswError::DegenerateMassRatio(info)
            | LswError::InvalidInput(info)
            | LswError::Io(info)
            | LswError::Serde(info) => info,
        }
    }

    /// Adds a context entry to the payload, keeping the error family.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let info = match &mut self {
            LswError::UnknownPotential(info)
            | LswError::IntegrationFailed(info)
            | LswError::DegenerateMassRatio(info)
            | LswError::InvalidInput(info)
            | LswError::Io(info)
            | LswError::Serde(info) => info,
        };
        info.context.insert(key.into(), value.into());
        self
    }
}

/// Rejects temperatures for which the Boltzmann weight is undefined.
pub fn check_kt(kt: f64) -> Result<(), LswError> {
    if kt.is_finite() && kt > 0.0 {
        Ok(())
    } else {
        Err(LswError::InvalidInput(
            ErrorInfo::new("kt-domain", "kT must be positive and finite")
                .with_context("kt", kt.to_string()),
        ))
    }
}
