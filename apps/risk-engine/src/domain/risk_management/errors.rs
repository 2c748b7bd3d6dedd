//! Risk management errors.

use std::fmt;

/// Structural errors raised while preparing an evaluation.
///
/// Rule violations are never errors; they are findings inside a verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RiskError {
    /// The order intent is malformed (caller's fault).
    InvalidOrder {
        /// Offending field.
        field: String,
        /// Error message.
        message: String,
    },

    /// The engine or the account data it was given cannot support an evaluation.
    Configuration {
        /// Offending field.
        field: String,
        /// Error message.
        message: String,
    },
}

impl RiskError {
    /// Create an invalid-order error.
    #[must_use]
    pub fn invalid_order(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidOrder {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error.
    #[must_use]
    pub fn configuration(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Configuration {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Field the error refers to.
    #[must_use]
    pub fn field(&self) -> &str {
        match self {
            Self::InvalidOrder { field, .. } | Self::Configuration { field, .. } => field,
        }
    }
}

impl fmt::Display for RiskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidOrder { field, message } => {
                write!(f, "Invalid order [{field}]: {message}")
            }
            Self::Configuration { field, message } => {
                write!(f, "Risk configuration error [{field}]: {message}")
            }
        }
    }
}

impl std::error::Error for RiskError {}
