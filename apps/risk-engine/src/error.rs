//! Evaluation errors and their wire representation.
//!
//! An evaluation either yields an audited verdict or exactly one of these
//! errors. Rule violations are never errors; they are findings inside a
//! verdict.
//!
//! # HTTP Status Codes
//!
//! | Code | Status | Usage |
//! |------|--------|-------|
//! | `INVALID_ORDER` | 400 | Malformed order intent |
//! | `CONFIGURATION_ERROR` | 500 | Corrupt snapshot or invalid limits |
//! | `SNAPSHOT_UNAVAILABLE` | 503 | Account snapshot could not be fetched |
//! | `AUDIT_UNAVAILABLE` | 503 | Verdict could not be recorded |

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::risk_management::RiskError;

/// Stable error codes for evaluation failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Order intent failed validation.
    InvalidOrder,
    /// Snapshot or limits are internally inconsistent.
    ConfigurationError,
    /// Account snapshot unavailable after retries.
    SnapshotUnavailable,
    /// Audit sink unavailable after retries.
    AuditUnavailable,
}

impl ErrorCode {
    /// HTTP status code for this error.
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        match self {
            Self::InvalidOrder => 400,
            Self::ConfigurationError => 500,
            Self::SnapshotUnavailable | Self::AuditUnavailable => 503,
        }
    }

    /// Error reason string.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::InvalidOrder => "INVALID_ORDER",
            Self::ConfigurationError => "CONFIGURATION_ERROR",
            Self::SnapshotUnavailable => "SNAPSHOT_UNAVAILABLE",
            Self::AuditUnavailable => "AUDIT_UNAVAILABLE",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.reason())
    }
}

/// Failure of a single evaluation.
#[derive(Debug, Clone, Error)]
pub enum EvaluationError {
    /// Order intent is malformed.
    #[error("Invalid order [{field}]: {message}")]
    InvalidOrder {
        /// Offending field.
        field: String,
        /// What is wrong with it.
        message: String,
    },

    /// Snapshot data or limits are inconsistent.
    #[error("Configuration error [{field}]: {message}")]
    Configuration {
        /// Offending field.
        field: String,
        /// What is wrong with it.
        message: String,
    },

    /// Snapshot could not be fetched; no evaluation was attempted.
    #[error("Account snapshot unavailable after {attempts} attempt(s): {reason}")]
    SnapshotUnavailable {
        /// Attempts made.
        attempts: u32,
        /// Last failure.
        reason: String,
    },

    /// Verdict could not be recorded; it is withheld.
    #[error("Audit unavailable for evaluation {evaluation_id} after {attempts} attempt(s): {reason}")]
    AuditUnavailable {
        /// Evaluation whose verdict was withheld.
        evaluation_id: String,
        /// Attempts made.
        attempts: u32,
        /// Last failure.
        reason: String,
    },
}

impl EvaluationError {
    /// Stable error code.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidOrder { .. } => ErrorCode::InvalidOrder,
            Self::Configuration { .. } => ErrorCode::ConfigurationError,
            Self::SnapshotUnavailable { .. } => ErrorCode::SnapshotUnavailable,
            Self::AuditUnavailable { .. } => ErrorCode::AuditUnavailable,
        }
    }

    fn details(&self) -> HashMap<String, String> {
        let mut details = HashMap::new();
        match self {
            Self::InvalidOrder { field, .. } | Self::Configuration { field, .. } => {
                details.insert("field".to_string(), field.clone());
            }
            Self::SnapshotUnavailable { attempts, .. } => {
                details.insert("attempts".to_string(), attempts.to_string());
            }
            Self::AuditUnavailable {
                evaluation_id,
                attempts,
                ..
            } => {
                details.insert("evaluation_id".to_string(), evaluation_id.clone());
                details.insert("attempts".to_string(), attempts.to_string());
            }
        }
        details
    }

    /// Convert to an HTTP error response body.
    #[must_use]
    pub fn to_http_response(&self) -> HttpErrorResponse {
        let code = self.code();
        HttpErrorResponse {
            code: code.reason().to_string(),
            message: self.to_string(),
            status: code.http_status(),
            details: self.details(),
        }
    }
}

impl From<RiskError> for EvaluationError {
    fn from(err: RiskError) -> Self {
        match err {
            RiskError::InvalidOrder { field, message } => Self::InvalidOrder { field, message },
            RiskError::Configuration { field, message } => Self::Configuration { field, message },
        }
    }
}

/// HTTP-compatible error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpErrorResponse {
    /// Error code string.
    pub code: String,
    /// Human-readable message.
    pub message: String,
    /// HTTP status code.
    pub status: u16,
    /// Additional details.
    pub details: HashMap<String, String>,
}
