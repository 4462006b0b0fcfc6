//! Error types for `podium`
//!
//! The pure engine (phase resolution, validation, transition checks,
//! advancement) never returns errors: it reports problems as values.
//! The types here cover the call sites around it: snapshot loading,
//! the persistence collaborator, and the lifecycle service.

use std::path::PathBuf;
use thiserror::Error;

use crate::config::schema::CompetitionStatus;

// ============================================================================
// Exit Codes
// ============================================================================

/// Exit codes for `podium` CLI operations.
///
/// These codes follow Unix conventions.
pub struct ExitCode;

impl ExitCode {
    /// Successful execution
    pub const SUCCESS: i32 = 0;

    /// General error
    pub const ERROR: i32 = 1;

    /// Snapshot error (invalid YAML, timeline validation failure)
    pub const CONFIG_ERROR: i32 = 2;

    /// I/O error (file not found, permission denied)
    pub const IO_ERROR: i32 = 3;

    /// Persistence collaborator error
    pub const STORE_ERROR: i32 = 4;

    /// Lifecycle refusal (illegal transition, tie-break rejected)
    pub const LIFECYCLE_ERROR: i32 = 5;

    /// Usage error (invalid arguments, missing required options)
    pub const USAGE_ERROR: i32 = 64;
}

// ============================================================================
// Top-Level Error
// ============================================================================

/// Top-level error type for `podium` operations.
///
/// Aggregates the domain errors and maps each to an exit code.
#[derive(Debug, Error)]
pub enum PodiumError {
    /// Snapshot loading or validation error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Persistence layer error
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Lifecycle service refusal
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// Invalid command-line usage
    #[error("{0}")]
    Usage(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl PodiumError {
    /// Returns the appropriate exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Json(_) | Self::Yaml(_) => ExitCode::CONFIG_ERROR,
            Self::Store(_) | Self::Service(ServiceError::Store(_)) => ExitCode::STORE_ERROR,
            Self::Service(ServiceError::InvalidTimeline(_)) => ExitCode::CONFIG_ERROR,
            Self::Service(_) => ExitCode::LIFECYCLE_ERROR,
            Self::Usage(_) => ExitCode::USAGE_ERROR,
            Self::Io(_) => ExitCode::IO_ERROR,
        }
    }
}

// ============================================================================
// Snapshot Errors
// ============================================================================

/// Competition snapshot loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// YAML parsing failed
    #[error("parse error in {path}: {message}")]
    ParseError {
        /// Path to the snapshot file
        path: PathBuf,
        /// Line number where the error occurred (if available)
        line: Option<usize>,
        /// Error message from the parser
        message: String,
    },

    /// Snapshot validation failed
    #[error("validation failed for {path}")]
    ValidationError {
        /// Path to the snapshot file
        path: String,
        /// List of validation issues found
        errors: Vec<ValidationIssue>,
    },

    /// Referenced snapshot file not found
    #[error("file not found: {path}")]
    MissingFile {
        /// Path to the missing file
        path: PathBuf,
    },

    /// Snapshot file has no content
    #[error("snapshot file is empty: {path}")]
    EmptyFile {
        /// Path to the empty file
        path: PathBuf,
    },

    /// A configured size or count limit was exceeded
    #[error("{what} exceeds limit: {actual} > {limit}")]
    LimitExceeded {
        /// What was counted (e.g. "voting_rounds")
        what: String,
        /// Observed size or count
        actual: usize,
        /// Configured maximum
        limit: usize,
    },

    /// Field has an invalid value
    #[error("invalid value for '{field}': got '{value}', expected {expected}")]
    InvalidValue {
        /// Name of the field with invalid value
        field: String,
        /// The actual value provided
        value: String,
        /// Description of what was expected
        expected: String,
    },
}

// ============================================================================
// Validation Types
// ============================================================================

/// A single validation issue found while checking a timeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Path to the problematic field (e.g. "voting_rounds[1].start")
    pub path: String,
    /// Human-readable description, shown verbatim to the operator
    pub message: String,
    /// Severity level of the issue
    pub severity: Severity,
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let prefix = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{}: {} at {}", prefix, self.message, self.path)
    }
}

/// Severity level for validation issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Prevents the timeline from being saved
    Error,
    /// Worth surfacing, does not block a save
    Warning,
}

// ============================================================================
// Persistence Errors
// ============================================================================

/// Errors raised by the persistence collaborator.
///
/// The engine performs no retries; these are propagated as-is.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Requested record does not exist
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Record kind (e.g. "competition", "contestant")
        kind: &'static str,
        /// Identifier that was looked up
        id: String,
    },

    /// Backend unreachable or refused the operation
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

// ============================================================================
// Lifecycle Service Errors
// ============================================================================

/// Refusals and failures reported by the lifecycle service.
///
/// None of these indicate a bug: each is a reportable outcome that
/// leaves the stored state unchanged.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Persistence failure, passed through unchanged
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Edited timeline failed validation; nothing was persisted
    #[error("timeline validation failed with {} error(s)", .0.len())]
    InvalidTimeline(Vec<ValidationIssue>),

    /// Requested status change is not allowed
    #[error("cannot move from {from} to {to}: {reason}")]
    TransitionRefused {
        /// Current status
        from: CompetitionStatus,
        /// Requested status
        to: CompetitionStatus,
        /// Reason shown to the operator
        reason: String,
    },

    /// The competition has no round matching the request
    #[error("round not found: {0}")]
    RoundNotFound(String),

    /// Tie-break requested but the cutoff is not contested
    #[error("no tie at the advancement cutoff")]
    NoTie,

    /// Selected contestant is not part of the tie
    #[error("contestant '{0}' is not tied at the cutoff")]
    NotInTie(String),
}

// ============================================================================
// Result Type Alias
// ============================================================================

/// Result type alias for `podium` operations.
pub type Result<T> = std::result::Result<T, PodiumError>;

// ============================================================================
// Tests
// ============================================================================
