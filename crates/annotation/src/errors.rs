//! Error types for the annotation domain.
//!
//! [`AnnotateError`] covers conditions that stop a run. [`GenerationError`] is
//! what a [`crate::LabelModel`] reports for a single failed call; the
//! [`crate::LabelGenerator`] absorbs it by retrying. [`TableError`] is shared by
//! the table model and every [`crate::TableStore`] implementation.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{ColumnName, RowId};

// ---------------------------------------------------------------------------
// Generation errors
// ---------------------------------------------------------------------------

/// A single failed call to the external text-generation service.
///
/// Every variant is treated as transient by the label generator: the identical
/// request is sent again after the configured delay.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum GenerationError {
    /// The request never produced an HTTP response (DNS, TLS, connection reset).
    #[error("Transport failure: {message}")]
    Transport {
        /// Description from the HTTP client.
        message: String,
    },

    /// The service answered with a non-success status (rate limit, quota, 5xx).
    #[error("Service returned HTTP {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, kept verbatim for diagnostics.
        body: String,
    },

    /// The response body could not be decoded.
    #[error("Malformed response: {message}")]
    MalformedResponse {
        /// Decoder message.
        message: String,
    },

    /// The response decoded but carried no text (e.g. blocked prompt).
    #[error("Response contained no text: {reason}")]
    EmptyResponse {
        /// Block or finish reason reported by the service, if any.
        reason: String,
    },
}

// ---------------------------------------------------------------------------
// Table errors
// ---------------------------------------------------------------------------

/// Which of the two tables an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableRole {
    /// The table being annotated.
    Input,
    /// The table written by a previous run.
    Output,
}

impl std::fmt::Display for TableRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TableRole::Input => write!(f, "input"),
            TableRole::Output => write!(f, "output"),
        }
    }
}

/// Failures reading, validating, or writing a table.
#[derive(Debug, Error)]
pub enum TableError {
    /// A required column is absent from the header row.
    #[error("The {table} table has no '{column}' column")]
    MissingColumn {
        /// Table that lacks the column.
        table: TableRole,
        /// Column that was expected.
        column: ColumnName,
    },

    /// Two rows share the same identifier, so the join key is ambiguous.
    #[error("The {table} table contains row id '{id}' more than once")]
    DuplicateRowId {
        /// Table containing the duplicate.
        table: TableRole,
        /// Repeated identifier.
        id: RowId,
    },

    /// A row has a blank identifier.
    #[error("Row {row_number} of the {table} table has an empty id")]
    EmptyRowId {
        /// Table containing the row.
        table: TableRole,
        /// One-based data row number (header excluded).
        row_number: usize,
    },

    /// A row's field count differs from the header's.
    #[error("Row {row_number} has {found} fields; the header has {expected}")]
    RaggedRow {
        /// One-based data row number (header excluded).
        row_number: usize,
        /// Header width.
        expected: usize,
        /// Width of the offending row.
        found: usize,
    },

    /// The input table file does not exist.
    #[error("Table file '{}' does not exist", .path.display())]
    NotFound {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// The file could not be read, parsed, or written.
    #[error("Table file '{}': {message}", .path.display())]
    Storage {
        /// File the store was operating on.
        path: PathBuf,
        /// Underlying I/O or parser message.
        message: String,
    },
}

// ---------------------------------------------------------------------------
// Run-level errors
// ---------------------------------------------------------------------------

/// Errors that stop an annotation run.
#[derive(Debug, Error)]
pub enum AnnotateError {
    /// Reading, validating, or persisting a table failed.
    #[error(transparent)]
    Table(#[from] TableError),

    /// A bounded retry schedule ran out before the model answered.
    ///
    /// Never produced with the default (unbounded) schedule.
    #[error("Gave up on row '{row}' after {attempts} attempts: {last_error}")]
    RetriesExhausted {
        /// Row whose label could not be generated.
        row: RowId,
        /// Number of calls made.
        attempts: u32,
        /// Error from the final call.
        last_error: GenerationError,
    },
}

/// Configuration rejected before any work starts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The API credential is absent or blank.
    #[error("Environment variable {variable} is not set or is empty")]
    MissingCredential {
        /// Name of the environment variable consulted.
        variable: String,
    },

    /// A setting has an unusable value.
    #[error("Invalid setting '{setting}': {message}")]
    InvalidSetting {
        /// Name of the setting (as exposed on the command line).
        setting: String,
        /// What is wrong with it.
        message: String,
    },
}
