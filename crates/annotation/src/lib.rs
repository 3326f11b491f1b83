//! Annotation domain for the CSV annotator.
//!
//! This crate contains every domain concept used to label the rows of a table
//! with a generative model: identifiers, the table model, label sanitisation,
//! the retrying label generator, and the resumable row iterator. Infrastructure
//! crates implement the port traits defined here; they never add domain rules.
//!
//! ## Architectural Layer
//!
//! **Business logic + port definitions.** This crate has no I/O dependencies.
//! It defines *what* is needed; infrastructure crates define *how* to supply it.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype identifiers (`RowId`, `ColumnName`, `ModelId`, `RunId`) |
//! | [`types`] | Value types (`Label`, `Temperature`, `Timestamp`) and [`sanitize`] |
//! | [`table`] | Raw [`Table`] grid and the [`AnnotationTable`] view |
//! | [`errors`] | Run, table, generation, and configuration errors |
//! | [`config`] | [`AnnotatorConfig`] and [`RetrySchedule`] |
//! | [`ports`] | [`LabelModel`], [`TableStore`], [`Sleeper`] |
//! | [`generator`] | [`LabelGenerator`] retry loop |
//! | [`annotator`] | [`annotate`] row iterator |

pub mod annotator;
pub mod config;
pub mod errors;
pub mod generator;
pub mod identifiers;
pub mod ports;
pub mod table;
pub mod types;

#[cfg(test)]
mod test_support;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use annotator::{annotate, RunSummary};
pub use config::{
    AnnotatorConfig, RetrySchedule, DEFAULT_ID_COLUMN, DEFAULT_INPUT_PATH, DEFAULT_LABEL_COLUMN,
    DEFAULT_OUTPUT_PATH, DEFAULT_RETRY_DELAY, DEFAULT_SOURCE_COLUMN, DEFAULT_SYSTEM_INSTRUCTION,
};
pub use errors::{AnnotateError, ConfigError, GenerationError, TableError, TableRole};
pub use generator::LabelGenerator;
pub use identifiers::{ColumnName, ModelId, RowId, RunId};
pub use ports::{GenerationRequest, LabelModel, Sleeper, TableStore};
pub use table::{AnnotationTable, Progress, RowView, Table, TableColumns};
pub use types::{sanitize, Label, Temperature, Timestamp};
