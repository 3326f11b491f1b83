//! Port traits implemented by infrastructure crates.
//!
//! | Trait | Implemented by |
//! |-------|----------------|
//! | [`LabelModel`] | `llm::GeminiClient` |
//! | [`TableStore`] | `tables::CsvTableStore` |
//! | [`Sleeper`] | `TokioSleeper` in the `cli` crate |

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;

use crate::{GenerationError, Table, TableError, Temperature};

// ---------------------------------------------------------------------------
// Text generation
// ---------------------------------------------------------------------------

/// One request to the text-generation service.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationRequest<'a> {
    /// Fixed instruction sent as the system prompt on every call.
    pub system_instruction: &'a str,
    /// Per-row user prompt (the row's source text).
    pub prompt: &'a str,
    /// Sampling temperature.
    pub temperature: Temperature,
}

/// A generative model that turns a request into free text.
///
/// Implementations make exactly one attempt per call; retrying is the
/// caller's job.
#[async_trait]
pub trait LabelModel: Send + Sync {
    /// Sends `request` and returns the model's text response.
    async fn generate(&self, request: &GenerationRequest<'_>) -> Result<String, GenerationError>;
}

// ---------------------------------------------------------------------------
// Table storage
// ---------------------------------------------------------------------------

/// Reads and writes whole tables.
pub trait TableStore {
    /// Loads the table at `path`, or `None` if no file exists there.
    fn load(&self, path: &Path) -> Result<Option<Table>, TableError>;

    /// Replaces the file at `path` with `table`.
    ///
    /// After this returns `Ok`, the new contents are on storage; a crash
    /// mid-call must leave either the old or the new file, never a mix.
    fn save(&self, path: &Path, table: &Table) -> Result<(), TableError>;
}

// ---------------------------------------------------------------------------
// Delay
// ---------------------------------------------------------------------------

/// Suspends the caller between retry attempts.
#[async_trait]
pub trait Sleeper: Send + Sync {
    /// Waits for `duration`.
    async fn sleep(&self, duration: Duration);
}
