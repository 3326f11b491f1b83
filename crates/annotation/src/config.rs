//! Run configuration.
//!
//! [`AnnotatorConfig`] is built once by the composition root, validated, and
//! passed by reference to [`crate::annotate`]. Nothing mutates it afterwards.

use std::num::NonZeroU32;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{ColumnName, ConfigError, TableColumns, Temperature};

/// Input table used when none is given.
pub const DEFAULT_INPUT_PATH: &str = "sample40.csv";

/// Output table used when none is given.
pub const DEFAULT_OUTPUT_PATH: &str = "sample40_annotated.csv";

/// Join key column.
pub const DEFAULT_ID_COLUMN: &str = "id";

/// Column whose text is sent to the model.
pub const DEFAULT_SOURCE_COLUMN: &str = "Input.text";

/// Column that receives the label.
pub const DEFAULT_LABEL_COLUMN: &str = "Annotator1";

/// System instruction sent with every request.
pub const DEFAULT_SYSTEM_INSTRUCTION: &str = "You are a member of the black community. \
     Your task is to output 'Hate' or 'Not Hate' depending the text you read";

/// Wait between a failed generation call and its retry.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(60);

// ---------------------------------------------------------------------------

/// How the label generator retries a failed call.
///
/// The delay is fixed: there is no exponential growth and no jitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrySchedule {
    /// Wait between attempts.
    pub delay: Duration,
    /// Total attempts allowed per row. `None` retries forever.
    pub max_attempts: Option<NonZeroU32>,
}

impl RetrySchedule {
    /// Retries forever, waiting `delay` between attempts.
    pub fn unbounded(delay: Duration) -> Self {
        Self {
            delay,
            max_attempts: None,
        }
    }

    /// Returns `true` if `attempts` calls have used up the budget.
    pub fn is_exhausted_after(&self, attempts: u32) -> bool {
        self.max_attempts.is_some_and(|max| attempts >= max.get())
    }
}

impl Default for RetrySchedule {
    fn default() -> Self {
        Self::unbounded(DEFAULT_RETRY_DELAY)
    }
}

// ---------------------------------------------------------------------------

/// Everything a run needs apart from its collaborators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatorConfig {
    /// Table to annotate.
    pub input_path: PathBuf,
    /// Table holding annotations; read for resume, rewritten after every row.
    pub output_path: PathBuf,
    /// Id, source, and label column names.
    pub columns: TableColumns,
    /// Fixed system instruction.
    pub system_instruction: String,
    /// Sampling temperature.
    pub temperature: Temperature,
    /// Retry behaviour for failed generation calls.
    pub retry: RetrySchedule,
}

impl AnnotatorConfig {
    /// Checks settings that cannot be expressed in the field types.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.input_path.as_os_str().is_empty() {
            return Err(invalid("input", "path is empty"));
        }
        if self.output_path.as_os_str().is_empty() {
            return Err(invalid("output", "path is empty"));
        }
        if self.columns.label == self.columns.id {
            return Err(invalid(
                "write-column",
                "must differ from the id column",
            ));
        }
        if self.columns.label == self.columns.source {
            return Err(invalid(
                "write-column",
                "must differ from the read column",
            ));
        }
        if self.system_instruction.trim().is_empty() {
            return Err(invalid("system-prompt", "must not be blank"));
        }
        Ok(())
    }
}

impl Default for AnnotatorConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(DEFAULT_INPUT_PATH),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            columns: TableColumns {
                id: default_column(DEFAULT_ID_COLUMN),
                source: default_column(DEFAULT_SOURCE_COLUMN),
                label: default_column(DEFAULT_LABEL_COLUMN),
            },
            system_instruction: DEFAULT_SYSTEM_INSTRUCTION.to_owned(),
            temperature: Temperature::DEFAULT,
            retry: RetrySchedule::default(),
        }
    }
}

fn default_column(name: &'static str) -> ColumnName {
    ColumnName::new(name).unwrap_or_else(|| unreachable!("default column names are non-empty"))
}

fn invalid(setting: &str, message: &str) -> ConfigError {
    ConfigError::InvalidSetting {
        setting: setting.to_owned(),
        message: message.to_owned(),
    }
}
