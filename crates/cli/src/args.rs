//! Command-line arguments.

use std::num::NonZeroU32;
use std::path::PathBuf;
use std::time::Duration;

use annotation::{
    AnnotatorConfig, ColumnName, ConfigError, ModelId, RetrySchedule, TableColumns, Temperature,
    DEFAULT_ID_COLUMN, DEFAULT_INPUT_PATH, DEFAULT_LABEL_COLUMN, DEFAULT_OUTPUT_PATH,
    DEFAULT_RETRY_DELAY, DEFAULT_SOURCE_COLUMN, DEFAULT_SYSTEM_INSTRUCTION,
};
use clap::Parser;
use llm::{DEFAULT_BASE_URL, DEFAULT_MODEL};

/// Label every row of a CSV file with a Gemini model, resuming from a previous
/// output file when one exists.
#[derive(Debug, Parser)]
#[command(name = "csv-annotator", version)]
pub struct Args {
    /// Table to annotate.
    #[arg(long, default_value = DEFAULT_INPUT_PATH)]
    pub input: PathBuf,

    /// Annotated table; read on start-up to resume, rewritten after every row.
    #[arg(long, default_value = DEFAULT_OUTPUT_PATH)]
    pub output: PathBuf,

    /// Column holding the unique row id.
    #[arg(long, default_value = DEFAULT_ID_COLUMN)]
    pub id_column: String,

    /// Column whose text is sent to the model.
    #[arg(long, default_value = DEFAULT_SOURCE_COLUMN)]
    pub read_column: String,

    /// Column that receives the label.
    #[arg(long, default_value = DEFAULT_LABEL_COLUMN)]
    pub write_column: String,

    /// System instruction sent with every request.
    #[arg(long, default_value = DEFAULT_SYSTEM_INSTRUCTION)]
    pub system_prompt: String,

    /// Gemini model id.
    #[arg(long, default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Sampling temperature, 0.0 to 2.0.
    #[arg(long, default_value_t = Temperature::DEFAULT.as_f32())]
    pub temperature: f32,

    /// Seconds to wait before retrying a failed request.
    #[arg(long, default_value_t = DEFAULT_RETRY_DELAY.as_secs())]
    pub retry_delay_secs: u64,

    /// Give up on a row after this many attempts. Retries forever when unset.
    #[arg(long)]
    pub max_attempts: Option<NonZeroU32>,

    /// Gemini API root.
    #[arg(long, default_value = DEFAULT_BASE_URL, hide = true)]
    pub base_url: String,

    /// Emit logs as JSON lines.
    #[arg(long)]
    pub log_json: bool,
}

impl Args {
    /// Builds and validates the run configuration.
    pub fn annotator_config(&self) -> Result<AnnotatorConfig, ConfigError> {
        let temperature = Temperature::new(self.temperature).ok_or_else(|| {
            invalid("temperature", format!("{} is outside 0.0..=2.0", self.temperature))
        })?;
        let config = AnnotatorConfig {
            input_path: self.input.clone(),
            output_path: self.output.clone(),
            columns: TableColumns {
                id: column("id-column", &self.id_column)?,
                source: column("read-column", &self.read_column)?,
                label: column("write-column", &self.write_column)?,
            },
            system_instruction: self.system_prompt.clone(),
            temperature,
            retry: RetrySchedule {
                delay: Duration::from_secs(self.retry_delay_secs),
                max_attempts: self.max_attempts,
            },
        };
        config.validate()?;
        Ok(config)
    }

    /// Returns the model id.
    pub fn model_id(&self) -> Result<ModelId, ConfigError> {
        ModelId::new(self.model.trim()).ok_or_else(|| invalid("model", "must not be empty".into()))
    }
}

fn column(setting: &str, name: &str) -> Result<ColumnName, ConfigError> {
    ColumnName::new(name).ok_or_else(|| invalid(setting, "must not be empty".into()))
}

fn invalid(setting: &str, message: String) -> ConfigError {
    ConfigError::InvalidSetting {
        setting: setting.to_owned(),
        message,
    }
}
