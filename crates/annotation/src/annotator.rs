//! Row iterator: the resumable annotation loop.
//!
//! ## Resume
//!
//! The output table from a previous run is the only record of completed work.
//! When it exists, its labels are joined onto the input rows by id before the
//! loop starts; rows with a non-empty label are skipped.
//!
//! ## Durability
//!
//! The whole output table is saved after every newly labelled row, so an
//! interrupted run loses at most the row whose request was in flight.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    AnnotateError, AnnotationTable, AnnotatorConfig, GenerationRequest, Label, LabelGenerator,
    LabelModel, RunId, Sleeper, TableError, TableStore, Timestamp,
};

/// Outcome of a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Run identifier.
    pub run_id: RunId,
    /// When the run started.
    pub started_at: Timestamp,
    /// Rows in the input table.
    pub total: usize,
    /// Rows already labelled before this run.
    pub previously_annotated: usize,
    /// Rows labelled by this run.
    pub newly_annotated: usize,
}

/// Labels every unannotated row of the input table, persisting the output
/// table after each one.
#[tracing::instrument(
    name = "annotate",
    skip_all,
    fields(
        run_id = %run_id,
        input = %config.input_path.display(),
        output = %config.output_path.display(),
    )
)]
pub async fn annotate<M, S, T>(
    config: &AnnotatorConfig,
    generator: &LabelGenerator<M, S>,
    store: &T,
    run_id: RunId,
) -> Result<RunSummary, AnnotateError>
where
    M: LabelModel,
    S: Sleeper,
    T: TableStore,
{
    let started_at = Timestamp::now();

    let input = store
        .load(&config.input_path)?
        .ok_or_else(|| TableError::NotFound {
            path: config.input_path.clone(),
        })?;
    let mut table = AnnotationTable::from_input(input, &config.columns)?;

    if let Some(previous) = store.load(&config.output_path)? {
        let matched = table.resume_from(&previous, &config.columns)?;
        info!(
            previous_rows = previous.len(),
            matched, "Merged labels from existing output table"
        );
    }

    let progress = table.progress();
    info!(
        total = progress.total,
        already_annotated = progress.annotated,
        to_do = progress.remaining,
        "Loaded input table"
    );

    let mut newly_annotated = 0;
    for index in 0..table.len() {
        let row = table.row(index);
        if row.is_annotated() {
            continue;
        }

        let id = row.id.clone();
        info!(row = %id, text = row.source, "Generating label");
        let request = GenerationRequest {
            system_instruction: &config.system_instruction,
            prompt: row.source,
            temperature: config.temperature,
        };
        let response = generator.generate(&id, &request).await?;

        let label = Label::from_response(&response);
        info!(row = %id, label = %label, "Annotated");
        table.set_label(index, label);
        store.save(&config.output_path, table.as_table())?;
        newly_annotated += 1;
    }

    let summary = RunSummary {
        run_id,
        started_at,
        total: progress.total,
        previously_annotated: progress.annotated,
        newly_annotated,
    };
    info!(newly_annotated, total = summary.total, "All rows annotated");
    Ok(summary)
}
