//! CSV annotator entry point.
//!
//! This binary is the composition root. Responsibilities:
//!
//! 1. **Parse configuration** — read command-line flags (every flag has a
//!    built-in default) and validate them into an [`annotation::AnnotatorConfig`].
//! 2. **Wire observability** — install the `tracing-subscriber` layer that all
//!    workspace crates log through.
//! 3. **Validate the credential** — fail before touching any file or the
//!    network when `GEMINI_API_KEY` is missing or blank.
//! 4. **Construct infrastructure** — [`llm::GeminiClient`], [`TokioSleeper`],
//!    and [`tables::CsvTableStore`], injected into [`annotation::annotate`].

mod args;
mod sleeper;
mod telemetry;

use annotation::{annotate, LabelGenerator, RunId};
use anyhow::Context;
use clap::Parser;
use llm::{ApiKey, GeminiClient, GeminiSettings, API_KEY_ENV_VAR};
use tables::CsvTableStore;
use tracing::{error, info};

use crate::args::Args;
use crate::sleeper::TokioSleeper;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    telemetry::init(args.log_json).context("failed to initialise logging")?;

    if let Err(err) = run(args).await {
        error!("Annotation run failed: {err:#}");
        return Err(err);
    }
    Ok(())
}

async fn run(args: Args) -> anyhow::Result<()> {
    let config = args.annotator_config().context("invalid configuration")?;
    let model = args.model_id().context("invalid configuration")?;

    let key_found = std::env::var_os(API_KEY_ENV_VAR).is_some();
    info!(variable = API_KEY_ENV_VAR, found = key_found, "Checked API credential");
    let api_key = ApiKey::from_env().context("a Gemini API key is required")?;

    let client = GeminiClient::new(GeminiSettings {
        base_url: args.base_url.clone(),
        model,
        api_key,
    })
    .context("failed to create Gemini client")?;
    info!(model = %client.model(), endpoint = client.endpoint(), "Gemini client ready");

    let generator = LabelGenerator::new(client, TokioSleeper, config.retry);
    let summary = annotate(&config, &generator, &CsvTableStore::new(), RunId::new_random())
        .await
        .with_context(|| format!("failed to annotate {}", config.input_path.display()))?;

    info!(
        run_id = %summary.run_id,
        started_at = %summary.started_at,
        total = summary.total,
        previously_annotated = summary.previously_annotated,
        newly_annotated = summary.newly_annotated,
        output = %config.output_path.display(),
        "Run complete"
    );
    Ok(())
}
