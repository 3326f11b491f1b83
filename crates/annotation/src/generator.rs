//! Label generator: one model call wrapped in a fixed-delay retry loop.

use tracing::{debug, warn};

use crate::{AnnotateError, GenerationRequest, LabelModel, RetrySchedule, RowId, Sleeper};

/// Sends generation requests, retrying the identical request after a fixed
/// delay whenever the model fails.
///
/// With the default [`RetrySchedule`] a persistent outage blocks on the
/// current row forever; progress resumes as soon as the service answers.
#[derive(Debug)]
pub struct LabelGenerator<M, S> {
    model: M,
    sleeper: S,
    retry: RetrySchedule,
}

impl<M: LabelModel, S: Sleeper> LabelGenerator<M, S> {
    /// Creates a generator over `model`, waiting through `sleeper` between
    /// attempts.
    pub fn new(model: M, sleeper: S, retry: RetrySchedule) -> Self {
        Self {
            model,
            sleeper,
            retry,
        }
    }

    /// Returns the wrapped model.
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Returns the sleeper used between attempts.
    pub fn sleeper(&self) -> &S {
        &self.sleeper
    }

    /// Generates the raw response text for `row`.
    ///
    /// Fails only with [`AnnotateError::RetriesExhausted`], and only when the
    /// schedule is bounded.
    pub async fn generate(
        &self,
        row: &RowId,
        request: &GenerationRequest<'_>,
    ) -> Result<String, AnnotateError> {
        let mut attempts: u32 = 0;
        loop {
            attempts += 1;
            let error = match self.model.generate(request).await {
                Ok(text) => {
                    debug!(row = %row, attempts, "Label generated");
                    return Ok(text);
                }
                Err(error) => error,
            };

            if self.retry.is_exhausted_after(attempts) {
                return Err(AnnotateError::RetriesExhausted {
                    row: row.clone(),
                    attempts,
                    last_error: error,
                });
            }

            warn!(
                row = %row,
                prompt = request.prompt,
                attempts,
                error = %error,
                delay_secs = self.retry.delay.as_secs_f64(),
                "Generation failed; waiting before retrying the same prompt"
            );
            self.sleeper.sleep(self.retry.delay).await;
        }
    }
}
