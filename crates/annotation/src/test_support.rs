//! In-memory fakes for the port traits, shared by unit tests.

use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::{GenerationError, GenerationRequest, LabelModel, Sleeper, Table, TableError, TableStore};

/// Returns queued results in order and records every prompt it receives.
pub(crate) struct ScriptedModel {
    script: Mutex<VecDeque<Result<String, GenerationError>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedModel {
    pub(crate) fn new(script: Vec<Result<String, GenerationError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub(crate) fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LabelModel for ScriptedModel {
    async fn generate(&self, request: &GenerationRequest<'_>) -> Result<String, GenerationError> {
        self.prompts.lock().unwrap().push(request.prompt.to_owned());
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .expect("model called more often than scripted")
    }
}

/// Answers each prompt through a closure.
pub(crate) struct FnModel<F>(pub(crate) F);

#[async_trait]
impl<F> LabelModel for FnModel<F>
where
    F: Fn(&str) -> Result<String, GenerationError> + Send + Sync,
{
    async fn generate(&self, request: &GenerationRequest<'_>) -> Result<String, GenerationError> {
        (self.0)(request.prompt)
    }
}

/// Records requested delays without waiting.
#[derive(Default)]
pub(crate) struct RecordingSleeper {
    sleeps: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub(crate) fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
    }
}

/// Table store over a shared map; clones see the same files.
#[derive(Clone, Default)]
pub(crate) struct MemoryStore {
    files: Arc<Mutex<HashMap<PathBuf, Table>>>,
    saves: Arc<Mutex<usize>>,
}

impl MemoryStore {
    pub(crate) fn insert(&self, path: impl Into<PathBuf>, table: Table) {
        self.files.lock().unwrap().insert(path.into(), table);
    }

    pub(crate) fn get(&self, path: impl AsRef<Path>) -> Option<Table> {
        self.files.lock().unwrap().get(path.as_ref()).cloned()
    }

    pub(crate) fn save_count(&self) -> usize {
        *self.saves.lock().unwrap()
    }
}

impl TableStore for MemoryStore {
    fn load(&self, path: &Path) -> Result<Option<Table>, TableError> {
        Ok(self.get(path))
    }

    fn save(&self, path: &Path, table: &Table) -> Result<(), TableError> {
        *self.saves.lock().unwrap() += 1;
        self.insert(path, table.clone());
        Ok(())
    }
}

/// Builds a [`Table`] from string literals.
pub(crate) fn table(headers: &[&str], rows: &[&[&str]]) -> Table {
    Table::new(
        headers.iter().map(|s| s.to_string()).collect(),
        rows.iter()
            .map(|r| r.iter().map(|s| s.to_string()).collect())
            .collect(),
    )
    .unwrap()
}
