use std::ffi::{OsStr, OsString};
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use annotation::{Table, TableError, TableStore};
use tracing::debug;

/// [`TableStore`] over CSV files.
///
/// Fields are quoted only when necessary and records end with `\n`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvTableStore;

impl CsvTableStore {
    /// Creates a store.
    pub fn new() -> Self {
        Self
    }

    fn read(path: &Path, file: File) -> Result<Table, TableError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(file);

        let headers = reader
            .headers()
            .map_err(|e| storage(path, e))?
            .iter()
            .map(str::to_owned)
            .collect();
        let rows = reader
            .records()
            .map(|record| {
                record
                    .map(|r| r.iter().map(str::to_owned).collect())
                    .map_err(|e| storage(path, e))
            })
            .collect::<Result<Vec<Vec<String>>, _>>()?;

        Table::new(headers, rows)
    }

    fn write(path: &Path, table: &Table) -> Result<(), TableError> {
        let mut writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .from_path(path)
            .map_err(|e| storage(path, e))?;

        writer
            .write_record(table.headers())
            .map_err(|e| storage(path, e))?;
        for row in table.rows() {
            writer.write_record(row).map_err(|e| storage(path, e))?;
        }

        let file = writer
            .into_inner()
            .map_err(|e| storage(path, e.error()))?;
        file.sync_all().map_err(|e| storage(path, e))
    }
}

impl TableStore for CsvTableStore {
    fn load(&self, path: &Path) -> Result<Option<Table>, TableError> {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(storage(path, e)),
        };
        let table = Self::read(path, file)?;
        debug!(path = %path.display(), rows = table.len(), "Loaded table");
        Ok(Some(table))
    }

    fn save(&self, path: &Path, table: &Table) -> Result<(), TableError> {
        let temp = temp_path(path);
        if let Err(e) = Self::write(&temp, table) {
            let _ = fs::remove_file(&temp);
            return Err(e);
        }
        if let Err(e) = fs::rename(&temp, path) {
            let _ = fs::remove_file(&temp);
            return Err(storage(path, e));
        }
        debug!(path = %path.display(), rows = table.len(), "Saved table");
        Ok(())
    }
}

/// `dir/name.csv` → `dir/.name.csv.tmp`, on the same filesystem as the target.
fn temp_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(".");
    name.push(path.file_name().unwrap_or_else(|| OsStr::new("table")));
    name.push(".tmp");
    path.with_file_name(name)
}

fn storage(path: &Path, error: impl std::fmt::Display) -> TableError {
    TableError::Storage {
        path: path.to_path_buf(),
        message: error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    fn table(headers: &[&str], rows: &[&[&str]]) -> Table {
        Table::new(
            headers.iter().map(|s| s.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn missing_file_loads_as_none() {
        let dir = tempdir().unwrap();
        let loaded = CsvTableStore::new().load(&dir.path().join("absent.csv")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn save_then_load_preserves_cells() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let original = table(
            &["id", "Input.text", "Annotator1"],
            &[
                &["1", "I hate you, really", "'Hate'"],
                &["2", "say \"hi\"\nthen leave", "'NotHate'"],
                &["3", "", ""],
            ],
        );

        CsvTableStore::new().save(&path, &original).unwrap();
        let loaded = CsvTableStore::new().load(&path).unwrap().unwrap();

        assert_eq!(loaded, original);
    }

    #[test]
    fn fields_are_quoted_only_when_needed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let t = table(&["id", "text", "label"], &[&["1", "a, b", "'Hate'"]]);

        CsvTableStore::new().save(&path, &t).unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "id,text,label\n1,\"a, b\",'Hate'\n"
        );
    }

    #[test]
    fn save_replaces_previous_contents_and_leaves_no_temp_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let store = CsvTableStore::new();

        store
            .save(&path, &table(&["id", "label"], &[&["1", ""], &["2", ""]]))
            .unwrap();
        store
            .save(&path, &table(&["id", "label"], &[&["1", "'Hate'"], &["2", ""]]))
            .unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "id,label\n1,'Hate'\n2,\n");
        let entries: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![OsString::from("out.csv")]);
    }

    #[test]
    fn ragged_file_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("in.csv");
        fs::write(&path, "id,text\n1,a\n2\n").unwrap();

        let err = CsvTableStore::new().load(&path).unwrap_err();

        assert!(matches!(
            err,
            TableError::RaggedRow {
                row_number: 2,
                expected: 2,
                found: 1
            }
        ));
    }

    #[test]
    fn unwritable_target_reports_storage_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("out.csv");

        let err = CsvTableStore::new()
            .save(&path, &table(&["id"], &[&["1"]]))
            .unwrap_err();

        assert!(matches!(err, TableError::Storage { .. }));
    }

    #[test]
    fn temp_file_sits_next_to_target() {
        assert_eq!(
            temp_path(Path::new("data/sample40_annotated.csv")),
            PathBuf::from("data/.sample40_annotated.csv.tmp")
        );
    }
}
