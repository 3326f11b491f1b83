//! In-memory tables.
//!
//! [`Table`] is the untyped grid a [`crate::TableStore`] reads and writes.
//! [`AnnotationTable`] layers the annotation view on top of it: the id join
//! key, the source-text column, and the label column.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::{ColumnName, Label, RowId, TableError, TableRole};

// ---------------------------------------------------------------------------
// Raw table
// ---------------------------------------------------------------------------

/// A header row plus data rows of equal width.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Creates a table, rejecting rows whose width differs from the header's.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self, TableError> {
        if let Some((i, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != headers.len())
        {
            return Err(TableError::RaggedRow {
                row_number: i + 1,
                expected: headers.len(),
                found: row.len(),
            });
        }
        Ok(Self { headers, rows })
    }

    /// Returns the header row.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Returns the data rows.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Returns the number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the table has no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the position of `column` in the header row.
    pub fn column_index(&self, column: &ColumnName) -> Option<usize> {
        self.headers.iter().position(|h| h == column.as_str())
    }

    fn require_column(&self, column: &ColumnName, table: TableRole) -> Result<usize, TableError> {
        self.column_index(column)
            .ok_or_else(|| TableError::MissingColumn {
                table,
                column: column.clone(),
            })
    }

    /// Appends a column filled with empty strings, returning its index.
    fn push_empty_column(&mut self, column: &ColumnName) -> usize {
        self.headers.push(column.as_str().to_owned());
        for row in &mut self.rows {
            row.push(String::new());
        }
        self.headers.len() - 1
    }

    /// Reads the id column, trimming whitespace and rejecting blanks and repeats.
    fn row_ids(&self, id_index: usize, table: TableRole) -> Result<Vec<RowId>, TableError> {
        let mut seen = HashSet::with_capacity(self.rows.len());
        let mut ids = Vec::with_capacity(self.rows.len());
        for (i, row) in self.rows.iter().enumerate() {
            let id = RowId::new(row[id_index].trim()).ok_or(TableError::EmptyRowId {
                table,
                row_number: i + 1,
            })?;
            if !seen.insert(id.clone()) {
                return Err(TableError::DuplicateRowId { table, id });
            }
            ids.push(id);
        }
        Ok(ids)
    }
}

// ---------------------------------------------------------------------------
// Column selection
// ---------------------------------------------------------------------------

/// The three columns the annotator reads and writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableColumns {
    /// Join key column (`id`).
    pub id: ColumnName,
    /// Column holding the text sent to the model.
    pub source: ColumnName,
    /// Column receiving the label.
    pub label: ColumnName,
}

// ---------------------------------------------------------------------------
// Progress
// ---------------------------------------------------------------------------

/// Row counts reported before the loop starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    /// Rows in the input table.
    pub total: usize,
    /// Rows whose label cell is non-empty.
    pub annotated: usize,
    /// Rows still to be labelled.
    pub remaining: usize,
}

// ---------------------------------------------------------------------------
// Annotation view
// ---------------------------------------------------------------------------

/// One row as seen by the row iterator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowView<'a> {
    /// Join key.
    pub id: &'a RowId,
    /// Text to classify.
    pub source: &'a str,
    /// Current label cell; empty means not yet annotated.
    pub label: &'a str,
}

impl RowView<'_> {
    /// Returns `true` if the row already carries a label.
    pub fn is_annotated(&self) -> bool {
        !self.label.is_empty()
    }
}

/// The input table with its id, source, and label columns resolved.
///
/// The label column always exists: it is appended, empty, when the input
/// lacks it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationTable {
    table: Table,
    ids: Vec<RowId>,
    source_index: usize,
    label_index: usize,
}

impl AnnotationTable {
    /// Wraps the input table.
    ///
    /// Fails if the id or source column is missing or if ids are blank or
    /// repeated.
    pub fn from_input(mut table: Table, columns: &TableColumns) -> Result<Self, TableError> {
        let id_index = table.require_column(&columns.id, TableRole::Input)?;
        let source_index = table.require_column(&columns.source, TableRole::Input)?;
        let ids = table.row_ids(id_index, TableRole::Input)?;
        let label_index = match table.column_index(&columns.label) {
            Some(index) => index,
            None => table.push_empty_column(&columns.label),
        };
        Ok(Self {
            table,
            ids,
            source_index,
            label_index,
        })
    }

    /// Replaces every label with the one recorded for the same id in a
    /// previous output table; rows absent from it get the empty label.
    ///
    /// Returns the number of input rows that matched a previous row.
    pub fn resume_from(
        &mut self,
        previous: &Table,
        columns: &TableColumns,
    ) -> Result<usize, TableError> {
        let id_index = previous.require_column(&columns.id, TableRole::Output)?;
        let label_index = previous.require_column(&columns.label, TableRole::Output)?;
        let previous_ids = previous.row_ids(id_index, TableRole::Output)?;
        let done: HashMap<&RowId, &str> = previous_ids
            .iter()
            .zip(previous.rows())
            .map(|(id, row)| (id, row[label_index].as_str()))
            .collect();

        let mut matched = 0;
        for (id, row) in self.ids.iter().zip(self.table.rows.iter_mut()) {
            row[self.label_index] = match done.get(id) {
                Some(label) => {
                    matched += 1;
                    (*label).to_owned()
                }
                None => String::new(),
            };
        }
        Ok(matched)
    }

    /// Returns the number of rows.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns `true` if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Returns row `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    pub fn row(&self, index: usize) -> RowView<'_> {
        let cells = &self.table.rows[index];
        RowView {
            id: &self.ids[index],
            source: &cells[self.source_index],
            label: &cells[self.label_index],
        }
    }

    /// Iterates rows in table order.
    pub fn iter(&self) -> impl Iterator<Item = RowView<'_>> {
        (0..self.len()).map(|i| self.row(i))
    }

    /// Stores `label` in row `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    pub fn set_label(&mut self, index: usize, label: Label) {
        self.table.rows[index][self.label_index] = label.into_string();
    }

    /// Counts annotated and remaining rows.
    pub fn progress(&self) -> Progress {
        let annotated = self.iter().filter(|row| row.is_annotated()).count();
        Progress {
            total: self.len(),
            annotated,
            remaining: self.len() - annotated,
        }
    }

    /// Returns the underlying grid, ready to be persisted.
    pub fn as_table(&self) -> &Table {
        &self.table
    }

    /// Looks up the label cell for `id`.
    pub fn label_of(&self, id: &RowId) -> Option<&str> {
        self.ids
            .iter()
            .position(|candidate| candidate == id)
            .map(|i| self.row(i).label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::table;

    fn columns() -> TableColumns {
        TableColumns {
            id: ColumnName::new("id").unwrap(),
            source: ColumnName::new("text").unwrap(),
            label: ColumnName::new("label").unwrap(),
        }
    }

    #[test]
    fn label_column_is_appended_when_missing() {
        let input = table(&["id", "text"], &[&["1", "a"], &["2", "b"]]);
        let annotated = AnnotationTable::from_input(input, &columns()).unwrap();

        assert_eq!(annotated.as_table().headers(), ["id", "text", "label"]);
        assert!(annotated.iter().all(|row| row.label.is_empty()));
        assert_eq!(
            annotated.progress(),
            Progress {
                total: 2,
                annotated: 0,
                remaining: 2
            }
        );
    }

    #[test]
    fn existing_input_labels_count_without_previous_output() {
        let input = table(&["id", "label", "text"], &[&["1", "'Hate'", "a"], &["2", "", "b"]]);
        let annotated = AnnotationTable::from_input(input, &columns()).unwrap();

        assert_eq!(annotated.as_table().headers(), ["id", "label", "text"]);
        assert_eq!(annotated.progress().annotated, 1);
        assert_eq!(annotated.row(1).source, "b");
    }

    #[test]
    fn previous_output_replaces_labels_by_id() {
        let input = table(
            &["id", "text", "label"],
            &[&["1", "a", "stale"], &["2", "b", ""], &["3", "c", "stale"]],
        );
        let previous = table(
            &["id", "text", "label"],
            &[&["2", "b", "'NotHate'"], &[" 1 ", "a", ""], &["9", "z", "'Hate'"]],
        );
        let mut annotated = AnnotationTable::from_input(input, &columns()).unwrap();
        let matched = annotated.resume_from(&previous, &columns()).unwrap();

        assert_eq!(matched, 2);
        let labels: Vec<_> = annotated.iter().map(|r| r.label).collect();
        assert_eq!(labels, ["", "'NotHate'", ""]);
        assert_eq!(annotated.progress().remaining, 2);
    }

    #[test]
    fn missing_columns_are_reported_per_table() {
        let err = AnnotationTable::from_input(table(&["id"], &[]), &columns()).unwrap_err();
        assert!(matches!(
            err,
            TableError::MissingColumn { table: TableRole::Input, ref column } if column.as_str() == "text"
        ));

        let mut annotated =
            AnnotationTable::from_input(table(&["id", "text"], &[&["1", "a"]]), &columns()).unwrap();
        let err = annotated
            .resume_from(&table(&["id", "text"], &[&["1", "a"]]), &columns())
            .unwrap_err();
        assert!(matches!(
            err,
            TableError::MissingColumn { table: TableRole::Output, ref column } if column.as_str() == "label"
        ));
    }

    #[test]
    fn duplicate_and_blank_ids_are_rejected() {
        let err = AnnotationTable::from_input(
            table(&["id", "text"], &[&["1", "a"], &["1 ", "b"]]),
            &columns(),
        )
        .unwrap_err();
        assert!(matches!(err, TableError::DuplicateRowId { table: TableRole::Input, .. }));

        let err = AnnotationTable::from_input(
            table(&["id", "text"], &[&["1", "a"], &["  ", "b"]]),
            &columns(),
        )
        .unwrap_err();
        assert!(matches!(err, TableError::EmptyRowId { row_number: 2, .. }));
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let err = Table::new(
            vec!["id".into(), "text".into()],
            vec![vec!["1".into(), "a".into()], vec!["2".into()]],
        )
        .unwrap_err();
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
    fn set_label_writes_the_label_cell() {
        let input = table(&["id", "text"], &[&["1", "a"]]);
        let mut annotated = AnnotationTable::from_input(input, &columns()).unwrap();
        annotated.set_label(0, Label::from_response("Not Hate"));

        assert_eq!(annotated.as_table().rows()[0], ["1", "a", "'NotHate'"]);
        assert_eq!(annotated.label_of(&RowId::new("1").unwrap()), Some("'NotHate'"));
    }
}
