//! Newtype domain identifiers.
//!
//! Every name the annotator joins or routes on is a distinct newtype wrapping a
//! primitive. This prevents accidentally passing — for example — a
//! [`ColumnName`] where a [`RowId`] is expected even though both are strings
//! under the hood.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Macro for String-wrapped newtypes.
// Generates: struct, new() returning Option<Self>, as_str(), Display.
// ---------------------------------------------------------------------------
macro_rules! string_id {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier, returning `None` if the value is empty.
            pub fn new(value: impl Into<String>) -> Option<Self> {
                let v = value.into();
                if v.is_empty() { None } else { Some(Self(v)) }
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

string_id! {
    /// Identifies one row of the input table.
    ///
    /// Taken from the `id` column with surrounding whitespace removed. It is the
    /// join key between the input table and a previously written output table,
    /// so it must be unique and stable across runs.
    RowId
}

string_id! {
    /// A column header in a tabular file (e.g. `"id"`, `"Input.text"`).
    ColumnName
}

string_id! {
    /// Identifies a generative model at the provider (e.g. `"gemini-2.0-flash"`).
    ModelId
}

// ---------------------------------------------------------------------------

/// Identifies a single annotation run (one process invocation).
///
/// Generated fresh at start-up and attached to the `annotate` span so every
/// log line of a run can be correlated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(Uuid);

impl RunId {
    /// Generates a new random run identifier.
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying [`Uuid`].
    pub fn as_uuid(self) -> Uuid {
        self.0
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
