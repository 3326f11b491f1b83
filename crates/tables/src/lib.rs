//! CSV table store.
//!
//! Implements the [`annotation::TableStore`] trait for comma-separated files
//! with a header row.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** File access, CSV quoting, and atomic replacement live
//! here. The [`annotation`] crate sees only [`annotation::Table`].
//!
//! ## Durability
//!
//! [`CsvTableStore::save`] writes to a hidden temporary file next to the
//! target, flushes it to disk, and renames it over the target. Readers and
//! crashes observe either the previous table or the new one.

mod csv_store;

pub use csv_store::CsvTableStore;
