//! Loading delimited text into a [`crate::types::DataSet`].
//!
//! Loading is schema-first: the caller declares every column it expects and its type. See
//! [`crate::contacts::raw_schema`] for the reference contact list.

pub mod csv;

pub use self::csv::{ingest_csv_from_path, ingest_csv_from_reader};
