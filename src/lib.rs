//! `tidy-contacts` cleans a small, messy contact-list table and reshapes it into tidy long form.
//!
//! The table is an in-memory [`types::DataSet`] loaded with a user-provided [`types::Schema`]
//! (see [`ingestion::ingest_csv_from_path`]). Cleaning is a sequence of pure steps, each taking
//! a table and returning a new one:
//!
//! 1. lenient numeric coercion (`"xx"` → null)
//! 2. splitting the compound `age_sex` column into `age` and `sex`
//! 3. reordering/projecting columns by name
//! 4. exact-value correction of known data-entry errors (`-60` → `60`, `0.0` → column mean)
//! 5. mean imputation of the remaining nulls
//! 6. an invariant check (no nulls, no negatives, plausible ranges) returning a structured report
//! 7. a wide-to-long reshape of the spend columns
//!
//! The steps are described by a serializable [`pipeline::CleaningPlan`] and run by
//! [`pipeline::Pipeline`]; [`contacts::reference_plan`] is the plan for the reference dataset.
//!
//! ## Quick example
//!
//! ```no_run
//! use tidy_contacts::contacts::{raw_schema, reference_plan};
//! use tidy_contacts::ingestion::ingest_csv_from_path;
//! use tidy_contacts::pipeline::Pipeline;
//!
//! # fn main() -> Result<(), tidy_contacts::CleaningError> {
//! let raw = ingest_csv_from_path("friends.csv", &raw_schema())?;
//! let out = Pipeline::new(reference_plan()).run(raw)?;
//! println!("rows={}", out.table.row_count()); // 30 for the 10-row reference list
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`types`]: schema + in-memory dataset types
//! - [`ingestion`]: schema-first CSV loading
//! - [`processing`]: the individual cleaning steps and column statistics
//! - [`pipeline`]: plans, the runner, and observer hooks
//! - [`contacts`]: reference schema and plan
//! - [`export`]: CSV output
//! - [`error`]: the error taxonomy

pub mod contacts;
pub mod error;
pub mod export;
pub mod ingestion;
pub mod pipeline;
pub mod processing;
pub mod types;

pub use error::{CleaningError, CleaningResult};
