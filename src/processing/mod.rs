//! Table cleaning steps.
//!
//! Every step is a pure function over a [`crate::types::DataSet`]: it borrows its input and
//! returns a new table, addressing columns by name only. Steps can be used on their own or
//! chained through [`crate::pipeline::Pipeline`].
//!
//! - [`coerce_numeric()`]: lenient text → number conversion (unparseable cells become null)
//! - [`split_column()`]: `<left>_<right>` compound column → two columns
//! - [`select_columns()`] / [`rename_columns()`]: projection, reordering, renaming
//! - [`drop_duplicates()`]: remove repeated rows, keeping the first
//! - [`replace_value()`]: exact-value substitution of known bad entries
//! - [`impute()`]: fill nulls from the column's own values
//! - [`check_invariants()`]: structured post-condition report
//! - [`melt()`]: wide → long reshape
//! - [`reduce()`] / [`describe()`]: column statistics
//!
//! ## Example: clean one column
//!
//! ```rust
//! use tidy_contacts::processing::{
//!     coerce_numeric, impute, replace_value, ImputeStrategy, Replacement,
//! };
//! use tidy_contacts::types::{DataSet, DataType, Field, Schema, Value};
//!
//! let schema = Schema::new(vec![Field::new("weight_kg", DataType::Utf8)]);
//! let ds = DataSet::new(
//!     schema,
//!     vec![
//!         vec![Value::Utf8("-60".into())],
//!         vec![Value::Utf8("xx".into())],
//!         vec![Value::Utf8("70".into())],
//!     ],
//! );
//!
//! let (ds, stats) = coerce_numeric(&ds, "weight_kg")?;
//! assert_eq!(stats.nullified, 1);
//! let (ds, _) = replace_value(&ds, "weight_kg", -60.0, Replacement::Value(60.0))?;
//! let (ds, filled) = impute(&ds, "weight_kg", ImputeStrategy::Mean)?;
//! assert_eq!(filled, 1);
//! assert_eq!(ds.rows[1][0], Value::Float64(65.0));
//! # Ok::<(), tidy_contacts::CleaningError>(())
//! ```

pub mod coerce;
pub mod columns;
pub mod dedupe;
pub mod impute;
pub mod melt;
pub mod profile;
pub mod reduce;
pub mod replace;
pub mod split;
pub mod validate;

pub use coerce::{coerce_numeric, CoercionStats};
pub use columns::{rename_columns, select_columns};
pub use dedupe::drop_duplicates;
pub use impute::{impute, ImputeStrategy};
pub use melt::{melt, MeltSpec};
pub use profile::{describe, ColumnSummary};
pub use reduce::{reduce, ReduceOp};
pub use replace::{replace_value, Replacement};
pub use split::split_column;
pub use validate::{
    check_invariants, Bounds, ValidationReport, ValidationRules, Violation, ViolationKind,
};
