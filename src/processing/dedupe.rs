//! Duplicate row removal.

use std::collections::BTreeSet;

use tracing::debug;

use crate::error::{CleaningError, CleaningResult};
use crate::types::DataSet;

/// Drop rows that repeat an earlier row, keeping the first occurrence.
///
/// Rows are compared on the `subset` columns, or on every column when `subset` is `None`. Cells
/// compare by type and value, so text `"1"` and the integer `1` differ, and two nulls are equal.
/// Returns the new table and the number of rows removed.
///
/// # Errors
///
/// [`CleaningError::SchemaError`] if `subset` is empty or names an unknown column.
pub fn drop_duplicates<S: AsRef<str>>(
    dataset: &DataSet,
    subset: Option<&[S]>,
) -> CleaningResult<(DataSet, usize)> {
    let key_idxs = match subset {
        None => (0..dataset.schema.fields.len()).collect(),
        Some([]) => {
            return Err(CleaningError::schema(
                "drop_duplicates subset must name at least one column",
            ));
        }
        Some(names) => names
            .iter()
            .map(|name| dataset.schema.require(name.as_ref()))
            .collect::<CleaningResult<Vec<usize>>>()?,
    };

    let mut seen = BTreeSet::new();
    let mut rows = Vec::with_capacity(dataset.row_count());
    for (row_idx, row) in dataset.rows.iter().enumerate() {
        let key: Vec<String> = key_idxs.iter().map(|&i| format!("{:?}", row[i])).collect();
        if seen.insert(key) {
            rows.push(row.clone());
        } else {
            debug!(row = row_idx, "duplicate row dropped");
        }
    }

    let removed = dataset.row_count() - rows.len();
    Ok((DataSet::new(dataset.schema.clone(), rows), removed))
}
