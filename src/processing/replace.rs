//! Exact-value substitution for known data-entry errors.

use serde::{Deserialize, Serialize};

use crate::error::CleaningResult;
use crate::types::{DataSet, DataType, Value};

use super::reduce::column_mean;

/// What a matched cell is replaced with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Replacement {
    /// A fixed number.
    Value(f64),
    /// Mean of the column's non-null cells, taken just before the substitution (the sentinel
    /// cells themselves included).
    ColumnMean,
}

/// Replace every cell of numeric `column` exactly equal to `from` with `to`.
///
/// Returns the new dataset and the number of replaced cells. Cells that are not equal to
/// `from` (including nulls) are never touched. If an integer column would receive a
/// fractional replacement it is widened to `Float64`.
pub fn replace_value(
    dataset: &DataSet,
    column: &str,
    from: f64,
    to: Replacement,
) -> CleaningResult<(DataSet, usize)> {
    let idx = dataset.schema.require_numeric(column)?;

    let to = match to {
        Replacement::Value(v) => v,
        Replacement::ColumnMean => match column_mean(dataset, column) {
            Some(mean) => mean,
            // No non-null cells means nothing can match.
            None => return Ok((dataset.clone(), 0)),
        },
    };

    let data_type = match dataset.schema.fields[idx].data_type {
        DataType::Int64 if to.fract() == 0.0 => DataType::Int64,
        _ => DataType::Float64,
    };

    let mut replaced = 0;
    let out = dataset.map_column(idx, data_type, |_, cell| {
        let hit = cell.as_f64() == Some(from);
        if hit {
            replaced += 1;
        }
        match (hit, data_type) {
            (true, DataType::Int64) => Value::Int64(to as i64),
            (true, _) => Value::Float64(to),
            (false, DataType::Float64) => {
                cell.as_f64().map_or_else(|| cell.clone(), Value::Float64)
            }
            (false, _) => cell.clone(),
        }
    });

    Ok((out, replaced))
}
