//! Lenient numeric coercion.

use tracing::debug;

use crate::error::{CleaningError, CleaningResult};
use crate::types::{DataSet, DataType, Value};

/// Outcome of a [`coerce_numeric`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CoercionStats {
    /// Cells that held a number (textual or already numeric).
    pub converted: usize,
    /// Non-empty cells that did not parse and were replaced by [`Value::Null`].
    pub nullified: usize,
}

/// Convert every cell of `column` to [`Value::Float64`].
///
/// Coercion is total: any cell whose text is not a finite number (the contact list uses `"xx"`)
/// becomes [`Value::Null`] instead of failing. Existing nulls stay null. The column's declared
/// type becomes [`DataType::Float64`].
///
/// Fails only when `column` is unknown or is a `Bool` column.
pub fn coerce_numeric(dataset: &DataSet, column: &str) -> CleaningResult<(DataSet, CoercionStats)> {
    let idx = dataset.schema.require(column)?;
    if dataset.schema.fields[idx].data_type == DataType::Bool {
        return Err(CleaningError::schema(format!(
            "cannot coerce bool column '{column}' to a number"
        )));
    }

    let mut stats = CoercionStats::default();
    let out = dataset.map_column(idx, DataType::Float64, |row, cell| {
        let parsed = match cell {
            Value::Null => return Value::Null,
            Value::Int64(v) => Some(*v as f64),
            Value::Float64(v) => Some(*v).filter(|v| v.is_finite()),
            Value::Utf8(raw) => parse_finite(raw),
            Value::Bool(_) => None,
        };
        match parsed {
            Some(v) => {
                stats.converted += 1;
                Value::Float64(v)
            }
            None => {
                stats.nullified += 1;
                debug!(column, row, raw = %cell, "unparseable cell replaced with null");
                Value::Null
            }
        }
    });

    Ok((out, stats))
}

fn parse_finite(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}
