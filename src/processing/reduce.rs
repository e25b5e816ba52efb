//! Column reductions for [`crate::types::DataSet`].

use crate::types::{DataSet, DataType, Value};

/// Built-in reduction operations over a single column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReduceOp {
    /// Count all rows (including nulls).
    Count,
    /// Sum numeric values, ignoring nulls and non-finite floats.
    Sum,
    /// Minimum numeric value, ignoring nulls.
    Min,
    /// Maximum numeric value, ignoring nulls.
    Max,
    /// Arithmetic mean of numeric values, ignoring nulls. Always `Float64`.
    Mean,
}

/// Reduce a column using a built-in [`ReduceOp`].
///
/// - Returns `None` if `column` does not exist in the schema.
/// - For `Sum`/`Min`/`Max`/`Mean`, returns `Some(Value::Null)` if there are no non-null numeric
///   values (this includes every non-numeric column).
/// - For `Count`, always returns `Some(Value::Int64(row_count))`.
pub fn reduce(dataset: &DataSet, column: &str, op: ReduceOp) -> Option<Value> {
    let idx = dataset.schema.index_of(column)?;
    let data_type = dataset.schema.fields[idx].data_type;

    if op == ReduceOp::Count {
        return Some(Value::Int64(dataset.row_count() as i64));
    }

    let (acc, n) = dataset.reduce_rows((None::<f64>, 0usize), |(acc, n), row| {
        match row
            .get(idx)
            .and_then(Value::as_f64)
            .filter(|v| v.is_finite())
        {
            None => (acc, n),
            Some(v) => {
                let next = match (op, acc) {
                    (ReduceOp::Sum | ReduceOp::Mean, Some(a)) => a + v,
                    (ReduceOp::Min, Some(a)) => a.min(v),
                    (ReduceOp::Max, Some(a)) => a.max(v),
                    (_, _) => v,
                };
                (Some(next), n + 1)
            }
        }
    });

    let Some(acc) = acc else {
        return Some(Value::Null);
    };
    Some(match (op, data_type) {
        (ReduceOp::Mean, _) => Value::Float64(acc / n as f64),
        (_, DataType::Int64) => Value::Int64(acc as i64),
        _ => Value::Float64(acc),
    })
}

/// Mean of the non-null cells of `column`, or `None` when there are none.
pub(crate) fn column_mean(dataset: &DataSet, column: &str) -> Option<f64> {
    reduce(dataset, column, ReduceOp::Mean).and_then(|v| v.as_f64())
}
