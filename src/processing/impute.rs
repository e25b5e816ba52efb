//! Missing-value imputation.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::CleaningResult;
use crate::types::{DataSet, DataType, Value};

use super::reduce::column_mean;

/// How the fill value for a column is derived from its own non-null cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImputeStrategy {
    /// Arithmetic mean.
    #[default]
    Mean,
    /// Middle value (average of the two middle values for an even count).
    Median,
    /// Constant zero.
    Zero,
}

/// Replace every null in numeric `column` with a value derived by `strategy`.
///
/// The column becomes `Float64`. Returns the new dataset and the number of filled cells.
/// A column with no non-null cells has nothing to derive a fill value from; it is returned
/// unchanged and logged at warn level.
pub fn impute(
    dataset: &DataSet,
    column: &str,
    strategy: ImputeStrategy,
) -> CleaningResult<(DataSet, usize)> {
    let idx = dataset.schema.require_numeric(column)?;

    let fill = match strategy {
        ImputeStrategy::Mean => column_mean(dataset, column),
        ImputeStrategy::Median => column_median(dataset, idx),
        ImputeStrategy::Zero => Some(0.0),
    };
    let Some(fill) = fill else {
        warn!(column, "no non-null values to impute from; column left unchanged");
        return Ok((dataset.clone(), 0));
    };
    debug!(column, ?strategy, fill, "imputing nulls");

    let mut filled = 0;
    let out = dataset.map_column(idx, DataType::Float64, |_, cell| match cell.as_f64() {
        Some(v) => Value::Float64(v),
        None => {
            filled += 1;
            Value::Float64(fill)
        }
    });
    Ok((out, filled))
}

fn column_median(dataset: &DataSet, idx: usize) -> Option<f64> {
    let mut values: Vec<f64> = dataset.rows.iter().filter_map(|row| row[idx].as_f64()).collect();
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    Some(if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    })
}

#[cfg(test)]
mod tests {
    use super::{impute, ImputeStrategy};
    use crate::types::{DataSet, DataType, Field, Schema, Value};

    fn spend(values: &[Option<f64>]) -> DataSet {
        let schema = Schema::new(vec![Field::new("spend_A", DataType::Float64)]);
        DataSet::new(
            schema,
            values
                .iter()
                .map(|v| vec![v.map_or(Value::Null, Value::Float64)])
                .collect(),
        )
    }

    #[test]
    fn mean_fills_every_null() {
        let ds = spend(&[Some(10.0), None, Some(20.0), None, Some(60.0)]);
        let (out, filled) = impute(&ds, "spend_A", ImputeStrategy::Mean).unwrap();
        assert_eq!(filled, 2);
        assert_eq!(out.null_count("spend_A").unwrap(), 0);
        assert_eq!(out.rows[1][0], Value::Float64(30.0));
        assert_eq!(out.rows[3][0], Value::Float64(30.0));
        assert_eq!(out.rows[4][0], Value::Float64(60.0));
    }

    #[test]
    fn imputation_is_idempotent() {
        let ds = spend(&[Some(1.0), None, Some(4.5)]);
        let (once, _) = impute(&ds, "spend_A", ImputeStrategy::Mean).unwrap();
        let (twice, filled) = impute(&once, "spend_A", ImputeStrategy::Mean).unwrap();
        assert_eq!(filled, 0);
        assert_eq!(once, twice);
    }

    #[test]
    fn median_and_zero_strategies() {
        let ds = spend(&[Some(1.0), None, Some(9.0), Some(3.0), Some(4.0)]);
        let (out, _) = impute(&ds, "spend_A", ImputeStrategy::Median).unwrap();
        assert_eq!(out.rows[1][0], Value::Float64(3.5));

        let (out, _) = impute(&ds, "spend_A", ImputeStrategy::Zero).unwrap();
        assert_eq!(out.rows[1][0], Value::Float64(0.0));
    }

    #[test]
    fn all_null_column_is_left_unchanged() {
        let ds = spend(&[None, None]);
        let (out, filled) = impute(&ds, "spend_A", ImputeStrategy::Mean).unwrap();
        assert_eq!(filled, 0);
        assert_eq!(out, ds);
    }

    #[test]
    fn integer_column_becomes_float() {
        let schema = Schema::new(vec![Field::new("n", DataType::Int64)]);
        let ds = DataSet::new(
            schema,
            vec![vec![Value::Int64(1)], vec![Value::Null], vec![Value::Int64(2)]],
        );
        let (out, _) = impute(&ds, "n", ImputeStrategy::Mean).unwrap();
        assert_eq!(out.schema.fields[0].data_type, DataType::Float64);
        assert_eq!(
            out.rows,
            vec![vec![Value::Float64(1.0)], vec![Value::Float64(1.5)], vec![Value::Float64(2.0)]]
        );
    }
}
