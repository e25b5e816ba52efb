//! Per-column summaries for inspecting a table between cleaning steps.

use serde::Serialize;

use crate::types::{DataSet, DataType};

use super::reduce::{reduce, ReduceOp};

/// Summary of one column. Numeric statistics are `None` for non-numeric or all-null columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub name: String,
    pub data_type: DataType,
    pub non_null: usize,
    pub nulls: usize,
    pub mean: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// Summarize every column of `dataset`, in schema order.
pub fn describe(dataset: &DataSet) -> Vec<ColumnSummary> {
    dataset
        .schema
        .fields
        .iter()
        .enumerate()
        .map(|(idx, field)| {
            let nulls = dataset
                .reduce_rows(0usize, |n, row| n + usize::from(row[idx].is_null()));
            let stat = |op| {
                if field.data_type.is_numeric() {
                    reduce(dataset, &field.name, op).and_then(|v| v.as_f64())
                } else {
                    None
                }
            };
            ColumnSummary {
                name: field.name.clone(),
                data_type: field.data_type,
                non_null: dataset.row_count() - nulls,
                nulls,
                mean: stat(ReduceOp::Mean),
                min: stat(ReduceOp::Min),
                max: stat(ReduceOp::Max),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::describe;
    use crate::types::{DataSet, DataType, Field, Schema, Value};

    #[test]
    fn describe_counts_nulls_and_numeric_stats() {
        let schema = Schema::new(vec![
            Field::new("fname", DataType::Utf8),
            Field::new("weight_kg", DataType::Float64),
        ]);
        let ds = DataSet::new(
            schema,
            vec![
                vec![Value::Utf8("a".into()), Value::Float64(50.0)],
                vec![Value::Null, Value::Null],
                vec![Value::Utf8("c".into()), Value::Float64(70.0)],
            ],
        );

        let summary = describe(&ds);
        assert_eq!(summary.len(), 2);

        assert_eq!(summary[0].name, "fname");
        assert_eq!(summary[0].nulls, 1);
        assert_eq!(summary[0].mean, None);

        assert_eq!(summary[1].non_null, 2);
        assert_eq!(summary[1].mean, Some(60.0));
        assert_eq!(summary[1].min, Some(50.0));
        assert_eq!(summary[1].max, Some(70.0));
    }
}
