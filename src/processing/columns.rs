//! Column projection, reordering and renaming.

use std::collections::{BTreeMap, HashSet};

use tracing::warn;

use crate::error::{CleaningError, CleaningResult};
use crate::types::{DataSet, Schema};

/// Returns a new [`DataSet`] holding exactly `columns`, in that order.
///
/// Columns of `dataset` that are not listed are dropped; they are logged at warn level so an
/// accidental omission is visible.
///
/// # Errors
///
/// [`CleaningError::SchemaError`] if a listed name is unknown or listed twice.
pub fn select_columns<S: AsRef<str>>(dataset: &DataSet, columns: &[S]) -> CleaningResult<DataSet> {
    let mut seen = HashSet::with_capacity(columns.len());
    let idxs = columns
        .iter()
        .map(|name| {
            let name = name.as_ref();
            if !seen.insert(name) {
                return Err(CleaningError::schema(format!(
                    "column '{name}' selected more than once"
                )));
            }
            dataset.schema.require(name)
        })
        .collect::<CleaningResult<Vec<usize>>>()?;

    let dropped: Vec<&str> = dataset
        .schema
        .field_names()
        .filter(|name| !seen.contains(*name))
        .collect();
    if !dropped.is_empty() {
        warn!(?dropped, "columns not selected are dropped");
    }

    let schema = Schema::new(
        idxs.iter()
            .map(|&i| dataset.schema.fields[i].clone())
            .collect(),
    );
    let rows = dataset
        .rows
        .iter()
        .map(|row| idxs.iter().map(|&i| row[i].clone()).collect())
        .collect();
    Ok(DataSet::new(schema, rows))
}

/// Returns a new [`DataSet`] with columns renamed according to `mapping` (old → new).
///
/// # Errors
///
/// [`CleaningError::SchemaError`] if an old name is unknown or the result would contain the
/// same name twice.
pub fn rename_columns(
    dataset: &DataSet,
    mapping: &BTreeMap<String, String>,
) -> CleaningResult<DataSet> {
    let mut schema = dataset.schema.clone();
    for (old, new) in mapping {
        let idx = dataset.schema.require(old)?;
        schema.fields[idx].name = new.clone();
    }

    let mut names = HashSet::with_capacity(schema.fields.len());
    if let Some(dup) = schema.field_names().find(|name| !names.insert(*name)) {
        return Err(CleaningError::schema(format!(
            "rename would produce duplicate column '{dup}'"
        )));
    }

    Ok(DataSet::new(schema, dataset.rows.clone()))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::{rename_columns, select_columns};
    use crate::types::{DataSet, DataType, Field, Schema, Value};

    fn sample_dataset() -> DataSet {
        let schema = Schema::new(vec![
            Field::new("fname", DataType::Utf8),
            Field::new("height(cm)", DataType::Float64),
            Field::new("sex", DataType::Utf8),
        ]);
        DataSet::new(
            schema,
            vec![
                vec![Value::Utf8("a".into()), Value::Float64(170.0), Value::Utf8("M".into())],
                vec![Value::Utf8("b".into()), Value::Null, Value::Utf8("F".into())],
            ],
        )
    }

    #[test]
    fn select_reorders_by_name() {
        let ds = sample_dataset();
        let out = select_columns(&ds, &["sex", "fname", "height(cm)"]).unwrap();
        assert_eq!(
            out.schema.field_names().collect::<Vec<_>>(),
            vec!["sex", "fname", "height(cm)"]
        );
        assert_eq!(
            out.rows[1],
            vec![Value::Utf8("F".into()), Value::Utf8("b".into()), Value::Null]
        );
    }

    #[test]
    fn select_drops_unlisted_columns() {
        let ds = sample_dataset();
        let out = select_columns(&ds, &["fname"]).unwrap();
        assert_eq!(out.schema.fields.len(), 1);
        assert_eq!(out.row_count(), 2);
    }

    #[test]
    fn select_rejects_unknown_and_duplicate_names() {
        let ds = sample_dataset();
        let err = select_columns(&ds, &["fname", "age"]).unwrap_err();
        assert!(err.to_string().contains("unknown column 'age'"));

        let err = select_columns(&ds, &["fname", "fname"]).unwrap_err();
        assert!(err.to_string().contains("selected more than once"));
    }

    #[test]
    fn rename_keeps_values_and_types() {
        let ds = sample_dataset();
        let mapping = BTreeMap::from([("height(cm)".to_string(), "height_cm".to_string())]);
        let out = rename_columns(&ds, &mapping).unwrap();
        assert_eq!(out.schema.index_of("height_cm"), Some(1));
        assert_eq!(out.schema.fields[1].data_type, DataType::Float64);
        assert_eq!(out.rows, ds.rows);
    }

    #[test]
    fn rename_rejects_collisions() {
        let ds = sample_dataset();
        let mapping = BTreeMap::from([("fname".to_string(), "sex".to_string())]);
        let err = rename_columns(&ds, &mapping).unwrap_err();
        assert!(err.to_string().contains("duplicate column 'sex'"));
    }
}
