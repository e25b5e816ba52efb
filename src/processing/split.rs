//! Splitting a compound `<left><sep><right>` column into two columns.

use crate::error::{CleaningError, CleaningResult};
use crate::types::{DataSet, DataType, Field, Schema, Value};

/// Replace `column` by two text columns holding the parts on either side of `separator`.
///
/// The new columns are appended to the end of the schema, in `[left, right]` order, and the
/// source column is removed. A null source cell yields nulls in both outputs.
///
/// # Errors
///
/// - [`CleaningError::SchemaError`] if `column` is unknown, is not text, or an output name is
///   already taken by another column.
/// - [`CleaningError::FormatError`] if any value does not contain exactly one `separator`.
pub fn split_column(
    dataset: &DataSet,
    column: &str,
    separator: &str,
    into: [&str; 2],
) -> CleaningResult<DataSet> {
    let idx = dataset.schema.require(column)?;
    if dataset.schema.fields[idx].data_type != DataType::Utf8 {
        return Err(CleaningError::schema(format!(
            "cannot split non-text column '{column}'"
        )));
    }
    if separator.is_empty() {
        return Err(CleaningError::schema("split separator must not be empty"));
    }
    if into[0] == into[1] {
        return Err(CleaningError::schema(format!(
            "split outputs must differ, got '{}' twice",
            into[0]
        )));
    }
    for name in into {
        if name != column && dataset.schema.index_of(name).is_some() {
            return Err(CleaningError::schema(format!(
                "split output column '{name}' already exists"
            )));
        }
    }

    let mut fields: Vec<Field> = dataset.schema.fields.clone();
    fields.remove(idx);
    fields.extend(into.iter().map(|name| Field::new(*name, DataType::Utf8)));

    let rows = dataset
        .rows
        .iter()
        .enumerate()
        .map(|(row_idx, row)| {
            let (left, right) = split_cell(&row[idx], separator).map_err(|message| {
                CleaningError::FormatError {
                    row: row_idx,
                    column: column.to_owned(),
                    value: row[idx].to_string(),
                    message,
                }
            })?;
            let mut out = row.clone();
            out.remove(idx);
            out.push(left);
            out.push(right);
            Ok(out)
        })
        .collect::<CleaningResult<Vec<_>>>()?;

    Ok(DataSet::new(Schema::new(fields), rows))
}

fn split_cell(cell: &Value, separator: &str) -> Result<(Value, Value), String> {
    let raw = match cell {
        Value::Null => return Ok((Value::Null, Value::Null)),
        Value::Utf8(s) => s,
        other => return Err(format!("expected text, found {other:?}")),
    };
    let mut parts = raw.split(separator);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(left), Some(right), None) => Ok((
            Value::Utf8(left.to_owned()),
            Value::Utf8(right.to_owned()),
        )),
        (_, None, _) => Err(format!("separator '{separator}' not found")),
        _ => Err(format!("separator '{separator}' occurs more than once")),
    }
}
