//! CSV loading.

use std::path::Path;

use tracing::debug;

use crate::error::{CleaningError, CleaningResult};
use crate::types::{DataSet, DataType, Schema, Value};

/// Load a CSV file into an in-memory [`DataSet`].
///
/// Rules:
///
/// - CSV must have headers.
/// - Headers must contain all schema fields (order can differ); extra headers are ignored.
/// - Empty cells become [`Value::Null`].
/// - Float cells that parse to a non-finite number (`NaN`, `inf`) are missing values and also
///   become [`Value::Null`].
/// - Every other value is parsed strictly according to the schema field type. Columns that may
///   hold sentinel text (such as `"xx"`) should be declared [`DataType::Utf8`] and converted later
///   with [`crate::processing::coerce_numeric`].
pub fn ingest_csv_from_path(path: impl AsRef<Path>, schema: &Schema) -> CleaningResult<DataSet> {
    let path = path.as_ref();
    debug!(path = %path.display(), "loading csv");
    let mut rdr = csv::ReaderBuilder::new().has_headers(true).from_path(path)?;
    ingest_csv_from_reader(&mut rdr, schema)
}

/// Load CSV data from an existing CSV reader.
pub fn ingest_csv_from_reader<R: std::io::Read>(
    rdr: &mut csv::Reader<R>,
    schema: &Schema,
) -> CleaningResult<DataSet> {
    let headers = rdr.headers()?.clone();

    // Schema field -> CSV column index, so the file's column order does not matter.
    let col_idxs = schema
        .fields
        .iter()
        .map(|field| {
            headers
                .iter()
                .position(|h| h.trim() == field.name)
                .ok_or_else(|| {
                    CleaningError::schema(format!(
                        "missing required column '{}'. headers={:?}",
                        field.name,
                        headers.iter().collect::<Vec<_>>()
                    ))
                })
        })
        .collect::<CleaningResult<Vec<usize>>>()?;

    let mut rows: Vec<Vec<Value>> = Vec::new();
    for (row_idx0, result) in rdr.records().enumerate() {
        // 1-based for users, and the header is line 1.
        let user_row = row_idx0 + 2;
        let record = result?;

        let row = schema
            .fields
            .iter()
            .zip(&col_idxs)
            .map(|(field, &csv_idx)| {
                let raw = record.get(csv_idx).unwrap_or("");
                parse_typed_value(user_row, &field.name, field.data_type, raw)
            })
            .collect::<CleaningResult<Vec<Value>>>()?;
        rows.push(row);
    }

    debug!(rows = rows.len(), columns = schema.fields.len(), "csv loaded");
    Ok(DataSet::new(schema.clone(), rows))
}

fn parse_typed_value(
    row: usize,
    column: &str,
    data_type: DataType,
    raw: &str,
) -> CleaningResult<Value> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Value::Null);
    }

    let parse_error = |message: String| CleaningError::ParseError {
        row,
        column: column.to_owned(),
        raw: raw.to_owned(),
        message,
    };

    match data_type {
        DataType::Utf8 => Ok(Value::Utf8(trimmed.to_owned())),
        DataType::Int64 => trimmed
            .parse::<i64>()
            .map(Value::Int64)
            .map_err(|e| parse_error(e.to_string())),
        DataType::Float64 => match trimmed.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(Value::Float64(v)),
            Ok(_) => {
                debug!(row, column, raw, "non-finite float loaded as null");
                Ok(Value::Null)
            }
            Err(e) => Err(parse_error(e.to_string())),
        },
        DataType::Bool => parse_bool(trimmed).map(Value::Bool).map_err(parse_error),
    }
}

fn parse_bool(s: &str) -> Result<bool, String> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "t" | "1" | "yes" | "y" => Ok(true),
        "false" | "f" | "0" | "no" | "n" => Ok(false),
        _ => Err("expected bool (true/false/1/0/yes/no)".to_string()),
    }
}
