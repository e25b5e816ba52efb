//! Wide-to-long reshaping.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{CleaningError, CleaningResult};
use crate::types::{DataSet, DataType, Field, Schema, Value};

/// Column layout for [`melt`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeltSpec {
    /// Columns copied unchanged onto every output row.
    pub id_vars: Vec<String>,
    /// Numeric columns folded into `(var_name, value_name)` pairs.
    pub value_vars: Vec<String>,
    /// Name of the output column holding the source column name.
    pub var_name: String,
    /// Name of the output column holding the amount.
    pub value_name: String,
}

/// Reshape `dataset` from wide to long form.
///
/// Output rows are grouped by value column: every input row for `value_vars[0]`, then every
/// input row for `value_vars[1]`, and so on, giving `rows * value_vars.len()` rows. The value
/// column is `Int64` when all value columns are `Int64`, otherwise `Float64`.
///
/// # Errors
///
/// [`CleaningError::SchemaError`] if a column is unknown, a value column is not numeric, a
/// name is used twice, or an output name collides with an id column.
pub fn melt(dataset: &DataSet, spec: &MeltSpec) -> CleaningResult<DataSet> {
    let mut names = HashSet::new();
    let taken = spec
        .id_vars
        .iter()
        .chain(&spec.value_vars)
        .chain([&spec.var_name, &spec.value_name]);
    for name in taken {
        if !names.insert(name.as_str()) {
            return Err(CleaningError::schema(format!(
                "column '{name}' used more than once in melt"
            )));
        }
    }
    if spec.value_vars.is_empty() {
        return Err(CleaningError::schema("melt requires at least one value column"));
    }

    let id_idxs = spec
        .id_vars
        .iter()
        .map(|name| dataset.schema.require(name))
        .collect::<CleaningResult<Vec<_>>>()?;
    let value_idxs = spec
        .value_vars
        .iter()
        .map(|name| dataset.schema.require_numeric(name))
        .collect::<CleaningResult<Vec<_>>>()?;

    let value_type = if value_idxs
        .iter()
        .all(|&i| dataset.schema.fields[i].data_type == DataType::Int64)
    {
        DataType::Int64
    } else {
        DataType::Float64
    };

    let mut fields: Vec<Field> = id_idxs
        .iter()
        .map(|&i| dataset.schema.fields[i].clone())
        .collect();
    fields.push(Field::new(spec.var_name.clone(), DataType::Utf8));
    fields.push(Field::new(spec.value_name.clone(), value_type));

    let mut rows = Vec::with_capacity(dataset.row_count() * value_idxs.len());
    for (name, &value_idx) in spec.value_vars.iter().zip(&value_idxs) {
        for row in &dataset.rows {
            let mut out: Vec<Value> = id_idxs.iter().map(|&i| row[i].clone()).collect();
            out.push(Value::Utf8(name.clone()));
            out.push(match (&row[value_idx], value_type) {
                (Value::Int64(v), DataType::Float64) => Value::Float64(*v as f64),
                (other, _) => other.clone(),
            });
            rows.push(out);
        }
    }

    Ok(DataSet::new(Schema::new(fields), rows))
}
