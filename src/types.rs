//! Core data model types.
//!
//! A table is an in-memory [`DataSet`]: a [`Schema`] (ordered list of typed [`Field`]s) plus
//! row-major [`Value`] storage. Cell `i` of every column belongs to row `i`; every cleaning step
//! preserves that alignment.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CleaningError, CleaningResult};

/// Logical data type for a schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    /// 64-bit signed integer.
    Int64,
    /// 64-bit floating point number.
    Float64,
    /// Boolean.
    Bool,
    /// UTF-8 string.
    Utf8,
}

impl DataType {
    /// `true` for [`DataType::Int64`] and [`DataType::Float64`].
    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Int64 | Self::Float64)
    }
}

/// A single named, typed field in a [`Schema`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Field/column name.
    pub name: String,
    /// Field data type.
    pub data_type: DataType,
}

impl Field {
    /// Create a new field.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

/// A list of fields describing the shape of a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    /// Ordered list of fields.
    pub fields: Vec<Field>,
}

impl Schema {
    /// Create a new schema from fields.
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// Iterate field names in order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Returns the index of a field by name, if present.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Like [`Self::index_of`], but an unknown name is a [`CleaningError::SchemaError`].
    pub fn require(&self, name: &str) -> CleaningResult<usize> {
        self.index_of(name).ok_or_else(|| {
            CleaningError::schema(format!(
                "unknown column '{name}'. columns={:?}",
                self.field_names().collect::<Vec<_>>()
            ))
        })
    }

    /// Index of a column that must have a numeric declared type.
    pub fn require_numeric(&self, name: &str) -> CleaningResult<usize> {
        let idx = self.require(name)?;
        let data_type = self.fields[idx].data_type;
        if !data_type.is_numeric() {
            return Err(CleaningError::schema(format!(
                "column '{name}' must be numeric, found {data_type:?}"
            )));
        }
        Ok(idx)
    }
}

/// A single typed value in a [`DataSet`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Missing marker.
    Null,
    /// 64-bit signed integer.
    Int64(i64),
    /// 64-bit float.
    Float64(f64),
    /// Boolean.
    Bool(bool),
    /// UTF-8 string.
    Utf8(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Numeric view of the value; `None` for nulls and non-numeric values.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int64(v) => Some(*v as f64),
            Self::Float64(v) => Some(*v),
            _ => None,
        }
    }

    /// Whether the value is representable under `data_type` (nulls always are).
    pub fn conforms_to(&self, data_type: DataType) -> bool {
        matches!(
            (self, data_type),
            (Self::Null, _)
                | (Self::Int64(_), DataType::Int64)
                | (Self::Float64(_), DataType::Float64)
                | (Self::Bool(_), DataType::Bool)
                | (Self::Utf8(_), DataType::Utf8)
        )
    }
}

/// Text form used for export; `Null` renders as the empty string.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Int64(v) => write!(f, "{v}"),
            Self::Float64(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Utf8(s) => f.write_str(s),
        }
    }
}

/// In-memory tabular dataset.
///
/// Rows are stored as `Vec<Vec<Value>>` in the same order as the [`Schema`] fields.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSet {
    /// Schema describing row shape.
    pub schema: Schema,
    /// Row-major value storage.
    pub rows: Vec<Vec<Value>>,
}

impl DataSet {
    /// Create a dataset from schema and rows.
    pub fn new(schema: Schema, rows: Vec<Vec<Value>>) -> Self {
        Self { schema, rows }
    }

    /// Number of rows in the dataset.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Borrow every cell of the named column, in row order.
    pub fn column(&self, name: &str) -> CleaningResult<Vec<&Value>> {
        let idx = self.schema.require(name)?;
        Ok(self.rows.iter().map(|row| &row[idx]).collect())
    }

    /// Number of null cells in the named column.
    pub fn null_count(&self, name: &str) -> CleaningResult<usize> {
        Ok(self.column(name)?.into_iter().filter(|v| v.is_null()).count())
    }

    /// Create a new dataset by applying `mapper` to the cell at `idx` of every row.
    ///
    /// `mapper` receives the zero-based row index. The returned dataset carries `data_type` for
    /// the rewritten column; every other column is untouched.
    pub(crate) fn map_column<F>(&self, idx: usize, data_type: DataType, mut mapper: F) -> Self
    where
        F: FnMut(usize, &Value) -> Value,
    {
        let mut schema = self.schema.clone();
        schema.fields[idx].data_type = data_type;
        let rows = self
            .rows
            .iter()
            .enumerate()
            .map(|(row_idx, row)| {
                let mut out = row.clone();
                out[idx] = mapper(row_idx, &row[idx]);
                out
            })
            .collect();
        Self { schema, rows }
    }

    /// Reduce (fold) all rows into an accumulator value.
    ///
    /// This is similar to `Iterator::fold`, but provides each row as `&[Value]`.
    pub fn reduce_rows<A, F>(&self, init: A, mut reducer: F) -> A
    where
        F: FnMut(A, &[Value]) -> A,
    {
        self.rows
            .iter()
            .fold(init, |acc, row| reducer(acc, row.as_slice()))
    }
}
