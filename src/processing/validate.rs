//! Post-cleaning invariant checks.
//!
//! [`check_invariants`] never panics or aborts on bad data: it returns a [`ValidationReport`]
//! listing every violating cell, and the caller decides what to do with it. The pipeline turns
//! a failing report into [`CleaningError::InvariantViolation`] via
//! [`ValidationReport::into_result`].

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CleaningError, CleaningResult};
use crate::types::{DataSet, Value};

/// Inclusive numeric bounds for one column. A missing side is unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

impl Bounds {
    pub fn new(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    fn contains(&self, v: f64) -> bool {
        self.min.is_none_or(|min| v >= min) && self.max.is_none_or(|max| v <= max)
    }
}

/// Which invariants [`check_invariants`] enforces.
///
/// Missing values are always checked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationRules {
    /// Reject negative numbers in every numeric column.
    #[serde(default = "default_true")]
    pub non_negative: bool,
    /// Per-column plausibility bounds.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub bounds: BTreeMap<String, Bounds>,
}

fn default_true() -> bool {
    true
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            non_negative: true,
            bounds: BTreeMap::new(),
        }
    }
}

/// Why a cell failed validation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ViolationKind {
    /// The cell is [`Value::Null`].
    Missing,
    /// The float cell is `NaN` or infinite.
    NonFinite { value: f64 },
    /// The numeric cell is below zero.
    Negative { value: f64 },
    /// The numeric cell lies outside the configured [`Bounds`].
    OutOfRange { value: f64, bounds: Bounds },
    /// The cell's representation differs from the column's declared type.
    TypeMismatch { found: String },
}

/// One violating cell. `row` is zero-based.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    pub column: String,
    pub row: usize,
    #[serde(flatten)]
    pub kind: ViolationKind,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "column '{}' row {}: ", self.column, self.row)?;
        match &self.kind {
            ViolationKind::Missing => f.write_str("missing value"),
            ViolationKind::NonFinite { value } => write!(f, "non-finite value {value}"),
            ViolationKind::Negative { value } => write!(f, "negative value {value}"),
            ViolationKind::OutOfRange { value, bounds } => write!(
                f,
                "value {value} outside [{}, {}]",
                bounds.min.map_or("-inf".to_string(), |v| v.to_string()),
                bounds.max.map_or("inf".to_string(), |v| v.to_string()),
            ),
            ViolationKind::TypeMismatch { found } => write!(f, "unexpected {found} cell"),
        }
    }
}

/// Result of [`check_invariants`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationReport {
    /// Violations in column order, then row order.
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    pub fn is_ok(&self) -> bool {
        self.violations.is_empty()
    }

    /// `Ok(())` if no invariant is violated, otherwise [`CleaningError::InvariantViolation`].
    pub fn into_result(self) -> CleaningResult<()> {
        if self.is_ok() {
            Ok(())
        } else {
            Err(CleaningError::InvariantViolation {
                violations: self.violations,
            })
        }
    }
}

/// Check that no cell is missing, and that numeric columns hold only finite, non-negative,
/// in-bounds values of their declared type.
///
/// # Errors
///
/// [`CleaningError::SchemaError`] if `rules` names bounds for an unknown or non-numeric column.
pub fn check_invariants(
    dataset: &DataSet,
    rules: &ValidationRules,
) -> CleaningResult<ValidationReport> {
    for column in rules.bounds.keys() {
        dataset.schema.require_numeric(column)?;
    }

    let mut violations = Vec::new();
    for (idx, field) in dataset.schema.fields.iter().enumerate() {
        let numeric = field.data_type.is_numeric();
        let bounds = rules.bounds.get(&field.name);

        for (row, cells) in dataset.rows.iter().enumerate() {
            let cell = &cells[idx];
            let kind = if cell.is_null() {
                Some(ViolationKind::Missing)
            } else if !cell.conforms_to(field.data_type) {
                Some(ViolationKind::TypeMismatch {
                    found: type_name(cell).to_string(),
                })
            } else if !numeric {
                None
            } else {
                let value = cell.as_f64().unwrap_or_default();
                if !value.is_finite() {
                    Some(ViolationKind::NonFinite { value })
                } else if rules.non_negative && value < 0.0 {
                    Some(ViolationKind::Negative { value })
                } else {
                    bounds
                        .filter(|b| !b.contains(value))
                        .map(|&bounds| ViolationKind::OutOfRange { value, bounds })
                }
            };

            if let Some(kind) = kind {
                violations.push(Violation {
                    column: field.name.clone(),
                    row,
                    kind,
                });
            }
        }
    }

    Ok(ValidationReport { violations })
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Int64(_) => "int64",
        Value::Float64(_) => "float64",
        Value::Bool(_) => "bool",
        Value::Utf8(_) => "utf8",
    }
}
