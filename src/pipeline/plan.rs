//! Serializable cleaning plans.
//!
//! A [`CleaningPlan`] is an ordered list of [`Step`]s. Order matters: sentinel corrections must
//! precede imputation so they do not bias the imputed means, and a mean-based replacement sees
//! the column exactly as the previous steps left it.
//!
//! Plans are plain JSON:
//!
//! ```json
//! {
//!   "name": "contacts",
//!   "steps": [
//!     { "op": "coerce_numeric", "columns": ["height_cm"] },
//!     { "op": "replace_value", "column": "height_cm", "from": 0.0, "to": "column_mean" },
//!     { "op": "impute", "strategy": "mean", "columns": ["height_cm"] },
//!     { "op": "validate" }
//!   ]
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CleaningResult;
use crate::processing::{ImputeStrategy, MeltSpec, Replacement, ValidationRules};

/// Named, ordered list of cleaning steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleaningPlan {
    /// Human-readable plan name, used in logs.
    pub name: String,
    /// Steps, applied in order.
    pub steps: Vec<Step>,
}

impl CleaningPlan {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            steps: Vec::new(),
        }
    }

    /// Append a step (builder style).
    pub fn step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    /// Load a plan from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> CleaningResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse a plan from a JSON string.
    pub fn from_json(json: &str) -> CleaningResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize the plan as pretty-printed JSON.
    pub fn to_json(&self) -> CleaningResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// One cleaning step (tagged by `op` in JSON).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    /// Leniently convert columns to `Float64`.
    CoerceNumeric { columns: Vec<String> },

    /// Split a compound text column into two.
    SplitColumn {
        column: String,
        separator: String,
        into: [String; 2],
    },

    /// Keep exactly these columns, in this order.
    SelectColumns { columns: Vec<String> },

    /// Rename columns (old → new).
    RenameColumns { mapping: BTreeMap<String, String> },

    /// Drop repeated rows, keeping the first. `subset: None` compares whole rows.
    DropDuplicates {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        subset: Option<Vec<String>>,
    },

    /// Replace an exact known-bad value.
    ReplaceValue {
        column: String,
        from: f64,
        to: Replacement,
    },

    /// Fill nulls in each listed column independently.
    Impute {
        #[serde(default)]
        strategy: ImputeStrategy,
        columns: Vec<String>,
    },

    /// Check invariants; a failing check stops the pipeline.
    Validate {
        #[serde(default)]
        rules: ValidationRules,
    },

    /// Reshape wide → long.
    Melt(MeltSpec),
}

impl Step {
    /// The `op` tag of this step.
    pub fn op(&self) -> &'static str {
        match self {
            Self::CoerceNumeric { .. } => "coerce_numeric",
            Self::SplitColumn { .. } => "split_column",
            Self::SelectColumns { .. } => "select_columns",
            Self::RenameColumns { .. } => "rename_columns",
            Self::DropDuplicates { .. } => "drop_duplicates",
            Self::ReplaceValue { .. } => "replace_value",
            Self::Impute { .. } => "impute",
            Self::Validate { .. } => "validate",
            Self::Melt(_) => "melt",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CleaningPlan, Step};
    use crate::processing::{ImputeStrategy, Replacement, ValidationRules};

    #[test]
    fn parses_tagged_steps_with_defaults() {
        let json = r#"{
            "name": "demo",
            "steps": [
                { "op": "coerce_numeric", "columns": ["height_cm"] },
                { "op": "replace_value", "column": "weight_kg", "from": -60, "to": { "value": 60 } },
                { "op": "replace_value", "column": "height_cm", "from": 0.0, "to": "column_mean" },
                { "op": "impute", "columns": ["height_cm"] },
                { "op": "validate" },
                { "op": "melt", "id_vars": ["fname"], "value_vars": ["spend_A"],
                  "var_name": "expenditure", "value_name": "amount" }
            ]
        }"#;
        let plan = CleaningPlan::from_json(json).unwrap();

        assert_eq!(plan.steps.len(), 6);
        assert_eq!(
            plan.steps[1],
            Step::ReplaceValue {
                column: "weight_kg".into(),
                from: -60.0,
                to: Replacement::Value(60.0),
            }
        );
        assert_eq!(
            plan.steps[2],
            Step::ReplaceValue {
                column: "height_cm".into(),
                from: 0.0,
                to: Replacement::ColumnMean,
            }
        );
        assert_eq!(
            plan.steps[3],
            Step::Impute {
                strategy: ImputeStrategy::Mean,
                columns: vec!["height_cm".into()],
            }
        );
        assert_eq!(
            plan.steps[4],
            Step::Validate {
                rules: ValidationRules::default()
            }
        );
        assert_eq!(plan.steps[5].op(), "melt");
    }

    #[test]
    fn drop_duplicates_subset_is_optional() {
        let json = r#"{ "name": "d", "steps": [
            { "op": "drop_duplicates" },
            { "op": "drop_duplicates", "subset": ["fname", "lname"] }
        ] }"#;
        let plan = CleaningPlan::from_json(json).unwrap();
        assert_eq!(plan.steps[0], Step::DropDuplicates { subset: None });
        assert_eq!(
            plan.steps[1],
            Step::DropDuplicates {
                subset: Some(vec!["fname".into(), "lname".into()])
            }
        );
        assert_eq!(plan.steps[1].op(), "drop_duplicates");
        assert!(!plan.to_json().unwrap().contains("null"));
    }

    #[test]
    fn unknown_op_is_rejected() {
        let err = CleaningPlan::from_json(r#"{ "name": "x", "steps": [{ "op": "explode" }] }"#)
            .unwrap_err();
        assert!(err.to_string().starts_with("json error"));
    }

    #[test]
    fn json_round_trip_preserves_plan() {
        let plan = crate::contacts::reference_plan();
        let again = CleaningPlan::from_json(&plan.to_json().unwrap()).unwrap();
        assert_eq!(plan, again);
    }
}
