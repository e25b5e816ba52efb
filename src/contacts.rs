//! The reference contact-list dataset and its cleaning plan.
//!
//! The raw file has nine columns: `fname`, `lname`, `age_sex` (`<age>_<sex>`), `section`,
//! `height_cm`, `weight_kg`, `spend_A`, `spend_B`, `spend_C`. Heights, weights and `spend_C`
//! contain the sentinel text `"xx"` and are therefore loaded as text; `spend_A` and `spend_B`
//! load as numbers directly.

use std::collections::BTreeMap;

use crate::pipeline::{CleaningPlan, Step};
use crate::processing::{Bounds, ImputeStrategy, MeltSpec, Replacement, ValidationRules};
use crate::types::{DataType, Field, Schema};

pub const HEIGHT: &str = "height_cm";
pub const WEIGHT: &str = "weight_kg";
pub const SPEND_COLUMNS: [&str; 3] = ["spend_A", "spend_B", "spend_C"];

/// Identifier columns of the long-form output, in order.
pub const ID_COLUMNS: [&str; 7] = ["fname", "lname", "age", "sex", "section", HEIGHT, WEIGHT];

fn strings(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

/// Schema used to load the raw contact list.
pub fn raw_schema() -> Schema {
    Schema::new(vec![
        Field::new("fname", DataType::Utf8),
        Field::new("lname", DataType::Utf8),
        Field::new("age_sex", DataType::Utf8),
        Field::new("section", DataType::Utf8),
        Field::new(HEIGHT, DataType::Utf8),
        Field::new(WEIGHT, DataType::Utf8),
        Field::new("spend_A", DataType::Float64),
        Field::new("spend_B", DataType::Float64),
        Field::new("spend_C", DataType::Utf8),
    ])
}

/// The reference cleaning run.
///
/// The sentinel corrections are the entry errors found by inspecting the raw list; they are
/// plain plan steps so another run can change or drop them.
pub fn reference_plan() -> CleaningPlan {
    let fix = |column: &str, from: f64, to: Replacement| Step::ReplaceValue {
        column: column.to_string(),
        from,
        to,
    };

    let wide_order: Vec<String> = ID_COLUMNS
        .iter()
        .chain(SPEND_COLUMNS.iter())
        .map(|s| s.to_string())
        .collect();

    CleaningPlan::new("contacts")
        .step(Step::CoerceNumeric {
            columns: strings(&[HEIGHT, WEIGHT, "spend_C"]),
        })
        .step(Step::SplitColumn {
            column: "age_sex".to_string(),
            separator: "_".to_string(),
            into: ["age".to_string(), "sex".to_string()],
        })
        .step(Step::SelectColumns {
            columns: wide_order,
        })
        .step(fix(WEIGHT, -60.0, Replacement::Value(60.0)))
        .step(fix("spend_B", -100.0, Replacement::Value(100.0)))
        .step(fix(HEIGHT, 0.0, Replacement::ColumnMean))
        .step(fix(WEIGHT, 160.0, Replacement::Value(60.0)))
        .step(Step::Impute {
            strategy: ImputeStrategy::Mean,
            columns: strings(&[HEIGHT, WEIGHT, "spend_A", "spend_B", "spend_C"]),
        })
        .step(Step::Validate {
            rules: ValidationRules {
                non_negative: true,
                bounds: BTreeMap::from([
                    (HEIGHT.to_string(), Bounds::new(100.0, 250.0)),
                    (WEIGHT.to_string(), Bounds::new(30.0, 150.0)),
                ]),
            },
        })
        .step(Step::Melt(MeltSpec {
            id_vars: strings(&ID_COLUMNS),
            value_vars: strings(&SPEND_COLUMNS),
            var_name: "expenditure".to_string(),
            value_name: "amount".to_string(),
        }))
}
