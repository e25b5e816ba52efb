//! Ordered execution of a [`CleaningPlan`].
//!
//! The table is threaded through the plan as a value: each step borrows the previous table and
//! returns a new one, so a step never sees a partially-updated table and the input passed to
//! [`Pipeline::run`] is consumed exactly once. The first failing step stops the run.
//!
//! ```rust
//! use tidy_contacts::pipeline::{CleaningPlan, Pipeline, Step};
//! use tidy_contacts::processing::{ImputeStrategy, ValidationRules};
//! use tidy_contacts::types::{DataSet, DataType, Field, Schema, Value};
//!
//! let plan = CleaningPlan::new("heights")
//!     .step(Step::CoerceNumeric { columns: vec!["height_cm".into()] })
//!     .step(Step::Impute { strategy: ImputeStrategy::Mean, columns: vec!["height_cm".into()] })
//!     .step(Step::Validate { rules: ValidationRules::default() });
//!
//! let ds = DataSet::new(
//!     Schema::new(vec![Field::new("height_cm", DataType::Utf8)]),
//!     vec![vec![Value::Utf8("170".into())], vec![Value::Utf8("xx".into())]],
//! );
//! let out = Pipeline::new(plan).run(ds)?;
//! assert_eq!(out.table.rows[1][0], Value::Float64(170.0));
//! assert_eq!(out.reports.len(), 3);
//! # Ok::<(), tidy_contacts::CleaningError>(())
//! ```

mod observer;
mod plan;

use std::fmt;
use std::sync::Arc;

use tracing::{debug, debug_span};

use crate::error::{CleaningError, CleaningResult};
use crate::processing::{
    check_invariants, coerce_numeric, drop_duplicates, impute, melt, rename_columns,
    replace_value, select_columns, split_column,
};
use crate::types::DataSet;

pub use observer::{
    CompositeObserver, PipelineObserver, Severity, StepContext, StepReport, StepSummary,
    SummaryObserver, TracingObserver,
};
pub use plan::{CleaningPlan, Step};

/// Options controlling a pipeline run.
#[derive(Clone)]
pub struct PipelineOptions {
    /// Optional observer for progress, snapshots and alerts.
    pub observer: Option<Arc<dyn PipelineObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: Severity,
}

impl fmt::Debug for PipelineOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineOptions")
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            observer: None,
            alert_at_or_above: Severity::Critical,
        }
    }
}

/// Result of a successful run.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    /// The table after the last step.
    pub table: DataSet,
    /// One report per step, in plan order.
    pub reports: Vec<StepReport>,
}

/// Runs a [`CleaningPlan`] over a table.
#[derive(Debug, Clone)]
pub struct Pipeline {
    plan: CleaningPlan,
    options: PipelineOptions,
}

impl Pipeline {
    pub fn new(plan: CleaningPlan) -> Self {
        Self {
            plan,
            options: PipelineOptions::default(),
        }
    }

    pub fn with_options(mut self, options: PipelineOptions) -> Self {
        self.options = options;
        self
    }

    /// Apply every step in order.
    ///
    /// When an observer is configured, this reports:
    ///
    /// - `on_step` after each successful step, with the step report and the new table
    /// - `on_failure` when a step fails, with a computed [`Severity`]
    /// - `on_alert` on failure when the severity is >= `options.alert_at_or_above`
    pub fn run(&self, input: DataSet) -> CleaningResult<PipelineOutput> {
        let mut table = input;
        let mut reports = Vec::with_capacity(self.plan.steps.len());

        for (index, step) in self.plan.steps.iter().enumerate() {
            let ctx = StepContext {
                plan: &self.plan.name,
                index,
                op: step.op(),
            };
            let _span = debug_span!("step", plan = ctx.plan, index, op = ctx.op).entered();

            let (next, cells_changed) = match apply_step(&table, step) {
                Ok(out) => out,
                Err(e) => {
                    self.report_failure(&ctx, &e);
                    return Err(e);
                }
            };

            let report = StepReport {
                index,
                op: ctx.op,
                rows_in: table.row_count(),
                rows_out: next.row_count(),
                columns_out: next.schema.fields.len(),
                cells_changed,
            };
            debug!(rows_out = report.rows_out, cells_changed, "step applied");
            if let Some(obs) = &self.options.observer {
                obs.on_step(&ctx, &report, &next);
            }
            reports.push(report);
            table = next;
        }

        Ok(PipelineOutput { table, reports })
    }

    fn report_failure(&self, ctx: &StepContext<'_>, error: &CleaningError) {
        if let Some(obs) = &self.options.observer {
            let severity = Severity::of(error);
            obs.on_failure(ctx, severity, error);
            if severity >= self.options.alert_at_or_above {
                obs.on_alert(ctx, severity, error);
            }
        }
    }
}

/// Apply a single step, returning the new table and the number of changed cells.
///
/// For [`Step::DropDuplicates`] the count is the number of removed rows.
pub fn apply_step(table: &DataSet, step: &Step) -> CleaningResult<(DataSet, usize)> {
    type Acc = CleaningResult<(DataSet, usize)>;

    match step {
        Step::CoerceNumeric { columns } => {
            columns
                .iter()
                .try_fold((table.clone(), 0), |(ds, n), column| -> Acc {
                    let (ds, stats) = coerce_numeric(&ds, column)?;
                    Ok((ds, n + stats.nullified))
                })
        }
        Step::SplitColumn {
            column,
            separator,
            into,
        } => Ok((
            split_column(table, column, separator, [into[0].as_str(), into[1].as_str()])?,
            0,
        )),
        Step::SelectColumns { columns } => Ok((select_columns(table, columns)?, 0)),
        Step::RenameColumns { mapping } => Ok((rename_columns(table, mapping)?, 0)),
        Step::DropDuplicates { subset } => drop_duplicates(table, subset.as_deref()),
        Step::ReplaceValue { column, from, to } => replace_value(table, column, *from, *to),
        Step::Impute { strategy, columns } => {
            columns
                .iter()
                .try_fold((table.clone(), 0), |(ds, n), column| -> Acc {
                    let (ds, filled) = impute(&ds, column, *strategy)?;
                    Ok((ds, n + filled))
                })
        }
        Step::Validate { rules } => {
            check_invariants(table, rules)?.into_result()?;
            Ok((table.clone(), 0))
        }
        Step::Melt(spec) => Ok((melt(table, spec)?, 0)),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::{
        CleaningPlan, CompositeObserver, Pipeline, PipelineObserver, PipelineOptions, Severity,
        Step, StepContext, StepReport, SummaryObserver,
    };
    use crate::error::CleaningError;
    use crate::processing::{ImputeStrategy, Replacement, ValidationRules};
    use crate::types::{DataSet, DataType, Field, Schema, Value};

    #[derive(Default)]
    struct RecordingObserver {
        steps: Mutex<Vec<(&'static str, usize)>>,
        failures: Mutex<Vec<Severity>>,
        alerts: Mutex<Vec<Severity>>,
    }

    impl PipelineObserver for RecordingObserver {
        fn on_step(&self, ctx: &StepContext<'_>, report: &StepReport, table: &DataSet) {
            assert_eq!(report.rows_out, table.row_count());
            self.steps.lock().unwrap().push((ctx.op, report.cells_changed));
        }

        fn on_failure(&self, _ctx: &StepContext<'_>, severity: Severity, _error: &CleaningError) {
            self.failures.lock().unwrap().push(severity);
        }

        fn on_alert(&self, _ctx: &StepContext<'_>, severity: Severity, _error: &CleaningError) {
            self.alerts.lock().unwrap().push(severity);
        }
    }

    fn weights() -> DataSet {
        DataSet::new(
            Schema::new(vec![Field::new("weight_kg", DataType::Utf8)]),
            ["65", "-60", "", "xx"]
                .iter()
                .map(|w| {
                    vec![if w.is_empty() {
                        Value::Null
                    } else {
                        Value::Utf8((*w).into())
                    }]
                })
                .collect(),
        )
    }

    fn weight_plan(with_correction: bool) -> CleaningPlan {
        let mut plan = CleaningPlan::new("weights")
            .step(Step::CoerceNumeric { columns: vec!["weight_kg".into()] });
        if with_correction {
            plan = plan.step(Step::ReplaceValue {
                column: "weight_kg".into(),
                from: -60.0,
                to: Replacement::Value(60.0),
            });
        }
        plan.step(Step::Impute {
            strategy: ImputeStrategy::Mean,
            columns: vec!["weight_kg".into()],
        })
        .step(Step::Validate { rules: ValidationRules::default() })
    }

    fn observed(obs: &Arc<RecordingObserver>) -> PipelineOptions {
        PipelineOptions {
            observer: Some(obs.clone()),
            alert_at_or_above: Severity::Critical,
        }
    }

    #[test]
    fn runs_steps_in_order_and_reports_each() {
        let obs = Arc::new(RecordingObserver::default());
        let out = Pipeline::new(weight_plan(true))
            .with_options(observed(&obs))
            .run(weights())
            .unwrap();

        assert_eq!(
            out.table.column("weight_kg").unwrap(),
            vec![
                &Value::Float64(65.0),
                &Value::Float64(60.0),
                &Value::Float64(62.5),
                &Value::Float64(62.5),
            ]
        );
        assert_eq!(
            *obs.steps.lock().unwrap(),
            vec![("coerce_numeric", 1), ("replace_value", 1), ("impute", 2), ("validate", 0)]
        );
        assert_eq!(out.reports.len(), 4);
        assert!(obs.failures.lock().unwrap().is_empty());
    }

    #[test]
    fn skipped_correction_fails_validation_with_critical_alert() {
        let obs = Arc::new(RecordingObserver::default());
        let err = Pipeline::new(weight_plan(false))
            .with_options(observed(&obs))
            .run(weights())
            .unwrap_err();

        match err {
            CleaningError::InvariantViolation { violations } => {
                assert_eq!(violations.len(), 1);
                assert_eq!(violations[0].row, 1);
            }
            other => panic!("expected invariant violation, got {other}"),
        }
        assert_eq!(*obs.failures.lock().unwrap(), vec![Severity::Critical]);
        assert_eq!(*obs.alerts.lock().unwrap(), vec![Severity::Critical]);
        // coerce + impute succeeded before validation stopped the run.
        assert_eq!(obs.steps.lock().unwrap().len(), 2);
    }

    #[test]
    fn schema_error_is_reported_without_alert() {
        let obs = Arc::new(RecordingObserver::default());
        let plan = CleaningPlan::new("bad").step(Step::SelectColumns {
            columns: vec!["height_cm".into()],
        });
        let err = Pipeline::new(plan)
            .with_options(observed(&obs))
            .run(weights())
            .unwrap_err();

        assert!(matches!(err, CleaningError::SchemaError { .. }));
        assert_eq!(*obs.failures.lock().unwrap(), vec![Severity::Error]);
        assert!(obs.alerts.lock().unwrap().is_empty());
    }

    #[test]
    fn empty_plan_returns_input() {
        let out = Pipeline::new(CleaningPlan::new("noop")).run(weights()).unwrap();
        assert_eq!(out.table, weights());
        assert!(out.reports.is_empty());
    }

    #[test]
    fn composite_fans_out_to_every_observer() {
        let first = Arc::new(RecordingObserver::default());
        let second = Arc::new(RecordingObserver::default());
        let summaries = Arc::new(SummaryObserver::default());
        let observers: Vec<Arc<dyn PipelineObserver>> =
            vec![first.clone(), second.clone(), summaries.clone()];
        let options = PipelineOptions {
            observer: Some(Arc::new(CompositeObserver::new(observers))),
            alert_at_or_above: Severity::Critical,
        };

        let err = Pipeline::new(weight_plan(false))
            .with_options(options)
            .run(weights())
            .unwrap_err();
        assert!(matches!(err, CleaningError::InvariantViolation { .. }));

        for obs in [&first, &second] {
            assert_eq!(obs.steps.lock().unwrap().len(), 2);
            assert_eq!(*obs.alerts.lock().unwrap(), vec![Severity::Critical]);
        }

        // Snapshots cover the steps before the failing one.
        let snapshots = summaries.snapshots();
        let ops: Vec<_> = snapshots.iter().map(|s| s.op).collect();
        assert_eq!(ops, vec!["coerce_numeric", "impute"]);
        assert_eq!(snapshots[0].columns[0].nulls, 2);
        assert_eq!(snapshots[1].columns[0].nulls, 0);
    }

    #[test]
    fn drop_duplicates_reports_removed_rows() {
        let obs = Arc::new(RecordingObserver::default());
        let plan = CleaningPlan::new("dedupe").step(Step::DropDuplicates { subset: None });
        let out = Pipeline::new(plan)
            .with_options(observed(&obs))
            .run(weights())
            .unwrap();
        assert_eq!(out.table, weights());

        let mut ds = weights();
        ds.rows.push(ds.rows[1].clone());
        ds.rows.push(ds.rows[2].clone());
        let plan = CleaningPlan::new("dedupe").step(Step::DropDuplicates {
            subset: Some(vec!["weight_kg".into()]),
        });
        let out = Pipeline::new(plan).run(ds).unwrap();
        assert_eq!(out.table, weights());
        assert_eq!(out.reports[0].rows_in, 6);
        assert_eq!(out.reports[0].rows_out, 4);
        assert_eq!(out.reports[0].cells_changed, 2);
        assert_eq!(*obs.steps.lock().unwrap(), vec![("drop_duplicates", 0)]);
    }
}
