use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;
use tracing::{error, info, warn};

use crate::error::CleaningError;
use crate::processing::{describe, ColumnSummary};
use crate::types::DataSet;

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Error-level event (step failed on bad input or a bad plan).
    Error,
    /// Critical error: I/O failures and violated post-conditions.
    Critical,
}

impl Severity {
    /// Severity of a step failure.
    pub fn of(error: &CleaningError) -> Self {
        match error {
            CleaningError::Io(_) | CleaningError::InvariantViolation { .. } => Self::Critical,
            CleaningError::Csv(_)
            | CleaningError::Json(_)
            | CleaningError::SchemaError { .. }
            | CleaningError::ParseError { .. }
            | CleaningError::FormatError { .. } => Self::Error,
        }
    }
}

/// Identifies a step within a pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepContext<'a> {
    /// Name of the running plan.
    pub plan: &'a str,
    /// Zero-based position of the step in the plan.
    pub index: usize,
    /// The step's `op` tag.
    pub op: &'static str,
}

/// What a successful step did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepReport {
    pub index: usize,
    pub op: &'static str,
    pub rows_in: usize,
    pub rows_out: usize,
    pub columns_out: usize,
    /// Cells whose value was substituted: coercion nullifications, replacements, imputed fills.
    pub cells_changed: usize,
}

/// Observer interface for pipeline progress.
///
/// `on_step` receives a read-only snapshot of the table after the step, so inspection tools
/// (summaries, plots) can watch the cleaning without affecting it.
pub trait PipelineObserver: Send + Sync {
    /// Called after each successful step.
    fn on_step(&self, _ctx: &StepContext<'_>, _report: &StepReport, _table: &DataSet) {}

    /// Called when a step fails.
    fn on_failure(&self, _ctx: &StepContext<'_>, _severity: Severity, _error: &CleaningError) {}

    /// Called when a failure meets the alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, ctx: &StepContext<'_>, severity: Severity, error: &CleaningError) {
        self.on_failure(ctx, severity, error)
    }
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn PipelineObserver>>,
}

impl CompositeObserver {
    pub fn new(observers: Vec<Arc<dyn PipelineObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl PipelineObserver for CompositeObserver {
    fn on_step(&self, ctx: &StepContext<'_>, report: &StepReport, table: &DataSet) {
        for o in &self.observers {
            o.on_step(ctx, report, table);
        }
    }

    fn on_failure(&self, ctx: &StepContext<'_>, severity: Severity, error: &CleaningError) {
        for o in &self.observers {
            o.on_failure(ctx, severity, error);
        }
    }

    fn on_alert(&self, ctx: &StepContext<'_>, severity: Severity, error: &CleaningError) {
        for o in &self.observers {
            o.on_alert(ctx, severity, error);
        }
    }
}

/// Emits pipeline events as `tracing` events.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl PipelineObserver for TracingObserver {
    fn on_step(&self, ctx: &StepContext<'_>, report: &StepReport, _table: &DataSet) {
        info!(
            plan = ctx.plan,
            step = ctx.index,
            op = ctx.op,
            rows_in = report.rows_in,
            rows_out = report.rows_out,
            columns = report.columns_out,
            cells_changed = report.cells_changed,
            "step ok"
        );
    }

    fn on_failure(&self, ctx: &StepContext<'_>, severity: Severity, error: &CleaningError) {
        warn!(plan = ctx.plan, step = ctx.index, op = ctx.op, ?severity, %error, "step failed");
    }

    fn on_alert(&self, ctx: &StepContext<'_>, severity: Severity, error: &CleaningError) {
        error!(
            plan = ctx.plan,
            step = ctx.index,
            op = ctx.op,
            ?severity,
            %error,
            "ALERT: step failed"
        );
    }
}

/// Column summaries of the table after one step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepSummary {
    pub index: usize,
    pub op: &'static str,
    pub columns: Vec<ColumnSummary>,
}

/// Records a [`describe`] snapshot after every successful step.
///
/// Snapshots survive a failed run, so the table can be inspected up to the failing step.
#[derive(Debug, Default)]
pub struct SummaryObserver {
    snapshots: Mutex<Vec<StepSummary>>,
}

impl SummaryObserver {
    /// Snapshots recorded so far, in step order.
    pub fn snapshots(&self) -> Vec<StepSummary> {
        self.snapshots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl PipelineObserver for SummaryObserver {
    fn on_step(&self, ctx: &StepContext<'_>, _report: &StepReport, table: &DataSet) {
        let summary = StepSummary {
            index: ctx.index,
            op: ctx.op,
            columns: describe(table),
        };
        self.snapshots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(summary);
    }
}
