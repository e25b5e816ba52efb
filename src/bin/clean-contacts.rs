use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use tidy_contacts::contacts::{raw_schema, reference_plan};
use tidy_contacts::export::{write_csv, write_csv_to_path};
use tidy_contacts::ingestion::ingest_csv_from_path;
use tidy_contacts::pipeline::{
    CleaningPlan, CompositeObserver, Pipeline, PipelineObserver, PipelineOptions, Severity,
    SummaryObserver, TracingObserver,
};

/// Clean a contact-list CSV and write it in long form.
#[derive(Debug, Parser)]
#[command(name = "clean-contacts", version, about)]
struct Args {
    /// Raw contact-list CSV.
    input: Option<PathBuf>,

    /// Cleaning plan JSON. Defaults to the built-in reference plan.
    #[arg(long)]
    plan: Option<PathBuf>,

    /// Output CSV. Defaults to stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print per-column summaries after every step to stderr, one JSON line per step.
    #[arg(long)]
    describe: bool,

    /// Print the built-in reference plan as JSON and exit.
    #[arg(long)]
    print_plan: bool,
}

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if args.print_plan {
        println!("{}", reference_plan().to_json()?);
        return Ok(());
    }

    let input = args
        .input
        .context("an input CSV is required unless --print-plan is given")?;
    let plan = match &args.plan {
        Some(path) => CleaningPlan::from_path(path)
            .with_context(|| format!("failed to load plan {}", path.display()))?,
        None => reference_plan(),
    };

    let raw = ingest_csv_from_path(&input, &raw_schema())
        .with_context(|| format!("failed to load {}", input.display()))?;
    info!(path = %input.display(), rows = raw.row_count(), plan = %plan.name, "loaded");

    let summaries = Arc::new(SummaryObserver::default());
    let mut observers: Vec<Arc<dyn PipelineObserver>> = vec![Arc::new(TracingObserver)];
    if args.describe {
        observers.push(summaries.clone());
    }
    let options = PipelineOptions {
        observer: Some(Arc::new(CompositeObserver::new(observers))),
        alert_at_or_above: Severity::Error,
    };
    let result = Pipeline::new(plan).with_options(options).run(raw);

    // Snapshots cover every step that ran, including on a failed run.
    for summary in summaries.snapshots() {
        eprintln!("{}", serde_json::to_string(&summary)?);
    }
    let out = result?;

    match &args.output {
        Some(path) => write_csv_to_path(&out.table, path)?,
        None => write_csv(&out.table, std::io::stdout().lock())?,
    }
    info!(rows = out.table.row_count(), "done");
    Ok(())
}
