//! src/main.rs
use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use wordindex::configuration::{get_configuration, get_configuration_from};
use wordindex::startup::IndexJob;
use wordindex::telemetry::init_tracing;

/// Builds a per-word index of the files and line numbers each word occurs on.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Directory holding base.yaml
    #[arg(long)]
    config_dir: Option<PathBuf>,

    /// Directory the index is written to; must not exist or be empty
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Stop-word list, one word per line
    #[arg(long)]
    stop_words: Option<PathBuf>,

    /// Input files or directories
    inputs: Vec<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = ?e, "word index job failed");
            eprintln!("Error: {e:?}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut settings = match &cli.config_dir {
        Some(dir) => get_configuration_from(dir),
        None => get_configuration(),
    }
    .context("Failed to read configuration.")?;
    if !cli.inputs.is_empty() {
        settings.job.inputs = cli.inputs;
    }
    if let Some(output) = cli.output {
        settings.job.output = output;
    }
    if let Some(stop_words) = cli.stop_words {
        settings.job.stop_words = stop_words;
    }

    let tracer_provider = init_tracing(&settings.telemetry)?;
    let result = async {
        let report = IndexJob::build(settings)?.run().await?;
        for path in &report.output_files {
            println!("{}", path.display());
        }
        tracing::info!(
            job_id = %report.job_id,
            map_tasks = report.map_tasks,
            reduce_tasks = report.reduce_tasks,
            records = report.records_mapped,
            rows = report.rows_written,
            "word index written"
        );
        Ok::<_, anyhow::Error>(())
    }
    .await;

    if let Some(provider) = tracer_provider {
        provider.shutdown().context("Failed to flush traces")?;
    }
    result
}
