//! src/startup.rs
use crate::configuration::Settings;
use crate::executors::{ExecutorKind, ParallelExecutor, SequentialExecutor};
use crate::functions::FunctionContext;
use crate::mappers::LINE_INDEXER;
use crate::mapreduce::{JobReport, MapReduce};
use crate::reducers::{LINE_AGGREGATOR, LINE_COMBINER};
use crate::spec::{MapReduceInput, MapReduceInputFormat, MapReduceOutput, MapReduceSpecification};
use crate::stop_words::StopWordSet;
use anyhow::Context;
use std::path::PathBuf;
use std::sync::Arc;

/// A word index job, ready to run once its stop words are loaded.
#[derive(Debug)]
pub struct IndexJob {
    settings: Settings,
    context: FunctionContext,
}

impl IndexJob {
    #[tracing::instrument(name = "Build IndexJob", skip_all)]
    pub fn build(settings: Settings) -> Result<Self, anyhow::Error> {
        let stop_words = StopWordSet::load(&settings.job.stop_words)
            .context("Workers cannot start without their stop words")?;
        let context = FunctionContext::new(Arc::new(stop_words));
        Ok(Self { settings, context })
    }

    pub fn specification(&self) -> Result<MapReduceSpecification, anyhow::Error> {
        let job = &self.settings.job;
        let mut spec = MapReduceSpecification::new(
            &job.work_dir,
            self.settings.cluster.workers,
            job.split_bytes,
            job.spill_records,
        );
        for path in collect_input_files(&job.inputs)? {
            spec.add_input(MapReduceInput::new(
                MapReduceInputFormat::Text,
                path,
                LINE_INDEXER,
            ));
        }
        spec.set_output(MapReduceOutput::new(
            &job.output,
            job.reduce_tasks,
            job.output_format,
            LINE_AGGREGATOR,
            Some(LINE_COMBINER),
        ));
        Ok(spec)
    }

    #[tracing::instrument(name = "Run IndexJob", skip_all)]
    pub async fn run(self) -> Result<JobReport, anyhow::Error> {
        let job = MapReduce::new(self.specification()?)?;
        tracing::info!(
            job_id = %job.job_id(),
            files = job.input_files().len(),
            "starting word index job"
        );
        match self.settings.cluster.executor {
            ExecutorKind::Sequential => job.run(SequentialExecutor, self.context).await,
            ExecutorKind::Parallel => job.run(ParallelExecutor, self.context).await,
        }
    }
}

/// Expands directories into the files directly inside them, sorted by name.
pub fn collect_input_files(inputs: &[PathBuf]) -> Result<Vec<PathBuf>, anyhow::Error> {
    let mut files = vec![];
    for input in inputs {
        if input.is_dir() {
            let mut entries = vec![];
            for entry in std::fs::read_dir(input)
                .with_context(|| format!("Failed to list {}", input.display()))?
            {
                let path = entry.context("Failed to read directory entry")?.path();
                if path.is_file() {
                    entries.push(path);
                }
            }
            entries.sort();
            files.extend(entries);
        } else if input.is_file() {
            files.push(input.clone());
        } else {
            anyhow::bail!("Input path {} does not exist", input.display());
        }
    }
    Ok(files)
}
