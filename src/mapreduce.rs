//! src/mapreduce.rs
use crate::{
    executors::Executor,
    file_splitter::FileSplitter,
    functions::FunctionContext,
    master::{Master, ensure_output_is_free},
    spec::{MapReduceInput, MapReduceSpecification},
};
use anyhow::Context;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// One piece of an input file, handed to a single map task.
#[derive(Clone, Debug)]
pub struct InputSplit {
    file: String,
    index: usize,
    location: PathBuf,
    mapper: String,
}

impl InputSplit {
    pub fn new(file: &str, index: usize, location: PathBuf, mapper: &str) -> Self {
        InputSplit {
            file: file.into(),
            index,
            location,
            mapper: mapper.into(),
        }
    }

    /// Identity of the file the split was cut from.
    pub fn file(&self) -> &str {
        &self.file
    }

    /// Position of the split within its file.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn location(&self) -> &Path {
        &self.location
    }

    pub fn mapper(&self) -> &str {
        &self.mapper
    }
}

/// Splits of one input file, in file order.
#[derive(Clone, Debug)]
pub struct InputFile {
    pub name: String,
    pub splits: Vec<InputSplit>,
}

#[tracing::instrument(name = "Split inputs", skip(inputs))]
fn split_inputs(
    split_dir: &Path,
    inputs: &[MapReduceInput],
    split_size_in_bytes: u64,
) -> Result<Vec<InputFile>, anyhow::Error> {
    std::fs::create_dir_all(split_dir).context("Failed to create split directory")?;
    let mut seen = HashSet::new();
    let mut results = Vec::with_capacity(inputs.len());
    for (i, input) in inputs.iter().enumerate() {
        let name = input
            .file_name()
            .with_context(|| format!("Input {} has no usable file name", input.path().display()))?;
        if !seen.insert(name.to_string()) {
            anyhow::bail!("Two inputs share the file name '{name}'");
        }
        tracing::debug!("processing input file: {}", input.path().display());
        let splitter = FileSplitter::new(
            input.path().to_path_buf(),
            split_size_in_bytes,
            format!("mr_input_{i}"),
            split_dir.to_path_buf(),
        );
        let locations = splitter.split().context("Failed to split input files")?;
        let splits = locations
            .into_iter()
            .enumerate()
            .map(|(index, location)| InputSplit::new(name, index, location, input.mapper()))
            .collect();
        results.push(InputFile {
            name: name.to_string(),
            splits,
        });
    }
    Ok(results)
}

#[derive(Debug, Clone, Default)]
pub struct JobReport {
    pub job_id: Uuid,
    pub map_tasks: usize,
    pub reduce_tasks: usize,
    /// Pairs produced by the map function, before combining.
    pub records_mapped: usize,
    /// Pairs written for the reduce phase, after combining.
    pub intermediate_records: usize,
    pub skipped_fragments: usize,
    pub rows_written: usize,
    pub output_files: Vec<PathBuf>,
}

#[derive(Debug)]
pub struct MapReduce {
    job_id: Uuid,
    spec: MapReduceSpecification,
    input_files: Vec<InputFile>,
}

impl MapReduce {
    pub fn new(spec: MapReduceSpecification) -> Result<Self, anyhow::Error> {
        if let Some(output) = spec.output() {
            ensure_output_is_free(output.base_path())?;
        }
        let job_id = Uuid::new_v4();
        let split_dir = spec.work_dir().join(job_id.to_string()).join("splits");
        let input_files = match split_inputs(&split_dir, spec.inputs(), spec.split_bytes()) {
            Ok(input_files) => input_files,
            Err(e) => {
                remove_job_dir(&spec.work_dir().join(job_id.to_string()));
                return Err(e);
            }
        };
        Ok(MapReduce {
            spec,
            job_id,
            input_files,
        })
    }

    pub fn input_files(&self) -> &[InputFile] {
        &self.input_files
    }

    pub fn job_id(&self) -> &Uuid {
        &self.job_id
    }

    pub fn job_dir(&self) -> PathBuf {
        self.spec.work_dir().join(self.job_id.to_string())
    }

    /// Runs every map task, then every reduce task. The job's scratch
    /// files are removed whether or not the job succeeds.
    #[tracing::instrument(name = "Run MapReduce job", skip_all, fields(job_id = %self.job_id))]
    pub async fn run<E: Executor>(
        self,
        executor: E,
        context: FunctionContext,
    ) -> Result<JobReport, anyhow::Error> {
        let job_dir = self.job_dir();
        let MapReduce {
            job_id,
            spec,
            input_files,
        } = self;
        let result = run_master(executor, context, &spec, input_files, &job_dir).await;
        let mut report = match result {
            Ok(report) => report,
            Err(e) => {
                remove_job_dir(&job_dir);
                return Err(e);
            }
        };
        report.job_id = job_id;
        std::fs::remove_dir_all(&job_dir).context("Failed to clean up the job directory")?;
        tracing::info!(
            rows = report.rows_written,
            skipped = report.skipped_fragments,
            "job finished"
        );
        Ok(report)
    }
}

async fn run_master<E: Executor>(
    executor: E,
    context: FunctionContext,
    spec: &MapReduceSpecification,
    input_files: Vec<InputFile>,
    job_dir: &Path,
) -> Result<JobReport, anyhow::Error> {
    let output = spec.output().context("The job has no output defined")?;
    let master = Master::new(
        executor,
        context,
        spec,
        output,
        input_files,
        job_dir.join("map"),
    )?;
    master.run().await
}

/// Best effort: the job's own error is what the caller needs to see.
fn remove_job_dir(job_dir: &Path) {
    if let Err(e) = std::fs::remove_dir_all(job_dir) {
        if e.kind() != std::io::ErrorKind::NotFound {
            tracing::warn!(
                error = %e,
                path = %job_dir.display(),
                "failed to remove job directory"
            );
        }
    }
}
