//! src/spec.rs
use std::path::{Path, PathBuf};

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum MapReduceInputFormat {
    Text,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MapReduceOutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct MapReduceInput {
    format: MapReduceInputFormat,
    path: PathBuf,
    mapper: String,
}

impl MapReduceInput {
    pub fn new(format: MapReduceInputFormat, path: impl Into<PathBuf>, mapper: &str) -> Self {
        MapReduceInput {
            format,
            path: path.into(),
            mapper: mapper.to_string(),
        }
    }

    pub fn mapper(&self) -> &str {
        &self.mapper
    }

    pub fn format(&self) -> &MapReduceInputFormat {
        &self.format
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The identity map functions see for this input: its file name.
    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name().and_then(|name| name.to_str())
    }
}

#[derive(Debug, Clone)]
pub struct MapReduceOutput {
    base_path: PathBuf,
    num_tasks: u32,
    format: MapReduceOutputFormat,
    reducer: String,
    combiner: Option<String>,
}

impl MapReduceOutput {
    pub fn new(
        base_path: impl Into<PathBuf>,
        num_tasks: u32,
        format: MapReduceOutputFormat,
        reducer: &str,
        combiner: Option<&str>,
    ) -> Self {
        MapReduceOutput {
            base_path: base_path.into(),
            num_tasks,
            format,
            reducer: reducer.to_string(),
            combiner: combiner.map(str::to_string),
        }
    }

    pub fn reducer(&self) -> &str {
        &self.reducer
    }

    pub fn format(&self) -> &MapReduceOutputFormat {
        &self.format
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn num_tasks(&self) -> u32 {
        self.num_tasks
    }

    pub fn combiner(&self) -> Option<&str> {
        self.combiner.as_deref()
    }
}

#[derive(Debug, Clone)]
pub struct MapReduceSpecification {
    work_dir: PathBuf,
    input: Vec<MapReduceInput>,
    output: Option<MapReduceOutput>,
    machines: u32,
    split_bytes: u64,
    spill_records: usize,
}

impl MapReduceSpecification {
    pub fn new(
        work_dir: impl Into<PathBuf>,
        machines: u32,
        split_bytes: u64,
        spill_records: usize,
    ) -> Self {
        MapReduceSpecification {
            work_dir: work_dir.into(),
            input: vec![],
            output: None,
            machines,
            split_bytes,
            spill_records,
        }
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    pub fn add_input(&mut self, input: MapReduceInput) {
        self.input.push(input);
    }

    pub fn inputs(&self) -> &Vec<MapReduceInput> {
        &self.input
    }

    pub fn machines(&self) -> u32 {
        self.machines
    }

    pub fn split_bytes(&self) -> u64 {
        self.split_bytes
    }

    /// Map output buffered before the combiner runs over it.
    pub fn spill_records(&self) -> usize {
        self.spill_records
    }

    pub fn set_output(&mut self, output: MapReduceOutput) {
        self.output = Some(output);
    }

    pub fn output(&self) -> Option<MapReduceOutput> {
        self.output.clone()
    }
}
