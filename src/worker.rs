//! src/worker.rs
use crate::{
    emitter::{OutputFileEmitter, PartitionedFileEmitter, read_intermediate},
    functions::{Emitter, FunctionContext, ReduceOutcome, VecEmitter},
    master::{MapTask, ReduceTask, TaskState},
    registry::{self, MapperDyn, ReducerDyn},
    shuffle::group_by_key,
};
use anyhow::Context;
use std::collections::HashMap;
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Clone, PartialEq, Debug)]
pub struct WorkerId(Uuid);

impl WorkerId {
    pub fn new() -> Self {
        WorkerId(Uuid::new_v4())
    }
}

impl Default for WorkerId {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared by every worker during the map phase.
#[derive(Debug)]
pub struct MapSettings {
    pub context: FunctionContext,
    pub map_dir: PathBuf,
    pub partitions: usize,
    pub spill_records: usize,
    /// Turns raw map pairs into the grouped values the reducer reads.
    pub combiner: String,
}

#[derive(Debug)]
pub struct MapPhaseReport {
    pub records_mapped: usize,
    pub intermediate_records: usize,
    pub outcome: ReduceOutcome,
    pub partitions: Vec<(usize, PathBuf)>,
}

#[derive(Debug)]
pub struct ReduceTaskReport {
    pub path: PathBuf,
    pub rows: usize,
    pub outcome: ReduceOutcome,
}

#[derive(Clone, Debug)]
pub struct Worker {
    id: WorkerId,
    index: usize,
    map_tasks: Vec<MapTask>,
    reduce_tasks: Vec<ReduceTask>,
}

impl Worker {
    pub fn new(index: usize) -> Self {
        Self {
            id: WorkerId::new(),
            index,
            map_tasks: vec![],
            reduce_tasks: vec![],
        }
    }

    pub fn id(&self) -> &WorkerId {
        &self.id
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn assign_map(&mut self, task: MapTask) {
        self.map_tasks.push(task);
    }

    pub fn assign_reduce(&mut self, task: ReduceTask) {
        self.reduce_tasks.push(task);
    }

    pub fn map_tasks(&self) -> &[MapTask] {
        &self.map_tasks
    }

    pub fn has_map_tasks(&self) -> bool {
        !self.map_tasks.is_empty()
    }

    pub fn has_reduce_tasks(&self) -> bool {
        !self.reduce_tasks.is_empty()
    }

    /// Runs the assigned map tasks in order with one mapper instance per
    /// mapper name, so a file split over several tasks keeps counting lines.
    #[tracing::instrument(name = "Run map tasks", skip_all, fields(worker = self.index))]
    pub fn run_map_tasks(
        mut self,
        settings: &MapSettings,
    ) -> Result<MapPhaseReport, anyhow::Error> {
        let mut output = PartitionedFileEmitter::new(
            &settings.map_dir,
            &format!("map-{:04}", self.index),
            settings.partitions,
        )?;
        let combiner = registry::get_reducer(&settings.combiner, &settings.context)?;
        let mut mappers: HashMap<String, Box<dyn MapperDyn>> = HashMap::new();
        let mut spill = VecEmitter::new();
        let mut records_mapped = 0;
        let mut outcome = ReduceOutcome::default();

        for task in self.map_tasks.iter_mut() {
            let split = &task.input_split;
            tracing::debug!(file = split.file(), index = split.index(), "map task started");
            if !mappers.contains_key(split.mapper()) {
                let mapper = registry::get_mapper(split.mapper(), &settings.context)?;
                mappers.insert(split.mapper().to_string(), mapper);
            }
            let mapper = mappers
                .get_mut(split.mapper())
                .context("Mapper missing after registration")?;

            let bytes = std::fs::read(split.location()).context("Failed to read input split")?;
            let text = String::from_utf8_lossy(&bytes);
            for line in text.lines() {
                mapper
                    .map(split.file(), line, &mut spill)
                    .with_context(|| format!("Map failed on {}", split.file()))?;
                if spill.len() >= settings.spill_records {
                    records_mapped += spill.len();
                    outcome += spill_to(&mut spill, combiner.as_ref(), &mut output)?;
                }
            }
            records_mapped += spill.len();
            outcome += spill_to(&mut spill, combiner.as_ref(), &mut output)?;
            task.state = TaskState::Completed;
        }

        let intermediate_records = output.records();
        Ok(MapPhaseReport {
            records_mapped,
            intermediate_records,
            outcome,
            partitions: output.finish()?,
        })
    }

    #[tracing::instrument(name = "Run reduce tasks", skip_all, fields(worker = self.index))]
    pub fn run_reduce_tasks(
        mut self,
        context: &FunctionContext,
    ) -> Result<Vec<ReduceTaskReport>, anyhow::Error> {
        let mut reports = Vec::with_capacity(self.reduce_tasks.len());
        for task in self.reduce_tasks.iter_mut() {
            reports.push(run_reduce_task(task, context)?);
            task.state = TaskState::Completed;
        }
        Ok(reports)
    }
}

/// Hands the buffered map output to the combiner, one call per key, and
/// writes what comes out.
fn spill_to(
    spill: &mut VecEmitter,
    combiner: &dyn ReducerDyn,
    output: &mut dyn Emitter,
) -> Result<ReduceOutcome, anyhow::Error> {
    let mut outcome = ReduceOutcome::default();
    for (key, values) in group_by_key(spill.take()) {
        outcome += combiner
            .reduce(&key, values, output)
            .with_context(|| format!("Combiner {} failed", combiner.name()))?;
    }
    Ok(outcome)
}

#[tracing::instrument(name = "Reduce task", skip_all, fields(partition = task.partition))]
fn run_reduce_task(
    task: &ReduceTask,
    context: &FunctionContext,
) -> Result<ReduceTaskReport, anyhow::Error> {
    let reducer = registry::get_reducer(task.output.reducer(), context)?;
    let mut pairs = vec![];
    for location in &task.input_locations {
        pairs.extend(
            read_intermediate(location)?
                .into_iter()
                .map(|record| (record.key, record.value)),
        );
    }

    let path = task
        .output
        .base_path()
        .join(format!("part-r-{:05}", task.partition));
    let mut emitter = OutputFileEmitter::create(&path, *task.output.format())?;
    let mut outcome = ReduceOutcome::default();
    for (key, values) in group_by_key(pairs) {
        outcome += reducer
            .reduce(&key, values, &mut emitter)
            .with_context(|| format!("Reducer {} failed on '{key}'", reducer.name()))?;
    }
    let (path, rows) = emitter.finish()?;
    tracing::debug!(rows, skipped = outcome.skipped, "reduce task finished");
    Ok(ReduceTaskReport {
        path,
        rows,
        outcome,
    })
}
