//! src/master.rs
use crate::{
    executors::Executor,
    functions::FunctionContext,
    mapreduce::{InputFile, InputSplit, JobReport},
    spec::{MapReduceOutput, MapReduceSpecification},
    worker::{MapSettings, Worker, WorkerId},
};
use anyhow::Context;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq)]
pub enum TaskState {
    Idle,
    InProgress,
    Completed,
}

#[derive(Clone, Debug)]
pub struct MapTask {
    pub task_id: Uuid,
    pub state: TaskState,
    pub worker_id: Option<WorkerId>,
    pub input_split: InputSplit,
}

#[derive(Clone, Debug)]
pub struct ReduceTask {
    pub task_id: Uuid,
    pub state: TaskState,
    pub worker_id: Option<WorkerId>,
    pub partition: usize,
    pub output: MapReduceOutput,
    pub input_locations: Vec<PathBuf>,
}

#[derive(Debug)]
pub struct Master<E: Executor> {
    executor: E,
    workers: Vec<Worker>,
    map_tasks: Vec<MapTask>,
    reduce_tasks: Vec<ReduceTask>,
    settings: Arc<MapSettings>,
    output: MapReduceOutput,
}

impl<E: Executor> Master<E> {
    pub fn new(
        executor: E,
        context: FunctionContext,
        spec: &MapReduceSpecification,
        output: MapReduceOutput,
        input_files: Vec<InputFile>,
        map_dir: PathBuf,
    ) -> Result<Self, anyhow::Error> {
        if spec.machines() == 0 {
            anyhow::bail!("A job needs at least one worker");
        }
        if output.num_tasks() == 0 {
            anyhow::bail!("A job needs at least one reduce task");
        }
        // Reducers read combined groups, never raw map pairs.
        let combiner = output
            .combiner()
            .with_context(|| format!("Reducer {} needs a combiner", output.reducer()))?
            .to_string();
        ensure_output_is_free(output.base_path())?;

        let workers = (0..spec.machines() as usize).map(Worker::new).collect();
        let map_tasks = input_files
            .into_iter()
            .flat_map(|file| file.splits)
            .map(|input_split| MapTask {
                task_id: Uuid::new_v4(),
                state: TaskState::Idle,
                worker_id: None,
                input_split,
            })
            .collect();
        let reduce_tasks = (0..output.num_tasks() as usize)
            .map(|partition| ReduceTask {
                task_id: Uuid::new_v4(),
                state: TaskState::Idle,
                worker_id: None,
                partition,
                output: output.clone(),
                input_locations: vec![],
            })
            .collect();
        let settings = Arc::new(MapSettings {
            context,
            map_dir,
            partitions: output.num_tasks() as usize,
            spill_records: spec.spill_records().max(1),
            combiner,
        });

        let mut master = Master {
            executor,
            workers,
            map_tasks,
            reduce_tasks,
            settings,
            output,
        };
        master.assign_map_tasks()?;
        Ok(master)
    }

    /// Every split of a file goes to the same worker, in split order, so the
    /// worker sees the file's lines as one contiguous stream. Files are dealt
    /// out round-robin.
    fn assign_map_tasks(&mut self) -> Result<(), anyhow::Error> {
        let num_workers = self.worker_count();
        let mut next_worker = 0;
        let mut previous_file: Option<String> = None;
        for task in self.map_tasks.iter_mut() {
            let file = task.input_split.file();
            if let Some(previous) = previous_file.as_deref() {
                if previous != file {
                    next_worker = (next_worker + 1) % num_workers;
                }
            }
            previous_file = Some(file.to_string());
            let worker = self
                .workers
                .get_mut(next_worker)
                .context("Worker index out of range")?;
            task.worker_id = Some(worker.id().clone());
            task.state = TaskState::InProgress;
            worker.assign_map(task.clone());
        }
        Ok(())
    }

    fn assign_reduce_tasks(
        &mut self,
        map_outputs: &[Vec<(usize, PathBuf)>],
    ) -> Result<(), anyhow::Error> {
        let num_workers = self.worker_count();
        for (curr_worker, task) in self.reduce_tasks.iter_mut().enumerate() {
            task.input_locations = map_outputs
                .iter()
                .flatten()
                .filter(|(partition, _)| *partition == task.partition)
                .map(|(_, path)| path.clone())
                .collect();
            let worker = self
                .workers
                .get_mut(curr_worker % num_workers)
                .context("Worker index out of range")?;
            task.worker_id = Some(worker.id().clone());
            task.state = TaskState::InProgress;
            worker.assign_reduce(task.clone());
        }
        Ok(())
    }

    pub fn workers(&self) -> &Vec<Worker> {
        &self.workers
    }

    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    pub fn task_count(&self) -> usize {
        self.map_tasks.len() + self.reduce_tasks.len()
    }

    pub fn map_tasks(&self) -> &Vec<MapTask> {
        &self.map_tasks
    }

    pub fn reduce_tasks(&self) -> &Vec<ReduceTask> {
        &self.reduce_tasks
    }

    #[tracing::instrument(name = "Run master", skip_all)]
    pub async fn run(mut self) -> Result<JobReport, anyhow::Error> {
        let mut report = JobReport {
            map_tasks: self.map_tasks.len(),
            reduce_tasks: self.reduce_tasks.len(),
            ..JobReport::default()
        };

        let jobs = self
            .workers
            .iter()
            .filter(|worker| worker.has_map_tasks())
            .cloned()
            .map(|worker| {
                let settings = Arc::clone(&self.settings);
                move || worker.run_map_tasks(&settings)
            })
            .collect();
        let map_reports = self.executor.run_all(jobs).await.context("Map phase failed")?;
        for task in self.map_tasks.iter_mut() {
            task.state = TaskState::Completed;
        }

        let mut map_outputs = vec![];
        for map_report in map_reports {
            report.records_mapped += map_report.records_mapped;
            report.intermediate_records += map_report.intermediate_records;
            report.skipped_fragments += map_report.outcome.skipped;
            map_outputs.push(map_report.partitions);
        }

        self.assign_reduce_tasks(&map_outputs)?;
        std::fs::create_dir_all(self.output.base_path())
            .context("Failed to create the output directory")?;
        let jobs = self
            .workers
            .iter()
            .filter(|worker| worker.has_reduce_tasks())
            .cloned()
            .map(|worker| {
                let context = self.settings.context.clone();
                move || worker.run_reduce_tasks(&context)
            })
            .collect();
        let reduce_reports: Vec<_> = self
            .executor
            .run_all(jobs)
            .await
            .context("Reduce phase failed")?;
        for task in self.reduce_tasks.iter_mut() {
            task.state = TaskState::Completed;
        }

        for reduce_report in reduce_reports.into_iter().flatten() {
            report.rows_written += reduce_report.rows;
            report.skipped_fragments += reduce_report.outcome.skipped;
            report.output_files.push(reduce_report.path);
        }
        report.output_files.sort();
        Ok(report)
    }
}

/// Output is never overwritten: the directory must be missing or empty.
pub fn ensure_output_is_free(output_dir: &Path) -> Result<(), anyhow::Error> {
    if output_dir.exists()
        && std::fs::read_dir(output_dir)
            .context("Failed to inspect the output directory")?
            .next()
            .is_some()
    {
        anyhow::bail!(
            "Output directory {} already exists and is not empty",
            output_dir.display()
        );
    }
    Ok(())
}
