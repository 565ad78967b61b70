//! src/executors/mod.rs
use std::future::Future;

/// Runs a batch of independent blocking jobs and returns their results in
/// the order the jobs were given.
pub trait Executor: Send + Sync {
    fn run_all<T, F>(&self, jobs: Vec<F>) -> impl Future<Output = anyhow::Result<Vec<T>>> + Send
    where
        F: FnOnce() -> anyhow::Result<T> + Send + 'static,
        T: Send + 'static;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutorKind {
    Sequential,
    Parallel,
}

mod parallel;
pub use parallel::ParallelExecutor;

mod sequential;
pub use sequential::SequentialExecutor;
