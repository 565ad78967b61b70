//! src/executors/parallel.rs
use crate::executors::Executor;
use anyhow::Context;
use std::future::Future;

/// Every job on tokio's blocking pool at once.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParallelExecutor;

impl Executor for ParallelExecutor {
    fn run_all<T, F>(&self, jobs: Vec<F>) -> impl Future<Output = anyhow::Result<Vec<T>>> + Send
    where
        F: FnOnce() -> anyhow::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        async move {
            let handles: Vec<_> = jobs.into_iter().map(tokio::task::spawn_blocking).collect();
            let mut results = Vec::with_capacity(handles.len());
            for handle in handles {
                results.push(handle.await.context("Task panicked")??);
            }
            Ok(results)
        }
    }
}
