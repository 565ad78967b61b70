//! src/executors/sequential.rs
use crate::executors::Executor;
use std::future::Future;

/// One job at a time on the calling task. Stops at the first failure.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialExecutor;

impl Executor for SequentialExecutor {
    fn run_all<T, F>(&self, jobs: Vec<F>) -> impl Future<Output = anyhow::Result<Vec<T>>> + Send
    where
        F: FnOnce() -> anyhow::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        async move { jobs.into_iter().map(|job| job()).collect() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claims::{assert_err, assert_ok};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn should_run_jobs_in_order() {
        let order = Arc::new(AtomicUsize::new(0));
        let jobs: Vec<_> = (0..4)
            .map(|i| {
                let order = Arc::clone(&order);
                move || {
                    assert_eq!(order.fetch_add(1, Ordering::SeqCst), i);
                    Ok(i * 10)
                }
            })
            .collect();
        let results = assert_ok!(SequentialExecutor.run_all(jobs).await);
        assert_eq!(results, vec![0, 10, 20, 30]);
    }

    #[tokio::test]
    async fn should_stop_at_the_first_failure() {
        let ran = Arc::new(AtomicUsize::new(0));
        let jobs: Vec<Box<dyn FnOnce() -> anyhow::Result<()> + Send>> = vec![
            Box::new(|| -> anyhow::Result<()> { anyhow::bail!("boom") }),
            Box::new({
                let ran = Arc::clone(&ran);
                move || {
                    ran.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                }
            }),
        ];
        assert_err!(SequentialExecutor.run_all(jobs).await);
        assert_eq!(ran.load(Ordering::SeqCst), 0);
    }
}
