//! src/functions.rs
use crate::error::{MapError, ReduceError};
use crate::stop_words::StopWordSet;
use std::ops::AddAssign;
use std::sync::Arc;

pub type Key = String;
pub type Value = String;

pub trait Emitter {
    fn emit(&mut self, key: Key, value: Value) -> anyhow::Result<()>;
}

/// Read-only resources shared by every function instance on a worker.
#[derive(Debug, Clone)]
pub struct FunctionContext {
    stop_words: Arc<StopWordSet>,
}

impl FunctionContext {
    pub fn new(stop_words: Arc<StopWordSet>) -> Self {
        FunctionContext { stop_words }
    }

    pub fn stop_words(&self) -> &Arc<StopWordSet> {
        &self.stop_words
    }
}

/// A map function. Whatever it has to remember between records lives in
/// `State`, which the caller owns and hands back on every call.
pub trait Mapper {
    type State: Default + Send;
    fn build(context: &FunctionContext) -> Self;
    fn map(
        &self,
        state: &mut Self::State,
        key: &str,
        value: &str,
        emitter: &mut dyn Emitter,
    ) -> Result<(), MapError>;
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReduceOutcome {
    /// Values that could not be decoded and were left out.
    pub skipped: usize,
}

impl AddAssign for ReduceOutcome {
    fn add_assign(&mut self, rhs: Self) {
        self.skipped += rhs.skipped;
    }
}

/// Reduce-shaped functions. Combiners implement this too.
pub trait Reducer {
    fn build(context: &FunctionContext) -> Self;
    fn reduce<I: Iterator<Item = Value>>(
        &self,
        key: &str,
        values: I,
        emitter: &mut dyn Emitter,
    ) -> Result<ReduceOutcome, ReduceError>;
}

/// Keeps emitted pairs in memory, in emission order.
#[derive(Debug, Default)]
pub struct VecEmitter {
    pairs: Vec<(Key, Value)>,
}

impl VecEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pairs(&self) -> &[(Key, Value)] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn take(&mut self) -> Vec<(Key, Value)> {
        std::mem::take(&mut self.pairs)
    }

    pub fn into_pairs(self) -> Vec<(Key, Value)> {
        self.pairs
    }
}

impl Emitter for VecEmitter {
    fn emit(&mut self, key: Key, value: Value) -> anyhow::Result<()> {
        self.pairs.push((key, value));
        Ok(())
    }
}
