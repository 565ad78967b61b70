//! src/reducers/line_aggregator.rs
use crate::codec::FileLineGroup;
use crate::error::ReduceError;
use crate::functions::{Emitter, FunctionContext, ReduceOutcome, Reducer, Value};
use crate::impl_reducer;
use crate::index::WordIndexEntry;

pub const LINE_AGGREGATOR: &str = "line_aggregator";

/// Merges every partial `(file, lines)` value of a word into one index row.
///
/// Several partials for the same file are concatenated in arrival order.
/// Overlapping partials are not deduplicated. Values that fail to decode
/// are logged and counted, the rest of the word is still aggregated.
pub struct LineAggregator;

impl LineAggregator {
    pub fn aggregate<I: Iterator<Item = Value>>(
        &self,
        word: &str,
        values: I,
    ) -> (WordIndexEntry, ReduceOutcome) {
        let mut entry = WordIndexEntry::new(word);
        let mut outcome = ReduceOutcome::default();
        for value in values {
            match FileLineGroup::decode(&value) {
                Ok(group) => entry.merge(group),
                Err(e) => {
                    tracing::warn!(word, error = %e, "skipping malformed fragment");
                    outcome.skipped += 1;
                }
            }
        }
        (entry, outcome)
    }
}

impl Reducer for LineAggregator {
    fn build(_context: &FunctionContext) -> Self {
        LineAggregator
    }

    fn reduce<I: Iterator<Item = Value>>(
        &self,
        key: &str,
        values: I,
        emitter: &mut dyn Emitter,
    ) -> Result<ReduceOutcome, ReduceError> {
        let (entry, outcome) = self.aggregate(key, values);
        if !entry.is_empty() {
            emitter.emit(key.to_string(), entry.render())?;
        }
        Ok(outcome)
    }
}

impl_reducer!(LineAggregator, LINE_AGGREGATOR);
