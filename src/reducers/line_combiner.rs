//! src/reducers/line_combiner.rs
use crate::codec::{FileLineGroup, decode_key, parse_line_number};
use crate::error::ReduceError;
use crate::functions::{Emitter, FunctionContext, ReduceOutcome, Reducer, Value};
use crate::impl_reducer;

pub const LINE_COMBINER: &str = "line_combiner";

/// Folds the line numbers of one `word;file` key into a single
/// `(file, l1, l2, ...)` value keyed by the word.
pub struct LineCombiner;

impl Reducer for LineCombiner {
    fn build(_context: &FunctionContext) -> Self {
        LineCombiner
    }

    fn reduce<I: Iterator<Item = Value>>(
        &self,
        key: &str,
        values: I,
        emitter: &mut dyn Emitter,
    ) -> Result<ReduceOutcome, ReduceError> {
        let (word, file) = decode_key(key).map_err(ReduceError::MalformedKey)?;
        let mut outcome = ReduceOutcome::default();
        let mut lines = vec![];
        for value in values {
            match parse_line_number(value.trim(), &value) {
                Ok(line) => lines.push(line),
                Err(e) => {
                    tracing::warn!(key, error = %e, "skipping line number");
                    outcome.skipped += 1;
                }
            }
        }
        if !lines.is_empty() {
            let group = FileLineGroup::new(file, lines);
            emitter.emit(word.to_string(), group.encode())?;
        }
        Ok(outcome)
    }
}

impl_reducer!(LineCombiner, LINE_COMBINER);
