//! src/mappers/line_indexer.rs
use crate::codec::{LineNumber, encode_key};
use crate::error::MapError;
use crate::functions::{Emitter, FunctionContext, Mapper};
use crate::impl_mapper;
use crate::stop_words::StopWordSet;
use crate::tokenizer::Tokenizer;
use std::sync::Arc;

pub const LINE_INDEXER: &str = "line_indexer";

/// Tracks which file the worker is reading and how far into it it is.
///
/// Lines of one file must arrive in order and without interruption by
/// another file; switching files restarts numbering at 1.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LineCursor {
    current_file: Option<String>,
    counter: LineNumber,
}

impl LineCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Line number of the line just read from `file`.
    pub fn advance(&mut self, file: &str) -> LineNumber {
        if self.current_file.as_deref() == Some(file) {
            self.counter += 1;
        } else {
            self.current_file = Some(file.to_string());
            self.counter = 1;
        }
        self.counter
    }

    pub fn current_file(&self) -> Option<&str> {
        self.current_file.as_deref()
    }
}

/// Emits `(word;file, line)` for every indexed word on a line.
pub struct LineIndexer {
    stop_words: Arc<StopWordSet>,
}

impl Mapper for LineIndexer {
    type State = LineCursor;

    fn build(context: &FunctionContext) -> Self {
        Self {
            stop_words: context.stop_words().clone(),
        }
    }

    fn map(
        &self,
        cursor: &mut LineCursor,
        file: &str,
        line: &str,
        emitter: &mut dyn Emitter,
    ) -> Result<(), MapError> {
        if file.trim().is_empty() {
            return Err(MapError::MissingFileIdentity);
        }
        let line_number = cursor.advance(file).to_string();
        for word in Tokenizer::new(&self.stop_words).retained(line) {
            emitter.emit(encode_key(&word, file), line_number.clone())?;
        }
        Ok(())
    }
}

impl_mapper!(LineIndexer, LINE_INDEXER);
