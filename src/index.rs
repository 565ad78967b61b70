//! src/index.rs
use crate::codec::{FileLineGroup, LineNumber};
use std::collections::HashMap;

/// Every file a word occurs in, with its line numbers.
///
/// Files keep the order in which they were first merged in. Merging lines
/// for a file that is already present appends to that file's list without
/// sorting or deduplicating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordIndexEntry {
    word: String,
    occurrences: Vec<FileLineGroup>,
    positions: HashMap<String, usize>,
}

impl WordIndexEntry {
    pub fn new(word: impl Into<String>) -> Self {
        WordIndexEntry {
            word: word.into(),
            occurrences: vec![],
            positions: HashMap::new(),
        }
    }

    pub fn word(&self) -> &str {
        &self.word
    }

    pub fn occurrences(&self) -> &[FileLineGroup] {
        &self.occurrences
    }

    pub fn lines_in(&self, file: &str) -> Option<&[LineNumber]> {
        self.positions
            .get(file)
            .map(|&position| self.occurrences[position].lines())
    }

    pub fn is_empty(&self) -> bool {
        self.occurrences.is_empty()
    }

    pub fn merge(&mut self, group: FileLineGroup) {
        match self.positions.get(group.file()) {
            Some(&position) => self.occurrences[position].extend(group.into_lines()),
            None => {
                self.positions
                    .insert(group.file().to_string(), self.occurrences.len());
                self.occurrences.push(group);
            }
        }
    }

    /// `(a.txt, 1, 2) (b.txt, 5)`
    pub fn render(&self) -> String {
        self.occurrences
            .iter()
            .map(FileLineGroup::encode)
            .collect::<Vec<_>>()
            .join(" ")
    }
}
