//! src/stop_words.rs
use crate::error::SetupError;
use std::collections::HashSet;
use std::path::Path;

/// Words that never make it into the index.
///
/// Entries are compared verbatim against already lowercased tokens, so an
/// uppercase entry in the list never matches anything.
#[derive(Debug, Clone, Default)]
pub struct StopWordSet {
    words: HashSet<String>,
}

impl StopWordSet {
    /// Reads one word per line. Lines are trimmed and blank lines ignored.
    #[tracing::instrument(
        name = "Load stop words",
        skip_all,
        fields(path = %path.as_ref().display())
    )]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SetupError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| SetupError::StopWords {
            path: path.to_path_buf(),
            source,
        })?;
        let set = Self::parse(&contents);
        tracing::debug!("loaded {} stop words", set.len());
        Ok(set)
    }

    pub fn parse(contents: &str) -> Self {
        contents.lines().collect()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.words.contains(token)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for StopWordSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let words = iter
            .into_iter()
            .map(|word| word.as_ref().trim().to_string())
            .filter(|word| !word.is_empty())
            .collect();
        StopWordSet { words }
    }
}
