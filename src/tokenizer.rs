//! src/tokenizer.rs
use crate::stop_words::StopWordSet;

/// Characters that separate words. Anything else, tabs included, is part of
/// a word.
pub const DELIMITERS: &[char] = &[
    ' ', '"', '\'', ',', '.', '(', ')', '?', '!', '[', ']', '#', '$', '*', '-', '=', ';', ':',
    '_', '+', '/', '\\', '<', '>', '@', '%', '&', '«', '»', '—',
];

pub fn is_delimiter(c: char) -> bool {
    DELIMITERS.contains(&c)
}

/// Lowercased tokens of `line`, left to right, with no empty tokens.
pub fn tokens(line: &str) -> impl Iterator<Item = String> + '_ {
    line.split(is_delimiter)
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
}

/// Splits lines into tokens and drops the ones in the stop-word set.
#[derive(Debug, Clone, Copy)]
pub struct Tokenizer<'a> {
    stop_words: &'a StopWordSet,
}

impl<'a> Tokenizer<'a> {
    pub fn new(stop_words: &'a StopWordSet) -> Self {
        Tokenizer { stop_words }
    }

    pub fn retained<'l>(self, line: &'l str) -> impl Iterator<Item = String> + 'l
    where
        'a: 'l,
    {
        let stop_words = self.stop_words;
        tokens(line).filter(move |token| !stop_words.contains(token))
    }
}
