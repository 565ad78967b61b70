//! src/codec.rs
//!
//! Text encodings for the keys and values passed between pipeline stages.
//!
//! Map output is keyed by `word;file` with a single line number as value.
//! Combine output is keyed by the word alone, with the value carrying every
//! line number the combiner saw for one file: `(file, 3, 7, 10)`.
use crate::error::DecodeError;
use std::fmt;

pub type LineNumber = u64;

/// Separates the word from the file name in a map output key. It is a word
/// delimiter, so the first occurrence always ends the word.
pub const KEY_SEPARATOR: char = ';';

pub fn encode_key(word: &str, file: &str) -> String {
    format!("{word}{KEY_SEPARATOR}{file}")
}

pub fn decode_key(key: &str) -> Result<(&str, &str), DecodeError> {
    let (word, file) = key
        .split_once(KEY_SEPARATOR)
        .ok_or_else(|| DecodeError::MissingKeySeparator(key.to_string()))?;
    if file.is_empty() {
        return Err(DecodeError::EmptyFileName(key.to_string()));
    }
    Ok((word, file))
}

pub fn parse_line_number(token: &str, fragment: &str) -> Result<LineNumber, DecodeError> {
    match token.parse::<LineNumber>() {
        Ok(line) if line > 0 => Ok(line),
        _ => Err(DecodeError::InvalidLineNumber {
            token: token.to_string(),
            fragment: fragment.to_string(),
        }),
    }
}

/// Line numbers at which one word occurs in one file, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileLineGroup {
    file: String,
    lines: Vec<LineNumber>,
}

impl FileLineGroup {
    pub fn new(file: impl Into<String>, lines: Vec<LineNumber>) -> Self {
        FileLineGroup {
            file: file.into(),
            lines,
        }
    }

    pub fn single(file: impl Into<String>, line: LineNumber) -> Self {
        Self::new(file, vec![line])
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn lines(&self) -> &[LineNumber] {
        &self.lines
    }

    pub fn extend(&mut self, lines: impl IntoIterator<Item = LineNumber>) {
        self.lines.extend(lines);
    }

    pub fn into_lines(self) -> Vec<LineNumber> {
        self.lines
    }

    pub fn encode(&self) -> String {
        self.to_string()
    }

    pub fn decode(value: &str) -> Result<Self, DecodeError> {
        let trimmed = value.trim();
        let inner = trimmed
            .strip_prefix('(')
            .and_then(|s| s.strip_suffix(')'))
            .ok_or_else(|| DecodeError::UnbalancedParentheses(value.to_string()))?;
        let (file, rest) = inner
            .split_once(',')
            .ok_or_else(|| DecodeError::MissingSeparator(value.to_string()))?;
        let file = file.trim();
        if file.is_empty() {
            return Err(DecodeError::EmptyFileName(value.to_string()));
        }
        let lines = rest
            .split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(|token| parse_line_number(token, value))
            .collect::<Result<Vec<_>, _>>()?;
        if lines.is_empty() {
            return Err(DecodeError::NoLineNumbers(value.to_string()));
        }
        Ok(Self::new(file, lines))
    }
}

impl fmt::Display for FileLineGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}", self.file)?;
        for line in &self.lines {
            write!(f, ", {line}")?;
        }
        write!(f, ")")
    }
}
