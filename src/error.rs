//! src/error.rs
use std::path::PathBuf;

pub fn error_chain_fmt(
    f: &mut std::fmt::Formatter<'_>,
    e: &impl std::error::Error,
) -> std::fmt::Result {
    writeln!(f, "{}\n", e)?;
    let mut current = e.source();
    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{}", cause)?;
        current = cause.source();
    }
    Ok(())
}

/// Failures that stop a worker before it processes a single record.
#[derive(thiserror::Error)]
pub enum SetupError {
    #[error("Failed to read the stop-word list at {path}")]
    StopWords {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{kind} '{name}' is not registered")]
    UnknownFunction { kind: &'static str, name: String },
}

impl std::fmt::Debug for SetupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(f, self)
    }
}

#[derive(thiserror::Error)]
pub enum MapError {
    #[error("Input record has no file identity")]
    MissingFileIdentity,
    #[error(transparent)]
    Emit(#[from] anyhow::Error),
}

impl std::fmt::Debug for MapError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(f, self)
    }
}

#[derive(thiserror::Error)]
pub enum ReduceError {
    #[error("Malformed intermediate key")]
    MalformedKey(#[source] DecodeError),
    #[error(transparent)]
    Emit(#[from] anyhow::Error),
}

impl std::fmt::Debug for ReduceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(f, self)
    }
}

/// Reasons an intermediate key or value could not be decoded.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum DecodeError {
    #[error("unbalanced parentheses in '{0}'")]
    UnbalancedParentheses(String),
    #[error("no separator between file name and line numbers in '{0}'")]
    MissingSeparator(String),
    #[error("empty file name in '{0}'")]
    EmptyFileName(String),
    #[error("'{token}' is not a line number in '{fragment}'")]
    InvalidLineNumber { token: String, fragment: String },
    #[error("no line numbers in '{0}'")]
    NoLineNumbers(String),
    #[error("intermediate key '{0}' has no word/file separator")]
    MissingKeySeparator(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_includes_the_cause_chain() {
        let err = SetupError::StopWords {
            path: PathBuf::from("missing.txt"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };
        let rendered = format!("{:?}", err);
        assert!(rendered.contains("missing.txt"));
        assert!(rendered.contains("Caused by:\n\tno such file"));
    }

    #[test]
    fn malformed_key_reports_its_decode_error_as_source() {
        let err = ReduceError::MalformedKey(DecodeError::MissingKeySeparator("fox".into()));
        let source = std::error::Error::source(&err).expect("Expected a source");
        assert!(source.to_string().contains("'fox'"));
    }
}
