//! src/file_splitter.rs
use anyhow::Context;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;

/// Cuts a text file into line-aligned pieces of at most `split_size_in_bytes`.
///
/// A line longer than the limit gets a split of its own. Splits keep their
/// newlines, so concatenating them in order gives back the input.
pub struct FileSplitter {
    split_size_in_bytes: u64,
    path: PathBuf,
    out_path: PathBuf,
    out_file_name: String,
}

impl FileSplitter {
    pub fn new(
        path: PathBuf,
        split_size_in_bytes: u64,
        out_file_name: String,
        out_path: PathBuf,
    ) -> Self {
        FileSplitter {
            split_size_in_bytes,
            path,
            out_file_name,
            out_path,
        }
    }

    #[tracing::instrument(name = "Split file", skip(self), fields(path = %self.path.display()))]
    pub fn split(&self) -> Result<Vec<PathBuf>, anyhow::Error> {
        if !self.path.is_file() {
            anyhow::bail!("Input file doesn't exist: {}", self.path.display());
        }

        let in_file = File::open(&self.path).context("Failed to open input file")?;
        let mut reader = BufReader::new(in_file);
        let mut results: Vec<PathBuf> = Vec::new();
        let mut current: Option<(BufWriter<File>, PathBuf)> = None;
        let mut curr_out_file_size = 0u64;
        let mut line = Vec::new();

        loop {
            line.clear();
            let read = reader
                .read_until(b'\n', &mut line)
                .context("Failed to read input file")?;
            if read == 0 {
                break;
            }
            let line_size = read as u64;

            if current.is_some() && line_size + curr_out_file_size > self.split_size_in_bytes {
                if let Some((writer, path)) = current.take() {
                    results.push(Self::close(writer, path)?);
                }
            }
            if current.is_none() {
                current = Some(self.create_new_out_file(results.len())?);
                curr_out_file_size = 0;
            }
            if let Some((writer, _)) = current.as_mut() {
                writer
                    .write_all(&line)
                    .context("Failed to write line to out file")?;
            }
            curr_out_file_size += line_size;
        }

        if let Some((writer, path)) = current.take() {
            results.push(Self::close(writer, path)?);
        }
        tracing::debug!("created {} splits", results.len());
        Ok(results)
    }

    fn close(mut writer: BufWriter<File>, path: PathBuf) -> Result<PathBuf, anyhow::Error> {
        writer.flush().context("Failed to flush split file")?;
        Ok(path)
    }

    fn create_new_out_file(
        &self,
        index: usize,
    ) -> Result<(BufWriter<File>, PathBuf), anyhow::Error> {
        let mut path = self.out_path.clone();
        path.push(format!("{}_{index}", self.out_file_name));
        let file = File::create(&path)
            .with_context(|| format!("Failed to create file at: {}", path.display()))?;
        Ok((BufWriter::new(file), path))
    }
}
