//! src/emitter.rs
use crate::functions::{Emitter, Key, Value};
use crate::shuffle::partition_for;
use crate::spec::MapReduceOutputFormat;
use anyhow::Context;
use std::fs::{File, create_dir_all};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// One intermediate pair as stored between the map and reduce phases.
/// JSON keeps tabs and other odd characters in words intact.
#[derive(Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct IntermediateRecord {
    pub key: Key,
    pub value: Value,
}

/// Spreads map output over `partitions` files, one per reduce task.
#[derive(Debug)]
pub struct PartitionedFileEmitter {
    output_dir: PathBuf,
    prefix: String,
    writers: Vec<Option<BufWriter<File>>>,
    records: usize,
}

impl PartitionedFileEmitter {
    pub fn new(
        output_dir: impl AsRef<Path>,
        prefix: &str,
        partitions: usize,
    ) -> anyhow::Result<Self> {
        if partitions == 0 {
            anyhow::bail!("Partition count must be at least 1");
        }
        let output_dir = output_dir.as_ref().to_path_buf();
        create_dir_all(&output_dir).context("Failed to create intermediate file directory")?;
        Ok(Self {
            output_dir,
            prefix: prefix.to_string(),
            writers: (0..partitions).map(|_| None).collect(),
            records: 0,
        })
    }

    pub fn partition_path(&self, partition: usize) -> PathBuf {
        self.output_dir
            .join(format!("{}-r{:05}.jsonl", self.prefix, partition))
    }

    pub fn records(&self) -> usize {
        self.records
    }

    fn writer(&mut self, partition: usize) -> anyhow::Result<&mut BufWriter<File>> {
        let path = self.partition_path(partition);
        let slot = self
            .writers
            .get_mut(partition)
            .context("Partition out of range")?;
        if slot.is_none() {
            let file = File::create(&path)
                .with_context(|| format!("Failed to create partition file {}", path.display()))?;
            *slot = Some(BufWriter::with_capacity(8192, file));
        }
        slot.as_mut().context("Partition writer missing")
    }

    /// Flushes every partition and returns the files that received data.
    pub fn finish(mut self) -> anyhow::Result<Vec<(usize, PathBuf)>> {
        let mut written = vec![];
        for partition in 0..self.writers.len() {
            if let Some(mut writer) = self.writers[partition].take() {
                writer.flush().context("Failed to flush partition file")?;
                written.push((partition, self.partition_path(partition)));
            }
        }
        Ok(written)
    }
}

impl Emitter for PartitionedFileEmitter {
    fn emit(&mut self, key: Key, value: Value) -> anyhow::Result<()> {
        let partition = partition_for(&key, self.writers.len());
        let writer = self.writer(partition)?;
        serde_json::to_writer(&mut *writer, &IntermediateRecord { key, value })
            .context("Failed to serialize intermediate record")?;
        writer
            .write_all(b"\n")
            .context("Failed to write to partition file")?;
        self.records += 1;
        Ok(())
    }
}

pub fn read_intermediate(path: &Path) -> anyhow::Result<Vec<IntermediateRecord>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open intermediate file {}", path.display()))?;
    let mut records = vec![];
    for line in BufReader::new(file).lines() {
        let line = line.context("Failed to read intermediate file")?;
        if line.is_empty() {
            continue;
        }
        records.push(serde_json::from_str(&line).context("Failed to parse intermediate record")?);
    }
    Ok(records)
}

/// Writes final rows for one reduce task.
pub struct OutputFileEmitter {
    path: PathBuf,
    format: MapReduceOutputFormat,
    writer: BufWriter<File>,
    rows: usize,
}

impl OutputFileEmitter {
    pub fn create(path: impl AsRef<Path>, format: MapReduceOutputFormat) -> anyhow::Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            create_dir_all(parent).context("Failed to create output directory")?;
        }
        let file = File::create(&path)
            .with_context(|| format!("Failed to create output file {}", path.display()))?;
        Ok(Self {
            path,
            format,
            writer: BufWriter::new(file),
            rows: 0,
        })
    }

    pub fn finish(mut self) -> anyhow::Result<(PathBuf, usize)> {
        self.writer.flush().context("Failed to flush output file")?;
        Ok((self.path, self.rows))
    }
}

impl Emitter for OutputFileEmitter {
    fn emit(&mut self, key: Key, value: Value) -> anyhow::Result<()> {
        match self.format {
            MapReduceOutputFormat::Text => {
                writeln!(self.writer, "{key}\t{value}").context("Failed to write output row")?
            }
            MapReduceOutputFormat::Json => {
                serde_json::to_writer(&mut self.writer, &IntermediateRecord { key, value })
                    .context("Failed to serialize output row")?;
                self.writer
                    .write_all(b"\n")
                    .context("Failed to write output row")?;
            }
        }
        self.rows += 1;
        Ok(())
    }
}
