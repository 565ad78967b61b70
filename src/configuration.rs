//! src/configuration.rs
use crate::executors::ExecutorKind;
use crate::spec::MapReduceOutputFormat;
use serde_aux::field_attributes::deserialize_number_from_string;
use std::path::{Path, PathBuf};

#[derive(serde::Deserialize, Clone, Debug)]
pub struct Settings {
    pub job: JobSettings,
    pub cluster: ClusterSettings,
    pub telemetry: TelemetrySettings,
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct JobSettings {
    /// Files or directories; directories contribute their files, not
    /// recursively.
    pub inputs: Vec<PathBuf>,
    pub output: PathBuf,
    pub work_dir: PathBuf,
    pub stop_words: PathBuf,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub split_bytes: u64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub reduce_tasks: u32,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub spill_records: usize,
    pub output_format: MapReduceOutputFormat,
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct ClusterSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub workers: u32,
    pub executor: ExecutorKind,
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct TelemetrySettings {
    pub service_name: String,
    /// Used when `RUST_LOG` is not set.
    pub log_level: String,
    /// Export spans over OTLP/gRPC to the collector named by the standard
    /// `OTEL_EXPORTER_OTLP_*` variables.
    pub otlp: bool,
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir().map_err(|e| config::ConfigError::Foreign(Box::new(e)))?;
    get_configuration_from(&base_path.join("configuration"))
}

pub fn get_configuration_from(config_dir: &Path) -> Result<Settings, config::ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::from(config_dir.join("base.yaml")))
        .add_source(
            config::Environment::with_prefix("WORDINDEX")
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("job.inputs")
                .try_parsing(true),
        )
        .build()?;
    settings.try_deserialize::<Settings>()
}

#[cfg(test)]
mod tests {
    use super::{get_configuration, get_configuration_from};
    use crate::executors::ExecutorKind;
    use crate::spec::MapReduceOutputFormat;
    use claims::assert_err;
    use std::path::PathBuf;

    #[test]
    fn should_get_base_dot_yaml() {
        let settings = get_configuration().expect("Failed to get configuration");

        assert_eq!(settings.job.stop_words, PathBuf::from("resources/stopwords.txt"));
        assert_eq!(settings.job.output_format, MapReduceOutputFormat::Text);
        assert_eq!(settings.cluster.executor, ExecutorKind::Parallel);
        assert_eq!(settings.cluster.workers, 2);
        assert!(!settings.telemetry.otlp);
    }

    #[test]
    fn should_fail_without_a_configuration_file() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        assert_err!(get_configuration_from(dir.path()));
    }
}
