//! tests/api/helpers.rs
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use wordindex::configuration::{ClusterSettings, JobSettings, Settings, TelemetrySettings};
use wordindex::executors::ExecutorKind;
use wordindex::spec::MapReduceOutputFormat;
use wordindex::telemetry::init_tracing;

static TRACING: LazyLock<()> = LazyLock::new(|| {
    let settings = TelemetrySettings {
        service_name: "tests::api".into(),
        log_level: "warn".into(),
        otlp: false,
    };
    init_tracing(&settings).expect("Failed to setup tracing");
});

pub fn test_data_dir() -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("data");
    path
}

pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("Failed to write test input");
    path
}

/// Settings for a job rooted in `root`: output in `root/out`, scratch
/// space in `root/work`.
pub fn test_settings(root: &Path, inputs: Vec<PathBuf>, executor: ExecutorKind) -> Settings {
    LazyLock::force(&TRACING);
    Settings {
        job: JobSettings {
            inputs,
            output: root.join("out"),
            work_dir: root.join("work"),
            stop_words: test_data_dir().join("stopwords.txt"),
            split_bytes: 1024 * 1024,
            reduce_tasks: 3,
            spill_records: 10_000,
            output_format: MapReduceOutputFormat::Text,
        },
        cluster: ClusterSettings {
            workers: 2,
            executor,
        },
        telemetry: TelemetrySettings {
            service_name: "tests::api".into(),
            log_level: "warn".into(),
            otlp: false,
        },
    }
}

/// Every `word<TAB>occurrences` row across all part files, by word.
pub fn read_text_output(files: &[PathBuf]) -> BTreeMap<String, String> {
    let mut rows = BTreeMap::new();
    for file in files {
        let contents = std::fs::read_to_string(file).expect("Failed to read output file");
        for line in contents.lines() {
            let (word, occurrences) = line.split_once('\t').expect("Row without a tab");
            let previous = rows.insert(word.to_string(), occurrences.to_string());
            assert!(previous.is_none(), "{word} written twice");
        }
    }
    rows
}
