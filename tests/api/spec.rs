//! tests/api/spec.rs
use crate::helpers::{test_data_dir, test_settings};
use claims::{assert_none, assert_ok, assert_some};
use std::path::{Path, PathBuf};
use wordindex::executors::ExecutorKind;
use wordindex::spec::{
    MapReduceInput, MapReduceInputFormat, MapReduceOutput, MapReduceOutputFormat,
    MapReduceSpecification,
};
use wordindex::startup::IndexJob;

#[test]
fn you_should_be_able_to_create_a_map_reduce_spec() {
    let spec = MapReduceSpecification::new("/tmp/wordindex", 2, 4096, 16);
    assert_eq!(spec.machines(), 2);
    assert_eq!(spec.split_bytes(), 4096);
    assert_eq!(spec.spill_records(), 16);
    assert_eq!(spec.work_dir(), Path::new("/tmp/wordindex"));
}

#[test]
fn you_should_be_able_to_add_input_to_a_map_reduce_spec() {
    let mut spec = MapReduceSpecification::new("/tmp/wordindex", 2, 4096, 16);

    for i in 0..5 {
        let input = MapReduceInput::new(
            MapReduceInputFormat::Text,
            format!("corpus/input_{i}.txt"),
            "line_indexer",
        );
        spec.add_input(input);
    }

    assert_eq!(spec.inputs().len(), 5);

    for (i, input) in spec.inputs().iter().enumerate() {
        assert_eq!(input.file_name(), Some(format!("input_{i}.txt").as_str()));
        assert_eq!(*input.format(), MapReduceInputFormat::Text);
        assert_eq!(input.mapper(), "line_indexer");
    }
}

#[test]
fn you_should_be_able_to_define_a_map_reduce_output_on_a_spec() {
    let mut spec = MapReduceSpecification::new("/tmp/wordindex", 2, 4096, 16);

    assert_none!(spec.output());

    spec.set_output(MapReduceOutput::new(
        "/root/home/word_index",
        100,
        MapReduceOutputFormat::Text,
        "line_aggregator",
        Some("line_combiner"),
    ));

    let output = assert_some!(spec.output());
    assert_eq!(output.base_path(), Path::new("/root/home/word_index"));
    assert_eq!(*output.format(), MapReduceOutputFormat::Text);
    assert_eq!(output.num_tasks(), 100);
    assert_eq!(output.combiner(), Some("line_combiner"));
    assert_eq!(output.reducer(), "line_aggregator");
}

#[test]
fn index_job_wires_the_line_functions_together() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let corpus = test_data_dir().join("corpus");
    let settings = test_settings(dir.path(), vec![corpus.clone()], ExecutorKind::Sequential);

    let job = assert_ok!(IndexJob::build(settings));
    let spec = assert_ok!(job.specification());

    let inputs: Vec<PathBuf> = spec.inputs().iter().map(|i| i.path().to_path_buf()).collect();
    assert_eq!(inputs, vec![corpus.join("lamb.txt"), corpus.join("tyger.txt")]);
    assert!(spec.inputs().iter().all(|i| i.mapper() == "line_indexer"));
    let output = assert_some!(spec.output());
    assert_eq!(output.reducer(), "line_aggregator");
    assert_eq!(output.combiner(), Some("line_combiner"));
    assert_eq!(output.num_tasks(), 3);
}
