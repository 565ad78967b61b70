//! tests/api/pipeline.rs
use crate::helpers::{read_text_output, test_data_dir, test_settings, write_file};
use claims::{assert_err, assert_ok};
use std::collections::BTreeMap;
use wordindex::configuration::Settings;
use wordindex::emitter::read_intermediate;
use wordindex::executors::ExecutorKind;
use wordindex::mapreduce::JobReport;
use wordindex::spec::MapReduceOutputFormat;
use wordindex::startup::IndexJob;

const FOX: &str = "the quick Fox.\nA QUICK fox runs.\n";

async fn run_job(settings: Settings) -> (JobReport, BTreeMap<String, String>) {
    let job = IndexJob::build(settings).expect("Failed to build job");
    let report = job.run().await.expect("Failed to run job");
    let rows = read_text_output(&report.output_files);
    (report, rows)
}

#[tokio::test]
async fn should_index_words_by_file_and_line() {
    for executor in [ExecutorKind::Sequential, ExecutorKind::Parallel] {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let input = write_file(dir.path(), "a.txt", FOX);

        let (report, rows) = run_job(test_settings(dir.path(), vec![input], executor)).await;

        assert_eq!(rows.len(), 3);
        assert_eq!(rows["fox"], "(a.txt, 1, 2)");
        assert_eq!(rows["quick"], "(a.txt, 1, 2)");
        assert_eq!(rows["runs"], "(a.txt, 2)");
        assert!(!rows.contains_key("the"));
        assert!(!rows.contains_key("a"));
        assert_eq!(report.records_mapped, 5);
        assert_eq!(report.rows_written, 3);
        assert_eq!(report.skipped_fragments, 0);
    }
}

#[tokio::test]
async fn files_are_listed_in_first_encounter_order() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let a = write_file(dir.path(), "b_first.txt", "fox\n");
    let b = write_file(dir.path(), "a_second.txt", "\n\n\n\nthe fox\n");

    let settings = test_settings(dir.path(), vec![a, b], ExecutorKind::Parallel);
    let (_, rows) = run_job(settings).await;

    assert_eq!(rows["fox"], "(b_first.txt, 1) (a_second.txt, 5)");
}

#[tokio::test]
async fn small_splits_and_spills_give_the_same_index() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let corpus = test_data_dir().join("corpus");

    let coarse = test_settings(
        &dir.path().join("coarse"),
        vec![corpus.clone()],
        ExecutorKind::Sequential,
    );
    let (_, expected) = run_job(coarse).await;

    let mut fine = test_settings(&dir.path().join("fine"), vec![corpus], ExecutorKind::Parallel);
    fine.job.split_bytes = 40;
    fine.job.spill_records = 1;
    fine.job.reduce_tasks = 5;
    fine.cluster.workers = 3;
    let (report, rows) = run_job(fine).await;

    assert!(report.map_tasks > 2);
    assert!(report.intermediate_records <= report.records_mapped);
    assert_eq!(rows, expected);
}

#[tokio::test]
async fn corpus_rows_match_a_hand_built_index() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let corpus = test_data_dir().join("corpus");
    let mut settings = test_settings(dir.path(), vec![corpus], ExecutorKind::Sequential);
    settings.job.split_bytes = 64;
    settings.job.spill_records = 3;

    let (_, rows) = run_job(settings).await;

    assert_eq!(rows["bright"], "(lamb.txt, 6) (tyger.txt, 1)");
    assert_eq!(rows["tyger"], "(tyger.txt, 1, 1)");
    assert_eq!(rows["thee"], "(lamb.txt, 1, 2, 3, 3, 5)");
    assert_eq!(rows["fire"], "(tyger.txt, 7, 9)");
    assert_eq!(rows["what"], "(tyger.txt, 3, 6, 8, 9)");
    assert_eq!(rows["o"], "(lamb.txt, 4)");
    assert_eq!(rows["er"], "(lamb.txt, 4)");
    assert!(!rows.contains_key("the"));
}

#[tokio::test]
async fn empty_and_delimiter_only_files_add_nothing() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let empty = write_file(dir.path(), "empty.txt", "");
    let dots = write_file(dir.path(), "dots.txt", "...\n-- !! --\n");

    let settings = test_settings(dir.path(), vec![empty, dots], ExecutorKind::Parallel);
    let (report, rows) = run_job(settings).await;

    assert!(rows.is_empty());
    assert_eq!(report.records_mapped, 0);
    assert_eq!(report.reduce_tasks, 3);
}

#[tokio::test]
async fn json_output_holds_the_same_rows() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let input = write_file(dir.path(), "a.txt", FOX);
    let mut settings = test_settings(dir.path(), vec![input], ExecutorKind::Sequential);
    settings.job.output_format = MapReduceOutputFormat::Json;

    let report = assert_ok!(IndexJob::build(settings).expect("Failed to build job").run().await);

    let mut rows = BTreeMap::new();
    for file in &report.output_files {
        for record in read_intermediate(file).expect("Failed to read JSON output") {
            rows.insert(record.key, record.value);
        }
    }
    assert_eq!(rows["runs"], "(a.txt, 2)");
    assert_eq!(rows.len(), 3);
}

#[tokio::test]
async fn scratch_files_are_removed_after_the_job() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let input = write_file(dir.path(), "a.txt", FOX);
    let settings = test_settings(dir.path(), vec![input], ExecutorKind::Parallel);
    let work_dir = settings.job.work_dir.clone();

    let (report, _) = run_job(settings).await;

    let job_dir = work_dir.join(report.job_id.to_string());
    assert!(!job_dir.exists());
}

#[tokio::test]
async fn missing_stop_words_fail_before_any_work() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let input = write_file(dir.path(), "a.txt", FOX);
    let mut settings = test_settings(dir.path(), vec![input], ExecutorKind::Parallel);
    settings.job.stop_words = dir.path().join("missing.txt");
    let work_dir = settings.job.work_dir.clone();

    assert_err!(IndexJob::build(settings));
    assert!(!work_dir.exists());
}

#[tokio::test]
async fn existing_output_is_never_overwritten() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let input = write_file(dir.path(), "a.txt", FOX);
    let settings = test_settings(dir.path(), vec![input], ExecutorKind::Parallel);
    std::fs::create_dir_all(&settings.job.output).expect("Failed to create output dir");
    write_file(&settings.job.output, "part-r-00000", "old\trow\n");
    let work_dir = settings.job.work_dir.clone();
    let output = settings.job.output.clone();

    let job = IndexJob::build(settings).expect("Failed to build job");
    assert_err!(job.run().await);

    let old = std::fs::read_to_string(output.join("part-r-00000")).expect("Failed to read");
    assert_eq!(old, "old\trow\n");
    let leftovers = match std::fs::read_dir(&work_dir) {
        Ok(entries) => entries.count(),
        Err(_) => 0,
    };
    assert_eq!(leftovers, 0);
}
