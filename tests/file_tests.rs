//! File-backed runs: FileSource/FileSink, missing paths, sample input, atomic temp handling.

use capsflow::pipeline::{
    ChunkSink, ChunkSource, Coordinator, FileSink, FileSource, NullObserver, PipelineError,
    RunObserver, Uppercase, transform_file,
};
use capsflow::engine::run_transform;
use capsflow::utils::config::SampleInputConsts;
use capsflow::utils::{
    rename_temp_to_final, remove_stale_temp, temp_path_for, write_sample_input,
};
use capsflow::{Opts, ProgressReport, RunSummary, Stage, uppercase_file};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Default)]
struct Recorder {
    progress: Vec<ProgressReport>,
    finished: usize,
    errors: Vec<Stage>,
}

impl RunObserver for Recorder {
    fn on_progress(&mut self, report: &ProgressReport) {
        self.progress.push(*report);
    }
    fn on_finished(&mut self, _summary: &RunSummary) {
        self.finished += 1;
    }
    fn on_error(&mut self, stage: Stage, _err: &PipelineError) {
        self.errors.push(stage);
    }
}

// --- FileSource / FileSink ---

#[test]
fn test_hello_world_file_in_two_chunks() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.txt");
    let output = dir.path().join("out.txt");
    fs::write(&input, "hello\nworld\n").unwrap();

    let mut recorder = Recorder::default();
    let mut coordinator = Coordinator::new(
        FileSource::with_chunk_size(&input, 6),
        FileSink::new(&output),
        Uppercase,
    );
    let summary = coordinator.run(&mut recorder).unwrap();

    assert_eq!(fs::read(&output).unwrap(), b"HELLO\nWORLD\n");
    assert_eq!(summary.total_lines, 2);
    assert_eq!(summary.total_bytes, 12);
    assert_eq!(recorder.finished, 1);
    assert!(recorder.errors.is_empty());
    // 6 of 12 bytes, then all 12.
    let pcts: Vec<u8> = recorder.progress.iter().map(|r| r.percent).collect();
    assert_eq!(pcts, vec![10, 20, 30, 40, 50, 60, 70, 80, 90, 100]);
    assert_eq!(recorder.progress[4].lines, 1);
    assert_eq!(recorder.progress[9].lines, 2);
}

#[test]
fn test_file_source_yields_whole_file_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.bin");
    let data: Vec<u8> = (0..=255u8).cycle().take(10_000).collect();
    fs::write(&input, &data).unwrap();

    let mut source = FileSource::with_chunk_size(&input, 333);
    assert_eq!(source.probe_size().unwrap(), 10_000);
    let mut read = Vec::new();
    while let Some(chunk) = source.next_chunk().unwrap() {
        assert!(chunk.len() <= 333);
        read.extend(chunk);
    }
    assert_eq!(read, data);
    assert!(source.next_chunk().unwrap().is_none());
}

#[test]
fn test_file_sink_creates_empty_output_on_close() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("empty.txt");
    let mut sink = FileSink::new(&output);
    assert!(!output.exists());
    sink.close().unwrap();
    assert_eq!(fs::read(&output).unwrap(), b"");
}

#[test]
fn test_empty_input_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.txt");
    let output = dir.path().join("out.txt");
    fs::write(&input, "").unwrap();
    let mut recorder = Recorder::default();
    let summary = transform_file(&input, &output, &mut recorder, None).unwrap();
    assert_eq!(summary.total_lines, 0);
    assert!(recorder.progress.is_empty());
    assert_eq!(fs::read(&output).unwrap(), b"");
}

// --- failures ---

#[test]
fn test_missing_input_fails_without_creating_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("does-not-exist.txt");
    let output = dir.path().join("out.txt");
    let mut recorder = Recorder::default();
    let err = transform_file(&input, &output, &mut recorder, None).unwrap_err();
    assert!(matches!(err, PipelineError::SourceUnavailable { .. }));
    assert_eq!(recorder.errors, vec![Stage::Source]);
    assert_eq!(recorder.finished, 0);
    assert!(!output.exists());
}

#[test]
fn test_missing_input_leaves_existing_output_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.txt");
    fs::write(&output, "keep me").unwrap();
    let err = transform_file(
        &dir.path().join("missing.txt"),
        &output,
        &mut NullObserver,
        None,
    )
    .unwrap_err();
    assert_eq!(err.stage(), Stage::Source);
    assert_eq!(fs::read_to_string(&output).unwrap(), "keep me");
}

#[test]
fn test_directory_input_is_source_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.txt");
    let err = transform_file(dir.path(), &output, &mut NullObserver, None).unwrap_err();
    assert!(matches!(err, PipelineError::SourceUnavailable { .. }));
    assert!(!output.exists());
}

#[test]
fn test_unwritable_output_is_sink_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.txt");
    fs::write(&input, "abc\n").unwrap();
    let output = dir.path().join("no-such-dir").join("out.txt");
    let mut recorder = Recorder::default();
    let err = transform_file(&input, &output, &mut recorder, None).unwrap_err();
    assert!(matches!(err, PipelineError::SinkUnavailable { .. }));
    assert_eq!(recorder.errors, vec![Stage::Sink]);
    assert_eq!(recorder.finished, 0);
}

// --- sample input ---

#[test]
fn test_sample_input_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("large-input.txt");
    let output = dir.path().join("large-output.txt");
    let line = SampleInputConsts::LINE;
    let lines = write_sample_input(&input, 200_000).unwrap();
    assert_eq!(lines, 200_000 / line.len() as u64);
    assert_eq!(
        fs::metadata(&input).unwrap().len(),
        lines * line.len() as u64
    );

    let mut recorder = Recorder::default();
    let summary = uppercase_file(&input, &output, &mut recorder, None).unwrap();
    assert_eq!(summary.total_lines, lines);
    assert_eq!(summary.total_bytes, lines * line.len() as u64);
    assert_eq!(recorder.progress.len(), 10);
    assert_eq!(recorder.progress.last().map(|r| r.lines), Some(lines));

    let expected = line.to_uppercase().repeat(lines as usize);
    assert_eq!(fs::read_to_string(&output).unwrap(), expected);
}

#[test]
fn test_sample_input_smaller_than_one_line_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("tiny.txt");
    assert_eq!(write_sample_input(&input, 10).unwrap(), 0);
    assert_eq!(fs::metadata(&input).unwrap().len(), 0);
}

// --- atomic output helpers ---

#[test]
fn test_temp_path_is_sibling_of_output() {
    let output = PathBuf::from("/data/out/result.txt");
    let temp = temp_path_for(&output);
    assert_eq!(temp.parent(), output.parent());
    assert_eq!(
        temp.file_name().unwrap().to_string_lossy(),
        "result.txt.capsflow.tmp"
    );
}

#[test]
fn test_temp_written_then_renamed() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.txt");
    let output = dir.path().join("out.txt");
    fs::write(&input, "atomic\n").unwrap();
    let temp = temp_path_for(&output);
    fs::write(&temp, "stale").unwrap();

    remove_stale_temp(&temp).unwrap();
    assert!(!temp.exists());
    remove_stale_temp(&temp).unwrap();

    transform_file(&input, &temp, &mut NullObserver, None).unwrap();
    assert!(!output.exists());
    rename_temp_to_final(&temp, &output).unwrap();
    assert!(!temp.exists());
    assert_eq!(fs::read_to_string(&output).unwrap(), "ATOMIC\n");
}

/// Sets the cancel flag on the first progress report, after the first chunk reached the sink.
struct CancelOnProgress(Arc<AtomicBool>);

impl RunObserver for CancelOnProgress {
    fn on_progress(&mut self, _report: &ProgressReport) {
        self.0.store(true, Ordering::Relaxed);
    }
}

fn atomic_opts(input: PathBuf, output: PathBuf) -> Opts {
    Opts {
        input,
        output,
        atomic: true,
        ..Opts::default()
    }
}

#[test]
fn test_atomic_run_renames_temp_into_place() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.txt");
    let output = dir.path().join("out.txt");
    fs::write(&input, "hello\nworld\n").unwrap();
    fs::write(&output, "previous").unwrap();
    let temp = temp_path_for(&output);
    fs::write(&temp, "stale").unwrap();

    let opts = atomic_opts(input, output.clone());
    let summary = run_transform(&opts, &mut NullObserver, None).unwrap();
    assert_eq!(summary.total_lines, 2);
    assert!(!temp.exists());
    assert_eq!(fs::read_to_string(&output).unwrap(), "HELLO\nWORLD\n");
}

#[test]
fn test_atomic_failure_discards_temp_and_keeps_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.txt");
    let output = dir.path().join("out.txt");
    // Several default-size reads, so the temp file exists before the run is cancelled.
    fs::write(&input, "abcdefghijklmno\n".repeat(16 * 1024)).unwrap();
    fs::write(&output, "keep me").unwrap();

    let cancel = Arc::new(AtomicBool::new(false));
    let mut observer = CancelOnProgress(Arc::clone(&cancel));
    let opts = atomic_opts(input, output.clone());
    let err = run_transform(&opts, &mut observer, Some(cancel)).unwrap_err();

    assert!(matches!(
        err.downcast_ref::<PipelineError>(),
        Some(PipelineError::Cancelled)
    ));
    assert!(!temp_path_for(&output).exists());
    assert_eq!(fs::read_to_string(&output).unwrap(), "keep me");
    let leftovers: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|name| name.ends_with(".capsflow.tmp"))
        .collect();
    assert!(leftovers.is_empty(), "{:?}", leftovers);
}

#[test]
fn test_atomic_missing_input_leaves_output_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.txt");
    fs::write(&output, "keep me").unwrap();

    let opts = atomic_opts(dir.path().join("missing.txt"), output.clone());
    assert!(run_transform(&opts, &mut NullObserver, None).is_err());
    assert!(!temp_path_for(&output).exists());
    assert_eq!(fs::read_to_string(&output).unwrap(), "keep me");
}

// --- JSON summary ---

#[test]
fn test_summary_json_fields() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.txt");
    let output = dir.path().join("out.txt");
    fs::write(&input, "one\ntwo\nthree\n").unwrap();

    let summary = uppercase_file(&input, &output, &mut NullObserver, None).unwrap();
    let value = serde_json::to_value(&summary).unwrap();
    assert_eq!(value["total_lines"], 3);
    assert_eq!(value["total_bytes"], 14);
    assert!(value["elapsed_secs"].is_f64());
    assert!(value.get("elapsed").is_none());
}
