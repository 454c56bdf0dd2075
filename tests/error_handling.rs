//! Error handling integration tests.
//!
//! Fixture-based tests require files from `tests/fixtures/generate_fixtures.sh`
//! and skip themselves when those are missing.

use std::path::Path;

use lumaslice::{
    ContainerDemuxer, Demuxer, ExtractionConfig, ExtractionSession, LumaError, RegionSpec,
    SelectionPolicy,
};

const SAMPLE_VIDEO: &str = "tests/fixtures/sample_video.mp4";
const SAMPLE_AUDIO_ONLY: &str = "tests/fixtures/sample_audio_only.mp4";

#[test]
fn open_nonexistent_file() {
    let result = ContainerDemuxer::open("this_file_does_not_exist.mp4");

    let error_message = result.unwrap_err().to_string();
    assert!(
        error_message.contains("Failed to open media file"),
        "Error message should mention file open failure: {error_message}",
    );
}

#[test]
fn open_invalid_file() {
    let temporary_directory = tempfile::tempdir().expect("Failed to create temp dir");
    let invalid_file_path = temporary_directory.path().join("invalid.mp4");
    std::fs::write(&invalid_file_path, b"this is not a media file")
        .expect("Failed to write invalid file");

    let mut session = ExtractionSession::new(ExtractionConfig::new());
    let result = session.process(&invalid_file_path);

    assert!(matches!(result, Err(LumaError::FileOpen { .. })));
}

#[test]
fn session_extracts_from_sample_video() {
    if !Path::new(SAMPLE_VIDEO).exists() {
        return;
    }

    let config = ExtractionConfig::new()
        .with_policy(SelectionPolicy::run(2, 3).unwrap())
        .with_region(RegionSpec::square(16).unwrap());
    let mut session = ExtractionSession::new(config);

    let outcome = session.process(SAMPLE_VIDEO).expect("Failed to extract from test video");

    assert_eq!(outcome.selected, 3);
    assert_eq!(outcome.decoded, 5);
    assert!(session.records().iter().all(|record| record.pixels().len() == 256));
}

#[test]
fn resampled_extraction_from_sample_video() {
    if !Path::new(SAMPLE_VIDEO).exists() {
        return;
    }

    let config = ExtractionConfig::new()
        .with_policy(SelectionPolicy::single(0))
        .with_region(RegionSpec::square(8).unwrap())
        .with_resample(true);
    let mut session = ExtractionSession::new(config);

    session.process(SAMPLE_VIDEO).expect("Failed to extract from test video");

    assert_eq!(session.records().len(), 1);
    assert_eq!(session.records()[0].pixels().len(), 64);
}

#[test]
fn sample_video_stream_is_h264() {
    if !Path::new(SAMPLE_VIDEO).exists() {
        return;
    }

    let demuxer = ContainerDemuxer::open(SAMPLE_VIDEO).expect("Failed to open test video");
    let stream = demuxer.video_stream().expect("video stream");
    assert_eq!(stream.codec_name, "h264");
}

#[test]
fn no_video_stream_error() {
    if !Path::new(SAMPLE_AUDIO_ONLY).exists() {
        return;
    }

    let mut session = ExtractionSession::new(ExtractionConfig::new());
    let error = session.process(SAMPLE_AUDIO_ONLY).unwrap_err();

    assert!(error.is_recoverable());
    assert!(
        error.to_string().contains("No video stream"),
        "Error should mention missing video stream: {error}",
    );
}
