//! Pipeline lifecycle integration tests.
//!
//! These tests drive the real plugins against small `sh` stand-ins for the
//! external tools:
//! - File mode and streamed mode conversions
//! - Intermediate file handling
//! - Destination removal before launch
//! - Conversion failures vs tag-copy failures

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;

use transcoder_core::{
    codec::{CodecError, CodecRegistry, ToolPaths},
    pipeline::{FileJob, Pipeline, PipelineConfig, PipelineError, PipelineMode, Stage},
    testing::{fixtures, MockTagBridge},
};

/// `flac` stand-in: decodes and encodes by copying bytes.
const FAKE_FLAC: &str = r#"echo "flac $*" >> "$LOG"
shift
if [ "$1" = "-d" ]; then
  if [ "$2" = "-o" ]; then cp "$4" "$3"; else cat "$3"; fi
elif [ "$3" = "-" ]; then
  cat > "$2"
else
  cp "$3" "$2"
fi"#;

/// `lame` / `afconvert` stand-in: input and destination are the last two arguments.
const FAKE_ENCODER: &str = r#"echo "$(basename "$0") $*" >> "$LOG"
for arg in "$@"; do input=$dest; dest=$arg; done
if [ "$input" = "-" ]; then cat > "$dest"; else cp "$input" "$dest"; fi"#;

/// Helper stand-in: `--encode --suffix <ext> -- cmd args...`.
const FAKE_WRAPPER: &str = r#"echo "wrapper $*" >> "$LOG"
shift 4
spooled="$SCRATCH/spooled.wav"
cat > "$spooled"
for arg do
  shift
  [ "$arg" = "%i" ] && arg=$spooled
  set -- "$@" "$arg"
done
"$@"
status=$?
rm -f "$spooled"
exit $status"#;

const FAILING: &str = r#"echo "$(basename "$0") $*" >> "$LOG"
echo "simulated failure" >&2
exit 1"#;

/// Test helper holding scripted tools and a mock tag bridge.
struct TestHarness {
    dir: TempDir,
    tools: ToolPaths,
    tags: MockTagBridge,
}

impl TestHarness {
    fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let log = dir.path().join("commands.log");
        let scratch = dir.path().join("scratch");
        std::fs::create_dir_all(&scratch).unwrap();

        let prelude = format!(
            "LOG='{}'\nSCRATCH='{}'\n",
            log.display(),
            scratch.display()
        );
        let script = |name: &str, body: &str| {
            fixtures::write_script(dir.path(), name, &format!("{prelude}{body}")).unwrap()
        };

        let tools = ToolPaths::default()
            .with_flac(script("flac", FAKE_FLAC))
            .with_lame(script("lame", FAKE_ENCODER))
            .with_afconvert(script("afconvert", FAKE_ENCODER))
            .with_wrapper(script("wrapper", FAKE_WRAPPER));

        // Also available for tests that swap a tool for a failing one.
        script("failing", FAILING);

        Self {
            dir,
            tools,
            tags: MockTagBridge::new(),
        }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn temp_dir(&self) -> PathBuf {
        self.path("tmp")
    }

    fn config(&self) -> PipelineConfig {
        PipelineConfig::default()
            .with_quality(2)
            .with_temp_dir(self.temp_dir())
    }

    fn pipeline(&self, config: PipelineConfig) -> Pipeline {
        self.pipeline_with_tools(config, self.tools.clone())
    }

    fn pipeline_with_tools(&self, config: PipelineConfig, tools: ToolPaths) -> Pipeline {
        let registry = CodecRegistry::with_builtin(&tools, Arc::new(self.tags.clone()));
        Pipeline::new(config, Arc::new(registry))
    }

    fn source(&self, name: &str, contents: &[u8]) -> PathBuf {
        let path = self.path(name);
        std::fs::write(&path, contents).unwrap();
        self.tags.set_tags(&path, fixtures::sample_tags());
        path
    }

    fn log(&self) -> String {
        std::fs::read_to_string(self.path("commands.log")).unwrap_or_default()
    }

    fn intermediates(&self) -> usize {
        std::fs::read_dir(self.temp_dir())
            .map(|entries| entries.count())
            .unwrap_or(0)
    }
}

fn assert_same_contents(a: &Path, b: &Path) {
    assert_eq!(std::fs::read(a).unwrap(), std::fs::read(b).unwrap());
}

#[tokio::test]
async fn test_file_mode_flac_to_mp3() {
    let harness = TestHarness::new();
    let source = harness.source("song.flac", b"fLaC pretend audio");
    let dest = harness.path("song.mp3");

    let report = harness
        .pipeline(harness.config())
        .run(FileJob::new("job-1", &source, &dest))
        .await
        .unwrap();

    assert_eq!(report.job_id, "job-1");
    assert_eq!(report.mode, PipelineMode::File);
    assert_eq!(report.dest, dest);
    assert_same_contents(&source, &dest);

    let log = harness.log();
    assert!(log.contains("flac --totally-silent -d -o "), "{log}");
    assert!(log.contains("lame --preset cbr 128 "), "{log}");

    // Intermediate removed, tags copied.
    assert_eq!(harness.intermediates(), 0);
    assert_eq!(report.tags_copied, fixtures::sample_tags().len());
    assert_eq!(harness.tags.tags_for(&dest), Some(fixtures::sample_tags()));
}

#[tokio::test]
async fn test_keep_intermediate() {
    let harness = TestHarness::new();
    let source = harness.source("song.flac", b"pcm");

    harness
        .pipeline(harness.config().with_keep_intermediate(true))
        .run(FileJob::new("job", &source, harness.path("song.mp3")))
        .await
        .unwrap();

    let kept: Vec<_> = std::fs::read_dir(harness.temp_dir())
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].extension().unwrap(), "wav");
    assert_same_contents(&source, &kept[0]);
}

#[tokio::test]
async fn test_streamed_mode_flac_to_mp3() {
    let harness = TestHarness::new();
    let source = harness.source("song.flac", b"streamed audio bytes");
    let dest = harness.path("song.mp3");

    let report = harness
        .pipeline(harness.config().with_streaming(true))
        .run(FileJob::new("job", &source, &dest))
        .await
        .unwrap();

    assert_eq!(report.mode, PipelineMode::Streamed);
    assert_same_contents(&source, &dest);
    assert_eq!(harness.intermediates(), 0);

    let log = harness.log();
    assert!(log.contains("flac --totally-silent -d -c "), "{log}");
    assert!(log.contains("lame --preset cbr 128 - "), "{log}");
}

#[tokio::test]
async fn test_streamed_aac_goes_through_helper() {
    let harness = TestHarness::new();
    let source = harness.source("song.flac", b"aac bound audio");
    let dest = harness.path("song.m4a");

    harness
        .pipeline(harness.config().with_streaming(true).with_quality(10))
        .run(FileJob::new("job", &source, &dest))
        .await
        .unwrap();

    assert_same_contents(&source, &dest);
    assert!(!harness.path("scratch/spooled.wav").exists());

    let log = harness.log();
    assert!(log.contains("--encode --suffix .wav --"), "{log}");
    assert!(log.contains("-f m4af -d aac  -s 3 -b 320000"), "{log}");
}

#[tokio::test]
async fn test_flac_to_flac_reencode() {
    let harness = TestHarness::new();
    let source = harness.source("in.flac", b"lossless");
    let dest = harness.path("out.flac");

    let report = harness
        .pipeline(harness.config().with_quality(200).with_streaming(true))
        .run(FileJob::new("job", &source, &dest))
        .await
        .unwrap();

    assert_eq!(report.target_format, "flac");
    assert_same_contents(&source, &dest);
}

#[tokio::test]
async fn test_decode_failure_stops_before_encode() {
    let harness = TestHarness::new();
    let source = harness.source("song.flac", b"corrupt");
    let dest = harness.path("song.mp3");
    let tools = harness.tools.clone().with_flac(harness.path("failing"));

    let err = harness
        .pipeline_with_tools(harness.config(), tools)
        .run(FileJob::new("job", &source, &dest))
        .await
        .unwrap_err();

    assert_eq!(err.stage(), Some(Stage::Decode));
    assert!(matches!(
        &err,
        PipelineError::Codec { source, .. } if source.is_conversion_failure()
    ));
    assert!(!dest.exists());
    assert!(!harness.log().contains("lame"));
    assert!(harness.tags.recorded_writes().is_empty());
    assert_eq!(harness.intermediates(), 0);
}

#[tokio::test]
async fn test_encode_failure_removes_stale_dest_and_skips_tags() {
    let harness = TestHarness::new();
    let source = harness.source("song.flac", b"audio");
    let dest = harness.path("song.mp3");
    std::fs::write(&dest, b"stale output from an earlier run").unwrap();
    let tools = harness.tools.clone().with_lame(harness.path("failing"));

    let err = harness
        .pipeline_with_tools(harness.config(), tools)
        .run(FileJob::new("job", &source, &dest))
        .await
        .unwrap_err();

    assert_eq!(err.stage(), Some(Stage::Encode));
    assert!(!err.audio_converted());
    assert!(!dest.exists());
    assert!(harness.tags.recorded_writes().is_empty());
}

#[tokio::test]
async fn test_streamed_encode_failure() {
    let harness = TestHarness::new();
    let source = harness.source("song.flac", b"audio");
    let dest = harness.path("song.mp3");
    let tools = harness.tools.clone().with_lame(harness.path("failing"));

    let err = harness
        .pipeline_with_tools(harness.config().with_streaming(true), tools)
        .run(FileJob::new("job", &source, &dest))
        .await
        .unwrap_err();

    assert_eq!(err.stage(), Some(Stage::Encode));
}

#[tokio::test]
async fn test_streamed_decode_failure_with_healthy_encoder() {
    let harness = TestHarness::new();
    let source = harness.source("song.flac", b"corrupt");
    let dest = harness.path("song.mp3");
    let tools = harness.tools.clone().with_flac(harness.path("failing"));

    let err = harness
        .pipeline_with_tools(harness.config().with_streaming(true), tools)
        .run(FileJob::new("job", &source, &dest))
        .await
        .unwrap_err();

    assert_eq!(err.stage(), Some(Stage::Decode));
    assert!(matches!(
        &err,
        PipelineError::Codec { source, .. } if source.is_conversion_failure()
    ));
    // The encoder consumed whatever the decoder wrote before dying.
    assert!(harness.log().contains("lame --preset cbr 128 - "));
    assert!(harness.tags.recorded_writes().is_empty());
}

#[tokio::test]
async fn test_missing_encoder_is_launch_failure_after_dest_removal() {
    let harness = TestHarness::new();
    let source = harness.source("song.flac", b"audio");
    let dest = harness.path("song.mp3");
    std::fs::write(&dest, b"stale").unwrap();
    let tools = harness.tools.clone().with_lame("/nonexistent/bin/lame");

    let err = harness
        .pipeline_with_tools(harness.config(), tools)
        .run(FileJob::new("job", &source, &dest))
        .await
        .unwrap_err();

    match err {
        PipelineError::Codec {
            stage: Stage::Encode,
            source,
        } => assert!(source.is_launch_failure()),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!dest.exists());
}

#[tokio::test]
async fn test_invalid_quality_launches_nothing() {
    let harness = TestHarness::new();
    let source = harness.source("song.flac", b"audio");
    let dest = harness.path("song.m4a");
    std::fs::write(&dest, b"previous conversion").unwrap();

    let err = harness
        .pipeline(harness.config().with_quality(11))
        .run(FileJob::new("job", &source, &dest))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        PipelineError::Codec {
            stage: Stage::Encode,
            source: CodecError::InvalidQuality { quality: 11, max: 10, .. },
        }
    ));
    assert_eq!(std::fs::read(&dest).unwrap(), b"previous conversion");
    assert!(harness.log().is_empty());
}

#[tokio::test]
async fn test_tag_failure_is_distinct_from_conversion() {
    let harness = TestHarness::new();
    let source = harness.source("song.flac", b"audio");
    let dest = harness.path("song.mp3");
    harness.tags.fail_writes("container is read-only");

    let err = harness
        .pipeline(harness.config())
        .run(FileJob::new("job", &source, &dest))
        .await
        .unwrap_err();

    assert!(err.audio_converted());
    assert!(matches!(
        &err,
        PipelineError::TagCopy { source } if source.is_tag_failure()
    ));
    assert_same_contents(&source, &dest);
}

#[tokio::test]
async fn test_untagged_source_copies_nothing() {
    let harness = TestHarness::new();
    let source = harness.path("bare.flac");
    std::fs::write(&source, b"audio").unwrap();

    let report = harness
        .pipeline(harness.config())
        .run(FileJob::new("job", &source, harness.path("bare.mp3")))
        .await
        .unwrap();

    assert_eq!(report.tags_copied, 0);
    assert!(harness.tags.recorded_writes().is_empty());
}

#[tokio::test]
async fn test_concurrent_jobs_on_shared_pipeline() {
    let harness = TestHarness::new();
    let pipeline = Arc::new(harness.pipeline(harness.config().with_streaming(true)));

    let mut handles = Vec::new();
    for i in 0..4 {
        let source = harness.source(&format!("track{i}.flac"), format!("audio {i}").as_bytes());
        let dest = harness.path(&format!("track{i}.mp3"));
        let pipeline = Arc::clone(&pipeline);
        handles.push(tokio::spawn(async move {
            pipeline
                .run(FileJob::new(format!("job-{i}"), source, dest))
                .await
        }));
    }

    for (i, handle) in handles.into_iter().enumerate() {
        let report = handle.await.unwrap().unwrap();
        assert_eq!(report.job_id, format!("job-{i}"));
        assert_eq!(
            std::fs::read(harness.path(&format!("track{i}.mp3"))).unwrap(),
            format!("audio {i}").as_bytes()
        );
    }
}
