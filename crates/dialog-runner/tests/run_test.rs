//! End-to-end tests for the runner pipeline

use clap::Parser;
use dialog_runner::{resolve_config, run, Cli, LayoutKind};
use rstest::rstest;
use std::fs;
use std::future;
use std::path::Path;
use tempfile::TempDir;

const LOG: &str = r#"<LOG T="00:00:00.00">
<R T="00:00:01.00" S="PARSER">
(TELL :RECEIVER IM :CONTENT (WORDS "hi"))
</R>
<R T="00:00:02.00" S="KEYBOARD">
(REQUEST :RECEIVER KEYBOARD :CONTENT (INPUT :TEXT "hi"))
</R>
<R T="00:00:05.00" S="IM">
(TELL :RECEIVER DAGENT :CONTENT (UTT))
</R>
<S T="00:00:09.00" R="KEYBOARD">
(TELL :CONTENT (SPOKEN :WHAT "hello"))
</S>
"#;

/// Small, fast animation: 8 s * 0.5 * 2 fps + 1 padding = 9 frames.
const CONFIG: &str = "animation:\n  fps: 2\n  time_scale: 0.5\n  frame_padding: 1\n";

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new(log: &str) -> Self {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("session.log"), log).unwrap();
        fs::write(dir.path().join("config.yaml"), CONFIG).unwrap();
        Self { dir }
    }

    fn path(&self, name: &str) -> String {
        self.dir.path().join(name).to_string_lossy().into_owned()
    }

    fn cli(&self, extra: &[&str]) -> Cli {
        let mut args = vec![
            "dialog-runner".to_string(),
            self.path("session.log"),
            "--config".to_string(),
            self.path("config.yaml"),
            "--frames-dir".to_string(),
            self.path("frames"),
            "--layout".to_string(),
            "circular".to_string(),
        ];
        args.extend(extra.iter().map(|s| s.to_string()));
        Cli::try_parse_from(args).unwrap()
    }
}

fn png_count(dir: &Path) -> usize {
    fs::read_dir(dir)
        .unwrap()
        .filter(|e| {
            e.as_ref()
                .unwrap()
                .path()
                .extension()
                .is_some_and(|x| x == "png")
        })
        .count()
}

#[test]
fn test_cli_defaults() {
    let cli = Cli::try_parse_from(["dialog-runner", "facilitator.log"]).unwrap();
    assert_eq!(cli.log, Path::new("facilitator.log"));
    assert_eq!(cli.layout, LayoutKind::Dot);
    assert!(cli.config.is_none());
    assert!(!cli.no_encode);
    assert!(!cli.summary_only);
}

#[rstest]
#[case(&["dialog-runner"])]
#[case(&["dialog-runner", "a.log", "--layout", "spring"])]
#[case(&["dialog-runner", "a.log", "--workers", "many"])]
fn test_cli_rejects_bad_arguments(#[case] args: &[&str]) {
    assert!(Cli::try_parse_from(args).is_err());
}

#[test]
fn test_command_line_overrides_configuration() {
    let fixture = Fixture::new(LOG);
    let cli = fixture.cli(&["--workers", "2", "--output", "movie.mp4"]);
    let config = resolve_config(&cli).unwrap();
    assert_eq!(config.workers, Some(2));
    assert_eq!(config.output.video, "movie.mp4");
    assert_eq!(config.output.frames_dir, fixture.path("frames"));
    assert_eq!(config.animation.fps, 2.0);
}

#[test]
fn test_zero_workers_is_rejected() {
    let fixture = Fixture::new(LOG);
    let err = resolve_config(&fixture.cli(&["--workers", "0"])).unwrap_err();
    assert!(err.to_string().contains("workers"));
}

#[tokio::test]
async fn test_summary_only_skips_rendering() {
    let fixture = Fixture::new(LOG);
    let cli = fixture.cli(&["--summary-only", "--dot", &fixture.path("graph.dot")]);

    let summary = run(&cli, future::pending()).await.unwrap();

    assert_eq!(summary.messages, 2);
    assert_eq!(summary.speeches, 2);
    assert_eq!(summary.frames, 0);
    assert!(!fixture.dir.path().join("frames").exists());
    let dot = fs::read_to_string(fixture.path("graph.dot")).unwrap();
    assert!(dot.contains("\"PARSER\" -> \"IM\";"));
    assert!(dot.contains("\"IM\" -> \"DAGENT\";"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_frames_are_rendered_without_encoding() {
    let fixture = Fixture::new(LOG);
    let cli = fixture.cli(&["--no-encode", "--workers", "3"]);

    let summary = run(&cli, future::pending()).await.unwrap();

    assert_eq!(summary.frames, 9);
    assert!(summary.video.is_none());
    let frames = fixture.dir.path().join("frames");
    assert_eq!(png_count(&frames), 9);
    assert!(frames.join("00000.png").is_file());
    assert!(frames.join("00008.png").is_file());
}

#[tokio::test]
async fn test_session_without_messages_is_an_error() {
    let fixture = Fixture::new(
        r#"<R T="00:00:02.00" S="KEYBOARD">
(REQUEST :RECEIVER KEYBOARD :CONTENT (INPUT :TEXT "hi"))
</R>
"#,
    );
    let err = run(&fixture.cli(&["--no-encode"]), future::pending())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("no accepted messages"));
}

#[tokio::test]
async fn test_malformed_log_aborts_the_run() {
    let fixture = Fixture::new("<R T=\"00:00:01.00\" S=\"IM\">\n(TELL :RECEIVER DAGENT)\n");
    let err = run(&fixture.cli(&["--no-encode"]), future::pending())
        .await
        .unwrap_err();
    assert!(format!("{err:#}").contains("never closed"));
}

#[tokio::test]
async fn test_interrupt_produces_no_video() {
    let fixture = Fixture::new(LOG);
    let err = run(&fixture.cli(&["--workers", "1"]), async {}).await.unwrap_err();
    assert!(err.to_string().contains("interrupted"));
}
