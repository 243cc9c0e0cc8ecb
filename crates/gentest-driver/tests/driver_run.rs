//! Integration tests: fixture directory → driver → signed files on disk.

use gentest_core::sign::{Signature, verify_signature};
use gentest_core::{BackendKind, BackendRecord, Execution, FixturePage};
use gentest_driver::{
    Driver, DriverConfig, ExecutionHost, HostChoice, HostError, OutputLayout, ReplayHost,
};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

const MARGIN_FIXTURE: &str = include_str!("fixtures/YGMarginTest.html");
const MARGIN_LAYOUT: &str = include_str!("fixtures/YGMarginTest.json");

// ─── Helpers ─────────────────────────────────────────────────────────────

struct Workspace {
    fixtures: TempDir,
    replay: TempDir,
    root: TempDir,
}

impl Workspace {
    fn new() -> Self {
        Self {
            fixtures: tempfile::tempdir().unwrap(),
            replay: tempfile::tempdir().unwrap(),
            root: tempfile::tempdir().unwrap(),
        }
    }

    fn add_fixture(&self, name: &str, html: &str, layout: Option<&str>) {
        std::fs::write(self.fixtures.path().join(format!("{name}.html")), html).unwrap();
        if let Some(json) = layout {
            std::fs::write(self.replay.path().join(format!("{name}.json")), json).unwrap();
        }
    }

    fn config(&self) -> DriverConfig {
        DriverConfig {
            fixtures_dir: self.fixtures.path().to_path_buf(),
            host: HostChoice::Replay(self.replay.path().to_path_buf()),
            output: OutputLayout::new(self.root.path()),
            ..DriverConfig::default()
        }
    }

    fn read(&self, relative: &str) -> String {
        std::fs::read_to_string(self.root.path().join(relative))
            .unwrap_or_else(|e| panic!("{relative}: {e}"))
    }

    fn exists(&self, relative: &str) -> bool {
        self.root.path().join(relative).is_file()
    }
}

/// Serves a fixed execution for every fixture.
struct ScriptedHost {
    execution: Execution,
}

impl ExecutionHost for ScriptedHost {
    async fn execute(&mut self, _page: &FixturePage) -> Result<Execution, HostError> {
        Ok(self.execution.clone())
    }

    async fn shutdown(self) -> Result<(), HostError> {
        Ok(())
    }
}

fn record(backend: BackendKind) -> BackendRecord {
    BackendRecord {
        backend,
        source: format!("/**\n * MAGIC_PLACEHOLDER\n */\n// {backend} YogaTest\n"),
    }
}

fn scripted(backends: &[BackendKind]) -> ScriptedHost {
    ScriptedHost {
        execution: Execution {
            records: backends.iter().copied().map(record).collect(),
            failures: Vec::new(),
        },
    }
}

const ALL_OUTPUTS: [&str; 4] = [
    "tests/generated/YGMarginTest.cpp",
    "java/tests/generated/com/facebook/yoga/YGMarginTest.java",
    "javascript/tests/generated/YGMarginTest.test.ts",
    "tests/margin_test.go",
];

// ─── Replay runs ─────────────────────────────────────────────────────────

#[tokio::test]
async fn replay_writes_signed_files_for_every_backend() {
    let ws = Workspace::new();
    ws.add_fixture("YGMarginTest", MARGIN_FIXTURE, Some(MARGIN_LAYOUT));

    let host = ReplayHost::new(ws.replay.path());
    let summary = Driver::new(host, ws.config()).run().await.unwrap();

    assert!(summary.is_success(), "{:?}", summary.diagnostics);
    assert_eq!(summary.fixtures, vec!["YGMarginTest".to_string()]);
    assert_eq!(summary.written.len(), 4);

    for relative in ALL_OUTPUTS {
        let text = ws.read(relative);
        assert_eq!(verify_signature(&text), Signature::Signed, "{relative}");
        assert!(!text.contains("MAGIC_PLACEHOLDER"), "{relative}");
    }

    let java = ws.read(ALL_OUTPUTS[1]);
    assert!(java.contains("public class YGMarginTest {"));
    assert!(!java.contains("YogaTest"));

    let cpp = ws.read(ALL_OUTPUTS[0]);
    assert!(cpp.contains("TEST(YogaTest, margin_start_ltr) {"));
}

#[tokio::test]
async fn rerunning_produces_identical_files() {
    let ws = Workspace::new();
    ws.add_fixture("YGMarginTest", MARGIN_FIXTURE, Some(MARGIN_LAYOUT));

    Driver::new(ReplayHost::new(ws.replay.path()), ws.config())
        .run()
        .await
        .unwrap();
    let first: Vec<String> = ALL_OUTPUTS.iter().map(|p| ws.read(p)).collect();

    Driver::new(ReplayHost::new(ws.replay.path()), ws.config())
        .run()
        .await
        .unwrap();
    let second: Vec<String> = ALL_OUTPUTS.iter().map(|p| ws.read(p)).collect();

    assert_eq!(first, second);
}

#[tokio::test]
async fn failing_fixture_does_not_stop_the_batch() {
    let ws = Workspace::new();
    // Sorted first, and has no recorded layout.
    ws.add_fixture("YGAlignTest", r#"<div id="align" style="width: 10px"></div>"#, None);
    ws.add_fixture("YGMarginTest", MARGIN_FIXTURE, Some(MARGIN_LAYOUT));

    let summary = Driver::new(ReplayHost::new(ws.replay.path()), ws.config())
        .run()
        .await
        .unwrap();

    assert_eq!(summary.fixtures, vec!["YGAlignTest", "YGMarginTest"]);
    assert_eq!(summary.failed(), vec!["YGAlignTest"]);
    assert_eq!(summary.diagnostics[0].backend, None);
    assert!(!ws.exists("tests/generated/YGAlignTest.cpp"));
    for relative in ALL_OUTPUTS {
        assert!(ws.exists(relative), "{relative}");
    }
}

#[tokio::test]
async fn unknown_single_fixture_falls_back_to_all() {
    let ws = Workspace::new();
    ws.add_fixture("YGMarginTest", MARGIN_FIXTURE, Some(MARGIN_LAYOUT));
    let config = DriverConfig {
        fixture: Some("YGNopeTest".into()),
        ..ws.config()
    };

    let summary = Driver::new(ReplayHost::new(ws.replay.path()), config)
        .run()
        .await
        .unwrap();
    assert_eq!(summary.fixtures, vec!["YGMarginTest"]);
}

// ─── Capture ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn missing_record_skips_only_that_backend() {
    let ws = Workspace::new();
    ws.add_fixture("YGMarginTest", MARGIN_FIXTURE, None);

    let host = scripted(&[BackendKind::Cpp, BackendKind::Java, BackendKind::JavaScript]);
    let summary = Driver::new(host, ws.config()).run().await.unwrap();

    assert_eq!(summary.written.len(), 3);
    assert_eq!(summary.diagnostics.len(), 1);
    assert_eq!(summary.diagnostics[0].backend, Some(BackendKind::Go));
    assert_eq!(summary.diagnostics[0].message, "no record produced");
    assert!(!ws.exists("tests/margin_test.go"));

    let java = ws.read(ALL_OUTPUTS[1]);
    assert!(java.contains("// java YGMarginTest"));
}

#[tokio::test]
async fn out_of_order_records_write_nothing() {
    let ws = Workspace::new();
    ws.add_fixture("YGMarginTest", MARGIN_FIXTURE, None);

    let host = scripted(&[BackendKind::Java, BackendKind::Cpp]);
    let summary = Driver::new(host, ws.config()).run().await.unwrap();

    assert!(summary.written.is_empty());
    assert_eq!(summary.diagnostics.len(), 1);
    assert_eq!(summary.diagnostics[0].backend, None);
    assert!(summary.diagnostics[0].message.contains("out of order"));
    for relative in ALL_OUTPUTS {
        assert!(!ws.exists(relative), "{relative}");
    }
}

#[tokio::test]
async fn every_fixture_is_written_in_order() {
    let ws = Workspace::new();
    ws.add_fixture("YGMarginTest", MARGIN_FIXTURE, None);
    ws.add_fixture("YGAlignTest", MARGIN_FIXTURE, None);

    let summary = Driver::new(scripted(&BackendKind::ALL), ws.config())
        .run()
        .await
        .unwrap();
    assert!(summary.is_success());
    assert_eq!(summary.written.len(), 8);
    assert!(summary.written[0].ends_with("tests/generated/YGAlignTest.cpp"));
    assert!(summary.written[7].ends_with("tests/margin_test.go"));
}
