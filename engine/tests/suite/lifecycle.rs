//! Signal chains run end to end against the fake tool.

use moji_engine::view::issue_entries;
use moji_engine::{EngineError, NotificationLevel, Signal};
use moji_tool::ToolError;
use moji_types::{ConvertMode, DetectionStatus, SessionStatus, StatusTint};

use crate::common::{Fixture, RecordingHost};

#[tokio::test]
async fn test_open_then_fix_updates_status() {
    let fx = Fixture::new();
    let doc = fx.file("notes.txt", "broken text\n");
    let c = fx.coordinator(RecordingHost::default());

    c.handle(Signal::DocumentOpened(doc.clone())).await.unwrap();
    assert_eq!(
        c.session().snapshot().status(),
        &SessionStatus::detected(DetectionStatus::Warn, "windows-1252")
    );

    c.handle(Signal::FixRequested(doc.clone())).await.unwrap();

    assert_eq!(std::fs::read_to_string(&doc).unwrap(), "fine\n");
    assert_eq!(
        c.session().snapshot().status(),
        &SessionStatus::detected(DetectionStatus::Ok, "utf-8")
    );
    assert_eq!(*c.host().reloaded.lock().unwrap(), [doc.clone()]);

    let calls = fx.calls();
    assert_eq!(calls.len(), 3);
    assert_eq!(
        calls[1],
        format!(
            "-path {} -in-place -backup-suffix .bak -fix-mojibake -strip-bom",
            doc.display()
        )
    );
    assert_eq!(calls[2], format!("-path {} -detect", doc.display()));
    assert_eq!(c.host().messages(), ["Encoding fixed successfully!"]);
}

#[tokio::test]
async fn test_scan_collects_only_warnings() {
    let fx = Fixture::new();
    fx.file("a.txt", "broken\n");
    fx.file("b.txt", "clean\n");
    fx.file("c.txt", "also broken\n");
    let c = fx.coordinator(RecordingHost::default());

    c.handle(Signal::ScanRequested(Some(fx.workspace.clone())))
        .await
        .unwrap();

    let snapshot = c.session().snapshot();
    let entries = issue_entries(snapshot.issues());
    let labels: Vec<&str> = entries.iter().map(|e| e.label.as_str()).collect();
    assert_eq!(labels, ["a.txt", "c.txt"]);
    assert_eq!(entries[0].description, "windows-1252 (85%)");
    assert_eq!(entries[0].tint, StatusTint::Warning);
    assert!(fx.calls()[0].contains("-ext .txt,.md,.java"));
    assert_eq!(
        c.host().messages(),
        ["Found 2 files with encoding issues. Check the Encoding Issues panel."]
    );
}

#[tokio::test]
async fn test_detect_failure_is_reported() {
    let fx = Fixture::new();
    let doc = fx.workspace.join("missing.txt");
    let c = fx.coordinator(RecordingHost::default());

    let err = c.handle(Signal::DocumentOpened(doc)).await.unwrap_err();

    match err {
        EngineError::Tool(ToolError::InvocationFailed { code, stderr, .. }) => {
            assert_eq!(code, Some(2));
            assert!(stderr.contains("no such file"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(c.session().snapshot().status().is_empty());
    let notes = c.host().notifications.lock().unwrap().clone();
    assert_eq!(notes[0].level(), NotificationLevel::Error);
    assert!(notes[0].message().contains("no such file"));
}

#[tokio::test]
async fn test_missing_binary_fails_without_probing() {
    let fx = Fixture::new();
    let doc = fx.file("notes.txt", "clean\n");
    let c = fx.coordinator(RecordingHost::default());
    c.update_config(moji_config::MojiConfig {
        binary_path: Some(fx.dir.path().join("not-installed")),
        ..fx.config()
    });

    let err = c.handle(Signal::DetectRequested(doc)).await.unwrap_err();

    assert!(matches!(
        err,
        EngineError::Tool(ToolError::InvocationFailed { code: None, .. })
    ));
    assert!(fx.calls().is_empty());
}

#[tokio::test]
async fn test_validate_shows_compatibility_output() {
    let fx = Fixture::new();
    let doc = fx.file("notes.txt", "clean\n");
    let c = fx.coordinator(RecordingHost::picking(ConvertMode::Validate));

    c.handle(Signal::ConvertPicked(doc.clone())).await.unwrap();

    assert_eq!(std::fs::read_to_string(&doc).unwrap(), "clean\n");
    let outputs = c.host().outputs.lock().unwrap().clone();
    assert_eq!(
        outputs,
        [(
            "ISO-8859-1 Compatibility Check".to_string(),
            "All characters are ISO-8859-1 compatible\n".to_string()
        )]
    );
    assert!(c.host().reloaded.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_report_written_and_opened() {
    let fx = Fixture::new();
    fx.file("a.txt", "broken\n");
    let c = fx.coordinator(RecordingHost::default());

    c.handle(Signal::ReportRequested(Some(fx.workspace.clone())))
        .await
        .unwrap();

    let report = fx.workspace.join("encoding-report.html");
    assert!(report.is_file());
    assert_eq!(*c.host().opened.lock().unwrap(), [report]);
    assert!(fx.calls()[0].contains("-report-format html"));
    assert_eq!(c.host().messages(), ["Report generated and opened!"]);
}
