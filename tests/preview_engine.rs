use std::path::Path;
use std::time::Duration;

use docpreview::PreviewError;
use docpreview::io::{LocalFileSink, LocalFileSource, MemorySource};
use docpreview::ooxml::{Sheet, create_document, create_workbook};
use docpreview::pdf::{create_pdf, extract_pages};
use docpreview::preview::{
    FileKind, HandleRegistry, Outcome, PageData, PageEdit, PreviewConfig, PreviewEngine,
    PreviewSession, PreviewState, Zoom,
};

fn session_with(registry: &HandleRegistry) -> PreviewSession {
    let engine = PreviewEngine::new(PreviewConfig::default()).with_registry(registry.clone());
    PreviewSession::from_engine(engine)
}

#[tokio::test]
async fn test_newer_open_wins_over_slow_decode() {
    let registry = HandleRegistry::new();
    let session = session_with(&registry);

    let slow = MemorySource::new("a.txt", None, b"from A".to_vec())
        .with_delay(Duration::from_millis(50));
    let fast = MemorySource::new("b.txt", None, b"from B".to_vec());

    let (a, b) = tokio::join!(session.open(&slow), session.open(&fast));
    assert_eq!(a, Ok(Outcome::Discarded));
    assert_eq!(b, Ok(Outcome::Applied));

    let summary = session.summary().await.unwrap();
    assert_eq!(summary.file.name, "b.txt");
    let text = session
        .with_engine(|engine| engine.document().map(|doc| doc.pages[0].data.render()))
        .await;
    assert_eq!(text.as_deref(), Some("from B"));

    // A was decoded but never shown; its handle is already gone
    assert_eq!((registry.issued(), registry.revoked()), (2, 1));
}

#[tokio::test]
async fn test_handles_released_exactly_once() {
    let registry = HandleRegistry::new();
    let session = session_with(&registry);

    for name in ["one.txt", "two.txt", "three.bin"] {
        let source = MemorySource::new(name, None, name.as_bytes().to_vec());
        session.open(&source).await.unwrap();
        assert_eq!(registry.live(), 1);
    }

    let broken = MemorySource::new("broken.xlsx", None, b"PK but not really".to_vec());
    session.open(&broken).await.unwrap();
    assert_eq!(registry.live(), 0);

    session.open(&MemorySource::new("four.txt", None, b"4".to_vec())).await.unwrap();
    session.with_engine(|engine| engine.close()).await.unwrap();
    assert_eq!((registry.issued(), registry.revoked()), (5, 5));
}

#[tokio::test]
async fn test_fetch_failure_shows_error() {
    let dir = tempfile::tempdir().unwrap();
    let session = PreviewSession::default();
    let source = LocalFileSource::new(&dir.path().join("absent.pdf"));

    assert_eq!(session.open(&source).await, Ok(Outcome::Applied));
    let message = session
        .with_engine(|engine| match engine.state() {
            PreviewState::Error { message } => Some(message.clone()),
            _ => None,
        })
        .await
        .unwrap();
    assert!(message.starts_with("Unable to preview absent.pdf: unable to read file"));
    assert!(session.summary().await.is_none());
}

#[tokio::test]
async fn test_spreadsheet_save_is_unsupported() {
    let session = PreviewSession::default();
    let bytes = create_workbook(&[
        Sheet::new("Budget", vec![vec!["Item".into(), "Cost".into()]]),
        Sheet::new("Notes", vec![vec!["ok".into()]]),
    ])
    .unwrap();
    session
        .open(&MemorySource::new("budget.xlsx", None, bytes))
        .await
        .unwrap();

    session
        .with_engine(|engine| {
            let doc = engine.document().unwrap();
            assert_eq!(doc.kind, FileKind::Spreadsheet);
            assert_eq!(doc.page_count(), 2);

            engine.navigate(1).unwrap();
            engine.begin_edit().unwrap();
            engine
                .edit_page(1, PageEdit::Cell {
                    row: 0,
                    col: 1,
                    value: "checked".into(),
                })
                .unwrap();
        })
        .await;

    let dir = tempfile::tempdir().unwrap();
    let sink = LocalFileSink::new(&dir.path().join("budget.xlsx"));
    let err = session.save_to(&sink).await.unwrap_err();
    assert!(matches!(err, PreviewError::UnsupportedOperation(_)));
    assert!(!dir.path().join("budget.xlsx").exists());

    let state = session.with_engine(|engine| engine.state().name()).await;
    assert_eq!(state, "editing");
}

#[tokio::test]
async fn test_pdf_edit_save_and_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("letter.pdf");
    tokio::fs::write(&input, create_pdf(&["Dear Sir,\nHello."])).await.unwrap();

    let session = PreviewSession::default();
    session.open(&LocalFileSource::new(&input)).await.unwrap();
    assert_eq!(session.summary().await.unwrap().kind, FileKind::Pdf);

    session
        .with_engine(|engine| {
            assert_eq!(engine.document().unwrap().zoom, Zoom::Fit);
            engine.begin_edit().unwrap();
            engine
                .edit_page(0, PageEdit::Text("Dear Madam,\nGoodbye.".into()))
                .unwrap();
        })
        .await;

    let output = dir.path().join("out").join("letter.pdf");
    let saved = session.save_to(&LocalFileSink::new(&output)).await.unwrap();
    assert_eq!(saved.name, "letter.pdf");
    assert_eq!(saved.content_type, "application/pdf");

    let written = tokio::fs::read(&output).await.unwrap();
    assert_eq!(written.len(), saved.size);
    assert_eq!(extract_pages(&written)[0].original, "Dear Madam,\nGoodbye.");

    let summary = session.summary().await.unwrap();
    assert!(summary.pages.iter().all(|p| !p.modified));

    // The saved file opens like any other
    session.open(&LocalFileSource::new(Path::new(&output))).await.unwrap();
    let text = session
        .with_engine(|engine| {
            engine.begin_edit().unwrap();
            engine.document().map(|doc| doc.pages[0].data.clone())
        })
        .await;
    assert_eq!(text, Some(PageData::pdf("Dear Madam,\nGoodbye.".into())));
}

#[tokio::test]
async fn test_content_type_overrides_extension() {
    let session = PreviewSession::default();
    let source = MemorySource::new("scan.png", Some("application/pdf"), create_pdf(&["x"]));
    session.open(&source).await.unwrap();
    assert_eq!(session.summary().await.unwrap().kind, FileKind::Pdf);

    let docx = create_document("<p>Body</p>").unwrap();
    let source = MemorySource::new(
        "upload",
        Some("application/vnd.openxmlformats-officedocument.wordprocessingml.document"),
        docx,
    );
    session.open(&source).await.unwrap();
    let html = session
        .with_engine(|engine| engine.document().map(|doc| doc.pages[0].data.render()))
        .await;
    assert_eq!(html.as_deref(), Some("<p>Body</p>"));
}

#[tokio::test]
async fn test_summary_serializes() {
    let session = PreviewSession::default();
    session
        .open(&MemorySource::new("a.txt", Some("text/plain"), b"hi".to_vec()))
        .await
        .unwrap();

    let summary = session.summary().await.unwrap();
    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["kind"], "text");
    assert_eq!(json["file"]["name"], "a.txt");
    assert_eq!(json["pages"].as_array().unwrap().len(), 1);
}
