//! Ingestion end-to-end over a mock HTTP server: the default
//! fetch-and-classify branch, redirect following, and the error taxonomy.

use std::sync::Arc;

use chunksmith::capabilities::{MockDescriber, MockTranscriber};
use chunksmith::ingestion::DOCX_MIME;
use chunksmith::types::ExcerptCandidate;
use chunksmith::{IngestError, Ingestor, resolve_chunks};
use httpmock::prelude::*;

fn test_ingestor() -> Ingestor {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    Ingestor::builder()
        .transcriber(Arc::new(MockTranscriber::new("transcribed speech")))
        .describer(Arc::new(MockDescriber))
        .build()
}

#[tokio::test]
async fn default_branch_extracts_html() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/article");
        then.status(200)
            .header("content-type", "text/html; charset=utf-8")
            .body("<html><body><p>Alpha beta.</p><p>Gamma delta.</p></body></html>");
    });

    let document = test_ingestor()
        .ingest(&server.url("/article"))
        .await
        .unwrap();

    assert_eq!(document.text, "Alpha beta.\n\nGamma delta.");
}

#[tokio::test]
async fn redirects_are_followed_before_classification() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/moved");
        then.status(302).header("location", server.url("/final"));
    });
    server.mock(|when, then| {
        when.method(GET).path("/final");
        then.status(200)
            .header("content-type", "text/html")
            .body("<body><p>Landed here.</p></body>");
    });

    let document = test_ingestor().ingest(&server.url("/moved")).await.unwrap();
    assert_eq!(document.text, "Landed here.");
}

#[tokio::test]
async fn unsupported_content_type_fails_ingestion() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/blob");
        then.status(200)
            .header("content-type", "application/x-made-up")
            .body(vec![0u8; 16]);
    });

    let err = test_ingestor()
        .ingest(&server.url("/blob"))
        .await
        .unwrap_err();

    match err {
        IngestError::Unsupported(unsupported) => {
            assert_eq!(unsupported.mime_type, "application/x-made-up");
        }
        other => panic!("expected Unsupported, got {other:?}"),
    }
}

#[tokio::test]
async fn transport_errors_surface_as_fetch_failures() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/gone");
        then.status(404);
    });

    let err = test_ingestor()
        .ingest(&server.url("/gone"))
        .await
        .unwrap_err();

    assert!(matches!(err, IngestError::Fetch { .. }));
}

#[tokio::test]
async fn invalid_locators_fail_before_any_network_io() {
    let err = test_ingestor().ingest("not a url").await.unwrap_err();
    assert!(matches!(err, IngestError::InvalidLocator { .. }));
}

#[tokio::test]
async fn classify_handles_word_processor_payloads() {
    let docx = docx_fixture(&["Alpha beta gamma.", "Delta epsilon zeta."]);
    let document = test_ingestor().classify(DOCX_MIME, &docx).await.unwrap();
    assert_eq!(document.text, "Alpha beta gamma.\n\nDelta epsilon zeta.");
}

#[tokio::test]
async fn ingested_documents_resolve_into_chunks() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/lesson");
        then.status(200).header("content-type", "text/html").body(
            "<html><body>\
             <h1>Water</h1>\
             <p>Water covers most of the planet's surface.</p>\
             <p>Evaporation lifts it into the atmosphere.</p>\
             </body></html>",
        );
    });

    let ingestor = test_ingestor();
    let document = ingestor.ingest(&server.url("/lesson")).await.unwrap();

    let candidates = vec![ExcerptCandidate {
        title: "Cycle".to_string(),
        start: "Water covers most".to_string(),
        end: "into the atmosphere.".to_string(),
    }];
    let chunks = resolve_chunks(&candidates, &document);

    assert_eq!(chunks.len(), 1);
    assert!(chunks[0].content.starts_with("Water covers most"));
    assert!(chunks[0].content.ends_with("into the atmosphere."));
    assert!(document.text.contains(&chunks[0].content));
}

fn docx_fixture(paragraphs: &[&str]) -> Vec<u8> {
    let mut docx = docx_rs::Docx::new();
    for text in paragraphs {
        docx = docx.add_paragraph(
            docx_rs::Paragraph::new().add_run(docx_rs::Run::new().add_text(*text)),
        );
    }
    let mut cursor = std::io::Cursor::new(Vec::new());
    docx.build().pack(&mut cursor).unwrap();
    cursor.into_inner()
}
