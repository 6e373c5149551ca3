//! Download tests against a mock image server

use super::*;
use crate::catalog::{CategorySet, Dataset, FilterIndex};
use crate::notify::NoticeLevel;
use crate::testing::{MemoryImporter, RecordingNotifier};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{method, path as url_path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn catalog(server: &MockServer) -> Catalog {
    let entries = json!({
        "ponies\\twilight.png": {
            "name": "Twilight",
            "author": "anon",
            "image_url": format!("{}/img/twilight.png", server.uri())
        },
        "ponies/gone.png": {
            "name": "Gone",
            "author": "anon",
            "image_url": format!("{}/img/gone.png", server.uri())
        },
        "ponies/blank.png": { "name": "Blank", "author": "anon" }
    });
    let dataset = Dataset::new(
        serde_json::from_value(entries).unwrap(),
        FilterIndex::default(),
    );
    Catalog::build(Arc::new(dataset), &CategorySet::default())
}

async fn server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(url_path("/img/twilight.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"PNGDATA".to_vec()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(url_path("/img/gone.png"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn test_download_hands_bytes_and_filename_to_importer() {
    let server = server().await;
    let catalog = catalog(&server);
    let notifier = RecordingNotifier::default();
    let downloader = Downloader::new(Client::new(), MemoryImporter::default(), &notifier);

    let card = downloader
        .download(&catalog, "ponies\\twilight.png")
        .await
        .unwrap();

    assert_eq!(card.name, "Twilight");
    assert_eq!(card.bytes, 7);
    assert_eq!(
        downloader.importer().files(),
        vec![("twilight.png".to_string(), b"PNGDATA".to_vec())]
    );
    assert_eq!(notifier.levels(), vec![NoticeLevel::Success]);
}

#[tokio::test]
async fn test_download_requires_exact_path() {
    let server = server().await;
    let catalog = catalog(&server);
    let notifier = RecordingNotifier::default();
    let downloader = Downloader::new(Client::new(), MemoryImporter::default(), &notifier);

    let result = downloader.download(&catalog, "ponies/twilight.png").await;

    assert!(matches!(result, Err(DownloadError::NotFound(_))));
    assert!(downloader.importer().files().is_empty());
    assert_eq!(notifier.levels(), vec![NoticeLevel::Error]);
}

#[tokio::test]
async fn test_download_reports_http_status() {
    let server = server().await;
    let catalog = catalog(&server);
    let notifier = RecordingNotifier::default();
    let downloader = Downloader::new(Client::new(), MemoryImporter::default(), &notifier);

    let result = downloader.download(&catalog, "ponies/gone.png").await;
    assert!(matches!(result, Err(DownloadError::Status { status: 404, .. })));

    let result = downloader.download(&catalog, "ponies/blank.png").await;
    assert!(matches!(result, Err(DownloadError::MissingImage(_))));
}

#[tokio::test]
async fn test_batch_continues_past_failures() {
    let server = server().await;
    let catalog = catalog(&server);
    let notifier = RecordingNotifier::default();
    let downloader = Downloader::new(Client::new(), MemoryImporter::default(), &notifier);

    let paths = vec![
        "ponies/gone.png".to_string(),
        "missing.png".to_string(),
        "ponies\\twilight.png".to_string(),
    ];
    let report = downloader.download_batch(&catalog, &paths).await;

    assert_eq!(report.imported.len(), 1);
    assert_eq!(report.imported[0].name, "Twilight");
    assert_eq!(
        report.failed.iter().map(|(p, _)| p.as_str()).collect::<Vec<_>>(),
        vec!["ponies/gone.png", "missing.png"]
    );
    assert_eq!(
        notifier.levels(),
        vec![NoticeLevel::Error, NoticeLevel::Error, NoticeLevel::Success]
    );
}
