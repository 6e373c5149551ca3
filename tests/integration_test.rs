//! Integration tests for cardcat
//!
//! These tests serve a small catalog from a mock HTTP server and drive the
//! public query and download APIs end to end.

use cardcat::catalog::{CategorySet, TagDef};
use cardcat::download::{DirectoryImporter, DownloadError, Downloader};
use cardcat::fetch::{FetchError, HttpSource, Resource, build_client};
use cardcat::notify::{NoticeLevel, Notifier};
use cardcat::query::{PageSize, QueryEngine, QueryState, SearchField, SortKey};
use serde_json::{Map, Value, json};
use std::sync::Mutex;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CARD_COUNT: usize = 35;

fn card_path(i: usize) -> String {
    format!("cards/card{i:02}.png")
}

/// 35 cards updated one minute apart. Even cards are tagged Female, every
/// fifth card is NSFW and the first four are in the `pony` group.
fn catalog_json(base: &str) -> (Value, Value) {
    let mut cards = Map::new();
    let mut tags = Map::new();
    for i in 0..CARD_COUNT {
        cards.insert(
            card_path(i),
            json!({
                "name": format!("Card {i:02}"),
                "author": if i % 3 == 0 { "mia" } else { "anon" },
                "description": format!("Card number {i}"),
                "dateupdate": format!("2024-03-01T00:{i:02}:00Z"),
                "image_url": format!("{base}/img/{i}.png"),
            }),
        );
        if i % 2 == 0 {
            tags.insert(card_path(i), json!(["Female"]));
        }
    }

    let nsfw: Vec<String> = (0..CARD_COUNT).filter(|i| i % 5 == 0).map(card_path).collect();
    let pony: Vec<String> = (0..4).map(card_path).collect();
    let filters = json!({ "tags": tags, "nsfw": nsfw, "pony": pony });

    (Value::Object(cards), filters)
}

async fn serve_catalog(expected_fetches: u64) -> MockServer {
    let server = MockServer::start().await;
    let (cards, filters) = catalog_json(&server.uri());

    Mock::given(method("GET"))
        .and(path("/cards.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(cards))
        .expect(expected_fetches)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/filters.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(filters))
        .expect(expected_fetches)
        .mount(&server)
        .await;

    server
}

fn engine(server: &MockServer) -> QueryEngine<HttpSource> {
    let categories = CategorySet::new(vec![TagDef::new("pony", "Pony", "#ffffff")]);
    QueryEngine::new(HttpSource::new(&server.uri()).unwrap(), categories)
}

fn names(page: &cardcat::query::QueryPage) -> Vec<&str> {
    page.items.iter().map(|entry| entry.name.as_str()).collect()
}

#[derive(Default)]
struct Recorder(Mutex<Vec<(NoticeLevel, String)>>);

impl Notifier for Recorder {
    fn notify(&self, level: NoticeLevel, message: &str) {
        self.0.lock().unwrap().push((level, message.to_string()));
    }
}

#[tokio::test]
async fn test_paging_reuses_cached_dataset() {
    let server = serve_catalog(1).await;
    let mut engine = engine(&server);
    let mut state = QueryState::new();
    state.set_page_size(PageSize::try_from(10).unwrap());

    let first = engine.execute(&mut state, false).await.unwrap();
    assert_eq!(first.total_matched, CARD_COUNT);
    assert_eq!(first.total_pages, 4);
    assert_eq!(first.items.first().map(|e| e.name.as_str()), Some("Card 34"));

    state.set_page(4);
    let last = engine.execute(&mut state, false).await.unwrap();
    assert_eq!(names(&last), vec!["Card 04", "Card 03", "Card 02", "Card 01", "Card 00"]);

    state.set_page(9);
    let clamped = engine.execute(&mut state, false).await.unwrap();
    assert_eq!(clamped.page, 4);
    assert_eq!(state.page(), 4);
}

#[tokio::test]
async fn test_reload_fetches_again() {
    let server = serve_catalog(2).await;
    let mut engine = engine(&server);
    let mut state = QueryState::new();

    engine.execute(&mut state, false).await.unwrap();
    engine.execute(&mut state, true).await.unwrap();
}

#[tokio::test]
async fn test_tags_categories_and_nsfw() {
    let server = serve_catalog(1).await;
    let mut engine = engine(&server);
    let mut state = QueryState::new();

    state.include("Female");
    state.set_show_nsfw(false);
    let page = engine.execute(&mut state, false).await.unwrap();
    assert_eq!(page.total_matched, 14);

    state.include("pony");
    let page = engine.execute(&mut state, false).await.unwrap();
    assert_eq!(names(&page), vec!["Card 02"]);

    state.set_show_nsfw(true);
    let page = engine.execute(&mut state, false).await.unwrap();
    assert_eq!(names(&page), vec!["Card 02", "Card 00"]);

    let counts = page.tag_counts();
    assert_eq!(counts.get("Female"), Some(&18));
    assert_eq!(counts.get("NSFW"), None);
    assert_eq!(counts.get("pony"), Some(&4));
}

#[tokio::test]
async fn test_regex_search_and_sort() {
    let server = serve_catalog(1).await;
    let mut engine = engine(&server);
    let mut state = QueryState::new();

    state.set_search_field(SearchField::Name);
    state.set_search_term("/^card 3/i");
    state.set_sort_key(SortKey::Name);
    let page = engine.execute(&mut state, false).await.unwrap();
    assert_eq!(
        names(&page),
        vec!["Card 30", "Card 31", "Card 32", "Card 33", "Card 34"]
    );

    state.set_search_field(SearchField::Author);
    state.set_search_term("MIA");
    let page = engine.execute(&mut state, false).await.unwrap();
    assert_eq!(page.total_matched, 12);
}

#[tokio::test]
async fn test_fetch_failure_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut engine = engine(&server);
    let mut state = QueryState::new();
    state.set_page(3);

    let err = engine.execute(&mut state, false).await.unwrap_err();
    assert!(matches!(
        err,
        FetchError::Status {
            resource: Resource::Cards,
            status: 500
        }
    ));
    assert_eq!(state.page(), 3);
}

#[tokio::test]
async fn test_download_into_directory() {
    let server = serve_catalog(1).await;
    Mock::given(method("GET"))
        .and(path("/img/3.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"PNG3".to_vec()))
        .mount(&server)
        .await;

    let mut engine = engine(&server);
    let catalog = engine.load(false).await.unwrap();
    let dir = TempDir::new().unwrap();
    let recorder = Recorder::default();
    let downloader = Downloader::new(
        build_client().unwrap(),
        DirectoryImporter::new(dir.path()),
        &recorder,
    );

    let paths = vec![card_path(3), card_path(3), "cards/missing.png".to_string()];
    let report = downloader.download_batch(&catalog, &paths).await;

    assert_eq!(report.imported.len(), 2);
    assert_eq!(report.total_bytes(), 8);
    assert!(dir.path().join("card03.png").exists());
    assert!(dir.path().join("card03 (1).png").exists());
    assert!(!report.is_success());
    assert!(matches!(report.failed[0].1, DownloadError::NotFound(_)));

    let levels: Vec<NoticeLevel> = recorder.0.lock().unwrap().iter().map(|(level, _)| *level).collect();
    assert_eq!(
        levels,
        vec![NoticeLevel::Success, NoticeLevel::Success, NoticeLevel::Error]
    );
}
