//! HTTP dataset source
//!
//! Fetches `cards.json` and `filters.json` from the configured endpoint.
//! Both requests go out together and both are awaited before either result
//! is inspected. Every request asks intermediaries not to serve a cached
//! copy; freshness is managed by `DatasetCache`.

use super::DatasetSource;
use super::error::{FetchError, Resource};
use crate::catalog::{Dataset, FilterIndex, RawEntries};
use reqwest::Client;
use reqwest::header::{CACHE_CONTROL, PRAGMA};
use serde::de::DeserializeOwned;
use std::time::Instant;
use tracing::{debug, info};

const CARDS_FILE: &str = "cards.json";
const FILTERS_FILE: &str = "filters.json";

/// Dataset source backed by two JSON documents under a base URL
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    cards_url: String,
    filters_url: String,
}

/// HTTP client identifying itself as cardcat
///
/// # Errors
///
/// Returns `FetchError::Client` if the TLS backend cannot be initialized.
pub fn build_client() -> Result<Client, FetchError> {
    Client::builder()
        .user_agent(concat!("cardcat/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(FetchError::Client)
}

impl HttpSource {
    /// Create a source for `<endpoint>/cards.json` and `<endpoint>/filters.json`
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Client` if the HTTP client cannot be built.
    pub fn new(endpoint: &str) -> Result<Self, FetchError> {
        Ok(Self::with_client(build_client()?, endpoint))
    }

    /// Create a source that reuses an existing client
    #[must_use]
    pub fn with_client(client: Client, endpoint: &str) -> Self {
        let base = endpoint.trim_end_matches('/');
        Self {
            client,
            cards_url: format!("{base}/{CARDS_FILE}"),
            filters_url: format!("{base}/{FILTERS_FILE}"),
        }
    }

    #[must_use]
    pub fn cards_url(&self) -> &str {
        &self.cards_url
    }

    #[must_use]
    pub fn filters_url(&self) -> &str {
        &self.filters_url
    }

    async fn get_json<T: DeserializeOwned>(&self, resource: Resource, url: &str) -> Result<T, FetchError> {
        let response = self
            .client
            .get(url)
            .header(CACHE_CONTROL, "no-cache")
            .header(PRAGMA, "no-cache")
            .send()
            .await
            .map_err(|source| FetchError::Transport { resource, source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                resource,
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| FetchError::Transport { resource, source })?;
        debug!(%resource, bytes = body.len(), "Received dataset resource");

        serde_json::from_slice(&body).map_err(|source| FetchError::Parse { resource, source })
    }
}

impl DatasetSource for HttpSource {
    async fn fetch(&self) -> Result<Dataset, FetchError> {
        let started = Instant::now();

        let (cards, filters) = tokio::join!(
            self.get_json::<RawEntries>(Resource::Cards, &self.cards_url),
            self.get_json::<FilterIndex>(Resource::Filters, &self.filters_url),
        );
        let dataset = Dataset::new(cards?, filters?);

        info!(
            cards = dataset.entries.len(),
            elapsed_ms = started.elapsed().as_millis(),
            "Fetched dataset"
        );
        Ok(dataset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mount(server: &MockServer, file: &str, response: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path(format!("/{file}")))
            .and(header("cache-control", "no-cache"))
            .and(header("pragma", "no-cache"))
            .respond_with(response)
            .mount(server)
            .await;
    }

    #[test]
    fn test_urls_ignore_trailing_slash() {
        let source = HttpSource::with_client(Client::new(), "https://example.com/repo/");
        assert_eq!(source.cards_url(), "https://example.com/repo/cards.json");
        assert_eq!(source.filters_url(), "https://example.com/repo/filters.json");
    }

    #[tokio::test]
    async fn test_fetch_both_resources() {
        let server = MockServer::start().await;
        mount(
            &server,
            CARDS_FILE,
            ResponseTemplate::new(200).set_body_json(json!({
                "b.png": { "name": "B", "author": "x" },
                "a.png": { "name": "A", "author": "x" }
            })),
        )
        .await;
        mount(
            &server,
            FILTERS_FILE,
            ResponseTemplate::new(200).set_body_json(json!({
                "tags": { "a.png": ["OC"] },
                "nsfw": []
            })),
        )
        .await;

        let dataset = HttpSource::new(&server.uri()).unwrap().fetch().await.unwrap();

        assert_eq!(dataset.entries.keys().collect::<Vec<_>>(), vec!["b.png", "a.png"]);
        assert_eq!(dataset.filters.tags_for("a.png"), ["OC"]);
    }

    #[tokio::test]
    async fn test_status_error_names_resource() {
        let server = MockServer::start().await;
        mount(&server, CARDS_FILE, ResponseTemplate::new(200).set_body_json(json!({}))).await;
        mount(&server, FILTERS_FILE, ResponseTemplate::new(503)).await;

        let err = HttpSource::new(&server.uri()).unwrap().fetch().await.unwrap_err();

        assert!(matches!(
            err,
            FetchError::Status {
                resource: Resource::Filters,
                status: 503
            }
        ));
    }

    #[tokio::test]
    async fn test_cards_error_wins_when_both_fail() {
        let server = MockServer::start().await;
        mount(&server, CARDS_FILE, ResponseTemplate::new(200).set_body_string("not json")).await;
        mount(&server, FILTERS_FILE, ResponseTemplate::new(404)).await;

        let err = HttpSource::new(&server.uri()).unwrap().fetch().await.unwrap_err();

        assert_eq!(err.resource(), Some(Resource::Cards));
        assert!(matches!(err, FetchError::Parse { .. }));
    }
}
