use reqwest::header;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::error;

use crate::config::UpstreamConfig;
use crate::error::RelayError;
use crate::models::SearchResult;
use crate::providers::SearchProvider;

#[derive(Clone)]
pub struct SearchService {
    client: Client,
    timeout: Duration,
    max_results: usize,
}

impl SearchService {
    pub fn new(client: Client, config: &UpstreamConfig) -> Self {
        Self {
            client,
            timeout: Duration::from_secs(config.search_timeout_secs),
            max_results: config.max_search_results,
        }
    }

    pub async fn search(
        &self,
        provider: SearchProvider,
        query: &str,
        api_key: &str,
    ) -> Result<Vec<SearchResult>, RelayError> {
        let request = match provider {
            SearchProvider::SerpApi => self.client.get(provider.endpoint()).query(&[
                ("engine", "google"),
                ("q", query),
                ("api_key", api_key),
                ("num", "10"),
            ]),
            SearchProvider::Brave => self
                .client
                .get(provider.endpoint())
                .query(&[("q", query), ("count", "10"), ("safesearch", "moderate")])
                .header("X-Subscription-Token", api_key)
                .header(header::ACCEPT, "application/json"),
            SearchProvider::Serper => self
                .client
                .post(provider.endpoint())
                .header("X-API-KEY", api_key)
                .json(&json!({ "q": query, "num": 10, "gl": "us", "hl": "en" })),
        };

        let response = request
            .timeout(self.timeout)
            .send()
            .await
            .map_err(RelayError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Search API error for {}: {} - {}", provider, status, body);
            return Err(RelayError::from_status(status, body));
        }

        let data = response
            .json::<Value>()
            .await
            .map_err(RelayError::from_reqwest)?;

        Ok(parse_results(provider, &data, self.max_results))
    }
}

// Normalizes a provider response into the uniform result shape. A response
// with an unexpected shape degrades to an empty list instead of failing the
// whole request.
fn parse_results(provider: SearchProvider, data: &Value, cap: usize) -> Vec<SearchResult> {
    let items = match provider {
        SearchProvider::SerpApi => data.get("organic_results"),
        SearchProvider::Brave => data.get("web").and_then(|web| web.get("results")),
        SearchProvider::Serper => data.get("organic"),
    };

    let Some(items) = items.and_then(Value::as_array) else {
        return Vec::new();
    };

    let (url_key, snippet_key) = match provider {
        SearchProvider::Brave => ("url", "description"),
        SearchProvider::SerpApi | SearchProvider::Serper => ("link", "snippet"),
    };

    items
        .iter()
        .filter_map(|item| {
            let title = item.get("title").and_then(Value::as_str)?.trim();
            let url = item.get(url_key).and_then(Value::as_str)?.trim();
            if title.is_empty() || url.is_empty() {
                return None;
            }

            let snippet = item
                .get(snippet_key)
                .and_then(Value::as_str)
                .unwrap_or("No description available");

            Some(SearchResult {
                title: title.to_string(),
                url: url.to_string(),
                snippet: snippet.to_string(),
            })
        })
        .take(cap)
        .collect()
}
