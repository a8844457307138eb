/// Custom Search JSON API provider
///
/// Issues a single image search per query and returns the first hit:
/// GET {api_url}?key=..&cx=..&q=..&searchType=image&num=1 → items[0].link
use crate::{
    error::{AppError, AppResult},
    services::providers::ImageProvider,
};
use reqwest::Client as HttpClient;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    link: String,
}

#[derive(Clone)]
pub struct CustomSearchProvider {
    http_client: HttpClient,
    api_key: String,
    engine_id: String,
    api_url: String,
}

impl CustomSearchProvider {
    pub fn new(api_key: String, engine_id: String, api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            engine_id,
            api_url,
        }
    }

    fn first_link(body: &str) -> AppResult<Option<String>> {
        let response: SearchResponse = serde_json::from_str(body).map_err(|e| {
            AppError::ExternalApi(format!("Failed to parse image search response: {}", e))
        })?;
        Ok(response.items.into_iter().next().map(|item| item.link))
    }
}

#[async_trait::async_trait]
impl ImageProvider for CustomSearchProvider {
    async fn find_image(&self, query: &str) -> AppResult<Option<String>> {
        if query.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Image query cannot be empty".to_string(),
            ));
        }

        let response = self
            .http_client
            .get(&self.api_url)
            .query(&[
                ("key", self.api_key.as_str()),
                ("cx", self.engine_id.as_str()),
                ("q", query),
                ("searchType", "image"),
                ("num", "1"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Image search API returned status {}: {}",
                status, body
            )));
        }

        let body = response.text().await?;
        let link = Self::first_link(&body)?;

        tracing::debug!(
            query = %query,
            found = link.is_some(),
            provider = self.name(),
            "Image search completed"
        );

        Ok(link)
    }

    fn name(&self) -> &'static str {
        "custom_search"
    }
}
