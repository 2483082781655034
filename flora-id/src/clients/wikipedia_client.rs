//! Wikipedia (MediaWiki) client
//!
//! Three endpoints are used:
//! - Page render: `w/api.php?action=parse&prop=text&redirects` (raw markup)
//! - Page summary: `api/rest_v1/page/summary/{title}` (extract + thumbnail)
//! - Category listing: `w/api.php?action=query&list=categorymembers`

use crate::types::{Encyclopedia, PageSummary, ServiceError};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Wikipedia requires a descriptive User-Agent
const USER_AGENT: &str = concat!(
    "flora-id/",
    env!("CARGO_PKG_VERSION"),
    " (plant identification service)"
);

/// Wikipedia API client
pub struct WikipediaClient {
    http_client: Client,
    base_url: String,
}

impl WikipediaClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ServiceError> {
        let http_client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| ServiceError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn action_api(&self) -> String {
        format!("{}/w/api.php", self.base_url)
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ServiceError> {
        let response = request
            .send()
            .await
            .map_err(|e| ServiceError::Network(format!("Wikipedia request failed: {}", e)))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(ServiceError::NotAvailable("Wikipedia page not found".to_string()));
        }
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::Api { status, body });
        }

        response
            .json()
            .await
            .map_err(|e| ServiceError::Parse(format!("Failed to parse Wikipedia response: {}", e)))
    }
}

#[async_trait]
impl Encyclopedia for WikipediaClient {
    fn name(&self) -> &'static str {
        "Wikipedia"
    }

    async fn render_page(&self, title: &str) -> Result<Option<String>, ServiceError> {
        debug!(title = %title, "Rendering Wikipedia page");

        let request = self.http_client.get(self.action_api()).query(&[
            ("action", "parse"),
            ("format", "json"),
            ("page", title),
            ("prop", "text"),
            ("redirects", "1"),
        ]);

        let body: ParseResponse = self.get_json(request).await?;
        Ok(body.parse.map(|p| p.text.markup))
    }

    async fn page_summary(&self, title: &str) -> Result<PageSummary, ServiceError> {
        debug!(title = %title, "Fetching Wikipedia page summary");

        let url = format!(
            "{}/api/rest_v1/page/summary/{}",
            self.base_url,
            urlencoding::encode(title)
        );
        self.get_json(self.http_client.get(url)).await
    }

    async fn category_members(
        &self,
        category: &str,
        limit: u32,
    ) -> Result<Vec<String>, ServiceError> {
        debug!(category = %category, "Listing Wikipedia category members");

        let cmtitle = format!("Category:{}", category);
        let cmlimit = limit.to_string();
        let request = self.http_client.get(self.action_api()).query(&[
            ("action", "query"),
            ("list", "categorymembers"),
            ("cmtitle", cmtitle.as_str()),
            ("cmtype", "page"),
            ("cmlimit", cmlimit.as_str()),
            ("format", "json"),
        ]);

        let body: CategoryResponse = self.get_json(request).await?;
        let query = body
            .query
            .ok_or_else(|| ServiceError::Parse("Category response missing 'query'".to_string()))?;

        Ok(query.categorymembers.into_iter().map(|m| m.title).collect())
    }
}

// ============================================================================
// MediaWiki API Types
// ============================================================================

/// `{"parse": {"text": {"*": "<html>"}}}`, or `{"error": {...}}` for missing pages
#[derive(Debug, Deserialize)]
struct ParseResponse {
    parse: Option<ParsedPage>,
}

#[derive(Debug, Deserialize)]
struct ParsedPage {
    text: ParsedText,
}

#[derive(Debug, Deserialize)]
struct ParsedText {
    #[serde(rename = "*")]
    markup: String,
}

#[derive(Debug, Deserialize)]
struct CategoryResponse {
    query: Option<CategoryQuery>,
}

#[derive(Debug, Deserialize)]
struct CategoryQuery {
    #[serde(default)]
    categorymembers: Vec<CategoryMember>,
}

#[derive(Debug, Deserialize)]
struct CategoryMember {
    title: String,
}
