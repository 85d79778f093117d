use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};

use crate::backend::{CategoryBackend, SearchBackend, SearchRequest};
use crate::config::Config;
use crate::data_models::{CategorySummary, SearchResultPage};
use crate::error::BackendError;

pub mod models;

use models::{SearchResponse, TopCategoriesResponse};

pub const SEARCH_PATH: &str = "api/search";
pub const TOP_CATEGORIES_PATH: &str = "api/categories/top";

/// Search and category backend reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: Url,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, BackendError> {
        // A trailing slash keeps any path prefix of the base when joining.
        let normalized = format!("{}/", base_url.trim_end_matches('/'));
        let base_url =
            Url::parse(&normalized).map_err(|e| BackendError::InvalidUrl(format!("{base_url}: {e}")))?;
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    pub fn from_config(config: &Config) -> Result<Self, BackendError> {
        Self::new(&config.api_base_url, config.request_timeout)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str, params: &[(&str, String)]) -> Result<Url, BackendError> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|e| BackendError::InvalidUrl(e.to_string()))?;
        url.query_pairs_mut()
            .extend_pairs(params.iter().map(|(k, v)| (*k, v.as_str())));
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, BackendError> {
        let start = Instant::now();
        log::debug!("GET {url}");
        let res = self.client.get(url.clone()).send().await?;
        let status = res.status();
        let body = res.text().await?;
        log::debug!(
            "GET {url} -> {} in {}ms",
            status.as_u16(),
            start.elapsed().as_millis()
        );

        if !status.is_success() {
            return Err(BackendError::Http {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("").to_string(),
                body,
            });
        }
        Ok(serde_json::from_str(&body)?)
    }
}

impl SearchBackend for HttpBackend {
    async fn search(&self, request: &SearchRequest) -> Result<SearchResultPage, BackendError> {
        let url = self.endpoint(
            SEARCH_PATH,
            &[
                ("query", request.query.trim().to_string()),
                ("page", request.page.to_string()),
                ("page_size", request.page_size.to_string()),
            ],
        )?;
        let response: SearchResponse = self.get_json(url).await?;
        Ok(response.into_page(request))
    }
}

impl CategoryBackend for HttpBackend {
    async fn top_categories(&self, limit: u32) -> Result<Vec<CategorySummary>, BackendError> {
        let url = self.endpoint(TOP_CATEGORIES_PATH, &[("limit", limit.to_string())])?;
        let response: TopCategoriesResponse = self.get_json(url).await?;
        Ok(response.into_list())
    }
}
