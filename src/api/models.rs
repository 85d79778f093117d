use serde::{Deserialize, Serialize};

use crate::backend::SearchRequest;
use crate::data_models::{CategorySummary, SearchResult, SearchResultPage, total_pages};

/// Body of `GET /api/search`. Only `total` and `hits` are guaranteed; the
/// paging fields fall back to what was asked for.
#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub hits: Vec<SearchResult>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub page_size: Option<u32>,
    #[serde(default)]
    pub total_pages: Option<u32>,
}

impl SearchResponse {
    pub fn into_page(self, request: &SearchRequest) -> SearchResultPage {
        let page_size = self.page_size.unwrap_or(request.page_size);
        SearchResultPage {
            total_pages: self
                .total_pages
                .unwrap_or_else(|| total_pages(self.total, page_size)),
            hits: self.hits,
            total: self.total,
            page: self.page.unwrap_or(request.page).max(1),
            page_size,
        }
    }
}

/// `GET /api/categories/top` answers with either a bare list or a wrapper.
#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TopCategoriesResponse {
    List(Vec<CategorySummary>),
    Wrapped { categories: Vec<CategorySummary> },
}

impl TopCategoriesResponse {
    pub fn into_list(self) -> Vec<CategorySummary> {
        match self {
            TopCategoriesResponse::List(list) => list,
            TopCategoriesResponse::Wrapped { categories } => categories,
        }
    }
}
