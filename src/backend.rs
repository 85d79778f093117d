use std::future::Future;

use crate::data_models::{CategorySummary, SearchResultPage};
use crate::error::BackendError;

/// One page of a search, exactly as it is sent to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    /// Already trimmed and never empty.
    pub query: String,
    pub page: u32,
    pub page_size: u32,
}

/// The service that owns ranking and pagination.
pub trait SearchBackend: Send + Sync {
    fn search(
        &self,
        request: &SearchRequest,
    ) -> impl Future<Output = Result<SearchResultPage, BackendError>> + Send;
}

/// The service that reports the most common hack categories.
pub trait CategoryBackend: Send + Sync {
    fn top_categories(
        &self,
        limit: u32,
    ) -> impl Future<Output = Result<Vec<CategorySummary>, BackendError>> + Send;
}
