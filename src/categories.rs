use crate::backend::CategoryBackend;
use crate::data_models::CategorySummary;
use crate::error::BackendError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryState {
    Idle,
    Loading,
    Success(Vec<CategorySummary>),
    Error(String),
}

/// Fetch-once list of popular categories.
///
/// A failed fetch leaves the aggregator in `Error` and may be retried; a
/// fetch that is in flight or already succeeded is never repeated.
#[derive(Debug)]
pub struct CategoryAggregator {
    state: CategoryState,
    display_limit: usize,
}

impl CategoryAggregator {
    pub fn new(display_limit: usize) -> Self {
        Self {
            state: CategoryState::Idle,
            display_limit,
        }
    }

    pub fn state(&self) -> &CategoryState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == CategoryState::Loading
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            CategoryState::Error(message) => Some(message),
            _ => None,
        }
    }

    /// Categories to show, capped to the display limit. Empty unless loaded.
    pub fn visible(&self) -> &[CategorySummary] {
        match &self.state {
            CategoryState::Success(list) => &list[..list.len().min(self.display_limit)],
            _ => &[],
        }
    }

    /// Moves to `Loading` and returns `true` if a request should be sent.
    pub fn begin_fetch(&mut self) -> bool {
        match self.state {
            CategoryState::Loading | CategoryState::Success(_) => false,
            CategoryState::Idle | CategoryState::Error(_) => {
                self.state = CategoryState::Loading;
                true
            }
        }
    }

    pub fn apply(&mut self, result: Result<Vec<CategorySummary>, BackendError>) {
        if self.state != CategoryState::Loading {
            log::debug!("ignoring category response outside of a fetch");
            return;
        }
        self.state = match result {
            Ok(list) => {
                log::debug!("loaded {} categories", list.len());
                CategoryState::Success(list)
            }
            Err(e) => {
                log::warn!("failed to load categories: {e}");
                CategoryState::Error(e.user_message())
            }
        };
    }

    pub async fn fetch_top_categories<B: CategoryBackend>(&mut self, backend: &B, limit: u32) {
        if self.begin_fetch() {
            let result = backend.top_categories(limit).await;
            self.apply(result);
        }
    }
}
