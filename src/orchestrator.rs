use crate::backend::{SearchBackend, SearchRequest};
use crate::data_models::{SearchQuery, SearchResultPage};
use crate::error::BackendError;

/// Sequence number attached to every dispatched search.
pub type Token = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStatus {
    Idle,
    Loading,
    Success,
    Error(String),
}

/// Where the search session is, together with the page that is on screen.
///
/// `Loading` and `Error` keep the last page that was displayed so a reload or
/// a failure never flashes the result list to empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchState {
    Idle,
    Loading { shown: Option<SearchResultPage> },
    Success(SearchResultPage),
    Error {
        message: String,
        shown: Option<SearchResultPage>,
    },
}

impl SearchState {
    pub fn status(&self) -> SessionStatus {
        match self {
            SearchState::Idle => SessionStatus::Idle,
            SearchState::Loading { .. } => SessionStatus::Loading,
            SearchState::Success(_) => SessionStatus::Success,
            SearchState::Error { message, .. } => SessionStatus::Error(message.clone()),
        }
    }

    pub fn shown(&self) -> Option<&SearchResultPage> {
        match self {
            SearchState::Idle => None,
            SearchState::Loading { shown } | SearchState::Error { shown, .. } => shown.as_ref(),
            SearchState::Success(page) => Some(page),
        }
    }

    fn into_shown(self) -> Option<SearchResultPage> {
        match self {
            SearchState::Idle => None,
            SearchState::Loading { shown } | SearchState::Error { shown, .. } => shown,
            SearchState::Success(page) => Some(page),
        }
    }
}

/// A search that has been committed to state and must now be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch {
    pub token: Token,
    pub request: SearchRequest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub total_pages: u32,
}

impl Pagination {
    pub fn is_visible(&self) -> bool {
        self.total_pages > 1
    }
}

/// Owns one search session: the query being edited, the page on screen and
/// the status of the request in flight.
///
/// Dispatching and applying are split so the caller decides how requests
/// travel. Every dispatch takes a fresh token; `apply` only accepts the
/// response carrying the latest outstanding token and drops anything else.
#[derive(Debug)]
pub struct QueryOrchestrator {
    query: SearchQuery,
    state: SearchState,
    last_token: Token,
    outstanding: Option<Token>,
    idle_page: SearchResultPage,
}

impl QueryOrchestrator {
    pub fn new(page_size: u32) -> Self {
        Self {
            query: SearchQuery::new(page_size),
            state: SearchState::Idle,
            last_token: 0,
            outstanding: None,
            idle_page: SearchResultPage::empty(page_size),
        }
    }

    pub fn query(&self) -> &SearchQuery {
        &self.query
    }

    pub fn query_text(&self) -> &str {
        &self.query.text
    }

    pub fn page(&self) -> u32 {
        self.query.page
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    pub fn status(&self) -> SessionStatus {
        self.state.status()
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, SearchState::Loading { .. })
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            SearchState::Error { message, .. } => Some(message),
            _ => None,
        }
    }

    pub fn outstanding(&self) -> Option<Token> {
        self.outstanding
    }

    /// The page currently on screen; the zero-result page when nothing has
    /// been shown yet.
    pub fn results(&self) -> &SearchResultPage {
        self.state.shown().unwrap_or(&self.idle_page)
    }

    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.query.page,
            total_pages: self.results().total_pages,
        }
    }

    /// Edits the query text. Never touches the network.
    pub fn set_query_text(&mut self, text: impl Into<String>) {
        self.query.text = text.into();
    }

    /// Commits a search for `page` of the current query text.
    ///
    /// Returns `None` when the trimmed text is empty: the session is reset to
    /// the zero-result page and any request still in flight is superseded.
    pub fn dispatch(&mut self, page: u32) -> Option<Dispatch> {
        self.last_token += 1;
        let page = page.max(1);

        let Some(text) = self.query.trimmed().map(str::to_string) else {
            log::debug!("empty query, resetting to idle (token {})", self.last_token);
            self.outstanding = None;
            self.query.page = 1;
            self.state = SearchState::Idle;
            return None;
        };

        let token = self.last_token;
        self.outstanding = Some(token);
        self.query.page = page;
        let shown = std::mem::replace(&mut self.state, SearchState::Idle).into_shown();
        self.state = SearchState::Loading { shown };

        log::debug!("dispatching search {text:?} page {page} (token {token})");
        Some(Dispatch {
            token,
            request: SearchRequest {
                query: text,
                page,
                page_size: self.query.page_size,
            },
        })
    }

    /// A brand-new search always starts at page 1.
    pub fn submit(&mut self) -> Option<Dispatch> {
        self.dispatch(1)
    }

    /// Reissues the current query text for a 1-based target page.
    pub fn change_page(&mut self, target: u32) -> Option<Dispatch> {
        self.dispatch(target)
    }

    pub fn select_category(&mut self, category: &str) -> Option<Dispatch> {
        self.set_query_text(category);
        self.dispatch(1)
    }

    /// Reconciles a backend response. Returns `false` if the response was
    /// stale and dropped without touching state.
    pub fn apply(&mut self, token: Token, result: Result<SearchResultPage, BackendError>) -> bool {
        if self.outstanding != Some(token) {
            log::debug!(
                "dropping stale search response (token {token}, outstanding {:?})",
                self.outstanding
            );
            return false;
        }
        self.outstanding = None;

        let shown = std::mem::replace(&mut self.state, SearchState::Idle).into_shown();
        match result {
            Ok(page) => {
                log::debug!(
                    "search response applied: {} hits of {} on page {} (token {token})",
                    page.hits.len(),
                    page.total,
                    page.page
                );
                self.query.page = page.page;
                self.state = SearchState::Success(page);
            }
            Err(e) => {
                log::warn!("search failed (token {token}): {e}");
                if let Some(prev) = &shown {
                    self.query.page = prev.page;
                }
                self.state = SearchState::Error {
                    message: e.user_message(),
                    shown,
                };
            }
        }
        true
    }

    /// Dispatches and awaits a search in one step.
    pub async fn search<B: SearchBackend>(&mut self, backend: &B, page: u32) -> SessionStatus {
        if let Some(dispatch) = self.dispatch(page) {
            let result = backend.search(&dispatch.request).await;
            self.apply(dispatch.token, result);
        }
        self.status()
    }
}
