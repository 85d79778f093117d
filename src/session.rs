use std::sync::Arc;
use tokio::sync::mpsc;

use crate::backend::{CategoryBackend, SearchBackend};
use crate::categories::CategoryAggregator;
use crate::config::Config;
use crate::data_models::{CategorySummary, SearchResultPage};
use crate::error::BackendError;
use crate::orchestrator::{Dispatch, QueryOrchestrator, Token};

/// A backend reply, delivered back to the session as an event.
#[derive(Debug)]
pub enum SessionEvent {
    Search {
        token: Token,
        result: Result<SearchResultPage, BackendError>,
    },
    Categories(Result<Vec<CategorySummary>, BackendError>),
}

/// What applying one event did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Update {
    Results,
    Stale,
    Categories,
}

/// Drives an orchestrator and a category aggregator against a backend.
///
/// Requests run on their own tasks and never touch state; their replies come
/// back through a channel and are applied one at a time by `next_update`, so
/// state has a single writer.
pub struct SearchSession<B> {
    backend: Arc<B>,
    orchestrator: QueryOrchestrator,
    categories: CategoryAggregator,
    category_limit: u32,
    events_tx: mpsc::UnboundedSender<SessionEvent>,
    events_rx: mpsc::UnboundedReceiver<SessionEvent>,
}

impl<B> SearchSession<B>
where
    B: SearchBackend + CategoryBackend + 'static,
{
    pub fn new(backend: Arc<B>, config: &Config) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            backend,
            orchestrator: QueryOrchestrator::new(config.page_size),
            categories: CategoryAggregator::new(config.category_limit as usize),
            category_limit: config.category_limit,
            events_tx,
            events_rx,
        }
    }

    pub fn orchestrator(&self) -> &QueryOrchestrator {
        &self.orchestrator
    }

    pub fn categories(&self) -> &CategoryAggregator {
        &self.categories
    }

    pub fn set_query_text(&mut self, text: impl Into<String>) {
        self.orchestrator.set_query_text(text);
    }

    /// Returns `true` if a request was sent.
    pub fn submit(&mut self) -> bool {
        let dispatch = self.orchestrator.submit();
        self.send(dispatch)
    }

    pub fn change_page(&mut self, target: u32) -> bool {
        let dispatch = self.orchestrator.change_page(target);
        self.send(dispatch)
    }

    pub fn select_category(&mut self, category: &str) -> bool {
        let dispatch = self.orchestrator.select_category(category);
        self.send(dispatch)
    }

    /// Starts the category fetch unless one is running or already succeeded.
    pub fn fetch_categories(&mut self) -> bool {
        if !self.categories.begin_fetch() {
            return false;
        }
        let backend = Arc::clone(&self.backend);
        let tx = self.events_tx.clone();
        let limit = self.category_limit;
        tokio::spawn(async move {
            let result = backend.top_categories(limit).await;
            // The receiver lives as long as the session.
            let _ = tx.send(SessionEvent::Categories(result));
        });
        true
    }

    fn send(&mut self, dispatch: Option<Dispatch>) -> bool {
        let Some(Dispatch { token, request }) = dispatch else {
            return false;
        };
        let backend = Arc::clone(&self.backend);
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = backend.search(&request).await;
            let _ = tx.send(SessionEvent::Search { token, result });
        });
        true
    }

    /// Waits for the next backend reply and applies it.
    pub async fn next_update(&mut self) -> Option<Update> {
        let event = self.events_rx.recv().await?;
        Some(self.apply(event))
    }

    pub fn apply(&mut self, event: SessionEvent) -> Update {
        match event {
            SessionEvent::Search { token, result } => {
                if self.orchestrator.apply(token, result) {
                    Update::Results
                } else {
                    Update::Stale
                }
            }
            SessionEvent::Categories(result) => {
                self.categories.apply(result);
                Update::Categories
            }
        }
    }

    /// Applies replies until no search or category fetch is outstanding.
    pub async fn settle(&mut self) {
        while self.orchestrator.outstanding().is_some() || self.categories.is_loading() {
            if self.next_update().await.is_none() {
                break;
            }
        }
    }
}
