use anyhow::Result;
use std::sync::Arc;

use hacksearch::config::Config;
use hacksearch::orchestrator::{QueryOrchestrator, SearchState, SessionStatus};
use hacksearch::render::{render_session, status_line};
use hacksearch::session::{SearchSession, Update};

mod test_helpers {
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::oneshot;

    use hacksearch::backend::{CategoryBackend, SearchBackend, SearchRequest};
    use hacksearch::data_models::{CategorySummary, SearchResult, SearchResultPage};
    use hacksearch::error::BackendError;

    /// In-memory backend. Requests for a gated page (or the category list)
    /// wait until the matching sender fires, so tests decide arrival order.
    #[derive(Default)]
    pub struct FakeBackend {
        pub total: u64,
        search_calls: AtomicUsize,
        category_calls: AtomicUsize,
        page_gates: Mutex<HashMap<u32, oneshot::Receiver<()>>>,
        category_gate: Mutex<Option<oneshot::Receiver<()>>>,
    }

    impl FakeBackend {
        pub fn with_total(total: u64) -> Self {
            Self {
                total,
                ..Default::default()
            }
        }

        pub fn gate_page(&self, page: u32) -> oneshot::Sender<()> {
            let (tx, rx) = oneshot::channel();
            self.page_gates.lock().unwrap().insert(page, rx);
            tx
        }

        pub fn gate_categories(&self) -> oneshot::Sender<()> {
            let (tx, rx) = oneshot::channel();
            *self.category_gate.lock().unwrap() = Some(rx);
            tx
        }

        pub fn search_calls(&self) -> usize {
            self.search_calls.load(Ordering::SeqCst)
        }

        pub fn category_calls(&self) -> usize {
            self.category_calls.load(Ordering::SeqCst)
        }

        fn take_page_gate(&self, page: u32) -> Option<oneshot::Receiver<()>> {
            self.page_gates.lock().unwrap().remove(&page)
        }

        fn take_category_gate(&self) -> Option<oneshot::Receiver<()>> {
            self.category_gate.lock().unwrap().take()
        }
    }

    impl SearchBackend for FakeBackend {
        async fn search(&self, request: &SearchRequest) -> Result<SearchResultPage, BackendError> {
            self.search_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = self.take_page_gate(request.page) {
                let _ = gate.await;
            }
            if request.query == "fail" {
                return Err(BackendError::Http {
                    status: 500,
                    reason: "Internal Server Error".to_string(),
                    body: "index unavailable".to_string(),
                });
            }

            let first = u64::from(request.page - 1) * u64::from(request.page_size);
            let last = (first + u64::from(request.page_size)).min(self.total);
            let hits = (first..last)
                .map(|i| SearchResult {
                    id: Some(format!("{}-{i}", request.query)),
                    title: Some(format!("{} hack #{i}", request.query)),
                    content: Some(format!("A {} makeover using two shelves.", request.query)),
                    url: Some(format!("https://hacks.example/{i}")),
                    ..Default::default()
                })
                .collect();
            Ok(SearchResultPage::new(hits, self.total, request.page, request.page_size))
        }
    }

    impl CategoryBackend for FakeBackend {
        async fn top_categories(&self, limit: u32) -> Result<Vec<CategorySummary>, BackendError> {
            self.category_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = self.take_category_gate() {
                let _ = gate.await;
            }
            Ok(["bedroom", "kitchen", "office", "kids", "storage", "desk", "bath", "garden", "hall", "cat"]
                .iter()
                .take(limit as usize + 2)
                .enumerate()
                .map(|(i, c)| CategorySummary {
                    category: c.to_string(),
                    count: 100 - i as u64,
                })
                .collect())
        }
    }
}

use test_helpers::*;

fn session(backend: &Arc<FakeBackend>) -> SearchSession<FakeBackend> {
    SearchSession::new(Arc::clone(backend), &Config::default())
}

#[tokio::test]
async fn test_kitchen_second_page_end_to_end() -> Result<()> {
    let backend = Arc::new(FakeBackend::with_total(23));
    let mut session = session(&backend);

    session.set_query_text("kitchen");
    assert!(session.change_page(2));
    assert!(session.orchestrator().is_loading());
    assert_eq!(session.next_update().await, Some(Update::Results));

    let o = session.orchestrator();
    assert_eq!(o.status(), SessionStatus::Success);
    assert_eq!(o.pagination().page, 2);
    assert_eq!(o.pagination().total_pages, 3);
    assert_eq!(o.results().hits.len(), 10);
    assert_eq!(status_line(o).as_deref(), Some("About 23 results (page 2 of 3)"));

    let cards = render_session(o, &Config::default().snippet);
    assert_eq!(cards.len(), 10);
    assert!(cards[0].title_segments.iter().any(|s| s.emphasized && s.text == "kitchen"));
    Ok(())
}

#[tokio::test]
async fn test_empty_query_never_reaches_backend() -> Result<()> {
    let backend = Arc::new(FakeBackend::with_total(23));
    let mut session = session(&backend);

    session.set_query_text("  \t ");
    assert!(!session.submit());
    assert!(!session.change_page(4));
    assert_eq!(backend.search_calls(), 0);

    let r = session.orchestrator().results();
    assert_eq!((r.total, r.page, r.total_pages), (0, 1, 0));
    assert!(r.hits.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_late_response_is_dropped() -> Result<()> {
    let backend = Arc::new(FakeBackend::with_total(23));
    let mut session = session(&backend);
    let release_first_page = backend.gate_page(1);

    session.set_query_text("kitchen");
    assert!(session.submit());
    assert!(session.change_page(2));

    // page 2 overtakes the held-back page 1
    assert_eq!(session.next_update().await, Some(Update::Results));
    let after_page_two = session.orchestrator().state().clone();
    assert_eq!(session.orchestrator().page(), 2);

    release_first_page.send(()).unwrap();
    assert_eq!(session.next_update().await, Some(Update::Stale));
    assert_eq!(session.orchestrator().state(), &after_page_two);
    assert_eq!(session.orchestrator().results().hits[0].key(), "kitchen-10");
    assert_eq!(backend.search_calls(), 2);
    Ok(())
}

#[tokio::test]
async fn test_error_keeps_previous_results_visible() -> Result<()> {
    let backend = Arc::new(FakeBackend::with_total(5));
    let mut session = session(&backend);

    session.set_query_text("desk");
    session.submit();
    session.settle().await;
    assert_eq!(session.orchestrator().results().hits.len(), 5);

    session.set_query_text("fail");
    session.submit();
    session.settle().await;

    let o = session.orchestrator();
    assert_eq!(
        o.error(),
        Some("HTTP 500 Internal Server Error – index unavailable")
    );
    assert_eq!(o.results().hits.len(), 5);
    assert!(matches!(o.state(), SearchState::Error { shown: Some(_), .. }));
    Ok(())
}

#[tokio::test]
async fn test_category_fetch_is_idempotent() -> Result<()> {
    let backend = Arc::new(FakeBackend::with_total(0));
    let mut session = session(&backend);
    let release = backend.gate_categories();

    assert!(session.fetch_categories());
    assert!(!session.fetch_categories());
    assert!(session.categories().is_loading());

    release.send(()).unwrap();
    assert_eq!(session.next_update().await, Some(Update::Categories));
    assert_eq!(backend.category_calls(), 1);
    assert_eq!(session.categories().visible().len(), 8);

    assert!(!session.fetch_categories());
    assert_eq!(backend.category_calls(), 1);
    Ok(())
}

#[tokio::test]
async fn test_category_selection_searches_first_page() -> Result<()> {
    let backend = Arc::new(FakeBackend::with_total(30));
    let mut session = session(&backend);

    session.set_query_text("kitchen");
    session.change_page(3);
    session.settle().await;
    assert_eq!(session.orchestrator().page(), 3);

    assert!(session.select_category("bedroom"));
    session.settle().await;
    let o = session.orchestrator();
    assert_eq!(o.query_text(), "bedroom");
    assert_eq!(o.page(), 1);
    assert_eq!(o.results().hits[0].key(), "bedroom-0");
    Ok(())
}

#[tokio::test]
async fn test_highlighting_follows_live_query_text() -> Result<()> {
    let backend = Arc::new(FakeBackend::with_total(1));
    let mut session = session(&backend);

    session.set_query_text("kitchen");
    session.submit();
    session.settle().await;

    // edited but not submitted
    session.set_query_text("shelves");
    let cards = render_session(session.orchestrator(), &Config::default().snippet);
    assert!(cards[0].snippet_segments.iter().any(|s| s.emphasized && s.text == "shelves"));
    assert!(!cards[0].title_segments.iter().any(|s| s.emphasized));
    assert_eq!(backend.search_calls(), 1);
    Ok(())
}

#[tokio::test]
async fn test_orchestrator_search_without_session() -> Result<()> {
    let backend = FakeBackend::with_total(12);
    let mut o = QueryOrchestrator::new(10);

    o.set_query_text("storage");
    assert_eq!(o.search(&backend, 2).await, SessionStatus::Success);
    assert_eq!(o.results().hits.len(), 2);
    assert_eq!(o.pagination().total_pages, 2);

    o.set_query_text("");
    assert_eq!(o.search(&backend, 1).await, SessionStatus::Idle);
    assert_eq!(backend.search_calls(), 1);
    Ok(())
}
