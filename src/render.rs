use regex::Regex;
use serde::Serialize;

use crate::data_models::{SearchResult, SearchResultPage};
use crate::highlight::{Segment, highlight_with, literal_matcher};
use crate::orchestrator::QueryOrchestrator;
use crate::snippet::{NO_DESCRIPTION, SnippetConfig, extract_snippet_with};

pub const UNTITLED: &str = "Untitled hack";
pub const NO_RESULTS: &str = "No results found. Try a different query.";

/// Everything a result card needs, already highlighted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultCard {
    pub key: String,
    pub title_segments: Vec<Segment>,
    pub snippet_segments: Vec<Segment>,
    pub url: String,
    pub source: Option<String>,
    pub author: Option<String>,
    pub date_display: String,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

pub fn render_result(result: &SearchResult, query: &str, config: &SnippetConfig) -> ResultCard {
    render_with(result, literal_matcher(query).as_ref(), config)
}

fn render_with(result: &SearchResult, matcher: Option<&Regex>, config: &SnippetConfig) -> ResultCard {
    let body = non_empty(&result.content)
        .or(non_empty(&result.excerpt))
        .unwrap_or(NO_DESCRIPTION);
    let snippet = extract_snippet_with(body, matcher, config);
    let title = non_empty(&result.title).unwrap_or(UNTITLED);

    ResultCard {
        key: result.key().to_string(),
        title_segments: highlight_with(title, matcher),
        snippet_segments: highlight_with(&snippet, matcher),
        url: result.url.clone().unwrap_or_default(),
        source: non_empty(&result.source).map(str::to_string),
        author: non_empty(&result.author).map(str::to_string),
        date_display: result
            .date
            .as_deref()
            .map(|d| d.chars().take(10).collect())
            .unwrap_or_default(),
    }
}

/// Cards for every hit, in backend order, highlighted with `query`.
pub fn render_page(page: &SearchResultPage, query: &str, config: &SnippetConfig) -> Vec<ResultCard> {
    let matcher = literal_matcher(query);
    page.hits
        .iter()
        .map(|hit| render_with(hit, matcher.as_ref(), config))
        .collect()
}

/// Cards for whatever the orchestrator has on screen. Highlighting follows
/// the live query text, which may have been edited since the last search.
pub fn render_session(orchestrator: &QueryOrchestrator, config: &SnippetConfig) -> Vec<ResultCard> {
    render_page(orchestrator.results(), orchestrator.query_text().trim(), config)
}

/// "About N results (page X of Y)", shown only for a settled multi-page result.
pub fn status_line(orchestrator: &QueryOrchestrator) -> Option<String> {
    let page = orchestrator.results();
    if orchestrator.is_loading()
        || orchestrator.error().is_some()
        || page.hits.is_empty()
        || page.total_pages <= 1
    {
        return None;
    }
    Some(format!(
        "About {} result{} (page {} of {})",
        page.total,
        if page.total == 1 { "" } else { "s" },
        orchestrator.page(),
        page.total_pages
    ))
}

pub fn empty_message(orchestrator: &QueryOrchestrator) -> Option<&'static str> {
    let nothing_shown = orchestrator.results().hits.is_empty();
    if !orchestrator.is_loading() && nothing_shown && !orchestrator.query_text().trim().is_empty() {
        Some(NO_RESULTS)
    } else {
        None
    }
}
