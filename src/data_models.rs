use serde::{Deserialize, Serialize};

/// Query text and paging position of the active search session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub text: String,
    pub page: u32,
    pub page_size: u32,
}

impl SearchQuery {
    pub fn new(page_size: u32) -> SearchQuery {
        SearchQuery {
            text: String::new(),
            page: 1,
            page_size,
        }
    }

    /// The text that is actually sent to the backend, or `None` for the
    /// "no search" sentinel.
    pub fn trimmed(&self) -> Option<&str> {
        let t = self.text.trim();
        if t.is_empty() { None } else { Some(t) }
    }
}

/// `ceil(total / page_size)`, or 0 when `page_size` is 0. Saturates at
/// `u32::MAX` pages.
pub fn total_pages(total: u64, page_size: u32) -> u32 {
    if page_size == 0 {
        return 0;
    }
    u32::try_from(total.div_ceil(u64::from(page_size))).unwrap_or(u32::MAX)
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SearchResultPage {
    pub hits: Vec<SearchResult>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u32,
}

impl SearchResultPage {
    /// The zero-result page shown when there is nothing to search for.
    pub fn empty(page_size: u32) -> SearchResultPage {
        SearchResultPage {
            hits: Vec::new(),
            total: 0,
            page: 1,
            page_size,
            total_pages: 0,
        }
    }

    pub fn new(hits: Vec<SearchResult>, total: u64, page: u32, page_size: u32) -> SearchResultPage {
        SearchResultPage {
            hits,
            total,
            page,
            page_size,
            total_pages: total_pages(total, page_size),
        }
    }
}

/// One matched hack document. Fields that the backend sends as `null` or
/// omits entirely are `None`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchResult {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub categories: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl SearchResult {
    /// Identity key used for stable list rendering: `id`, falling back to `url`.
    pub fn key(&self) -> &str {
        self.id
            .as_deref()
            .filter(|id| !id.is_empty())
            .or(self.url.as_deref())
            .unwrap_or("")
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CategorySummary {
    pub category: String,
    pub count: u64,
}
