use regex::{Regex, RegexBuilder};
use serde::Serialize;

/// A run of text that is either plain or a match of the active query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    pub text: String,
    pub emphasized: bool,
}

impl Segment {
    pub fn plain(text: impl Into<String>) -> Segment {
        Segment {
            text: text.into(),
            emphasized: false,
        }
    }

    pub fn emphasized(text: impl Into<String>) -> Segment {
        Segment {
            text: text.into(),
            emphasized: true,
        }
    }
}

/// Case-insensitive matcher for `query` taken as a literal phrase.
/// Returns `None` for an empty query.
pub fn literal_matcher(query: &str) -> Option<Regex> {
    if query.is_empty() {
        return None;
    }
    // An escaped literal always compiles; only the size limit could refuse it.
    RegexBuilder::new(&regex::escape(query))
        .case_insensitive(true)
        .build()
        .ok()
}

/// Splits `text` into plain and emphasized segments around every
/// case-insensitive occurrence of `query`.
///
/// Concatenating the returned segments always reproduces `text`. Empty
/// plain runs between adjacent matches are not emitted.
pub fn highlight(text: &str, query: &str) -> Vec<Segment> {
    highlight_with(text, literal_matcher(query).as_ref())
}

/// Same as [`highlight`] with an already compiled query matcher.
pub fn highlight_with(text: &str, matcher: Option<&Regex>) -> Vec<Segment> {
    let matcher = match matcher {
        Some(m) if !text.is_empty() => m,
        _ => return vec![Segment::plain(text)],
    };

    let mut segments = Vec::new();
    let mut last = 0usize;
    for m in matcher.find_iter(text) {
        if m.start() > last {
            segments.push(Segment::plain(&text[last..m.start()]));
        }
        segments.push(Segment::emphasized(m.as_str()));
        last = m.end();
    }
    if last < text.len() || segments.is_empty() {
        segments.push(Segment::plain(&text[last..]));
    }
    segments
}
