use regex::Regex;

use crate::highlight::literal_matcher;

pub const ELLIPSIS: &str = "…";
pub const NO_DESCRIPTION: &str = "No description available yet.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnippetConfig {
    /// Window size in characters.
    pub length: usize,
    /// How many characters before the first match the window tries to start.
    pub context_before: usize,
}

impl Default for SnippetConfig {
    fn default() -> Self {
        Self {
            length: 260,
            context_before: 80,
        }
    }
}

/// Builds a bounded excerpt of `full_text`, positioned around the first
/// case-insensitive occurrence of `query`.
///
/// Without a query or a match the excerpt is the leading `length`
/// characters. Otherwise the window starts `context_before` characters ahead
/// of the match; a window that would run past the end is slid back so it ends
/// at the text boundary instead of shrinking. Ellipses mark cut-off sides.
pub fn extract_snippet(full_text: &str, query: &str, config: &SnippetConfig) -> String {
    extract_snippet_with(full_text, literal_matcher(query).as_ref(), config)
}

/// Same as [`extract_snippet`] with an already compiled query matcher.
pub fn extract_snippet_with(full_text: &str, matcher: Option<&Regex>, config: &SnippetConfig) -> String {
    if full_text.is_empty() {
        return NO_DESCRIPTION.to_string();
    }

    let first_match = matcher.and_then(|m| m.find(full_text));
    let Some(m) = first_match else {
        return leading(full_text, config.length);
    };

    let chars: Vec<char> = full_text.chars().collect();
    let len = chars.len();
    let idx = full_text[..m.start()].chars().count();

    // The match must start inside the window.
    let before = config.context_before.min(config.length.saturating_sub(1));
    let mut start = idx.saturating_sub(before);
    let mut end = start + config.length;
    if end > len {
        end = len;
        start = end.saturating_sub(config.length);
    }

    // A window covering the whole text is returned untouched.
    if start == 0 && end == len {
        return full_text.to_string();
    }

    let window: String = chars[start..end].iter().collect();
    let mut snippet = String::with_capacity(window.len() + 2 * ELLIPSIS.len());
    if start > 0 {
        snippet.push_str(ELLIPSIS);
    }
    snippet.push_str(window.trim());
    if end < len {
        snippet.push_str(ELLIPSIS);
    }
    snippet
}

fn leading(text: &str, length: usize) -> String {
    match text.char_indices().nth(length) {
        Some((cut, _)) => format!("{}{}", &text[..cut], ELLIPSIS),
        None => text.to_string(),
    }
}
