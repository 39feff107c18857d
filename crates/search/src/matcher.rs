use regex::{Regex, RegexBuilder};
use std::ops::Range;

pub const MARK_OPEN: &str = "<mark>";
pub const MARK_CLOSE: &str = "</mark>";

/// True iff `query` is empty or `haystack` contains it, ignoring case.
pub fn matches(haystack: &str, query: &str) -> bool {
    QueryMatcher::new(query).matches(haystack)
}

/// Wrap every case-insensitive occurrence of `query` in `<mark>` tags.
/// `query` is matched literally; an empty query returns `text` unchanged.
pub fn highlight(text: &str, query: &str) -> String {
    QueryMatcher::new(query).highlight(text)
}

/// Byte ranges of `text` that [`highlight`] would wrap.
pub fn highlight_spans(text: &str, query: &str) -> Vec<Range<usize>> {
    QueryMatcher::new(query).spans(text)
}

/// A query prepared once and applied to many rows.
#[derive(Debug, Clone)]
pub struct QueryMatcher {
    folded: String,
    pattern: Option<Regex>,
}

impl QueryMatcher {
    pub fn new(query: &str) -> Self {
        if query.is_empty() {
            return Self {
                folded: String::new(),
                pattern: None,
            };
        }

        let pattern = RegexBuilder::new(&regex::escape(query))
            .case_insensitive(true)
            .build()
            .map_err(|err| log::debug!("matcher: cannot highlight {query:?}: {err}"))
            .ok();

        Self {
            folded: query.to_lowercase(),
            pattern,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.folded.is_empty()
    }

    pub fn matches(&self, haystack: &str) -> bool {
        self.folded.is_empty() || haystack.to_lowercase().contains(&self.folded)
    }

    /// True when any of `fields` matches.
    pub fn matches_any<'a>(&self, mut fields: impl Iterator<Item = &'a str>) -> bool {
        self.folded.is_empty() || fields.any(|field| self.matches(field))
    }

    pub fn spans(&self, text: &str) -> Vec<Range<usize>> {
        match &self.pattern {
            Some(pattern) => pattern.find_iter(text).map(|m| m.range()).collect(),
            None => Vec::new(),
        }
    }

    pub fn highlight(&self, text: &str) -> String {
        let spans = self.spans(text);
        if spans.is_empty() {
            return text.to_string();
        }

        let mut out =
            String::with_capacity(text.len() + spans.len() * (MARK_OPEN.len() + MARK_CLOSE.len()));
        let mut last = 0;
        for span in spans {
            out.push_str(&text[last..span.start]);
            out.push_str(MARK_OPEN);
            out.push_str(&text[span.clone()]);
            out.push_str(MARK_CLOSE);
            last = span.end;
        }
        out.push_str(&text[last..]);
        out
    }
}
