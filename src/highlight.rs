//! Splitting text into plain and matched runs for search highlighting.
//!
//! The query is a literal, case-insensitive substring. Regex metacharacters
//! in it are escaped before compiling.

use regex::{Regex, RegexBuilder};

/// A run of text, either plain or matching the query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Plain(String),
    Match(String),
}

impl Segment {
    pub fn text(&self) -> &str {
        match self {
            Segment::Plain(s) | Segment::Match(s) => s,
        }
    }

    pub fn is_match(&self) -> bool {
        matches!(self, Segment::Match(_))
    }
}

/// A compiled query, reused across every row of a render pass
#[derive(Debug, Clone)]
pub struct Highlighter {
    pattern: Option<Regex>,
}

impl Highlighter {
    pub fn new(query: &str) -> Self {
        // Blank queries never reach the regex compiler
        if query.trim().is_empty() {
            return Highlighter { pattern: None };
        }

        let pattern = match RegexBuilder::new(&regex::escape(query))
            .case_insensitive(true)
            .build()
        {
            Ok(pattern) => Some(pattern),
            Err(e) => {
                log::warn!("highlighting disabled for a {}-byte query: {}", query.len(), e);
                None
            }
        };
        Highlighter { pattern }
    }

    pub fn segments(&self, text: &str) -> Vec<Segment> {
        let Some(pattern) = &self.pattern else {
            return vec![Segment::Plain(text.to_string())];
        };

        let mut segments = Vec::new();
        let mut last = 0;
        for found in pattern.find_iter(text) {
            if found.start() > last {
                segments.push(Segment::Plain(text[last..found.start()].to_string()));
            }
            segments.push(Segment::Match(found.as_str().to_string()));
            last = found.end();
        }
        if last < text.len() {
            segments.push(Segment::Plain(text[last..].to_string()));
        }

        if segments.is_empty() {
            segments.push(Segment::Plain(text.to_string()));
        }
        segments
    }
}

/// Segment `text` against `query`
#[allow(dead_code)]
pub fn highlight(text: &str, query: &str) -> Vec<Segment> {
    Highlighter::new(query).segments(text)
}
