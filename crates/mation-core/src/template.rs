//! `to` templates.
//!
//! A template is plain text with three kinds of tokens:
//!
//! - `{content}`: the element's current content
//! - `{dataset.KEY}`: the value of attribute `KEY`, empty when absent
//! - `{spacing}`: reserved, always renders as the empty string
//!
//! Templates are parsed once when the rule is built. Rendering is a single
//! pass over the parsed segments, so text coming from `{content}` or an
//! attribute value is never scanned for tokens again.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{(?:(content)|(spacing)|dataset\.([\w-]+))\}").unwrap()
});

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Content,
    Spacing,
    Dataset(String),
}

/// Parsed `to` template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    segments: Vec<Segment>,
}

impl Template {
    /// Parse a template string. Unknown `{...}` sequences are kept literally.
    #[must_use]
    pub fn parse(source: impl Into<String>) -> Self {
        let source = source.into();
        let mut segments = Vec::new();
        let mut last = 0;

        for caps in TOKEN_RE.captures_iter(&source) {
            let Some(whole) = caps.get(0) else { continue };
            if whole.start() > last {
                segments.push(Segment::Literal(source[last..whole.start()].to_owned()));
            }
            let segment = if caps.get(1).is_some() {
                Segment::Content
            } else if caps.get(2).is_some() {
                Segment::Spacing
            } else {
                Segment::Dataset(caps[3].to_owned())
            };
            segments.push(segment);
            last = whole.end();
        }
        if last < source.len() {
            segments.push(Segment::Literal(source[last..].to_owned()));
        }

        Self { source, segments }
    }

    /// Template text as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Render with the given content and attribute map.
    #[must_use]
    pub fn render(&self, content: &str, dataset: &HashMap<String, String>) -> String {
        let mut out = String::with_capacity(self.source.len() + content.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Content => out.push_str(content),
                Segment::Spacing => {}
                Segment::Dataset(key) => {
                    if let Some(value) = dataset.get(key) {
                        out.push_str(value);
                    }
                }
            }
        }
        out
    }
}
