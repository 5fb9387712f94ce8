//! CSS selector matching with a compiled-selector cache.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use mation_core::Matcher;
use scraper::{ElementRef, Selector};

use crate::document::HtmlDocument;

/// [`Matcher`] backed by `scraper` CSS selectors.
///
/// Selectors are compiled on first use and cached by source text.
/// Selectors that fail to compile never match.
#[derive(Debug, Default)]
pub struct CssMatcher {
    cache: RwLock<HashMap<String, Selector>>,
}

impl CssMatcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn compiled(&self, selector: &str) -> Option<Selector> {
        if let Some(compiled) = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(selector)
        {
            return Some(compiled.clone());
        }

        let compiled = match Selector::parse(selector) {
            Ok(compiled) => compiled,
            Err(e) => {
                tracing::debug!(selector, error = %e, "Invalid selector");
                return None;
            }
        };
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(selector.to_owned(), compiled.clone());
        Some(compiled)
    }
}

impl Matcher<HtmlDocument> for CssMatcher {
    fn matches(&self, document: &HtmlDocument, node: ego_tree::NodeId, selector: &str) -> bool {
        let Some(element) = document.html().tree.get(node).and_then(ElementRef::wrap) else {
            return false;
        };
        self.compiled(selector)
            .is_some_and(|compiled| compiled.matches(&element))
    }

    fn check_selector(&self, selector: &str) -> Result<(), String> {
        Selector::parse(selector).map(drop).map_err(|e| e.to_string())
    }
}
