//! Rule registry: ordered rules, placeholders, ignore selectors, fallback.

use crate::document::Document;
use crate::placeholders::{PlaceholderRule, Placeholders};
use crate::rule::{Formatter, Rule};

/// Registered conversion configuration.
///
/// Only the [`Engine`](crate::Engine) mutates a registry, after validating
/// the whole batch being registered.
pub struct Registry<D: Document> {
    rules: Vec<Rule<D>>,
    placeholders: Placeholders,
    ignore_selectors: Vec<String>,
    fallback: Option<Box<dyn Formatter<D>>>,
}

impl<D: Document> Default for Registry<D> {
    fn default() -> Self {
        Self {
            rules: Vec::new(),
            placeholders: Placeholders::new(),
            ignore_selectors: Vec::new(),
            fallback: None,
        }
    }
}

impl<D: Document> Registry<D> {
    /// Registered rules in registration order.
    #[must_use]
    pub fn rules(&self) -> &[Rule<D>] {
        &self.rules
    }

    /// Registered placeholders in application order.
    #[must_use]
    pub fn placeholders(&self) -> &Placeholders {
        &self.placeholders
    }

    /// Ignore selectors in registration order, without duplicates.
    #[must_use]
    pub fn ignore_selectors(&self) -> &[String] {
        &self.ignore_selectors
    }

    /// Fallback for elements no rule matches.
    #[must_use]
    pub fn fallback(&self) -> Option<&dyn Formatter<D>> {
        self.fallback.as_deref()
    }

    pub(crate) fn push_rules(&mut self, rules: Vec<Rule<D>>) {
        self.rules.extend(rules);
    }

    pub(crate) fn insert_placeholders(&mut self, placeholders: Vec<PlaceholderRule>) {
        for placeholder in placeholders {
            self.placeholders.insert(placeholder);
        }
    }

    pub(crate) fn add_ignore_selectors(&mut self, selectors: Vec<String>) {
        for selector in selectors {
            if !self.ignore_selectors.contains(&selector) {
                self.ignore_selectors.push(selector);
            }
        }
    }

    pub(crate) fn set_fallback(&mut self, fallback: Box<dyn Formatter<D>>) {
        self.fallback = Some(fallback);
    }
}
