//! Placeholder rules: literal find/replace over the final output.
//!
//! Placeholders are applied once per conversion, after the whole tree has been
//! reduced. They never see intermediate per-element content.

/// A literal substring replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PlaceholderRule {
    /// Text to search for.
    pub from: String,
    /// Replacement text.
    pub to: String,
}

impl PlaceholderRule {
    /// Create a placeholder rule.
    #[must_use]
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

impl IntoIterator for PlaceholderRule {
    type Item = Self;
    type IntoIter = std::iter::Once<Self>;

    fn into_iter(self) -> Self::IntoIter {
        std::iter::once(self)
    }
}

/// Ordered placeholder set, keyed by `from`.
///
/// Registering a `from` that is already present replaces its `to` and keeps
/// the original position in the application order.
#[derive(Debug, Default, Clone)]
pub struct Placeholders {
    items: Vec<PlaceholderRule>,
}

impl Placeholders {
    /// Create an empty placeholder set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a placeholder, replacing the `to` of an existing entry with the
    /// same `from`.
    pub fn insert(&mut self, rule: PlaceholderRule) {
        if let Some(existing) = self.items.iter_mut().find(|item| item.from == rule.from) {
            existing.to = rule.to;
        } else {
            self.items.push(rule);
        }
    }

    /// Apply every placeholder in order as a global literal replacement.
    ///
    /// Entries with an empty `from` are skipped.
    pub fn apply(&self, text: &mut String) {
        for item in &self.items {
            if item.from.is_empty() {
                tracing::debug!(to = %item.to, "Skipping placeholder with empty `from`");
                continue;
            }
            if text.contains(&item.from) {
                *text = text.replace(&item.from, &item.to);
            }
        }
    }

    /// Registered placeholders in application order.
    #[must_use]
    pub fn as_slice(&self) -> &[PlaceholderRule] {
        &self.items
    }

    /// Check if there are any placeholders registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get the number of registered placeholders.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }
}
