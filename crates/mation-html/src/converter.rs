//! HTML-to-text converter facade.

use mation_core::{
    ConversionContext, ConvertError, ConvertOptions, Engine, Formatter, PlaceholderDef,
    PlaceholderRule, RegistrationError, Registry, Rule, RuleDef,
};

use crate::document::HtmlDocument;
use crate::matcher::CssMatcher;

/// Rule over HTML documents.
pub type HtmlRule = Rule<HtmlDocument>;

/// Formatter context over HTML documents.
pub type HtmlContext<'a> = ConversionContext<'a, HtmlDocument>;

/// Converts HTML source to text using registered rules.
///
/// # Example
///
/// ```ignore
/// use mation_html::{ConvertOptions, HtmlConverter, HtmlRule};
///
/// let mut converter = HtmlConverter::new();
/// converter.register(vec![
///     HtmlRule::template("strong, b", "**{content}**"),
///     HtmlRule::template("a", "[{content}]({dataset.href})"),
/// ])?;
/// converter.set_ignore_selectors(["script", "style"])?;
///
/// let text = converter.convert("<p><b>Hi</b></p>", &ConvertOptions::default())?;
/// assert_eq!(text, "**Hi**");
/// ```
pub struct HtmlConverter {
    engine: Engine<HtmlDocument, CssMatcher>,
}

impl Default for HtmlConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl HtmlConverter {
    #[must_use]
    pub fn new() -> Self {
        Self {
            engine: Engine::new(CssMatcher::new()),
        }
    }

    /// Underlying engine.
    #[must_use]
    pub fn engine(&self) -> &Engine<HtmlDocument, CssMatcher> {
        &self.engine
    }

    /// Registered configuration.
    #[must_use]
    pub fn registry(&self) -> &Registry<HtmlDocument> {
        self.engine.registry()
    }

    /// Register one rule or a batch of rules (all-or-nothing).
    pub fn register(
        &mut self,
        rules: impl IntoIterator<Item = HtmlRule>,
    ) -> Result<(), RegistrationError> {
        self.engine.register(rules)
    }

    /// Register declarative rule definitions (all-or-nothing).
    pub fn register_defs(
        &mut self,
        defs: impl IntoIterator<Item = RuleDef>,
    ) -> Result<(), RegistrationError> {
        self.engine.register_defs(defs)
    }

    /// Register one placeholder or a batch of placeholders.
    pub fn register_placeholder(&mut self, placeholders: impl IntoIterator<Item = PlaceholderRule>) {
        self.engine.register_placeholder(placeholders);
    }

    /// Register declarative placeholder definitions (all-or-nothing).
    pub fn register_placeholder_defs(
        &mut self,
        defs: impl IntoIterator<Item = PlaceholderDef>,
    ) -> Result<(), RegistrationError> {
        self.engine.register_placeholder_defs(defs)
    }

    /// Set the formatter for elements no rule matches.
    pub fn set_fallback(&mut self, fallback: impl Formatter<HtmlDocument> + 'static) {
        self.engine.set_fallback(fallback);
    }

    /// Set a closure as fallback.
    pub fn set_fallback_fn<F>(&mut self, f: F)
    where
        F: Fn(&HtmlContext<'_>) -> Result<Option<String>, ConvertError> + Send + Sync + 'static,
    {
        self.engine.set_fallback_fn(f);
    }

    /// Add selectors whose matching elements are dropped with their subtree.
    pub fn set_ignore_selectors<I, S>(&mut self, selectors: I) -> Result<(), RegistrationError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.engine.set_ignore_selectors(selectors)
    }

    /// Parse `html` and convert it.
    ///
    /// # Errors
    ///
    /// Returns an error if a formatter fails or returns no content.
    pub fn convert(&self, html: &str, options: &ConvertOptions) -> Result<String, ConvertError> {
        let document = HtmlDocument::parse(html);
        self.convert_document(&document, options)
    }

    /// Convert raw bytes, which must be valid UTF-8.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::InvalidInput`] for invalid UTF-8, otherwise
    /// see [`convert`](Self::convert).
    pub fn convert_bytes(
        &self,
        bytes: &[u8],
        options: &ConvertOptions,
    ) -> Result<String, ConvertError> {
        self.convert(std::str::from_utf8(bytes)?, options)
    }

    /// Convert an already parsed document.
    pub fn convert_document(
        &self,
        document: &HtmlDocument,
        options: &ConvertOptions,
    ) -> Result<String, ConvertError> {
        self.engine.convert(document, options)
    }
}
