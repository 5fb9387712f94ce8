//! Conversion engine: registration surface, tree reducer and rule resolver.

use std::cell::OnceCell;
use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::context::{Content, ConversionContext, Reduce, children_text};
use crate::def::{PlaceholderDef, RuleDef};
use crate::document::{Document, Matcher, NodeKind};
use crate::error::{ConvertError, RegistrationError};
use crate::options::ConvertOptions;
use crate::placeholders::PlaceholderRule;
use crate::registry::Registry;
use crate::rule::{FnFormatter, Formatter, Rule, Transform};

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Tag whose text nodes keep their whitespace.
const PREFORMATTED_TAG: &str = "pre";

/// Rule-driven converter from a document tree to text.
///
/// Configuration methods take `&mut self` and conversion takes `&self`, so a
/// configured engine can be shared (e.g. behind an `Arc`) for concurrent
/// conversions while reconfiguration requires exclusive access.
///
/// # Example
///
/// ```ignore
/// let mut engine = Engine::new(matcher);
/// engine.register(Rule::template("strong", "**{content}**"))?;
/// engine.register_placeholder(PlaceholderRule::new("(c)", "\u{a9}"));
/// engine.set_ignore_selectors(["script", "style"])?;
///
/// let text = engine.convert(&document, &ConvertOptions::default())?;
/// ```
pub struct Engine<D: Document, M> {
    registry: Registry<D>,
    matcher: M,
}

impl<D: Document, M: Matcher<D>> Engine<D, M> {
    /// Create an engine with no rules, using `matcher` for selector tests.
    #[must_use]
    pub fn new(matcher: M) -> Self {
        Self {
            registry: Registry::default(),
            matcher,
        }
    }

    /// Selector matcher in use.
    #[must_use]
    pub fn matcher(&self) -> &M {
        &self.matcher
    }

    /// Registered configuration.
    #[must_use]
    pub fn registry(&self) -> &Registry<D> {
        &self.registry
    }

    /// Register one rule or a batch of rules.
    ///
    /// The whole batch is validated before anything is stored: on error, no
    /// rule from the batch is registered.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::InvalidRule`] for an empty selector, an
    /// empty `to` template, or a selector the matcher rejects.
    pub fn register(
        &mut self,
        rules: impl IntoIterator<Item = Rule<D>>,
    ) -> Result<(), RegistrationError> {
        let rules: Vec<Rule<D>> = rules.into_iter().collect();
        for rule in &rules {
            rule.validate()?;
            self.matcher
                .check_selector(rule.selector())
                .map_err(|reason| rule.invalid(reason))?;
        }
        tracing::debug!(count = rules.len(), "Registered rules");
        self.registry.push_rules(rules);
        Ok(())
    }

    /// Register declarative rule definitions (all-or-nothing).
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::InvalidRule`] if any definition is
    /// incomplete or invalid.
    pub fn register_defs(
        &mut self,
        defs: impl IntoIterator<Item = RuleDef>,
    ) -> Result<(), RegistrationError> {
        let rules = defs
            .into_iter()
            .map(Rule::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        self.register(rules)
    }

    /// Register one placeholder or a batch of placeholders.
    ///
    /// A placeholder whose `from` is already registered replaces the earlier
    /// `to` (last write wins) and keeps its original position.
    pub fn register_placeholder(&mut self, placeholders: impl IntoIterator<Item = PlaceholderRule>) {
        self.registry
            .insert_placeholders(placeholders.into_iter().collect());
    }

    /// Register declarative placeholder definitions (all-or-nothing).
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::InvalidPlaceholder`] if any definition
    /// lacks `from` or `to`.
    pub fn register_placeholder_defs(
        &mut self,
        defs: impl IntoIterator<Item = PlaceholderDef>,
    ) -> Result<(), RegistrationError> {
        let placeholders = defs
            .into_iter()
            .map(PlaceholderRule::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        self.registry.insert_placeholders(placeholders);
        Ok(())
    }

    /// Set the formatter used for elements no rule matches, replacing any
    /// previous fallback.
    pub fn set_fallback(&mut self, fallback: impl Formatter<D> + 'static) {
        self.registry.set_fallback(Box::new(fallback));
    }

    /// Set a closure as fallback.
    pub fn set_fallback_fn<F>(&mut self, f: F)
    where
        F: Fn(&ConversionContext<'_, D>) -> Result<Option<String>, ConvertError>
            + Send
            + Sync
            + 'static,
    {
        self.set_fallback(FnFormatter(f));
    }

    /// Add selectors whose matching elements are dropped with their subtree.
    ///
    /// Selectors already registered are ignored. The list is validated in
    /// full before anything is added.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::InvalidSelectorList`] for an empty
    /// selector or one the matcher rejects.
    pub fn set_ignore_selectors<I, S>(&mut self, selectors: I) -> Result<(), RegistrationError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let selectors: Vec<String> = selectors.into_iter().map(Into::into).collect();
        for selector in &selectors {
            let checked = if selector.trim().is_empty() {
                Err("selector cannot be empty".to_owned())
            } else {
                self.matcher.check_selector(selector)
            };
            checked.map_err(|reason| RegistrationError::InvalidSelectorList {
                selector: selector.clone(),
                reason,
            })?;
        }
        self.registry.add_ignore_selectors(selectors);
        Ok(())
    }

    /// Convert a document.
    ///
    /// Reduces the children of `<body>` (or of the document element when
    /// [`ConvertOptions::whole_document`] is set, or when there is no body),
    /// then applies the placeholders once to the result.
    ///
    /// # Errors
    ///
    /// Returns an error if a formatter or the fallback fails or returns no
    /// content. No partial output is produced.
    pub fn convert(&self, document: &D, options: &ConvertOptions) -> Result<String, ConvertError> {
        let root = if options.whole_document {
            document.document_element()
        } else {
            document
                .body()
                .unwrap_or_else(|| document.document_element())
        };
        self.convert_node(document, root, options)
    }

    /// Convert the children of an arbitrary root node.
    ///
    /// # Errors
    ///
    /// See [`convert`](Self::convert).
    pub fn convert_node(
        &self,
        document: &D,
        root: D::NodeId,
        options: &ConvertOptions,
    ) -> Result<String, ConvertError> {
        let pass = Pass {
            engine: self,
            document,
            options,
        };
        let mut output = pass.reduce_children(root, 0)?;
        self.registry.placeholders().apply(&mut output);

        if options.trim {
            let trimmed = output.trim();
            if trimmed.len() != output.len() {
                output = trimmed.to_owned();
            }
        }
        Ok(output)
    }
}

/// State of one conversion call.
struct Pass<'a, D: Document, M> {
    engine: &'a Engine<D, M>,
    document: &'a D,
    options: &'a ConvertOptions,
}

impl<D: Document, M: Matcher<D>> Pass<'_, D, M> {
    /// Contribution of a single node.
    fn reduce(&self, node: D::NodeId, depth: usize) -> Result<String, ConvertError> {
        match self.document.kind(node) {
            NodeKind::Text => Ok(self.reduce_text(node)),
            NodeKind::Element if self.is_ignored(node) => Ok(String::new()),
            NodeKind::Element => self.resolve(node, depth + 1),
            NodeKind::Other => Ok(String::new()),
        }
    }

    fn reduce_text(&self, node: D::NodeId) -> String {
        let text = self.document.text(node).unwrap_or_default();
        if !self.options.normalize_whitespace || self.is_preformatted(node) {
            return text.to_owned();
        }
        WHITESPACE_RE.replace_all(text, " ").into_owned()
    }

    fn is_preformatted(&self, node: D::NodeId) -> bool {
        self.document
            .parent_element(node)
            .and_then(|parent| self.document.tag_name(parent))
            .is_some_and(|tag| tag.eq_ignore_ascii_case(PREFORMATTED_TAG))
    }

    fn is_ignored(&self, node: D::NodeId) -> bool {
        self.engine
            .registry
            .ignore_selectors()
            .iter()
            .any(|selector| self.engine.matcher.matches(self.document, node, selector))
    }

    /// Text of an element at `depth`: rule chain, fallback, or passthrough.
    fn resolve(&self, node: D::NodeId, depth: usize) -> Result<String, ConvertError> {
        let dataset = self.document.dataset(node);
        let children = OnceCell::new();
        let matching: Vec<&Rule<D>> = self
            .engine
            .registry
            .rules()
            .iter()
            .filter(|rule| {
                self.engine
                    .matcher
                    .matches(self.document, node, rule.selector())
            })
            .collect();

        if matching.is_empty() {
            return self.resolve_unmatched(node, depth, &dataset, &children);
        }

        let mut accumulated: Option<String> = None;
        for rule in matching {
            tracing::trace!(selector = rule.selector(), depth, "Applying rule");
            let output = match rule.transform() {
                Transform::Format(formatter) => {
                    let content = match &accumulated {
                        Some(text) => Content::Accumulated(text),
                        None => Content::Children(&children),
                    };
                    let ctx =
                        ConversionContext::new(self.document, node, &dataset, depth, content, self);
                    formatter.format(&ctx)?.ok_or_else(|| {
                        ConvertError::FormatMustReturnContent {
                            selector: rule.selector().to_owned(),
                        }
                    })?
                }
                Transform::Template(template) => {
                    let content = match &accumulated {
                        Some(text) => text.as_str(),
                        None => children_text(&children, self, node, depth)?,
                    };
                    template.render(content, &dataset)
                }
            };
            accumulated = Some(output);
        }

        Ok(accumulated.unwrap_or_default())
    }

    fn resolve_unmatched(
        &self,
        node: D::NodeId,
        depth: usize,
        dataset: &HashMap<String, String>,
        children: &OnceCell<String>,
    ) -> Result<String, ConvertError> {
        let tag = self.document.tag_name(node).unwrap_or_default();

        if let Some(fallback) = self.engine.registry.fallback() {
            let ctx = ConversionContext::new(
                self.document,
                node,
                dataset,
                depth,
                Content::Children(children),
                self,
            );
            return fallback
                .format(&ctx)?
                .ok_or_else(|| ConvertError::FallbackMustReturnContent {
                    tag: tag.to_owned(),
                });
        }

        tracing::debug!(tag, depth, "No rule found for element");
        children_text(children, self, node, depth).map(str::to_owned)
    }
}

impl<D: Document, M: Matcher<D>> Reduce<D> for Pass<'_, D, M> {
    fn reduce_children(&self, node: D::NodeId, depth: usize) -> Result<String, ConvertError> {
        // Snapshot before descending.
        let children = self.document.children(node);
        let mut output = String::new();
        for child in children {
            output.push_str(&self.reduce(child, depth)?);
        }
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::mock::{MockDocument, MockNodeId, TagMatcher};

    type TestEngine = Engine<MockDocument, TagMatcher>;

    fn engine() -> TestEngine {
        Engine::new(TagMatcher)
    }

    fn convert(engine: &TestEngine, doc: &MockDocument) -> String {
        engine.convert(doc, &ConvertOptions::default()).unwrap()
    }

    /// `<body><p>{text}</p></body>`
    fn paragraph(text: &str) -> (MockDocument, MockNodeId) {
        let mut doc = MockDocument::new();
        let p = doc.add_element(doc.body_node(), "p", &[]);
        doc.add_text(p, text);
        (doc, p)
    }

    #[test]
    fn test_text_only_body() {
        let mut doc = MockDocument::new();
        doc.add_text(doc.body_node(), "hello");
        assert_eq!(convert(&engine(), &doc), "hello");
    }

    #[test]
    fn test_template_rule() {
        let mut engine = engine();
        engine.register(Rule::template("p", "{content}\n")).unwrap();
        let (doc, _) = paragraph("Hello");
        assert_eq!(convert(&engine, &doc), "Hello\n");
    }

    #[test]
    fn test_chain_composition() {
        let mut engine = engine();
        engine
            .register(vec![
                Rule::template("p", "[{content}]"),
                Rule::template("p", "<{content}>"),
            ])
            .unwrap();
        let (doc, _) = paragraph("innerText");
        assert_eq!(convert(&engine, &doc), "<[innerText]>");
    }

    #[test]
    fn test_chain_format_sees_previous_output() {
        let mut engine = engine();
        engine.register(Rule::template("p", "*{content}*")).unwrap();
        engine
            .register(Rule::format_fn("p", |ctx: &ConversionContext<'_, MockDocument>| {
                Ok(Some(format!("> {}", ctx.content()?)))
            }))
            .unwrap();
        let (doc, _) = paragraph("quoted");
        assert_eq!(convert(&engine, &doc), "> *quoted*");
    }

    #[test]
    fn test_registration_order_is_independent_of_batching() {
        let rules = || {
            vec![
                Rule::template("p", "1{content}"),
                Rule::template("span", "x{content}"),
                Rule::template("p", "2{content}"),
                Rule::template("p", "3{content}"),
            ]
        };

        let mut batched = engine();
        batched.register(rules()).unwrap();

        let mut single = engine();
        for rule in rules() {
            single.register(rule).unwrap();
        }

        let (doc, _) = paragraph("t");
        assert_eq!(convert(&batched, &doc), "321t");
        assert_eq!(convert(&single, &doc), "321t");
    }

    #[test]
    fn test_dataset_in_template() {
        let mut engine = engine();
        engine
            .register(Rule::template("a", "[{content}]({dataset.href})"))
            .unwrap();
        let mut doc = MockDocument::new();
        let a = doc.add_element(doc.body_node(), "a", &[("href", "https://example.com")]);
        doc.add_text(a, "site");
        assert_eq!(convert(&engine, &doc), "[site](https://example.com)");
    }

    #[test]
    fn test_missing_dataset_key_renders_empty() {
        let mut engine = engine();
        engine
            .register(Rule::template("img", "![{dataset.alt}]({dataset.src})"))
            .unwrap();
        let mut doc = MockDocument::new();
        doc.add_element(doc.body_node(), "img", &[("src", "a.png")]);
        assert_eq!(convert(&engine, &doc), "![](a.png)");
    }

    #[test]
    fn test_duplicate_attribute_last_write_wins() {
        let mut engine = engine();
        engine.register(Rule::template("span", "{dataset.title}")).unwrap();
        let mut doc = MockDocument::new();
        doc.add_element(
            doc.body_node(),
            "span",
            &[("title", "first"), ("title", "second")],
        );
        assert_eq!(convert(&engine, &doc), "second");
    }

    #[test]
    fn test_depth_counts_from_root() {
        let mut engine = engine();
        engine
            .register(Rule::format_fn("li", |ctx: &ConversionContext<'_, MockDocument>| {
                Ok(Some(format!("{}{}|", ctx.depth(), ctx.content()?)))
            }))
            .unwrap();
        let mut doc = MockDocument::new();
        let outer = doc.add_element(doc.body_node(), "li", &[]);
        doc.add_text(outer, "a");
        let ul = doc.add_element(outer, "ul", &[]);
        let inner = doc.add_element(ul, "li", &[]);
        doc.add_text(inner, "b");

        assert_eq!(convert(&engine, &doc), "1a3b||");
    }

    #[test]
    fn test_content_is_lazy() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);

        let mut engine = engine();
        engine
            .register(Rule::format_fn("em", move |_: &ConversionContext<'_, MockDocument>| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(Some("E".to_owned()))
            }))
            .unwrap();
        engine
            .register(Rule::format_fn("p", |_: &ConversionContext<'_, MockDocument>| {
                Ok(Some("replaced".to_owned()))
            }))
            .unwrap();

        let (mut doc, p) = paragraph("before ");
        doc.add_element(p, "em", &[]);

        assert_eq!(convert(&engine, &doc), "replaced");
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_children_reduced_once_per_chain() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);

        let mut engine = engine();
        engine
            .register(Rule::format_fn("em", move |ctx: &ConversionContext<'_, MockDocument>| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(Some(ctx.content()?.to_owned()))
            }))
            .unwrap();
        engine
            .register(Rule::format_fn("p", |ctx: &ConversionContext<'_, MockDocument>| {
                let first = ctx.content()?.to_owned();
                let second = ctx.content()?;
                Ok(Some(format!("{first}{second}")))
            }))
            .unwrap();

        let (mut doc, p) = paragraph("");
        let em = doc.add_element(p, "em", &[]);
        doc.add_text(em, "x");

        assert_eq!(convert(&engine, &doc), "xx");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_context_convert_ignores_accumulator() {
        let mut engine = engine();
        engine.register(Rule::template("p", "[{content}]")).unwrap();
        engine
            .register(Rule::format_fn("p", |ctx: &ConversionContext<'_, MockDocument>| {
                Ok(Some(format!("{}/{}", ctx.content()?, ctx.convert(None)?)))
            }))
            .unwrap();
        let (doc, _) = paragraph("raw");
        assert_eq!(convert(&engine, &doc), "[raw]/raw");
    }

    #[test]
    fn test_format_returning_none_fails() {
        let mut engine = engine();
        engine
            .register(Rule::format_fn("p", |_: &ConversionContext<'_, MockDocument>| Ok(None)))
            .unwrap();
        let (doc, _) = paragraph("x");
        let err = engine.convert(&doc, &ConvertOptions::default()).unwrap_err();
        assert!(
            matches!(&err, ConvertError::FormatMustReturnContent { selector } if selector == "p"),
            "unexpected error: {err:?}"
        );
    }

    #[test]
    fn test_nested_failure_aborts_conversion() {
        let mut engine = engine();
        engine
            .register(Rule::format_fn("em", |_: &ConversionContext<'_, MockDocument>| {
                Err(ConvertError::callback("no emphasis today"))
            }))
            .unwrap();
        engine.register(Rule::template("p", "{content}")).unwrap();
        let (mut doc, p) = paragraph("a");
        doc.add_element(p, "em", &[]);

        let err = engine.convert(&doc, &ConvertOptions::default()).unwrap_err();
        assert!(matches!(err, ConvertError::Callback(_)));
    }

    #[test]
    fn test_passthrough_without_fallback() {
        let mut doc = MockDocument::new();
        let div = doc.add_element(doc.body_node(), "div", &[]);
        doc.add_text(div, "inner ");
        let span = doc.add_element(div, "span", &[]);
        doc.add_text(span, "text");
        assert_eq!(convert(&engine(), &doc), "inner text");
    }

    #[test]
    fn test_fallback_used_verbatim() {
        let mut engine = engine();
        engine.set_fallback_fn(|ctx: &ConversionContext<'_, MockDocument>| {
            Ok(Some(format!("<{}:{}>", ctx.tag_name(), ctx.content()?)))
        });
        let (doc, _) = paragraph("x");
        assert_eq!(convert(&engine, &doc), "<p:x>");
    }

    #[test]
    fn test_fallback_returning_none_fails() {
        let mut engine = engine();
        engine.set_fallback_fn(|_: &ConversionContext<'_, MockDocument>| Ok(None));
        let (doc, _) = paragraph("x");
        let err = engine.convert(&doc, &ConvertOptions::default()).unwrap_err();
        assert!(
            matches!(&err, ConvertError::FallbackMustReturnContent { tag } if tag == "p"),
            "unexpected error: {err:?}"
        );
    }

    #[test]
    fn test_fallback_is_replaced() {
        let mut engine = engine();
        engine.set_fallback_fn(|_: &ConversionContext<'_, MockDocument>| Ok(Some("old".to_owned())));
        engine.set_fallback_fn(|_: &ConversionContext<'_, MockDocument>| Ok(Some("new".to_owned())));
        let (doc, _) = paragraph("x");
        assert_eq!(convert(&engine, &doc), "new");
    }

    #[test]
    fn test_fallback_not_used_when_rule_matches() {
        let mut engine = engine();
        engine.register(Rule::template("p", "P")).unwrap();
        engine.set_fallback_fn(|_: &ConversionContext<'_, MockDocument>| Ok(Some("F".to_owned())));
        let (doc, _) = paragraph("x");
        assert_eq!(convert(&engine, &doc), "P");
    }

    #[test]
    fn test_ignored_subtree_is_never_visited() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);

        let mut engine = engine();
        engine
            .register(Rule::format_fn("nav a", move |_: &ConversionContext<'_, MockDocument>| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(Some("link".to_owned()))
            }))
            .unwrap();
        engine.set_ignore_selectors(["nav"]).unwrap();

        let mut doc = MockDocument::new();
        let nav = doc.add_element(doc.body_node(), "nav", &[]);
        doc.add_element(nav, "a", &[]);
        doc.add_text(doc.body_node(), "kept");

        assert_eq!(convert(&engine, &doc), "kept");
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_ignore_selectors_deduplicated() {
        let mut engine = engine();
        engine.set_ignore_selectors(["script", "style"]).unwrap();
        engine.set_ignore_selectors(vec!["style".to_owned(), "nav".to_owned()]).unwrap();
        assert_eq!(
            engine.registry().ignore_selectors(),
            &["script".to_owned(), "style".to_owned(), "nav".to_owned()]
        );
    }

    #[test]
    fn test_invalid_ignore_selector_rejects_whole_list() {
        let mut engine = engine();
        let err = engine.set_ignore_selectors(["script", ""]).unwrap_err();
        assert!(matches!(err, RegistrationError::InvalidSelectorList { .. }));
        assert!(engine.registry().ignore_selectors().is_empty());
    }

    #[test]
    fn test_whitespace_normalized() {
        let (doc, _) = paragraph("a   b\n c");
        assert_eq!(convert(&engine(), &doc), "a b c");
    }

    #[test]
    fn test_whitespace_not_trimmed_in_text_nodes() {
        let (doc, _) = paragraph("  padded\t");
        assert_eq!(convert(&engine(), &doc), " padded ");
    }

    #[test]
    fn test_whitespace_preserved_in_pre() {
        let mut doc = MockDocument::new();
        let pre = doc.add_element(doc.body_node(), "pre", &[]);
        doc.add_text(pre, "a   b\n c");
        assert_eq!(convert(&engine(), &doc), "a   b\n c");
    }

    #[test]
    fn test_whitespace_normalized_in_pre_code() {
        let mut doc = MockDocument::new();
        let pre = doc.add_element(doc.body_node(), "pre", &[]);
        doc.add_text(pre, "x  y|");
        let code = doc.add_element(pre, "code", &[]);
        doc.add_text(code, "a   b\n c");
        assert_eq!(convert(&engine(), &doc), "x  y|a b c");
    }

    #[test]
    fn test_whitespace_normalization_disabled() {
        let (doc, _) = paragraph("a   b\n c");
        let options = ConvertOptions::new().with_normalize_whitespace(false);
        assert_eq!(engine().convert(&doc, &options).unwrap(), "a   b\n c");
    }

    #[test]
    fn test_comments_contribute_nothing() {
        let mut doc = MockDocument::new();
        doc.add_text(doc.body_node(), "a");
        doc.add_comment(doc.body_node(), "hidden");
        doc.add_text(doc.body_node(), "b");
        assert_eq!(convert(&engine(), &doc), "ab");
    }

    #[test]
    fn test_placeholder_applied_once_to_final_output() {
        let mut engine = engine();
        engine.register(Rule::template("p", "[{content}]")).unwrap();
        engine
            .register(Rule::format_fn("p", |ctx: &ConversionContext<'_, MockDocument>| {
                assert!(ctx.content()?.contains('X'));
                Ok(Some(ctx.content()?.to_owned()))
            }))
            .unwrap();
        engine.register_placeholder(PlaceholderRule::new("X", "Y"));
        engine.register_placeholder(PlaceholderRule::new("Y", "Z"));
        engine.register_placeholder(PlaceholderRule::new("X", "Y"));

        let (doc, _) = paragraph("X-mid");
        assert_eq!(convert(&engine, &doc), "[Z-mid]");
    }

    #[test]
    fn test_placeholder_scope() {
        let mut engine = engine();
        engine.register(Rule::template("p", "[{content}]")).unwrap();
        engine.register_placeholder(PlaceholderRule::new("X", "Y"));
        let (doc, _) = paragraph("X-mid");
        assert_eq!(convert(&engine, &doc), "[Y-mid]");
    }

    #[test]
    fn test_placeholder_defs_all_or_nothing() {
        let mut engine = engine();
        let err = engine
            .register_placeholder_defs(vec![
                PlaceholderDef {
                    from: Some("a".to_owned()),
                    to: Some("b".to_owned()),
                },
                PlaceholderDef {
                    from: None,
                    to: Some("c".to_owned()),
                },
            ])
            .unwrap_err();
        assert!(matches!(err, RegistrationError::InvalidPlaceholder(_)));
        assert!(engine.registry().placeholders().is_empty());
    }

    #[test]
    fn test_invalid_rule_batch_registers_nothing() {
        let mut engine = engine();
        let err = engine
            .register(vec![
                Rule::template("p", "{content}"),
                Rule::template("", "{content}"),
            ])
            .unwrap_err();
        assert!(matches!(err, RegistrationError::InvalidRule { .. }));
        assert!(engine.registry().rules().is_empty());
    }

    #[test]
    fn test_empty_template_rejected() {
        let mut engine = engine();
        let err = engine.register(Rule::template("p", "")).unwrap_err();
        assert!(err.to_string().contains("template"));
    }

    #[test]
    fn test_selector_rejected_by_matcher() {
        let mut engine = engine();
        let err = engine.register(Rule::template("p >", "{content}")).unwrap_err();
        assert!(
            matches!(&err, RegistrationError::InvalidRule { selector, .. } if selector == "p >"),
            "unexpected error: {err:?}"
        );
    }

    #[test]
    fn test_register_defs() {
        let mut engine = engine();
        engine
            .register_defs(vec![RuleDef::new("p", "({content})")])
            .unwrap();
        let (doc, _) = paragraph("x");
        assert_eq!(convert(&engine, &doc), "(x)");
    }

    #[test]
    fn test_whole_document() {
        let mut engine = engine();
        engine.register(Rule::template("head", "H:{content};")).unwrap();
        engine.register(Rule::template("body", "B:{content}")).unwrap();

        let mut doc = MockDocument::new();
        let head = doc.add_head();
        doc.add_text(head, "meta");
        doc.add_text(doc.body_node(), "text");

        assert_eq!(convert(&engine, &doc), "text");
        let options = ConvertOptions::new().with_whole_document(true);
        assert_eq!(engine.convert(&doc, &options).unwrap(), "H:meta;B:text");
    }

    #[test]
    fn test_trim_option() {
        let (doc, _) = paragraph("  spaced  ");
        let options = ConvertOptions::new().with_trim(true);
        assert_eq!(engine().convert(&doc, &options).unwrap(), "spaced");
    }

    #[test]
    fn test_trim_runs_after_placeholders() {
        let mut engine = engine();
        engine.register_placeholder(PlaceholderRule::new("_", " "));
        let (doc, _) = paragraph("_x_");
        let options = ConvertOptions::new().with_trim(true);
        assert_eq!(engine.convert(&doc, &options).unwrap(), "x");
    }

    #[test]
    fn test_engine_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TestEngine>();
    }
}
