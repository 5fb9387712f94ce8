//! Rule-driven conversion of document trees to text.
//!
//! This crate provides an [`Engine`] that walks a parsed document and replaces
//! every element with text produced by an ordered list of [`Rule`]s.
//!
//! # Architecture
//!
//! The engine consumes two external capabilities through traits:
//! - [`Document`]: read-only access to a parsed tree
//! - [`Matcher`]: tests a node against a selector string
//!
//! For HTML parsing and CSS selectors, use the `mation-html` crate.
//!
//! Conversion runs in three steps:
//!
//! 1. **Reduction**: children are visited in document order. Text nodes are
//!    whitespace-normalized (except directly inside `<pre>`), ignored
//!    elements vanish with their subtree, other nodes contribute nothing.
//! 2. **Resolution**: every rule whose selector matches an element is
//!    applied in registration order, each one seeing the previous rule's
//!    output as `{content}`. Without a matching rule the fallback runs, or
//!    the children's text passes through.
//! 3. **Placeholders**: literal find/replace pairs are applied once to the
//!    final string.
//!
//! # Example
//!
//! ```ignore
//! use mation_core::{ConvertOptions, Engine, Rule};
//!
//! let mut engine = Engine::new(matcher);
//! engine.register(vec![
//!     Rule::template("strong", "**{content}**"),
//!     Rule::template("a", "[{content}]({dataset.href})"),
//! ])?;
//!
//! let text = engine.convert(&document, &ConvertOptions::default())?;
//! ```

mod context;
mod def;
mod document;
mod engine;
mod error;
#[cfg(any(test, feature = "mock"))]
mod mock;
mod options;
mod placeholders;
mod registry;
mod rule;
mod template;

pub use context::ConversionContext;
pub use def::{PlaceholderDef, RuleDef};
pub use document::{Document, Matcher, NodeKind};
pub use engine::Engine;
pub use error::{CallbackError, ConvertError, RegistrationError};
#[cfg(any(test, feature = "mock"))]
pub use mock::{MockDocument, MockNodeId, TagMatcher};
pub use options::ConvertOptions;
pub use placeholders::{PlaceholderRule, Placeholders};
pub use registry::Registry;
pub use rule::{Formatter, Rule, Transform};
pub use template::Template;
