//! Conversion rules.

use std::fmt;

use crate::context::ConversionContext;
use crate::document::Document;
use crate::error::{ConvertError, RegistrationError};
use crate::template::Template;

/// Caller-supplied transformation of an element.
///
/// Used both for `format` rules and for the fallback. Returning `Ok(None)`
/// signals "no content" and aborts the conversion with
/// [`ConvertError::FormatMustReturnContent`] or
/// [`ConvertError::FallbackMustReturnContent`].
///
/// Closures can be used through [`Rule::format_fn`] and
/// [`Engine::set_fallback_fn`](crate::Engine::set_fallback_fn).
///
/// # Example
///
/// ```ignore
/// struct Heading;
///
/// impl<D: Document> Formatter<D> for Heading {
///     fn format(&self, ctx: &ConversionContext<'_, D>) -> Result<Option<String>, ConvertError> {
///         let level = ctx.tag_name()[1..].parse::<usize>().unwrap_or(1);
///         Ok(Some(format!("{} {}\n", "#".repeat(level), ctx.content()?)))
///     }
/// }
/// ```
pub trait Formatter<D: Document>: Send + Sync {
    /// Produce the text for the element described by `ctx`.
    fn format(&self, ctx: &ConversionContext<'_, D>) -> Result<Option<String>, ConvertError>;
}

/// Adapter turning a closure into a [`Formatter`].
pub(crate) struct FnFormatter<F>(pub(crate) F);

impl<D, F> Formatter<D> for FnFormatter<F>
where
    D: Document,
    F: Fn(&ConversionContext<'_, D>) -> Result<Option<String>, ConvertError> + Send + Sync,
{
    fn format(&self, ctx: &ConversionContext<'_, D>) -> Result<Option<String>, ConvertError> {
        (self.0)(ctx)
    }
}

/// How a rule produces text.
pub enum Transform<D: Document> {
    /// `to` template.
    Template(Template),
    /// `format` callable.
    Format(Box<dyn Formatter<D>>),
}

impl<D: Document> fmt::Debug for Transform<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Template(template) => f.debug_tuple("Template").field(&template.as_str()).finish(),
            Self::Format(_) => f.write_str("Format(<function>)"),
        }
    }
}

/// A `(selector, transform)` pair.
///
/// Rules are immutable once built. Every rule whose selector matches an
/// element is applied, in registration order, each one seeing the previous
/// rule's output as its content.
pub struct Rule<D: Document> {
    selector: String,
    transform: Transform<D>,
}

impl<D: Document> fmt::Debug for Rule<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("selector", &self.selector)
            .field("transform", &self.transform)
            .finish()
    }
}

impl<D: Document> Rule<D> {
    /// Rule rendering a `to` template.
    #[must_use]
    pub fn template(selector: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            transform: Transform::Template(Template::parse(to)),
        }
    }

    /// Rule delegating to a [`Formatter`].
    #[must_use]
    pub fn format(selector: impl Into<String>, formatter: impl Formatter<D> + 'static) -> Self {
        Self {
            selector: selector.into(),
            transform: Transform::Format(Box::new(formatter)),
        }
    }

    /// Rule delegating to a closure.
    #[must_use]
    pub fn format_fn<F>(selector: impl Into<String>, f: F) -> Self
    where
        F: Fn(&ConversionContext<'_, D>) -> Result<Option<String>, ConvertError>
            + Send
            + Sync
            + 'static,
    {
        Self::format(selector, FnFormatter(f))
    }

    /// Selector passed verbatim to the matcher.
    #[must_use]
    pub fn selector(&self) -> &str {
        &self.selector
    }

    /// The rule's transform.
    #[must_use]
    pub fn transform(&self) -> &Transform<D> {
        &self.transform
    }

    /// Structural validation: non-empty selector and non-empty template.
    pub(crate) fn validate(&self) -> Result<(), RegistrationError> {
        if self.selector.trim().is_empty() {
            return Err(self.invalid("selector cannot be empty"));
        }
        if let Transform::Template(template) = &self.transform
            && template.as_str().is_empty()
        {
            return Err(self.invalid("`to` template cannot be empty"));
        }
        Ok(())
    }

    pub(crate) fn invalid(&self, reason: impl Into<String>) -> RegistrationError {
        RegistrationError::InvalidRule {
            selector: self.selector.clone(),
            reason: reason.into(),
        }
    }
}

impl<D: Document> IntoIterator for Rule<D> {
    type Item = Self;
    type IntoIter = std::iter::Once<Self>;

    fn into_iter(self) -> Self::IntoIter {
        std::iter::once(self)
    }
}
