//! Declarative rule and placeholder definitions.
//!
//! These are the loosely-typed shapes produced by configuration files. Every
//! field is optional so that missing values surface as registration errors
//! naming the problem instead of as opaque deserialization failures.

use crate::document::Document;
use crate::error::RegistrationError;
use crate::placeholders::PlaceholderRule;
use crate::rule::Rule;

/// Declarative template rule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(deny_unknown_fields))]
pub struct RuleDef {
    /// Selector the rule applies to.
    pub selector: Option<String>,
    /// `to` template.
    pub to: Option<String>,
}

impl RuleDef {
    /// Definition with both fields set.
    #[must_use]
    pub fn new(selector: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            selector: Some(selector.into()),
            to: Some(to.into()),
        }
    }
}

impl<D: Document> TryFrom<RuleDef> for Rule<D> {
    type Error = RegistrationError;

    fn try_from(def: RuleDef) -> Result<Self, Self::Error> {
        let selector = def.selector.unwrap_or_default();
        if selector.trim().is_empty() {
            return Err(RegistrationError::InvalidRule {
                selector,
                reason: "must have a non-empty \"selector\"".to_owned(),
            });
        }
        match def.to {
            Some(to) if !to.is_empty() => Ok(Rule::template(selector, to)),
            _ => Err(RegistrationError::InvalidRule {
                selector,
                reason: "must have a non-empty \"to\" template".to_owned(),
            }),
        }
    }
}

/// Declarative placeholder rule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(deny_unknown_fields))]
pub struct PlaceholderDef {
    /// Text to search for.
    pub from: Option<String>,
    /// Replacement text.
    pub to: Option<String>,
}

impl TryFrom<PlaceholderDef> for PlaceholderRule {
    type Error = RegistrationError;

    fn try_from(def: PlaceholderDef) -> Result<Self, Self::Error> {
        match (def.from, def.to) {
            (Some(from), Some(to)) => Ok(Self::new(from, to)),
            (None, _) => Err(RegistrationError::InvalidPlaceholder(
                "missing \"from\"".to_owned(),
            )),
            (Some(from), None) => Err(RegistrationError::InvalidPlaceholder(format!(
                "missing \"to\" for {from:?}"
            ))),
        }
    }
}
