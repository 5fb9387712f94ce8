//! Error types for rule registration and conversion.

use std::error::Error as StdError;
use std::str::Utf8Error;

/// Boxed error raised by a caller-supplied formatter.
pub type CallbackError = Box<dyn StdError + Send + Sync>;

/// Error raised while registering rules, placeholders or ignore selectors.
///
/// Registration is all-or-nothing: when a batch fails, nothing from that
/// batch has been stored.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum RegistrationError {
    /// Rule without a selector, without a transform, or with a selector the
    /// matcher rejects.
    #[error("invalid rule for selector {selector:?}: {reason}")]
    InvalidRule {
        /// Selector of the offending rule (may be empty).
        selector: String,
        /// What is wrong with the rule.
        reason: String,
    },

    /// Placeholder definition missing `from` or `to`.
    #[error("invalid placeholder: {0}")]
    InvalidPlaceholder(String),

    /// Ignore selector that is empty or rejected by the matcher.
    #[error("invalid ignore selector {selector:?}: {reason}")]
    InvalidSelectorList {
        /// Offending selector.
        selector: String,
        /// What is wrong with it.
        reason: String,
    },
}

/// Error raised by a conversion call.
///
/// Any of these aborts the whole conversion; no partial output is returned.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConvertError {
    /// Input bytes are not valid UTF-8.
    #[error("invalid input: {0}")]
    InvalidInput(#[from] Utf8Error),

    /// A `format` rule returned no content.
    #[error("the format handler for the selector \"{selector}\" must return content")]
    FormatMustReturnContent {
        /// Selector of the rule whose formatter returned nothing.
        selector: String,
    },

    /// The fallback returned no content.
    #[error("the fallback handler must return content (element <{tag}>)")]
    FallbackMustReturnContent {
        /// Tag name of the element the fallback was invoked for.
        tag: String,
    },

    /// A caller-supplied formatter failed.
    #[error("rule callback failed: {0}")]
    Callback(#[source] CallbackError),
}

impl ConvertError {
    /// Wrap an arbitrary error raised inside a formatter.
    pub fn callback(err: impl Into<CallbackError>) -> Self {
        Self::Callback(err.into())
    }
}
