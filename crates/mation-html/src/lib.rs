//! HTML front end for the mation conversion engine.
//!
//! Parses HTML with `scraper` and matches rules with its CSS selector
//! engine. [`HtmlConverter`] is the entry point:
//!
//! ```ignore
//! use mation_html::{ConvertOptions, HtmlConverter, HtmlRule};
//!
//! let mut converter = HtmlConverter::new();
//! converter.register(HtmlRule::template("h1", "# {content}\n"))?;
//! let text = converter.convert("<h1>Title</h1>", &ConvertOptions::default())?;
//! ```

mod converter;
mod document;
mod matcher;

pub use converter::{HtmlContext, HtmlConverter, HtmlRule};
pub use document::HtmlDocument;
pub use matcher::CssMatcher;

pub use mation_core::{
    ConvertError, ConvertOptions, Formatter, PlaceholderDef, PlaceholderRule, RegistrationError,
    RuleDef,
};
