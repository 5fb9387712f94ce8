//! Configuration management for mation.
//!
//! Parses `mation.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ```toml
//! [convert]
//! trim = true
//! ignore = ["script", "style"]
//!
//! [[rules]]
//! selector = "strong, b"
//! to = "**{content}**"
//!
//! [[placeholders]]
//! from = "(c)"
//! to = "©"
//! ```

use std::path::{Path, PathBuf};

use mation_core::{
    ConvertOptions, Matcher, PlaceholderDef, PlaceholderRule, RegistrationError, RuleDef,
};
use mation_html::HtmlConverter;
use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override whole-document conversion.
    pub whole_document: Option<bool>,
    /// Override whitespace normalization.
    pub normalize_whitespace: Option<bool>,
    /// Override result trimming.
    pub trim: Option<bool>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "mation.toml";

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Conversion settings.
    pub convert: ConvertConfig,
    /// Template rules in registration order.
    pub rules: Vec<RuleDef>,
    /// Placeholder rules in application order.
    pub placeholders: Vec<PlaceholderDef>,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// `[convert]` section.
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConvertConfig {
    /// Convert the whole document instead of `<body>` only.
    pub whole_document: bool,
    /// Collapse whitespace runs outside `<pre>`.
    pub normalize_whitespace: bool,
    /// Trim the final result.
    pub trim: bool,
    /// Selectors whose elements are dropped with their subtree.
    pub ignore: Vec<String>,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        let options = ConvertOptions::default();
        Self {
            whole_document: options.whole_document,
            normalize_whitespace: options.normalize_whitespace,
            trim: options.trim,
            ignore: Vec::new(),
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Rules rejected by the converter.
    #[error("Rule registration error: {0}")]
    Registration(#[from] RegistrationError),
}

/// Require an optional string field to be present and non-empty.
fn require_non_empty(value: Option<&str>, field: &str) -> Result<(), ConfigError> {
    if value.is_none_or(|v| v.trim().is_empty()) {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require an optional string field to be present.
fn require_present(value: Option<&str>, field: &str) -> Result<(), ConfigError> {
    if value.is_none() {
        return Err(ConfigError::Validation(format!("{field} is required")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `mation.toml` in current directory and parents,
    /// falling back to defaults (no rules) when none is found.
    ///
    /// CLI settings are applied after loading, allowing CLI arguments to take
    /// precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, or if reading,
    /// parsing or validation fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let discovered = match config_path {
            Some(path) if !path.exists() => {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Some(path) => Some(path.to_path_buf()),
            None => std::env::current_dir()
                .ok()
                .and_then(|cwd| Self::discover_config(&cwd)),
        };

        let mut config = match discovered {
            Some(path) => Self::load_from_file(&path)?,
            None => {
                tracing::debug!("No {CONFIG_FILENAME} found, using defaults");
                Self::default()
            }
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(whole_document) = settings.whole_document {
            self.convert.whole_document = whole_document;
        }
        if let Some(normalize_whitespace) = settings.normalize_whitespace {
            self.convert.normalize_whitespace = normalize_whitespace;
        }
        if let Some(trim) = settings.trim {
            self.convert.trim = trim;
        }
    }

    /// Search for config file in `start` and its parents.
    fn discover_config(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                tracing::debug!(path = %candidate.display(), "Discovered config file");
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Checks that every rule and placeholder is complete and that ignore
    /// selectors are non-empty. Selector syntax is checked when the rules are
    /// applied to a converter. Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (i, rule) in self.rules.iter().enumerate() {
            require_non_empty(rule.selector.as_deref(), &format!("rules[{i}].selector"))?;
            require_non_empty(rule.to.as_deref(), &format!("rules[{i}].to"))?;
        }
        for (i, placeholder) in self.placeholders.iter().enumerate() {
            require_present(
                placeholder.from.as_deref(),
                &format!("placeholders[{i}].from"),
            )?;
            require_present(placeholder.to.as_deref(), &format!("placeholders[{i}].to"))?;
        }
        for (i, selector) in self.convert.ignore.iter().enumerate() {
            require_non_empty(Some(selector.as_str()), &format!("convert.ignore[{i}]"))?;
        }
        Ok(())
    }

    /// Conversion options from the `[convert]` section.
    #[must_use]
    pub fn convert_options(&self) -> ConvertOptions {
        ConvertOptions::new()
            .with_whole_document(self.convert.whole_document)
            .with_normalize_whitespace(self.convert.normalize_whitespace)
            .with_trim(self.convert.trim)
    }

    /// Register rules, placeholders and ignore selectors on `converter`.
    ///
    /// Either everything is registered or, on error, nothing is.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Registration` if the converter rejects a rule,
    /// a placeholder or an ignore selector.
    pub fn apply(&self, converter: &mut HtmlConverter) -> Result<(), ConfigError> {
        // Every fallible check runs before the converter is touched.
        let placeholders = self
            .placeholders
            .iter()
            .cloned()
            .map(PlaceholderRule::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        for selector in &self.convert.ignore {
            let checked = if selector.trim().is_empty() {
                Err("selector cannot be empty".to_owned())
            } else {
                converter.engine().matcher().check_selector(selector)
            };
            checked.map_err(|reason| RegistrationError::InvalidSelectorList {
                selector: selector.clone(),
                reason,
            })?;
        }

        converter.register_defs(self.rules.iter().cloned())?;
        converter.register_placeholder(placeholders);
        converter.set_ignore_selectors(self.convert.ignore.iter().cloned())?;
        tracing::debug!(
            rules = self.rules.len(),
            placeholders = self.placeholders.len(),
            ignore = self.convert.ignore.len(),
            "Applied configuration"
        );
        Ok(())
    }

    /// Build a converter configured from this file.
    ///
    /// # Errors
    ///
    /// See [`apply`](Self::apply).
    pub fn build_converter(&self) -> Result<HtmlConverter, ConfigError> {
        let mut converter = HtmlConverter::new();
        self.apply(&mut converter)?;
        Ok(converter)
    }
}
