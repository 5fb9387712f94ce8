//! `mation rules` command implementation.

use std::fmt::Write as _;
use std::io::Write as _;
use std::path::PathBuf;

use clap::Args;
use mation_config::Config;
use mation_core::Transform;
use mation_html::HtmlConverter;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the rules command.
#[derive(Args)]
pub(crate) struct RulesArgs {
    /// Path to configuration file (default: auto-discover mation.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl RulesArgs {
    /// Execute the rules command.
    ///
    /// Loads the configuration, registers it on a converter so that every
    /// selector is checked, then prints the resulting rule set.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration fails to load or register.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = Config::load(self.config.as_deref(), None)?;
        let converter = config.build_converter()?;

        match &config.config_path {
            Some(path) => output.highlight(&format!("Config: {}", path.display())),
            None => output.info("No mation.toml found, using defaults"),
        }

        let mut stdout = std::io::stdout().lock();
        stdout.write_all(summarize(&config, &converter).as_bytes())?;
        stdout.flush()?;
        Ok(())
    }
}

/// Render the rule set registered on `converter`.
fn summarize(config: &Config, converter: &HtmlConverter) -> String {
    let registry = converter.registry();
    let options = config.convert_options();
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Options: whole_document={} normalize_whitespace={} trim={}",
        options.whole_document, options.normalize_whitespace, options.trim
    );

    let _ = writeln!(out, "Rules ({}):", registry.rules().len());
    for rule in registry.rules() {
        let transform = match rule.transform() {
            Transform::Template(template) => format!("{:?}", template.as_str()),
            Transform::Format(_) => "<formatter>".to_owned(),
        };
        let _ = writeln!(out, "  {} -> {transform}", rule.selector());
    }

    let placeholders = registry.placeholders();
    let _ = writeln!(out, "Placeholders ({}):", placeholders.len());
    for placeholder in placeholders.as_slice() {
        let _ = writeln!(out, "  {:?} -> {:?}", placeholder.from, placeholder.to);
    }

    if registry.ignore_selectors().is_empty() {
        out.push_str("Ignore: (none)\n");
    } else {
        let _ = writeln!(out, "Ignore: {}", registry.ignore_selectors().join(", "));
    }

    out
}
