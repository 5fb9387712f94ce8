//! `mation convert` command implementation.

use std::io::{Read, Write};
use std::path::PathBuf;

use clap::Args;
use mation_config::{CliSettings, Config};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the convert command.
#[derive(Args)]
pub(crate) struct ConvertArgs {
    /// HTML file to convert (default: read stdin).
    input: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover mation.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the result to a file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Convert the whole document, including `<head>` (overrides config).
    #[arg(long)]
    whole_document: bool,

    /// Keep whitespace runs in text nodes as they are (overrides config).
    #[arg(long)]
    no_normalize_whitespace: bool,

    /// Trim leading and trailing whitespace of the result (overrides config).
    #[arg(long)]
    trim: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl ConvertArgs {
    /// Execute the convert command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration, input reading or conversion fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let cli_settings = self.cli_settings();
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let converter = config.build_converter()?;

        let input = match &self.input {
            Some(path) => std::fs::read(path)?,
            None => {
                let mut buf = Vec::new();
                std::io::stdin().lock().read_to_end(&mut buf)?;
                buf
            }
        };

        let text = converter.convert_bytes(&input, &config.convert_options())?;
        tracing::info!(
            input_bytes = input.len(),
            output_bytes = text.len(),
            "Converted document"
        );

        match &self.output {
            Some(path) => {
                std::fs::write(path, &text)?;
                Output::new().success(&format!("Wrote {}", path.display()));
            }
            None => {
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(text.as_bytes())?;
                stdout.flush()?;
            }
        }

        Ok(())
    }

    /// Build config overrides from the command-line flags.
    ///
    /// Flags can only switch a setting away from its default, so an unset
    /// flag leaves the config file value alone.
    fn cli_settings(&self) -> CliSettings {
        CliSettings {
            whole_document: self.whole_document.then_some(true),
            normalize_whitespace: self.no_normalize_whitespace.then_some(false),
            trim: self.trim.then_some(true),
        }
    }
}
