//! `lumo nav` command implementation.

use std::path::PathBuf;

use clap::Args;
use lumo_config::Config;
use lumo_nav::LocaleId;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the nav command.
#[derive(Args)]
pub(crate) struct NavArgs {
    /// Locale to resolve the sidebar for (default: the configured default
    /// locale).
    #[arg(short, long)]
    locale: Option<String>,

    /// Path to configuration file (default: auto-discover lumo.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl NavArgs {
    /// Execute the nav command.
    ///
    /// Resolves the sidebar tree and label translations for the requested
    /// locale and prints the display-ready rows as JSON on stdout.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading fails or the rows cannot be
    /// serialized.
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let config = Config::load(self.config.as_deref(), None)?;
        let nav = config.navigation()?;

        let locale = self
            .locale
            .map_or_else(|| nav.default_locale().clone(), LocaleId::new);

        let resolved = nav.resolve(&locale);
        let json = serde_json::to_string_pretty(&resolved)
            .map_err(|e| CliError::Validation(format!("failed to serialize navigation: {e}")))?;
        output.data(&json);
        Ok(())
    }
}
