//! `lumo check` command implementation.

use std::path::PathBuf;

use clap::Args;
use lumo_config::Config;
use lumo_nav::Localized;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the check command.
#[derive(Args)]
pub(crate) struct CheckArgs {
    /// Path to configuration file (default: auto-discover lumo.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl CheckArgs {
    /// Execute the check command.
    ///
    /// Loads the configuration and builds the navigation table, so every
    /// startup-time defect (bad TOML, invalid values, missing default
    /// sidebar) surfaces here with a nonzero exit instead of at page render
    /// time.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or validation fails.
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let config = Config::load(self.config.as_deref(), None)?;
        let nav = config.navigation()?;

        output.highlight(&format!("Site: {}", config.site.title));
        if let Some(path) = &config.config_path {
            output.info(&format!("Config: {}", path.display()));
        } else {
            output.info("Config: (defaults, no lumo.toml found)");
        }

        output.info(&format!("Default locale: {}", nav.default_locale()));
        let mut locales: Vec<_> = nav.locales().collect();
        locales.sort_unstable();
        for locale in locales {
            let tree = nav.tree_for(locale);
            let label = tree
                .first()
                .map_or("(empty)", |section| section.label_for(locale));
            output.info(&format!(
                "Sidebar [{locale}]: {} section(s), first: {label}",
                tree.len()
            ));
        }

        match &config.diagrams_resolved.kroki_url {
            Some(url) => output.info(&format!(
                "Diagrams: {url} (timeout {}s)",
                config.diagrams_resolved.timeout_secs
            )),
            None => output.info("Diagrams: disabled (no [diagrams] section)"),
        }

        output.success("Configuration OK");
        Ok(())
    }
}
