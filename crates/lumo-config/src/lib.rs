//! Configuration management for lumo.
//!
//! Parses `lumo.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `diagrams.kroki_url`
//! - `site.repository`
//!
//! ## Sidebar
//!
//! Sidebar tables deserialize straight into `lumo-nav` types and are turned
//! into the immutable navigation table with [`Config::navigation`]. A missing
//! sidebar for the default locale is a fatal configuration error, surfaced
//! here at load/validation time rather than per page render.

mod expand;

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use serde::Deserialize;

use lumo_nav::{LocaleId, LocaleNav, NavError, NavTree};

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "lumo.toml";

/// Default HTTP timeout for diagram rendering, in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override Kroki URL for diagram rendering.
    pub kroki_url: Option<String>,
    /// Override HTTP timeout for diagram rendering, in seconds.
    pub timeout_secs: Option<u64>,
}

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Site presentation settings.
    pub site: SiteConfig,
    /// Diagram rendering configuration (optional section).
    /// When present, `kroki_url` is required.
    diagrams: Option<DiagramsConfigRaw>,
    /// Locale set and default locale.
    pub locales: LocalesConfig,
    /// Per-locale sidebar trees.
    sidebar: HashMap<LocaleId, NavTree>,

    /// Resolved diagrams configuration (set after loading).
    #[serde(skip)]
    pub diagrams_resolved: DiagramsConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Site presentation settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Site title shown in the header.
    pub title: String,
    /// Path to the site logo asset.
    pub logo: Option<String>,
    /// Repository URL for the social link.
    pub repository: Option<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Documentation".to_owned(),
            logo: None,
            repository: None,
        }
    }
}

/// Raw diagrams configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct DiagramsConfigRaw {
    kroki_url: Option<String>,
    timeout_secs: Option<u64>,
    mermaid_theme: Option<String>,
}

/// Resolved diagram rendering configuration.
#[derive(Debug)]
pub struct DiagramsConfig {
    /// Kroki server URL for diagram rendering.
    pub kroki_url: Option<String>,
    /// HTTP timeout for render requests, in seconds.
    pub timeout_secs: u64,
    /// Theme injected into Mermaid sources without their own init directive.
    pub mermaid_theme: Option<String>,
}

impl Default for DiagramsConfig {
    fn default() -> Self {
        Self {
            kroki_url: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            mermaid_theme: None,
        }
    }
}

/// Locale set configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LocalesConfig {
    /// The default/fallback locale.
    pub default: LocaleId,
    /// Display names per locale. When present, defines the full locale set
    /// together with `default`.
    pub labels: HashMap<LocaleId, String>,
}

impl Default for LocalesConfig {
    fn default() -> Self {
        Self {
            default: LocaleId::new("en"),
            labels: HashMap::new(),
        }
    }
}

impl LocalesConfig {
    /// The full configured locale set: the labeled locales plus the default.
    #[must_use]
    pub fn all(&self) -> HashSet<&LocaleId> {
        let mut set: HashSet<&LocaleId> = self.labels.keys().collect();
        set.insert(&self.default);
        set
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
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
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`diagrams.kroki_url`").
        field: String,
        /// Error message (e.g., "${`KROKI_URL`} not set").
        message: String,
    },
    /// Navigation table construction error.
    #[error("{0}")]
    Nav(#[from] NavError),
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `lumo.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading, allowing CLI arguments to take
    /// precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing or
    /// validation fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Load configuration from a specific file.
    ///
    /// # Errors
    ///
    /// Returns error on I/O failure, TOML parse failure, or validation
    /// failure.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;
        config.resolve_diagrams()?;
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(kroki_url) = &settings.kroki_url {
            self.diagrams_resolved.kroki_url = Some(kroki_url.clone());
        }
        if let Some(timeout_secs) = settings.timeout_secs {
            self.diagrams_resolved.timeout_secs = timeout_secs;
        }
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref mut diagrams) = self.diagrams
            && let Some(ref url) = diagrams.kroki_url
        {
            diagrams.kroki_url = Some(expand::expand_env(url, "diagrams.kroki_url")?);
        }
        if let Some(ref repository) = self.site.repository {
            self.site.repository = Some(expand::expand_env(repository, "site.repository")?);
        }
        Ok(())
    }

    /// Resolve the raw `[diagrams]` section.
    ///
    /// Validates that `kroki_url` is provided when the section exists.
    fn resolve_diagrams(&mut self) -> Result<(), ConfigError> {
        self.diagrams_resolved = match &self.diagrams {
            Some(diagrams) => {
                let kroki_url = diagrams.kroki_url.clone().ok_or_else(|| {
                    ConfigError::Validation(
                        "[diagrams] section requires kroki_url to be set".to_owned(),
                    )
                })?;
                DiagramsConfig {
                    kroki_url: Some(kroki_url),
                    timeout_secs: diagrams.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
                    mermaid_theme: diagrams.mermaid_theme.clone(),
                }
            }
            None => DiagramsConfig::default(),
        };
        Ok(())
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_site()?;
        self.validate_diagrams()?;
        self.validate_locales()?;
        Ok(())
    }

    fn validate_site(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.site.title, "site.title")?;
        if let Some(ref repository) = self.site.repository {
            require_http_url(repository, "site.repository")?;
        }
        Ok(())
    }

    fn validate_diagrams(&self) -> Result<(), ConfigError> {
        // Only validate kroki_url if set (diagram rendering enabled)
        if let Some(ref kroki_url) = self.diagrams_resolved.kroki_url {
            require_non_empty(kroki_url, "diagrams.kroki_url")?;
            require_http_url(kroki_url, "diagrams.kroki_url")?;
        }
        if self.diagrams_resolved.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "diagrams.timeout_secs must be greater than 0".to_owned(),
            ));
        }
        Ok(())
    }

    fn validate_locales(&self) -> Result<(), ConfigError> {
        require_non_empty(self.locales.default.as_str(), "locales.default")?;

        // With an explicit label table, the default must be part of it
        if !self.locales.labels.is_empty()
            && !self.locales.labels.contains_key(&self.locales.default)
        {
            return Err(ConfigError::Validation(format!(
                "locales.default '{}' is not listed in locales.labels",
                self.locales.default
            )));
        }

        // Sidebar keys must come from the configured locale set
        let known = self.locales.all();
        for locale in self.sidebar.keys() {
            if !known.contains(locale) {
                return Err(ConfigError::Validation(format!(
                    "sidebar locale '{locale}' is not a configured locale"
                )));
            }
        }

        Ok(())
    }

    /// Build the immutable navigation table from the sidebar configuration.
    ///
    /// # Errors
    ///
    /// Returns [`NavError::NoDefaultConfigured`] (wrapped) when the default
    /// locale has no sidebar tree. This is a startup-time failure: callers
    /// should abort, not retry per request.
    pub fn navigation(&self) -> Result<LocaleNav, ConfigError> {
        let nav = LocaleNav::new(self.locales.default.clone(), self.sidebar.clone())?;
        Ok(nav)
    }
}
