//! Navigation tree data model.
//!
//! A sidebar is an ordered list of [`NavSection`]s, each holding ordered
//! [`NavItem`] links. Sections and items carry their own per-locale label
//! translations; [`Localized::label_for`] resolves them.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::locale::LocaleId;

/// Ordered sequence of sidebar sections for one locale.
pub type NavTree = Vec<NavSection>;

/// A labeled sidebar section containing navigation links.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavSection {
    /// Untranslated display label, used when no translation matches.
    pub label: String,
    /// Per-locale label overrides.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub translations: HashMap<LocaleId, String>,
    /// Ordered navigation entries in this section.
    #[serde(default)]
    pub items: Vec<NavItem>,
}

/// A single navigation link.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavItem {
    /// Untranslated display label, used when no translation matches.
    pub label: String,
    /// Per-locale label overrides.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub translations: HashMap<LocaleId, String>,
    /// Link target path.
    pub link: String,
}

/// Label resolution for translated navigation entries.
///
/// Lookup is exact-match on the [`LocaleId`]; a missing translation is a
/// normal condition and falls back to the untranslated label. This never
/// fails.
pub trait Localized {
    /// The untranslated base label.
    fn label(&self) -> &str;

    /// Per-locale label overrides.
    fn translations(&self) -> &HashMap<LocaleId, String>;

    /// Label to display for `locale`.
    fn label_for(&self, locale: &LocaleId) -> &str {
        self.translations()
            .get(locale)
            .map_or_else(|| self.label(), String::as_str)
    }
}

impl Localized for NavSection {
    fn label(&self) -> &str {
        &self.label
    }

    fn translations(&self) -> &HashMap<LocaleId, String> {
        &self.translations
    }
}

impl Localized for NavItem {
    fn label(&self) -> &str {
        &self.label
    }

    fn translations(&self) -> &HashMap<LocaleId, String> {
        &self.translations
    }
}
