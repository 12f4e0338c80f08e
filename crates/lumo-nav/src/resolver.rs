//! Per-locale navigation tree table and resolution.
//!
//! [`LocaleNav`] maps locales to sidebar trees. Locales without an explicit
//! tree fall back to the default locale's tree, so the table only needs
//! entries where a locale's sidebar actually differs. The default locale
//! must have a tree; that is validated once at construction, which keeps
//! per-request resolution infallible.

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use crate::locale::LocaleId;
use crate::tree::{Localized, NavTree};

/// Navigation configuration error.
#[derive(Debug, thiserror::Error)]
pub enum NavError {
    /// The default locale has no sidebar tree, so fallback has nowhere to
    /// land. This is a configuration defect and should abort startup.
    #[error("no sidebar configured for default locale '{0}'")]
    NoDefaultConfigured(LocaleId),
}

/// Immutable per-locale navigation table.
///
/// Built once from configuration (see `lumo-config`) and shared read-only
/// afterwards; resolution methods take `&self` and are safe to call from any
/// number of threads.
#[derive(Clone, Debug)]
pub struct LocaleNav {
    default_locale: LocaleId,
    trees: HashMap<LocaleId, NavTree>,
}

impl LocaleNav {
    /// Build the table, validating that the default locale has a tree.
    ///
    /// # Errors
    ///
    /// Returns [`NavError::NoDefaultConfigured`] if `trees` has no entry for
    /// `default_locale`.
    pub fn new(
        default_locale: LocaleId,
        trees: HashMap<LocaleId, NavTree>,
    ) -> Result<Self, NavError> {
        if !trees.contains_key(&default_locale) {
            return Err(NavError::NoDefaultConfigured(default_locale));
        }
        Ok(Self {
            default_locale,
            trees,
        })
    }

    /// The configured default locale.
    #[must_use]
    pub fn default_locale(&self) -> &LocaleId {
        &self.default_locale
    }

    /// Locales that have an explicit sidebar tree.
    pub fn locales(&self) -> impl Iterator<Item = &LocaleId> {
        self.trees.keys()
    }

    /// Sidebar tree to display for `locale`.
    ///
    /// Exact-match lookup; any locale without an explicit tree gets the
    /// default locale's tree. Construction guarantees the default tree
    /// exists, so this never fails.
    #[must_use]
    pub fn tree_for(&self, locale: &LocaleId) -> &NavTree {
        self.trees.get(locale).unwrap_or_else(|| {
            debug!(locale = %locale, default = %self.default_locale, "no sidebar for locale, using default");
            &self.trees[&self.default_locale]
        })
    }

    /// Resolve the tree for `locale` into display-ready rows.
    ///
    /// Applies [`Localized::label_for`] to every section and item, producing
    /// plain serializable structures for the frontend.
    #[must_use]
    pub fn resolve(&self, locale: &LocaleId) -> Vec<ResolvedSection> {
        self.tree_for(locale)
            .iter()
            .map(|section| ResolvedSection {
                label: section.label_for(locale).to_owned(),
                items: section
                    .items
                    .iter()
                    .map(|item| ResolvedItem {
                        label: item.label_for(locale).to_owned(),
                        link: item.link.clone(),
                    })
                    .collect(),
            })
            .collect()
    }
}

/// A sidebar section with locale-resolved labels.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ResolvedSection {
    /// Display label for the requested locale.
    pub label: String,
    /// Resolved navigation entries.
    pub items: Vec<ResolvedItem>,
}

/// A navigation link with a locale-resolved label.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ResolvedItem {
    /// Display label for the requested locale.
    pub label: String,
    /// Link target path.
    pub link: String,
}
