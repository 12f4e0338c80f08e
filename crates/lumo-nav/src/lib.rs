//! Locale-aware navigation resolution for lumo.
//!
//! This crate owns the sidebar data model and the rules for deciding which
//! navigation tree and which label translations a page render should display:
//! - [`LocaleId`]: locale identifiers with exact-match semantics
//! - [`NavSection`] / [`NavItem`]: the immutable sidebar tree
//! - [`LocaleNav`]: the per-locale tree table with default-locale fallback
//! - [`Localized`]: label translation lookup with silent fallback
//!
//! All navigation data is built once from configuration and never mutated,
//! so a shared [`LocaleNav`] can serve any number of concurrent page renders.
//!
//! # Example
//!
//! ```
//! use std::collections::HashMap;
//! use lumo_nav::{LocaleId, LocaleNav, Localized, NavItem, NavSection};
//!
//! let en = LocaleId::new("en");
//! let fr = LocaleId::new("fr");
//!
//! let guides = NavSection {
//!     label: "Guides".to_owned(),
//!     translations: HashMap::from([(fr.clone(), "Manuels".to_owned())]),
//!     items: vec![NavItem {
//!         label: "Download".to_owned(),
//!         translations: HashMap::new(),
//!         link: "/guides/download/".to_owned(),
//!     }],
//! };
//!
//! let nav = LocaleNav::new(en.clone(), HashMap::from([(en, vec![guides])])).unwrap();
//!
//! // "fr" has no tree of its own: falls back to the default locale's tree,
//! // but labels still resolve per-locale.
//! let tree = nav.tree_for(&fr);
//! assert_eq!(tree[0].label_for(&fr), "Manuels");
//! ```

mod locale;
mod resolver;
mod tree;

pub use locale::LocaleId;
pub use resolver::{LocaleNav, NavError, ResolvedItem, ResolvedSection};
pub use tree::{Localized, NavItem, NavSection, NavTree};
