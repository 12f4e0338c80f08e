//! Locale identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier for a display locale (e.g. `"en"`, `"fr"`, `"en-US"`).
///
/// Matching is exact byte equality on the identifier string. `"en-US"` and
/// `"en"` are distinct locales: a request for `"en-US"` against a table that
/// only configures `"en"` falls back to the default locale, it does not
/// prefix-match. Case is significant for the same reason.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocaleId(String);

impl LocaleId {
    /// Create a locale identifier from a string tag.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LocaleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LocaleId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}
