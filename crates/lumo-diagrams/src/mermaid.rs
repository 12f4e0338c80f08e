//! Mermaid source theming.
//!
//! Mermaid takes presentation settings through an init directive embedded in
//! the diagram source. The site configures a theme once; this module injects
//! it into sources that do not already declare their own directive.

/// Prepend a Mermaid init directive selecting `theme`.
///
/// Sources that already start with an `%%{init: …}%%` directive are returned
/// unchanged; an author's explicit settings win over the site default.
#[must_use]
pub fn apply_mermaid_theme(source: &str, theme: &str) -> String {
    if source.trim_start().starts_with("%%{") {
        return source.to_owned();
    }
    format!("%%{{init: {{'theme': '{theme}'}}}}%%\n{source}")
}
