//! The external renderer boundary.
//!
//! Diagram layout is a separate engineering problem owned by an external
//! renderer; this crate depends only on the narrow contract defined here:
//! a function from diagram source text to SVG markup that may reject
//! malformed input.

use crate::language::DiagramLanguage;

/// Failure from the external renderer.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// The renderer rejected the diagram source (malformed input).
    #[error("diagram source rejected: {0}")]
    Rejected(String),
    /// Transport-level failure reaching the renderer.
    #[error("HTTP error: {0}")]
    Http(String),
    /// The renderer's response was not usable SVG.
    #[error("invalid SVG payload: {0}")]
    InvalidSvg(String),
}

/// A renderer mapping diagram source text to an SVG artifact.
///
/// Implementations take `&self` so one backend can serve many views;
/// the view layer owns all lifecycle and consistency concerns.
pub trait RenderBackend {
    /// Render `source` in the given language to SVG markup.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Rejected`] when the renderer refuses the
    /// source, or a transport/decoding variant for infrastructure failures.
    fn render_svg(&self, language: DiagramLanguage, source: &str) -> Result<String, BackendError>;
}

impl<B: RenderBackend + ?Sized> RenderBackend for &B {
    fn render_svg(&self, language: DiagramLanguage, source: &str) -> Result<String, BackendError> {
        (**self).render_svg(language, source)
    }
}
