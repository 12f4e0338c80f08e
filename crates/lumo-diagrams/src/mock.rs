//! Mock render backend for testing.
//!
//! Provides [`MockBackend`] for exercising view lifecycle without a Kroki
//! server.

use std::collections::VecDeque;
use std::sync::Mutex;

use crate::backend::{BackendError, RenderBackend};
use crate::language::DiagramLanguage;

/// Scripted in-memory render backend.
///
/// Responses queued with the builder methods are returned in order; once the
/// queue is empty the backend echoes the source as `<svg>{source}</svg>`,
/// which gives tests a deterministic artifact per distinct source.
///
/// # Example
///
/// ```
/// use lumo_diagrams::{BackendError, DiagramLanguage, MockBackend, RenderBackend};
///
/// let backend = MockBackend::new()
///     .with_response("<svg>ok</svg>")
///     .with_failure(BackendError::Rejected("bad syntax".to_owned()));
///
/// assert!(backend.render_svg(DiagramLanguage::Mermaid, "a").is_ok());
/// assert!(backend.render_svg(DiagramLanguage::Mermaid, "b").is_err());
/// ```
#[derive(Debug, Default)]
pub struct MockBackend {
    responses: Mutex<VecDeque<Result<String, BackendError>>>,
    calls: Mutex<Vec<String>>,
}

impl MockBackend {
    /// Create a mock with an empty script (echo mode).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful response.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_response(self, svg: impl Into<String>) -> Self {
        self.responses.lock().unwrap().push_back(Ok(svg.into()));
        self
    }

    /// Queue a failure.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_failure(self, error: BackendError) -> Self {
        self.responses.lock().unwrap().push_back(Err(error));
        self
    }

    /// Sources the backend has been asked to render, in call order.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl RenderBackend for MockBackend {
    fn render_svg(&self, _language: DiagramLanguage, source: &str) -> Result<String, BackendError> {
        self.calls.lock().unwrap().push(source.to_owned());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(format!("<svg>{source}</svg>")))
    }
}
