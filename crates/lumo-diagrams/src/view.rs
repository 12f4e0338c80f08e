//! Diagram view lifecycle.
//!
//! [`DiagramView`] keeps one rendered artifact current on one display target.
//! Rendering goes through two phases: [`begin_render`](DiagramView::begin_render)
//! stamps the request with a sequence number, and
//! [`complete_render`](DiagramView::complete_render) applies the result only
//! if no newer request was begun and the target is still attached. Hosts with
//! a synchronous renderer use [`render`](DiagramView::render), which runs
//! both phases back to back.

use tracing::{debug, warn};

use crate::backend::{BackendError, RenderBackend};
use crate::language::DiagramLanguage;
use crate::target::DisplayTarget;

/// Diagram view error.
#[derive(Debug, thiserror::Error)]
pub enum ViewError {
    /// No display target is attached, or the offered target cannot host
    /// markup. Surfaced to the caller; the view does not retry.
    #[error("display target unavailable")]
    TargetUnavailable,
    /// The external renderer failed. The previously displayed artifact is
    /// left untouched; report the error alongside it.
    #[error("diagram rendering failed: {0}")]
    Render(#[from] BackendError),
}

/// What happened to a completed render pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    /// The artifact was swapped into the display target.
    Applied,
    /// The requested source is already displayed; the backend was not
    /// invoked.
    Unchanged,
    /// A newer pass was begun before this one completed; the result was
    /// discarded.
    Superseded,
    /// The target was detached while the pass was in flight; the result was
    /// discarded.
    Detached,
}

/// An in-flight render request.
///
/// Created by [`DiagramView::begin_render`] and consumed by
/// [`DiagramView::complete_render`]. Holds the source it was begun with so
/// the view can record what is displayed once the pass applies.
#[derive(Debug)]
pub struct RenderPass {
    seq: u64,
    source: String,
}

impl RenderPass {
    /// The diagram source this pass renders.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }
}

/// Owns the lifecycle of one displayed diagram.
///
/// The view is generic over the external renderer (`B`) and the display
/// target (`T`). At most one artifact is live per view; re-renders replace
/// it as a unit, and a failed render never removes it.
///
/// Render calls on one view are serialized by `&mut self`; overlapping
/// two-phase passes resolve to the most recently begun source regardless of
/// completion order.
pub struct DiagramView<B, T> {
    backend: B,
    language: DiagramLanguage,
    target: Option<T>,
    /// Source of the artifact currently in the target.
    shown: Option<String>,
    /// Sequence number for the next begun pass.
    next_seq: u64,
    /// Sequence number whose completion may still apply.
    live_seq: Option<u64>,
}

impl<B: RenderBackend, T: DisplayTarget> DiagramView<B, T> {
    /// Create a detached view for one diagram language.
    #[must_use]
    pub fn new(backend: B, language: DiagramLanguage) -> Self {
        Self {
            backend,
            language,
            target: None,
            shown: None,
            next_seq: 0,
            live_seq: None,
        }
    }

    /// The diagram language this view renders.
    #[must_use]
    pub fn language(&self) -> DiagramLanguage {
        self.language
    }

    /// The attached display target, if any.
    #[must_use]
    pub fn target(&self) -> Option<&T> {
        self.target.as_ref()
    }

    /// Source of the currently displayed artifact, if any.
    #[must_use]
    pub fn shown_source(&self) -> Option<&str> {
        self.shown.as_deref()
    }

    /// Acquire a display target and perform the initial render.
    ///
    /// If the view already holds a target, the old one is cleared and
    /// dropped, and any in-flight pass is discarded before the new target
    /// takes over. When the view has a displayed source from before, it is
    /// re-rendered into the new target.
    ///
    /// # Errors
    ///
    /// [`ViewError::TargetUnavailable`] when `target` reports it cannot host
    /// markup; [`ViewError::Render`] when the initial render fails (the view
    /// stays attached with an empty target).
    pub fn attach(&mut self, target: T) -> Result<(), ViewError> {
        if !target.is_ready() {
            return Err(ViewError::TargetUnavailable);
        }
        if let Some(mut old) = self.target.take() {
            old.clear();
            self.invalidate_inflight();
        }
        self.target = Some(target);

        // Initial render: bring the new target up to date with whatever the
        // view was showing before.
        if let Some(source) = self.shown.take() {
            self.render(&source)?;
        }
        Ok(())
    }

    /// Render `source` and apply the result.
    ///
    /// Re-rendering the source that is already displayed is a no-op
    /// ([`RenderOutcome::Unchanged`]); the backend is not invoked, so equal
    /// consecutive sources cannot flicker.
    ///
    /// # Errors
    ///
    /// [`ViewError::TargetUnavailable`] when no target is attached;
    /// [`ViewError::Render`] when the backend fails, in which case the
    /// previously displayed artifact is left untouched.
    pub fn render(&mut self, source: &str) -> Result<RenderOutcome, ViewError> {
        if self.target.is_none() {
            return Err(ViewError::TargetUnavailable);
        }
        if self.shown.as_deref() == Some(source) {
            return Ok(RenderOutcome::Unchanged);
        }
        let pass = self.begin_render(source);
        let result = self.backend.render_svg(self.language, pass.source());
        self.complete_render(pass, result)
    }

    /// Begin a render pass without invoking the backend.
    ///
    /// For hosts whose renderer completes asynchronously: begin the pass,
    /// run the backend however the host likes, then hand the result to
    /// [`complete_render`](Self::complete_render). Beginning a new pass
    /// supersedes any pass still in flight.
    pub fn begin_render(&mut self, source: impl Into<String>) -> RenderPass {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.live_seq = Some(seq);
        RenderPass {
            seq,
            source: source.into(),
        }
    }

    /// Complete a render pass, applying the artifact if the pass is still
    /// current.
    ///
    /// A pass superseded by a newer [`begin_render`](Self::begin_render), or
    /// orphaned by [`detach`](Self::detach), is discarded without touching
    /// the target; its result (success or failure) is irrelevant by then, so
    /// discarding is reported as an outcome, not an error.
    ///
    /// # Errors
    ///
    /// [`ViewError::Render`] when the pass is current but `result` carries a
    /// backend failure. The previously displayed artifact stays in place.
    pub fn complete_render(
        &mut self,
        pass: RenderPass,
        result: Result<String, BackendError>,
    ) -> Result<RenderOutcome, ViewError> {
        if self.live_seq != Some(pass.seq) {
            debug!(seq = pass.seq, "discarding superseded render pass");
            return Ok(RenderOutcome::Superseded);
        }
        let Some(target) = self.target.as_mut() else {
            debug!(seq = pass.seq, "discarding render pass completed after detach");
            return Ok(RenderOutcome::Detached);
        };

        // Failure keeps the prior artifact: the target is not touched and
        // the shown source still describes what is on screen.
        let markup = result.inspect_err(|e| {
            warn!(seq = pass.seq, error = %e, "diagram render failed, keeping previous artifact");
        })?;

        target.set_markup(&markup);
        self.shown = Some(pass.source);
        self.live_seq = None;
        Ok(RenderOutcome::Applied)
    }

    /// Release the display target.
    ///
    /// Clears the target's contents, discards any in-flight pass, and
    /// returns the target to the caller. Calling on a detached view is a
    /// no-op returning `None`.
    pub fn detach(&mut self) -> Option<T> {
        self.invalidate_inflight();
        self.shown = None;
        let mut target = self.target.take()?;
        target.clear();
        Some(target)
    }

    /// Ensure no outstanding pass can apply.
    fn invalidate_inflight(&mut self) {
        self.live_seq = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::BackendError;
    use crate::mock::MockBackend;
    use crate::target::HtmlSlot;
    use pretty_assertions::assert_eq;

    fn view(backend: MockBackend) -> DiagramView<MockBackend, HtmlSlot> {
        DiagramView::new(backend, DiagramLanguage::Mermaid)
    }

    fn attached(backend: MockBackend) -> DiagramView<MockBackend, HtmlSlot> {
        let mut v = view(backend);
        v.attach(HtmlSlot::new()).unwrap();
        v
    }

    /// A target that refuses attachment.
    struct BrokenTarget;

    impl DisplayTarget for BrokenTarget {
        fn is_ready(&self) -> bool {
            false
        }
        fn set_markup(&mut self, _markup: &str) {}
        fn clear(&mut self) {}
    }

    #[test]
    fn test_attach_unready_target_fails() {
        let mut v: DiagramView<MockBackend, BrokenTarget> =
            DiagramView::new(MockBackend::new(), DiagramLanguage::Mermaid);

        let err = v.attach(BrokenTarget).unwrap_err();

        assert!(matches!(err, ViewError::TargetUnavailable));
        assert!(v.target().is_none());
    }

    #[test]
    fn test_render_before_attach_fails() {
        let mut v = view(MockBackend::new());
        let err = v.render("graph TD").unwrap_err();
        assert!(matches!(err, ViewError::TargetUnavailable));
    }

    #[test]
    fn test_render_applies_artifact() {
        let mut v = attached(MockBackend::new());

        let outcome = v.render("graph TD\n  A --> B").unwrap();

        assert_eq!(outcome, RenderOutcome::Applied);
        assert_eq!(v.target().unwrap().markup(), Some("<svg>graph TD\n  A --> B</svg>"));
        assert_eq!(v.shown_source(), Some("graph TD\n  A --> B"));
    }

    #[test]
    fn test_render_same_source_twice_is_idempotent() {
        let mut v = attached(MockBackend::new());

        v.render("graph TD").unwrap();
        let markup_after_first = v.target().unwrap().markup().unwrap().to_owned();
        let outcome = v.render("graph TD").unwrap();

        assert_eq!(outcome, RenderOutcome::Unchanged);
        assert_eq!(v.target().unwrap().markup(), Some(markup_after_first.as_str()));
        // The backend saw exactly one call
        assert_eq!(v.backend.calls().len(), 1);
    }

    #[test]
    fn test_render_new_source_replaces_artifact() {
        let mut v = attached(MockBackend::new());

        v.render("graph TD").unwrap();
        v.render("graph LR").unwrap();

        assert_eq!(v.target().unwrap().markup(), Some("<svg>graph LR</svg>"));
        assert_eq!(v.shown_source(), Some("graph LR"));
    }

    #[test]
    fn test_failed_render_keeps_previous_artifact() {
        let backend = MockBackend::new()
            .with_response("<svg>good</svg>")
            .with_failure(BackendError::Rejected("parse error at line 2".to_owned()));
        let mut v = attached(backend);

        v.render("good diagram").unwrap();
        let err = v.render("bad diagram").unwrap_err();

        assert!(matches!(err, ViewError::Render(BackendError::Rejected(_))));
        // No regression: the prior artifact is untouched
        assert_eq!(v.target().unwrap().markup(), Some("<svg>good</svg>"));
        assert_eq!(v.shown_source(), Some("good diagram"));
    }

    #[test]
    fn test_failed_render_does_not_poison_idempotence() {
        let backend = MockBackend::new()
            .with_failure(BackendError::Rejected("boom".to_owned()))
            .with_response("<svg>ok</svg>");
        let mut v = attached(backend);

        assert!(v.render("diagram").is_err());
        // Retrying the same source goes back to the backend, it is not
        // skipped as already shown.
        let outcome = v.render("diagram").unwrap();

        assert_eq!(outcome, RenderOutcome::Applied);
        assert_eq!(v.target().unwrap().markup(), Some("<svg>ok</svg>"));
    }

    #[test]
    fn test_last_write_wins_in_order_completion() {
        let mut v = attached(MockBackend::new());

        let first = v.begin_render("graph TD");
        let second = v.begin_render("graph LR");

        let out1 = v
            .complete_render(first, Ok("<svg>first</svg>".to_owned()))
            .unwrap();
        let out2 = v
            .complete_render(second, Ok("<svg>second</svg>".to_owned()))
            .unwrap();

        assert_eq!(out1, RenderOutcome::Superseded);
        assert_eq!(out2, RenderOutcome::Applied);
        assert_eq!(v.target().unwrap().markup(), Some("<svg>second</svg>"));
        assert_eq!(v.shown_source(), Some("graph LR"));
    }

    #[test]
    fn test_last_write_wins_reordered_completion() {
        let mut v = attached(MockBackend::new());

        let first = v.begin_render("graph TD");
        let second = v.begin_render("graph LR");

        // Newest result lands first, stale one afterwards
        let out2 = v
            .complete_render(second, Ok("<svg>second</svg>".to_owned()))
            .unwrap();
        let out1 = v
            .complete_render(first, Ok("<svg>first</svg>".to_owned()))
            .unwrap();

        assert_eq!(out2, RenderOutcome::Applied);
        assert_eq!(out1, RenderOutcome::Superseded);
        assert_eq!(v.target().unwrap().markup(), Some("<svg>second</svg>"));
    }

    #[test]
    fn test_stale_failure_is_discarded_silently() {
        let mut v = attached(MockBackend::new());

        let first = v.begin_render("graph TD");
        let second = v.begin_render("graph LR");
        v.complete_render(second, Ok("<svg>second</svg>".to_owned()))
            .unwrap();

        // The superseded pass failed; that is not the caller's problem
        let outcome = v
            .complete_render(first, Err(BackendError::Rejected("late".to_owned())))
            .unwrap();

        assert_eq!(outcome, RenderOutcome::Superseded);
        assert_eq!(v.target().unwrap().markup(), Some("<svg>second</svg>"));
    }

    #[test]
    fn test_detach_discards_inflight_pass() {
        let mut v = attached(MockBackend::new());
        v.render("graph TD").unwrap();

        let pass = v.begin_render("graph LR");
        let slot = v.detach().unwrap();
        assert!(slot.markup().is_none());

        // Re-attach: the target must not receive the orphaned result
        v.attach(HtmlSlot::new()).unwrap();
        let outcome = v
            .complete_render(pass, Ok("<svg>orphan</svg>".to_owned()))
            .unwrap();

        assert_eq!(outcome, RenderOutcome::Superseded);
        assert!(v.target().unwrap().markup().is_none());
    }

    #[test]
    fn test_complete_after_detach_without_reattach() {
        let mut v = attached(MockBackend::new());
        let pass = v.begin_render("graph TD");
        v.detach();

        let outcome = v
            .complete_render(pass, Ok("<svg>orphan</svg>".to_owned()))
            .unwrap();

        assert_eq!(outcome, RenderOutcome::Superseded);
    }

    #[test]
    fn test_pass_begun_while_detached_reports_detached() {
        let mut v = view(MockBackend::new());
        let pass = v.begin_render("graph TD");

        let outcome = v
            .complete_render(pass, Ok("<svg>orphan</svg>".to_owned()))
            .unwrap();

        assert_eq!(outcome, RenderOutcome::Detached);
    }

    #[test]
    fn test_detach_clears_target_and_returns_it() {
        let mut v = attached(MockBackend::new());
        v.render("graph TD").unwrap();

        let slot = v.detach().unwrap();

        assert!(slot.markup().is_none());
        assert!(v.target().is_none());
        assert!(v.shown_source().is_none());
    }

    #[test]
    fn test_detach_twice_is_idempotent() {
        let mut v = attached(MockBackend::new());
        v.render("graph TD").unwrap();

        assert!(v.detach().is_some());
        assert!(v.detach().is_none());
        assert!(v.target().is_none());
    }

    #[test]
    fn test_detach_never_attached_is_noop() {
        let mut v = view(MockBackend::new());
        assert!(v.detach().is_none());
    }

    #[test]
    fn test_attach_over_attach_replaces_target_and_rerenders() {
        let mut v = attached(MockBackend::new());
        v.render("graph TD").unwrap();

        v.attach(HtmlSlot::new()).unwrap();

        // The replacement target got its own render of the shown source
        assert_eq!(v.target().unwrap().markup(), Some("<svg>graph TD</svg>"));
        assert_eq!(v.shown_source(), Some("graph TD"));
        assert_eq!(v.backend.calls().len(), 2);
    }

    #[test]
    fn test_attach_over_attach_discards_inflight() {
        let mut v = attached(MockBackend::new());
        let pass = v.begin_render("graph TD");

        v.attach(HtmlSlot::new()).unwrap();

        let outcome = v
            .complete_render(pass, Ok("<svg>orphan</svg>".to_owned()))
            .unwrap();
        assert_eq!(outcome, RenderOutcome::Superseded);
        assert!(v.target().unwrap().markup().is_none());
    }

    #[test]
    fn test_attach_after_detach_starts_clean() {
        let mut v = attached(MockBackend::new());
        v.render("graph TD").unwrap();
        v.detach();

        v.attach(HtmlSlot::new()).unwrap();

        // Detach released everything; the fresh target starts empty
        assert!(v.target().unwrap().markup().is_none());
        assert!(v.shown_source().is_none());
    }
}
