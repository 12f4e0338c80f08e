//! Diagram rendering for lumo.
//!
//! This crate owns the lifecycle of one displayed diagram: taking a textual
//! diagram description, handing it to an external renderer, and keeping the
//! resulting SVG artifact current on a display target across re-renders,
//! failures, and detachment.
//!
//! # Architecture
//!
//! - [`language`]: supported diagram languages and their Kroki endpoints
//! - [`backend`]: the [`RenderBackend`] boundary (text in, SVG out)
//! - [`kroki`]: HTTP backend rendering via a Kroki service
//! - [`mermaid`]: Mermaid init-directive theming
//! - [`target`]: the [`DisplayTarget`] boundary and the [`HtmlSlot`] container
//! - [`view`]: [`DiagramView`], the lifecycle component tying it together
//!
//! The actual diagram layout algorithm lives entirely behind the
//! [`RenderBackend`] contract; this crate only guarantees consistency: a
//! failed render never blanks a previously shown artifact, overlapping
//! renders resolve to the most recently requested source, and detaching
//! discards in-flight results.
//!
//! # Example
//!
//! ```no_run
//! use lumo_diagrams::{DiagramLanguage, DiagramView, HtmlSlot, KrokiBackend};
//!
//! let backend = KrokiBackend::new("https://kroki.io");
//! let mut view = DiagramView::new(backend, DiagramLanguage::Mermaid);
//!
//! view.attach(HtmlSlot::new())?;
//! view.render("graph TD\n  A --> B")?;
//!
//! let slot = view.detach().expect("attached above");
//! assert!(slot.markup().is_none()); // cleared on release
//! # Ok::<(), lumo_diagrams::ViewError>(())
//! ```

mod backend;
mod kroki;
mod language;
mod mermaid;
#[cfg(any(test, feature = "mock"))]
mod mock;
mod target;
mod view;

pub use backend::{BackendError, RenderBackend};
pub use kroki::KrokiBackend;
pub use language::DiagramLanguage;
pub use mermaid::apply_mermaid_theme;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockBackend;
pub use target::{DisplayTarget, HtmlSlot};
pub use view::{DiagramView, RenderOutcome, RenderPass, ViewError};
