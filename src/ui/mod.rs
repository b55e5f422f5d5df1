//! HTML rendering layer with component-based architecture.
//!
//! # Architecture
//!
//! ```text
//! AppState → compute_viewmodel → OverlayViewModel → render → HTML fragments
//! ```
//!
//! # Modules
//!
//! - [`viewmodel`]: Display-ready view model types
//! - [`renderer`]: Top-level rendering coordinator
//! - [`components`]: Fragment renderers (items, pane, loading, error, side panel)
//! - [`helpers`]: Escaping and truncation

pub mod components;
pub mod helpers;
pub mod renderer;
pub mod viewmodel;

pub use renderer::{render, render_viewmodel, RenderedOverlay, RenderedPanel};
pub use viewmodel::{BodyView, ButtonPane, OverlayViewModel, ResultItemView, SidePanelView, Summary};
