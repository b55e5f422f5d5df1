//! Top-level rendering coordinator.
//!
//! Rendering is two steps: compute the view model from [`AppState`], then hand
//! each part to its component. The result is a set of HTML fragments the host
//! places into the popup, its button pane, and the side panel window.
//!
//! # Example
//!
//! ```rust
//! use portalsearch::domain::HostForm;
//! use portalsearch::ui::render;
//! use portalsearch::{initialize, PartialConfig};
//!
//! let config = PartialConfig::with_url("http://localhost:8090").resolve()?;
//! let state = initialize(&config, HostForm::new("query"));
//! let overlay = render(&state);
//! assert!(!overlay.visible);
//! assert!(overlay.body.is_empty());
//! # Ok::<(), portalsearch::PortalSearchError>(())
//! ```

use crate::app::dialog::Geometry;
use crate::app::AppState;
use crate::ui::components;
use crate::ui::viewmodel::{BodyView, OverlayViewModel};

/// HTML fragments for one overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedOverlay {
    pub visible: bool,
    pub title: String,
    /// Popup body.
    pub body: String,
    /// Branding followed by the summary; replaces every previous `ybpane` block.
    pub button_pane: String,
    pub side_panel: Option<RenderedPanel>,
}

/// The navigation window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPanel {
    pub title: String,
    pub geometry: Geometry,
    pub visible: bool,
    pub body: String,
}

/// Renders the overlay from its current state.
#[must_use]
pub fn render(state: &AppState) -> RenderedOverlay {
    render_viewmodel(&state.compute_viewmodel())
}

/// Renders a pre-computed view model.
#[must_use]
pub fn render_viewmodel(vm: &OverlayViewModel) -> RenderedOverlay {
    let body = match &vm.body {
        BodyView::Empty => String::new(),
        BodyView::Loading { base_url, spinner } => components::render_loading(base_url, spinner),
        BodyView::Results(items) => components::render_items(items),
        BodyView::Error { message, retained } => components::render_error(message, retained),
    };

    let button_pane = vm.button_pane.as_ref().map_or_else(String::new, |pane| {
        let mut html = components::render_branding(&pane.branding);
        html.push_str(&components::render_summary(&pane.summary));
        html
    });

    let side_panel = vm.side_panel.as_ref().map(|panel| RenderedPanel {
        title: panel.title.clone(),
        geometry: panel.geometry,
        visible: panel.visible,
        body: components::render_page_links(&panel.pages),
    });

    RenderedOverlay {
        visible: vm.state.is_visible(),
        title: vm.title.clone(),
        body,
        button_pane,
        side_panel,
    }
}
