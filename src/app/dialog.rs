//! Popup dialog state machine and its docked navigation panel.
//!
//! [`OverlayDialog`] owns the popup's [`DialogState`], its on-screen geometry,
//! and an optional [`SidePanel`]. The panel is a nested window with its own
//! open/close/reposition contract; it is created on the first entry into
//! [`DialogState::Open`], stays docked while the popup is dragged or resized,
//! and is destroyed on every transition to [`DialogState::Closed`].

use crate::app::modes::DialogState;
use crate::domain::error::{PortalSearchError, Result};
use crate::Config;
use serde::{Deserialize, Serialize};

/// Width of the side panel in pixels.
pub const SIDE_PANEL_WIDTH: u32 = 220;

/// Horizontal gap between the popup's right edge and the panel.
pub const SIDE_PANEL_GAP: i32 = 5;

/// Vertical offset of the panel below the popup's top edge (clears the title bar).
pub const SIDE_PANEL_DROP: i32 = 32;

/// The panel is this much shorter than the configured popup height.
pub const SIDE_PANEL_HEIGHT_INSET: u32 = 85;

/// Title of the side panel window.
pub const SIDE_PANEL_TITLE: &str = "Navigation";

/// Position and size of a window, in CSS pixels relative to the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Geometry {
    pub left: i32,
    pub top: i32,
    pub width: u32,
    pub height: u32,
}

impl Geometry {
    /// Right edge of the window.
    #[must_use]
    pub fn right(&self) -> i32 {
        self.left.saturating_add(i32::try_from(self.width).unwrap_or(i32::MAX))
    }
}

/// The docked navigation window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SidePanel {
    pub title: String,
    pub geometry: Geometry,
    /// Created hidden; toggled by the popup's `>` and the panel's `<` buttons.
    pub visible: bool,
}

impl SidePanel {
    /// Creates a hidden panel docked to `main`.
    #[must_use]
    pub fn docked_to(main: &Geometry, configured_height: u32) -> Self {
        Self {
            title: SIDE_PANEL_TITLE.to_string(),
            geometry: Geometry {
                width: SIDE_PANEL_WIDTH,
                height: configured_height.saturating_sub(SIDE_PANEL_HEIGHT_INSET),
                ..Self::dock_position(main)
            },
            visible: false,
        }
    }

    /// Moves the panel back into its docked position next to `main`.
    pub fn reposition(&mut self, main: &Geometry) {
        let docked = Self::dock_position(main);
        self.geometry.left = docked.left;
        self.geometry.top = docked.top;
    }

    pub fn open(&mut self) -> bool {
        !std::mem::replace(&mut self.visible, true)
    }

    pub fn close(&mut self) -> bool {
        std::mem::replace(&mut self.visible, false)
    }

    fn dock_position(main: &Geometry) -> Geometry {
        Geometry {
            left: main.right().saturating_add(SIDE_PANEL_GAP),
            top: main.top.saturating_add(SIDE_PANEL_DROP),
            width: 0,
            height: 0,
        }
    }
}

/// What happened to the side panel as a consequence of a dialog operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelChange {
    Unchanged,
    Mounted(Geometry),
    Moved(Geometry),
    Removed,
}

/// The main popup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlayDialog {
    state: DialogState,
    geometry: Geometry,
    configured_height: u32,
    side_panel: Option<SidePanel>,
}

impl OverlayDialog {
    /// Creates a closed dialog sized from `config`, placed at the configured
    /// vertical offset until the host reports its real position.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            state: DialogState::Closed,
            geometry: Geometry {
                left: 0,
                top: config.position.offset,
                width: config.width,
                height: config.height,
            },
            configured_height: config.height,
            side_panel: None,
        }
    }

    #[must_use]
    pub const fn state(&self) -> DialogState {
        self.state
    }

    #[must_use]
    pub const fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    #[must_use]
    pub const fn side_panel(&self) -> Option<&SidePanel> {
        self.side_panel.as_ref()
    }

    /// `Closed → Opening`.
    ///
    /// # Errors
    ///
    /// Returns [`PortalSearchError::InvalidTransition`] from any other state.
    pub fn open(&mut self) -> Result<()> {
        self.transition(DialogState::Opening)
    }

    /// Enters `Loading` from `Opening`, `Open`, or `Error`.
    ///
    /// # Errors
    ///
    /// Returns [`PortalSearchError::InvalidTransition`] from `Closed` or `Loading`.
    pub fn begin_loading(&mut self) -> Result<()> {
        self.transition(DialogState::Loading)
    }

    /// `Loading → Open`, mounting the side panel on the first entry.
    ///
    /// # Errors
    ///
    /// Returns [`PortalSearchError::InvalidTransition`] unless loading.
    pub fn finish_loading(&mut self) -> Result<PanelChange> {
        self.transition(DialogState::Open)?;

        if self.side_panel.is_some() {
            return Ok(PanelChange::Unchanged);
        }

        let panel = SidePanel::docked_to(&self.geometry, self.configured_height);
        let geometry = panel.geometry;
        tracing::debug!(left = geometry.left, top = geometry.top, "side panel mounted");
        self.side_panel = Some(panel);
        Ok(PanelChange::Mounted(geometry))
    }

    /// `Loading → Error`.
    ///
    /// # Errors
    ///
    /// Returns [`PortalSearchError::InvalidTransition`] unless loading.
    pub fn fail(&mut self) -> Result<()> {
        self.transition(DialogState::Error)
    }

    /// Moves to `Closed` from any state and destroys the side panel.
    ///
    /// Closing an already closed dialog is a no-op.
    pub fn close(&mut self) -> PanelChange {
        if self.state == DialogState::Closed {
            return PanelChange::Unchanged;
        }
        self.state = DialogState::Closed;
        tracing::debug!("dialog closed");

        if self.side_panel.take().is_some() {
            PanelChange::Removed
        } else {
            PanelChange::Unchanged
        }
    }

    /// Records a new popup position (drag or drag end) and re-docks the panel.
    pub fn move_to(&mut self, left: i32, top: i32) -> PanelChange {
        self.geometry.left = left;
        self.geometry.top = top;
        self.redock()
    }

    /// Records a new popup size and re-docks the panel.
    pub fn resize(&mut self, width: u32, height: u32) -> PanelChange {
        self.geometry.width = width;
        self.geometry.height = height;
        self.redock()
    }

    /// Shows the side panel. Returns `false` when there is no panel or it was
    /// already visible.
    pub fn show_side_panel(&mut self) -> bool {
        self.side_panel.as_mut().is_some_and(SidePanel::open)
    }

    /// Hides the side panel without destroying it.
    pub fn hide_side_panel(&mut self) -> bool {
        self.side_panel.as_mut().is_some_and(SidePanel::close)
    }

    fn redock(&mut self) -> PanelChange {
        let main = self.geometry;
        match self.side_panel.as_mut() {
            Some(panel) => {
                panel.reposition(&main);
                PanelChange::Moved(panel.geometry)
            }
            None => PanelChange::Unchanged,
        }
    }

    fn transition(&mut self, to: DialogState) -> Result<()> {
        let from = self.state;
        if !from.can_transition_to(to) {
            return Err(PortalSearchError::InvalidTransition { from, to });
        }
        tracing::trace!(?from, ?to, "dialog transition");
        self.state = to;
        Ok(())
    }
}
