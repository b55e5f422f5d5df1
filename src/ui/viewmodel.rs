//! View model types representing renderable overlay state.
//!
//! View models are computed by [`AppState::compute_viewmodel`](crate::AppState::compute_viewmodel)
//! and consumed by the renderer. They hold display-ready data only: dates are
//! already truncated and totals already parsed. Escaping happens at render time.

use crate::app::dialog::Geometry;
use crate::app::modes::DialogState;
use crate::domain::Scope;

/// Complete view model of one overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayViewModel {
    pub state: DialogState,

    /// Popup title bar text.
    pub title: String,

    /// Content of the popup body.
    pub body: BodyView,

    /// Branding and summary block. Present once a page has rendered.
    pub button_pane: Option<ButtonPane>,

    /// Present after the first successful render until the popup closes.
    pub side_panel: Option<SidePanelView>,
}

/// What the popup body shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyView {
    /// Nothing rendered yet.
    Empty,

    /// Request in flight.
    Loading { base_url: String, spinner: String },

    /// Result items in service order.
    Results(Vec<ResultItemView>),

    /// Request failed. The previous results stay visible underneath.
    Error {
        message: String,
        retained: Vec<ResultItemView>,
    },
}

/// One search hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultItemView {
    pub title: String,
    pub link: String,
    pub description: String,
    /// First 16 characters of the publication date.
    pub date: String,
    pub size: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonPane {
    pub branding: Branding,
    pub summary: Summary,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branding {
    pub link: String,
    pub logo: String,
}

/// "Displaying result {start} to {end} of {total} {scope} results."
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub start: u64,
    /// `start_record + maximum_records`, not clamped to the total.
    pub end: u64,
    pub total: u64,
    pub scope: Scope,
}

impl Summary {
    /// Plain-text form of the summary line.
    ///
    /// ```
    /// use portalsearch::domain::Scope;
    /// use portalsearch::ui::viewmodel::Summary;
    ///
    /// let summary = Summary { start: 1, end: 10, total: 1234, scope: Scope::Local };
    /// assert_eq!(summary.text(), "Displaying result 1 to 10 of 1234 local results.");
    /// ```
    #[must_use]
    pub fn text(&self) -> String {
        format!(
            "Displaying result {} to {} of {} {} results.",
            self.start, self.end, self.total, self.scope
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidePanelView {
    pub title: String,
    pub geometry: Geometry,
    pub visible: bool,
    pub pages: Vec<PageLink>,
}

/// A page shortcut in the side panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLink {
    /// 1-based page number.
    pub number: u64,
    pub current: bool,
}
