//! Popup lifecycle states.
//!
//! # State Machine
//!
//! ```text
//!            open               begin_loading           finish_loading
//!  Closed ─────────▶ Opening ─────────────────▶ Loading ───────────────▶ Open
//!    ▲                                           │  ▲                     │
//!    │                                     fail  ▼  │ retry / new search  │
//!    │                                          Error ◀───────────────────┘
//!    └──────────────── close (from every state) ─────────────────────────
//! ```
//!
//! `Closed` is both the initial state and reachable from everywhere; an overlay
//! can be reopened any number of times.

use serde::{Deserialize, Serialize};

/// Visibility and content state of the main popup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DialogState {
    /// Hidden. Initial state.
    #[default]
    Closed,
    /// Becoming visible for a first search.
    Opening,
    /// Showing the loading placeholder while a request is in flight.
    Loading,
    /// Showing rendered results.
    Open,
    /// Showing a failure message with a retry affordance.
    Error,
}

impl DialogState {
    /// Whether `self → to` is a legal transition.
    #[must_use]
    pub const fn can_transition_to(self, to: Self) -> bool {
        matches!(
            (self, to),
            (Self::Closed, Self::Opening)
                | (Self::Opening | Self::Open | Self::Error, Self::Loading)
                | (Self::Loading, Self::Open | Self::Error)
                | (Self::Opening | Self::Loading | Self::Open | Self::Error, Self::Closed)
        )
    }

    /// Whether the popup is on screen.
    #[must_use]
    pub const fn is_visible(self) -> bool {
        !matches!(self, Self::Closed)
    }
}
