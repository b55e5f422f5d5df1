//! Application layer coordinating state, events, and actions.
//!
//! Sits between the host (which owns the page, the network, and the clock) and
//! the domain/client layers. Every interaction flows one way:
//!
//! ```text
//! Host Input → Events → Event Handler → State Mutations → Actions → Host
//!                            ↑                                  ↓
//!                            └──────── Search Outcomes ─────────┘
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Side effect commands emitted by the event handler
//! - [`dialog`]: Popup state machine and docked side panel
//! - [`handler`]: Event processing logic
//! - [`modes`]: Dialog lifecycle states
//! - [`state`]: Per-instance state, fencing, and view model computation

pub mod actions;
pub mod dialog;
pub mod handler;
pub mod modes;
pub mod state;

pub use actions::Action;
pub use dialog::{Geometry, OverlayDialog, SidePanel};
pub use handler::{handle_event, Event, Key};
pub use modes::DialogState;
pub use state::{AppState, ResultPage};
