//! Composable HTML fragment renderers.
//!
//! Each component turns one part of the view model into an HTML fragment. All
//! service-provided text is escaped before it is placed into markup.
//!
//! # Components
//!
//! - [`results`]: Result items
//! - [`pane`]: Branding and summary block of the button pane
//! - [`loading`]: Loading placeholder
//! - [`error`]: Failure message with retry affordance
//! - [`side_panel`]: Page shortcuts of the navigation window

mod error;
mod loading;
mod pane;
mod results;
mod side_panel;

pub use error::render_error;
pub use loading::render_loading;
pub use pane::{render_branding, render_summary};
pub use results::{render_item, render_items};
pub use side_panel::render_page_links;
