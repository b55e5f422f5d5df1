//! Actions representing side effects to be executed by the host.
//!
//! The event handler never touches the page or the network itself. It returns a
//! `Vec<Action>` after each event and the host executes them in order: issuing
//! requests through the [`SearchWorker`](crate::client::SearchWorker), mirroring
//! the side panel, and talking to the excluded collaborators (asset injection,
//! favicon decoration).
//!
//! # Example
//!
//! ```rust
//! use portalsearch::{Action, handle_event, initialize, Event, PartialConfig};
//! use portalsearch::domain::HostForm;
//!
//! let config = PartialConfig::with_url("http://localhost:8090").resolve()?;
//! let mut state = initialize(&config, HostForm::new("query"));
//! let (_render, actions) = handle_event(&mut state, &Event::Submit { query: "rust".into() })?;
//! assert!(actions.iter().any(|a| matches!(a, Action::IssueRequest(_))));
//! # Ok::<(), portalsearch::PortalSearchError>(())
//! ```

use crate::app::dialog::Geometry;
use crate::client::SearchRequest;
use crate::infrastructure::assets::AssetManifest;

/// Commands for the host to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Inject the theme stylesheets and helper scripts.
    ///
    /// Failures are the host's concern and must not block the overlay.
    LoadAssets(AssetManifest),

    /// Send a request to the search service.
    IssueRequest(SearchRequest),

    /// Empty the host's query input (emitted when the popup closes).
    ClearQueryField,

    /// Return keyboard focus to the query input.
    FocusQueryField,

    /// Create the side panel window at the given geometry.
    MountSidePanel(Geometry),

    /// Move the side panel window.
    MoveSidePanel(Geometry),

    /// Destroy the side panel window and remove it from the document.
    RemoveSidePanel,

    /// Decorate the rendered title links with site favicons.
    DecorateFavicons {
        /// Link targets in display order.
        links: Vec<String>,
        /// Image used when a site has no favicon.
        default_image: String,
    },
}
