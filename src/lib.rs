//! Portalsearch: the core of an embeddable live-search overlay for YaCy-style
//! search portals.
//!
//! A host page (or terminal host, or test harness) embeds the overlay next to
//! its search form. The core provides:
//! - Live search while typing, with PageUp/PageDown paging
//! - Asynchronous requests to a remote `yacysearch.json` endpoint with a
//!   client-side timeout
//! - Sequence-number fencing so late answers never overwrite newer ones
//! - A popup state machine with a docked navigation side panel
//! - HTML rendering of results, branding, and the result summary

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Host (main.rs CLI, or an embedding page shell)     │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │ Events            ▲ Actions
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← State machine
//! │  - Event handling, submit guard, fencing            │
//! │  - Dialog + side panel lifecycle                    │
//! │  - View model computation                           │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌────────────────┐
//! │ UI Layer      │   │ Client Layer  │   │ Infrastructure │
//! │ (ui/)         │   │ (client/)     │   │ (infrastructure/)
//! │ - HTML frags  │   │ - Requests    │   │ - Asset list   │
//! │ - Escaping    │   │ - Worker/HTTP │   │ - Platform dirs│
//! └───────────────┘   └───────────────┘   └────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Domain Layer (domain/)                             │
//! │  - Query state, scope, host form                    │
//! │  - Response normalization (direct / wrapped)        │
//! │  - Error types                                      │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │  ← Optional
//! │  - OpenTelemetry tracing to a rotating JSON file    │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Configuration
//!
//! Hosts pass configuration as a string map ([`PartialConfig::from_host`]) or a
//! TOML file ([`PartialConfig::from_toml_str`]):
//!
//! ```toml
//! url = "http://localhost:8090"
//! global = false
//! theme = "start"
//! position = ["top", 50]
//! trace_level = "debug"
//! ```
//!
//! Only `url` is mandatory. Everything else has a default, and `logo` is derived
//! from `url` unless set explicitly.
//!
//! # Flow
//!
//! 1. The host resolves a [`Config`] and calls [`initialize`] with a snapshot of
//!    its search form.
//! 2. It sends [`Event::Mounted`] and injects the returned asset manifest.
//! 3. Key releases and submits become [`Event::KeyUp`] / [`Event::Submit`]. The
//!    handler returns [`Action::IssueRequest`], which the host hands to a
//!    [`client::SearchWorker`].
//! 4. The worker's [`client::SearchOutcome`] comes back as
//!    [`Event::SearchOutcome`]; the host renders with [`ui::render`].
//!
//! # Example
//!
//! ```rust
//! use portalsearch::client::SearchOutcome;
//! use portalsearch::domain::HostForm;
//! use portalsearch::{handle_event, initialize, Action, DialogState, Event, PartialConfig};
//!
//! let config = PartialConfig::with_url("http://localhost:8090").resolve()?;
//! let mut state = initialize(&config, HostForm::new("query").with_field("query", ""));
//!
//! let (_, actions) = handle_event(&mut state, &Event::Submit { query: "weather".into() })?;
//! let Some(Action::IssueRequest(request)) = actions.into_iter().last() else {
//!     unreachable!("a non-empty submit issues a request");
//! };
//!
//! let body = r#"{"channels":[{"totalResults":"1,234","startIndex":"0","itemsPerPage":"10","items":[]}]}"#;
//! let outcome = SearchOutcome::Completed {
//!     ticket: request.ticket.clone(),
//!     scope: request.scope,
//!     callback: None,
//!     body: body.to_string(),
//! };
//! handle_event(&mut state, &Event::SearchOutcome(outcome))?;
//!
//! assert_eq!(state.dialog.state(), DialogState::Open);
//! let summary = state.compute_viewmodel().button_pane.map(|pane| pane.summary.text());
//! assert_eq!(summary.as_deref(), Some("Displaying result 1 to 10 of 1234 local results."));
//! # Ok::<(), portalsearch::PortalSearchError>(())
//! ```

pub mod app;
pub mod client;
pub mod domain;
pub mod infrastructure;

pub mod ui;

pub mod observability;

pub use app::{handle_event, Action, AppState, DialogState, Event, Key};
pub use domain::{PortalSearchError, Result};

use domain::HostForm;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

pub const DEFAULT_THEME: &str = "start";
pub const DEFAULT_TITLE: &str = "YaCy P2P Web Search";
pub const DEFAULT_LINK: &str = "http://yacy.net";
pub const DEFAULT_WIDTH: u32 = 420;
pub const DEFAULT_HEIGHT: u32 = 640;
pub const DEFAULT_QUERY_FIELD: &str = "query";

/// Popup placement: an anchor keyword and a pixel offset along it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub anchor: String,
    pub offset: i32,
}

impl Default for Position {
    fn default() -> Self {
        Self {
            anchor: "top".to_string(),
            offset: 50,
        }
    }
}

/// Configuration overrides as supplied by a host, before defaults are applied.
///
/// Every field is optional; [`resolve`](Self::resolve) fills the gaps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PartialConfig {
    pub url: Option<String>,
    pub global: Option<bool>,
    pub theme: Option<String>,
    pub title: Option<String>,
    pub logo: Option<String>,
    pub link: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// `["top", 50]` in TOML, `"top,50"` in a host map.
    pub position: Option<(String, i32)>,
    pub modal: Option<bool>,
    pub resizable: Option<bool>,
    pub show: Option<String>,
    pub hide: Option<String>,
    pub query_field: Option<String>,
    pub fence_responses: Option<bool>,
    pub jsonp_callback: Option<String>,
    pub trace_level: Option<String>,
}

impl PartialConfig {
    /// Overrides with only `url` set.
    #[must_use]
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }

    /// Parses overrides from TOML.
    ///
    /// # Errors
    ///
    /// Returns [`PortalSearchError::Configuration`] on invalid TOML or unknown keys.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| PortalSearchError::Configuration(e.to_string()))
    }

    /// Reads and parses a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`PortalSearchError::Io`] when the file cannot be read and
    /// [`PortalSearchError::Configuration`] when it does not parse.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Parses overrides from a host's string map.
    ///
    /// Values that do not parse as the field's type are ignored with a debug
    /// log, so the default applies.
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use portalsearch::PartialConfig;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("url".to_string(), "http://localhost:8090/".to_string());
    /// map.insert("width".to_string(), "wide".to_string());
    /// map.insert("position".to_string(), "top,80".to_string());
    ///
    /// let config = PartialConfig::from_host(&map).resolve()?;
    /// assert_eq!(config.url, "http://localhost:8090");
    /// assert_eq!(config.width, 420);
    /// assert_eq!(config.position.offset, 80);
    /// # Ok::<(), portalsearch::PortalSearchError>(())
    /// ```
    #[must_use]
    pub fn from_host(map: &BTreeMap<String, String>) -> Self {
        let text = |key: &str| map.get(key).cloned();

        Self {
            url: text("url"),
            global: parse_field(map, "global"),
            theme: text("theme"),
            title: text("title"),
            logo: text("logo"),
            link: text("link"),
            width: parse_field(map, "width"),
            height: parse_field(map, "height"),
            position: map.get("position").and_then(|raw| {
                let parsed = parse_position(raw);
                if parsed.is_none() {
                    tracing::debug!(value = %raw, "ignoring unparsable position");
                }
                parsed
            }),
            modal: parse_field(map, "modal"),
            resizable: parse_field(map, "resizable"),
            show: text("show"),
            hide: text("hide"),
            query_field: text("query_field"),
            fence_responses: parse_field(map, "fence_responses"),
            jsonp_callback: text("jsonp_callback"),
            trace_level: text("trace_level"),
        }
    }

    /// Layers `overrides` on top of `self`; fields set in `overrides` win.
    #[must_use]
    pub fn merge(self, overrides: Self) -> Self {
        Self {
            url: overrides.url.or(self.url),
            global: overrides.global.or(self.global),
            theme: overrides.theme.or(self.theme),
            title: overrides.title.or(self.title),
            logo: overrides.logo.or(self.logo),
            link: overrides.link.or(self.link),
            width: overrides.width.or(self.width),
            height: overrides.height.or(self.height),
            position: overrides.position.or(self.position),
            modal: overrides.modal.or(self.modal),
            resizable: overrides.resizable.or(self.resizable),
            show: overrides.show.or(self.show),
            hide: overrides.hide.or(self.hide),
            query_field: overrides.query_field.or(self.query_field),
            fence_responses: overrides.fence_responses.or(self.fence_responses),
            jsonp_callback: overrides.jsonp_callback.or(self.jsonp_callback),
            trace_level: overrides.trace_level.or(self.trace_level),
        }
    }

    /// Applies defaults and derives `logo`.
    ///
    /// # Errors
    ///
    /// Returns [`PortalSearchError::Configuration`] when `url` is missing or blank.
    pub fn resolve(self) -> Result<Config> {
        let url = self
            .url
            .as_deref()
            .map(|raw| raw.trim().trim_end_matches('/'))
            .filter(|url| !url.is_empty())
            .ok_or_else(|| PortalSearchError::Configuration("url is mandatory".to_string()))?
            .to_string();

        let logo = non_blank(self.logo).unwrap_or_else(|| format!("{url}/yacy/ui/img/yacy-logo.png"));

        let position = self
            .position
            .map_or_else(Position::default, |(anchor, offset)| Position { anchor, offset });

        Ok(Config {
            global: self.global.unwrap_or(false),
            theme: non_blank(self.theme).unwrap_or_else(|| DEFAULT_THEME.to_string()),
            title: self.title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            logo,
            link: self.link.unwrap_or_else(|| DEFAULT_LINK.to_string()),
            width: self.width.unwrap_or(DEFAULT_WIDTH),
            height: self.height.unwrap_or(DEFAULT_HEIGHT),
            position,
            modal: self.modal.unwrap_or(false),
            resizable: self.resizable.unwrap_or(true),
            show: self.show.unwrap_or_default(),
            hide: self.hide.unwrap_or_default(),
            query_field: non_blank(self.query_field).unwrap_or_else(|| DEFAULT_QUERY_FIELD.to_string()),
            fence_responses: self.fence_responses.unwrap_or(true),
            jsonp_callback: non_blank(self.jsonp_callback),
            trace_level: non_blank(self.trace_level),
            url,
        })
    }
}

fn parse_field<T: std::str::FromStr>(map: &BTreeMap<String, String>, key: &str) -> Option<T> {
    let raw = map.get(key)?;
    let parsed = raw.trim().parse().ok();
    if parsed.is_none() {
        tracing::debug!(key, value = %raw, "ignoring unparsable configuration value");
    }
    parsed
}

fn parse_position(raw: &str) -> Option<(String, i32)> {
    let (anchor, offset) = raw.split_once(',')?;
    let anchor = anchor.trim();
    if anchor.is_empty() {
        return None;
    }
    Some((anchor.to_string(), offset.trim().parse().ok()?))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Resolved configuration of one overlay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Config {
    /// Base URL of the search peer, without trailing `/`.
    pub url: String,

    /// Whether explicit submits search the global index.
    pub global: bool,

    /// Theme directory under `/yacy/ui/css/themes/`.
    pub theme: String,

    pub title: String,

    /// Branding image. Defaults to the peer's logo.
    pub logo: String,

    /// Target of the branding link.
    pub link: String,

    pub width: u32,
    pub height: u32,
    pub position: Position,
    pub modal: bool,
    pub resizable: bool,

    /// Show and hide effect names, passed through to the dialog chrome.
    pub show: String,
    pub hide: String,

    /// Name of the host form input holding the query.
    pub query_field: String,

    /// Apply only the newest request's outcome. Disable to get the legacy
    /// arrival-order behavior.
    pub fence_responses: bool,

    /// JSONP callback name. When set, requests carry `callback=<name>`.
    pub jsonp_callback: Option<String>,

    /// Tracing filter, e.g. `debug` or `portalsearch=trace`.
    pub trace_level: Option<String>,
}

impl Config {
    /// Image shown for results whose site has no favicon.
    #[must_use]
    pub fn favicon_fallback(&self) -> String {
        format!("{}/yacy/ui/img-2/article.png", self.url)
    }

    /// Spinner shown in the loading placeholder.
    #[must_use]
    pub fn spinner_url(&self) -> String {
        format!("{}/yacy/ui/img/loading2.gif", self.url)
    }
}

/// Creates an overlay instance for a host form.
///
/// The form's query field name is taken from `config.query_field`. Instances
/// share nothing, so a page can embed several.
#[must_use]
pub fn initialize(config: &Config, mut form: HostForm) -> AppState {
    tracing::debug!(url = %config.url, fenced = config.fence_responses, "initializing overlay");
    form.query_field.clone_from(&config.query_field);
    AppState::new(config.clone(), form)
}
