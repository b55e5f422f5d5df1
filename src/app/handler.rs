//! Event handling and state transition logic.
//!
//! The host translates page interactions (key releases in the query input, form
//! submissions, button clicks, drag/resize notifications) and worker outcomes into
//! [`Event`]s and feeds them to [`handle_event`] one at a time. The handler
//! mutates [`AppState`] and returns whether the overlay must be re-rendered plus
//! the [`Action`]s the host has to execute.
//!
//! # Event Types
//!
//! - **Input**: `KeyUp`, `Submit`
//! - **Navigation**: `Next`, `Prev`, `JumpToPage`
//! - **Window**: `CloseDialog`, `ShowSidePanel`, `HideSidePanel`, `DialogMoved`,
//!   `DragStopped`, `DialogResized`
//! - **Lifecycle**: `Mounted`, `Retry`
//! - **Worker**: `SearchOutcome`
//!
//! # Submit/keyup de-duplication
//!
//! Pressing Enter in the query input fires a submit followed by a key release for
//! the same keystroke. Submit arms a one-shot guard that the next key release
//! consumes, so the keystroke issues one request instead of two.

use crate::app::dialog::PanelChange;
use crate::app::{Action, AppState};
use crate::client::SearchOutcome;
use crate::domain::error::Result;
use crate::domain::Scope;
use crate::infrastructure::assets::AssetManifest;
use serde::{Deserialize, Serialize};

/// Keys the query input distinguishes on release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    Escape,
    PageUp,
    PageDown,
    /// Any other key, including Enter and editing keys.
    Other,
}

/// Events delivered by the host or the search worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The overlay was attached to a page.
    Mounted,

    /// A key was released in the query input. `query` is the input's value
    /// after the keystroke.
    KeyUp { key: Key, query: String },

    /// The host search form was submitted.
    Submit { query: String },

    /// The `Next` button was clicked.
    Next,

    /// The `Prev` button was clicked.
    Prev,

    /// A page shortcut in the side panel was clicked (1-based).
    JumpToPage(u64),

    /// The popup's close button was clicked.
    CloseDialog,

    /// The popup's `>` button was clicked.
    ShowSidePanel,

    /// The side panel's `<` button was clicked.
    HideSidePanel,

    /// The popup is being dragged.
    DialogMoved { left: i32, top: i32 },

    /// A drag of the popup ended.
    DragStopped { left: i32, top: i32 },

    /// The popup was resized.
    DialogResized { width: u32, height: u32 },

    /// The error view's retry affordance was activated.
    Retry,

    /// A search request finished on the worker.
    SearchOutcome(SearchOutcome),
}

/// Processes an event, mutates the overlay state, and returns whether to
/// re-render together with the actions to execute.
///
/// # Errors
///
/// Returns [`PortalSearchError::InvalidTransition`](crate::PortalSearchError::InvalidTransition)
/// if the dialog state machine rejects a transition; the state is unchanged in
/// that case.
pub fn handle_event(state: &mut AppState, event: &Event) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_event", event_type = event_name(event)).entered();

    match event {
        Event::Mounted => {
            let manifest = AssetManifest::for_config(&state.config);
            tracing::debug!(
                stylesheets = manifest.stylesheets.len(),
                scripts = manifest.scripts.len(),
                "requesting asset injection"
            );
            Ok((false, vec![Action::LoadAssets(manifest)]))
        }
        Event::KeyUp { key, query } => {
            state.sync_query(query);
            let guarded = state.query.consume_guard();
            let page_size = state.query.maximum_records;

            match key {
                Key::Escape => {
                    tracing::debug!("escape released, closing");
                    return Ok((true, state.close()));
                }
                Key::PageDown => state.query.advance(page_size),
                Key::PageUp => state.query.retreat(page_size),
                Key::Other => state.query.reset(),
            }

            if state.query.is_query_empty() {
                return Ok((true, state.close()));
            }
            if guarded {
                tracing::debug!("key release follows a submit, not searching again");
                return Ok((false, vec![]));
            }
            Ok((true, state.start_search(Scope::Local)?))
        }
        Event::Submit { query } => {
            state.sync_query(query);
            submit(state)
        }
        Event::Next => {
            state.query.advance(state.query.maximum_records);
            submit(state)
        }
        Event::Prev => {
            state.query.retreat(state.query.maximum_records);
            submit(state)
        }
        Event::JumpToPage(page) => {
            tracing::debug!(page, "jumping to page");
            state.query.jump_to_page(*page);
            submit(state)
        }
        Event::CloseDialog => Ok((true, state.close())),
        Event::ShowSidePanel => Ok((state.dialog.show_side_panel(), vec![])),
        Event::HideSidePanel => Ok((state.dialog.hide_side_panel(), vec![])),
        Event::DialogMoved { left, top } | Event::DragStopped { left, top } => {
            Ok(redock(state.dialog.move_to(*left, *top)))
        }
        Event::DialogResized { width, height } => Ok(redock(state.dialog.resize(*width, *height))),
        Event::Retry => Ok((true, state.retry()?)),
        Event::SearchOutcome(outcome) => state.apply_outcome(outcome),
    }
}

/// Shared tail of submit and the pagination buttons: arm the guard, then close
/// on an empty query or search with the configured scope.
fn submit(state: &mut AppState) -> Result<(bool, Vec<Action>)> {
    state.query.arm_guard();
    if state.query.is_query_empty() {
        return Ok((true, state.close()));
    }
    let scope = Scope::from_flag(state.config.global);
    Ok((true, state.start_search(scope)?))
}

fn redock(change: PanelChange) -> (bool, Vec<Action>) {
    match change {
        PanelChange::Moved(geometry) => (false, vec![Action::MoveSidePanel(geometry)]),
        PanelChange::Unchanged | PanelChange::Mounted(_) | PanelChange::Removed => (false, vec![]),
    }
}

const fn event_name(event: &Event) -> &'static str {
    match event {
        Event::Mounted => "mounted",
        Event::KeyUp { .. } => "key_up",
        Event::Submit { .. } => "submit",
        Event::Next => "next",
        Event::Prev => "prev",
        Event::JumpToPage(_) => "jump_to_page",
        Event::CloseDialog => "close_dialog",
        Event::ShowSidePanel => "show_side_panel",
        Event::HideSidePanel => "hide_side_panel",
        Event::DialogMoved { .. } => "dialog_moved",
        Event::DragStopped { .. } => "drag_stopped",
        Event::DialogResized { .. } => "dialog_resized",
        Event::Retry => "retry",
        Event::SearchOutcome(_) => "search_outcome",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::modes::DialogState;
    use crate::client::SearchRequest;
    use crate::domain::HostForm;
    use crate::PartialConfig;

    fn state_with(global: bool) -> AppState {
        let mut partial = PartialConfig::with_url("http://peer.example/");
        partial.global = Some(global);
        let config = partial.resolve().unwrap();
        let form = HostForm::new("query")
            .with_field("query", "")
            .with_field("maximumRecords", "10")
            .with_field("resource", "local");
        AppState::new(config, form)
    }

    fn requests(actions: &[Action]) -> Vec<&SearchRequest> {
        actions
            .iter()
            .filter_map(|a| match a {
                Action::IssueRequest(request) => Some(request),
                _ => None,
            })
            .collect()
    }

    fn key(key: Key, query: &str) -> Event {
        Event::KeyUp {
            key,
            query: query.to_string(),
        }
    }

    #[test]
    fn typing_searches_from_the_first_record() {
        let mut state = state_with(false);
        state.query.start_record = 30;

        let (render, actions) = handle_event(&mut state, &key(Key::Other, "w")).unwrap();
        assert!(render);
        let issued = requests(&actions);
        assert_eq!(issued.len(), 1);
        assert_eq!(issued[0].param("startRecord"), Some("0"));
        assert_eq!(issued[0].param("query"), Some("w"));
        assert_eq!(actions[0], Action::FocusQueryField);
        assert_eq!(state.dialog.state(), DialogState::Loading);
    }

    #[test]
    fn enter_issues_exactly_one_request() {
        let mut state = state_with(false);

        let (_, submitted) = handle_event(&mut state, &Event::Submit { query: "rust".into() }).unwrap();
        let (render, released) = handle_event(&mut state, &key(Key::Other, "rust")).unwrap();

        assert_eq!(requests(&submitted).len(), 1);
        assert!(requests(&released).is_empty());
        assert!(!render);
        assert!(!state.query.submit_guard);

        let (_, typed) = handle_event(&mut state, &key(Key::Other, "rusty")).unwrap();
        assert_eq!(requests(&typed).len(), 1);
    }

    #[test]
    fn page_keys_move_by_one_page() {
        let mut state = state_with(false);
        handle_event(&mut state, &key(Key::Other, "weather")).unwrap();

        let (_, actions) = handle_event(&mut state, &key(Key::PageDown, "weather")).unwrap();
        assert_eq!(requests(&actions)[0].param("startRecord"), Some("10"));

        let (_, actions) = handle_event(&mut state, &key(Key::PageUp, "weather")).unwrap();
        assert_eq!(requests(&actions)[0].param("startRecord"), Some("0"));

        let (_, actions) = handle_event(&mut state, &key(Key::PageUp, "weather")).unwrap();
        assert_eq!(requests(&actions)[0].param("startRecord"), Some("0"));
    }

    #[test]
    fn escape_closes_and_consumes_guard() {
        let mut state = state_with(false);
        handle_event(&mut state, &Event::Submit { query: "rust".into() }).unwrap();

        let (_, actions) = handle_event(&mut state, &key(Key::Escape, "rust")).unwrap();
        assert_eq!(state.dialog.state(), DialogState::Closed);
        assert!(actions.contains(&Action::ClearQueryField));
        assert!(!state.query.submit_guard);
    }

    #[test]
    fn empty_query_closes_from_every_path() {
        let mut state = state_with(false);
        handle_event(&mut state, &key(Key::Other, "abc")).unwrap();
        handle_event(&mut state, &key(Key::Other, "")).unwrap();
        assert_eq!(state.dialog.state(), DialogState::Closed);

        handle_event(&mut state, &key(Key::Other, "abc")).unwrap();
        let (_, actions) = handle_event(&mut state, &Event::Submit { query: String::new() }).unwrap();
        assert_eq!(state.dialog.state(), DialogState::Closed);
        assert!(requests(&actions).is_empty());
    }

    fn fail_latest(state: &mut AppState, actions: &[Action]) {
        let ticket = requests(actions)[0].ticket.clone();
        let failed = Event::SearchOutcome(SearchOutcome::Failed {
            ticket,
            message: "connection refused".to_string(),
        });
        handle_event(state, &failed).unwrap();
        assert_eq!(state.dialog.state(), DialogState::Error);
    }

    #[test]
    fn empty_query_closes_from_error() {
        let mut state = state_with(false);
        let (_, actions) = handle_event(&mut state, &key(Key::Other, "abc")).unwrap();
        fail_latest(&mut state, &actions);

        let (_, actions) = handle_event(&mut state, &key(Key::Other, "")).unwrap();
        assert_eq!(state.dialog.state(), DialogState::Closed);
        assert!(actions.contains(&Action::ClearQueryField));
        assert!(requests(&actions).is_empty());

        let (_, actions) = handle_event(&mut state, &Event::Submit { query: "abc".into() }).unwrap();
        fail_latest(&mut state, &actions);

        let (_, actions) = handle_event(&mut state, &Event::Submit { query: String::new() }).unwrap();
        assert_eq!(state.dialog.state(), DialogState::Closed);
        assert!(requests(&actions).is_empty());
    }

    #[test]
    fn jump_to_the_last_possible_page_renders() {
        let mut state = state_with(false);
        handle_event(&mut state, &Event::Submit { query: "x".into() }).unwrap();

        let (_, actions) = handle_event(&mut state, &Event::JumpToPage(u64::MAX)).unwrap();
        let request = requests(&actions)[0].clone();
        assert_eq!(request.param("startRecord"), Some(u64::MAX.to_string().as_str()));

        let body = r#"{"channels":[{"totalResults":"8","startIndex":"0","itemsPerPage":"10","items":[{"title":"x","link":"http://x.example/"}]}]}"#;
        let outcome = Event::SearchOutcome(SearchOutcome::Completed {
            ticket: request.ticket.clone(),
            scope: request.scope,
            callback: None,
            body: body.to_string(),
        });
        handle_event(&mut state, &outcome).unwrap();

        let summary = state.compute_viewmodel().button_pane.unwrap().summary;
        assert_eq!(summary.start, u64::MAX);
        assert_eq!(summary.end, u64::MAX);
        assert!(crate::ui::render(&state).visible);
    }

    #[test]
    fn submit_uses_configured_scope() {
        let mut state = state_with(true);
        let (_, actions) = handle_event(&mut state, &Event::Submit { query: "rust".into() }).unwrap();
        assert_eq!(requests(&actions)[0].param("resource"), Some("global"));

        let mut state = state_with(true);
        let (_, actions) = handle_event(&mut state, &key(Key::Other, "rust")).unwrap();
        assert_eq!(requests(&actions)[0].param("resource"), Some("local"));
    }

    #[test]
    fn next_and_prev_follow_the_submit_path() {
        let mut state = state_with(false);
        handle_event(&mut state, &Event::Submit { query: "rust".into() }).unwrap();
        handle_event(&mut state, &key(Key::Other, "rust")).unwrap();

        let (_, actions) = handle_event(&mut state, &Event::Next).unwrap();
        assert_eq!(requests(&actions)[0].param("startRecord"), Some("10"));
        assert!(state.query.submit_guard);

        let (_, actions) = handle_event(&mut state, &Event::Prev).unwrap();
        assert_eq!(requests(&actions)[0].param("startRecord"), Some("0"));

        let (_, actions) = handle_event(&mut state, &Event::JumpToPage(4)).unwrap();
        assert_eq!(requests(&actions)[0].param("startRecord"), Some("30"));
    }

    #[test]
    fn mounted_requests_assets() {
        let mut state = state_with(false);
        let (render, actions) = handle_event(&mut state, &Event::Mounted).unwrap();
        assert!(!render);
        match &actions[..] {
            [Action::LoadAssets(manifest)] => {
                assert!(manifest.stylesheets[0].ends_with("/yacy/ui/css/yacyui-portalsearch.css"));
            }
            other => panic!("unexpected actions {other:?}"),
        }
    }

    #[test]
    fn moving_without_panel_emits_nothing() {
        let mut state = state_with(false);
        let (_, actions) = handle_event(&mut state, &Event::DialogMoved { left: 5, top: 5 }).unwrap();
        assert!(actions.is_empty());
        assert_eq!(state.dialog.geometry().left, 5);
    }
}
