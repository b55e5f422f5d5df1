//! Out-of-order responses: a slow request for an older prefix answering after a
//! newer one.

use portalsearch::client::{SearchOutcome, SearchRequest};
use portalsearch::domain::HostForm;
use portalsearch::{handle_event, initialize, Action, AppState, DialogState, Event, Key, PartialConfig};

fn overlay(fenced: bool) -> AppState {
    let mut partial = PartialConfig::with_url("http://peer.example");
    partial.fence_responses = Some(fenced);
    initialize(
        &partial.resolve().unwrap(),
        HostForm::new("query").with_field("query", "").with_field("maximumRecords", "10"),
    )
}

fn type_query(state: &mut AppState, query: &str) -> SearchRequest {
    let (_, actions) = handle_event(
        state,
        &Event::KeyUp {
            key: Key::Other,
            query: query.to_string(),
        },
    )
    .unwrap();
    actions
        .into_iter()
        .find_map(|action| match action {
            Action::IssueRequest(request) => Some(request),
            _ => None,
        })
        .unwrap()
}

fn answer(request: &SearchRequest, title: &str, total: &str) -> Event {
    let body = format!(
        r#"{{"channels":[{{"totalResults":"{total}","startIndex":"0","itemsPerPage":"10","items":[{{"title":"{title}","link":"http://{title}.example/"}}]}}]}}"#
    );
    Event::SearchOutcome(SearchOutcome::Completed {
        ticket: request.ticket.clone(),
        scope: request.scope,
        callback: None,
        body,
    })
}

fn shown_titles(state: &AppState) -> Vec<String> {
    state
        .results
        .as_ref()
        .map(|page| page.response.items.iter().map(|item| item.title.clone()).collect())
        .unwrap_or_default()
}

#[test]
fn fenced_overlay_keeps_the_newest_answer() {
    let mut state = overlay(true);
    let older = type_query(&mut state, "weat");
    let newer = type_query(&mut state, "weather");

    let (render, _) = handle_event(&mut state, &answer(&newer, "weather", "40")).unwrap();
    assert!(render);
    let (render, actions) = handle_event(&mut state, &answer(&older, "weat", "7")).unwrap();
    assert!(!render);
    assert!(actions.is_empty());

    assert_eq!(state.dialog.state(), DialogState::Open);
    assert_eq!(shown_titles(&state), vec!["weather"]);
    assert_eq!(state.results.as_ref().unwrap().total, 40);
}

#[test]
fn fenced_overlay_ignores_older_answer_while_loading() {
    let mut state = overlay(true);
    let older = type_query(&mut state, "weat");
    let _newer = type_query(&mut state, "weather");

    handle_event(&mut state, &answer(&older, "weat", "7")).unwrap();
    assert_eq!(state.dialog.state(), DialogState::Loading);
    assert!(state.results.is_none());
}

#[test]
fn unfenced_overlay_shows_the_stale_answer() {
    let mut state = overlay(false);
    let older = type_query(&mut state, "weat");
    let newer = type_query(&mut state, "weather");

    handle_event(&mut state, &answer(&newer, "weather", "40")).unwrap();
    handle_event(&mut state, &answer(&older, "weat", "7")).unwrap();

    assert_eq!(state.dialog.state(), DialogState::Open);
    assert_eq!(shown_titles(&state), vec!["weat"]);
    assert_eq!(state.query.query, "weather");
}

#[test]
fn answers_after_close_never_reopen_the_popup() {
    for fenced in [true, false] {
        let mut state = overlay(fenced);
        let request = type_query(&mut state, "weather");
        handle_event(&mut state, &Event::CloseDialog).unwrap();

        handle_event(&mut state, &answer(&request, "weather", "40")).unwrap();
        assert_eq!(state.dialog.state(), DialogState::Closed, "fenced={fenced}");
        assert!(state.dialog.side_panel().is_none());
    }
}

#[test]
fn unfenced_stale_failure_does_not_stick_in_error() {
    let mut state = overlay(false);
    let older = type_query(&mut state, "we");
    let newer = type_query(&mut state, "weather");

    handle_event(
        &mut state,
        &Event::SearchOutcome(SearchOutcome::Failed {
            ticket: older.ticket.clone(),
            message: "connection reset".to_string(),
        }),
    )
    .unwrap();
    assert_eq!(state.dialog.state(), DialogState::Error);

    let (render, _) = handle_event(&mut state, &answer(&newer, "weather", "40")).unwrap();
    assert!(render);
    assert_eq!(state.dialog.state(), DialogState::Open);
    assert!(state.error.is_none());

    let overlay = portalsearch::ui::render(&state);
    assert!(!overlay.body.contains("yerror"));
    assert!(!overlay.body.contains("yretry"));
    assert!(overlay.body.contains("weather"));
}
