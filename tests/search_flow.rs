use portalsearch::client::{SearchOutcome, SearchRequest, SearchWorker, Transport};
use portalsearch::domain::HostForm;
use portalsearch::ui::render;
use portalsearch::{handle_event, initialize, Action, AppState, DialogState, Event, Key, PartialConfig, Result};
use std::sync::{Arc, Mutex};
use std::time::Duration;

const WEATHER_CHANNEL: &str = r#"{"totalResults":"1,234","startIndex":"0","itemsPerPage":"10","items":[
    {"title":"Weather Radar","link":"http://radar.example/","description":"Live radar","pubDate":"Tue, 06 Feb 2024 08:30:00 +0000","sizename":"12 kbyte"},
    null,
    {"title":"Forecast","link":"http://forecast.example/","description":"Seven days","pubDate":"Wed, 07 Feb 2024 10:00:00 +0000","sizename":"8 kbyte"}
]}"#;

fn direct_body() -> String {
    format!(r#"{{"channels":[{WEATHER_CHANNEL}]}}"#)
}

fn wrapped_body() -> String {
    format!(r#"[{{"channels":[{WEATHER_CHANNEL}]}}]"#)
}

/// Answers every request with a fixed body and records the parameters it saw.
struct CannedTransport {
    body: String,
    seen: Mutex<Vec<Vec<(String, String)>>>,
}

impl CannedTransport {
    fn new(body: String) -> Self {
        Self {
            body,
            seen: Mutex::new(Vec::new()),
        }
    }
}

impl Transport for CannedTransport {
    fn get(&self, _endpoint: &str, params: &[(String, String)], _timeout: Duration) -> Result<String> {
        self.seen.lock().unwrap().push(params.to_vec());
        Ok(self.body.clone())
    }
}

fn overlay() -> AppState {
    let config = PartialConfig::with_url("http://peer.example:8090").resolve().unwrap();
    let form = HostForm::new("query")
        .with_field("query", "")
        .with_field("maximumRecords", "10")
        .with_field("resource", "local");
    initialize(&config, form)
}

fn issued(actions: &[Action]) -> SearchRequest {
    actions
        .iter()
        .find_map(|action| match action {
            Action::IssueRequest(request) => Some(request.clone()),
            _ => None,
        })
        .expect("a request was issued")
}

fn search_with(body: String) -> (AppState, Arc<CannedTransport>) {
    let transport = Arc::new(CannedTransport::new(body));
    let (worker, _outcomes) = SearchWorker::new(transport.clone());
    let mut state = overlay();

    let (_, actions) = handle_event(&mut state, &Event::Submit { query: "weather".into() }).unwrap();
    let outcome = worker.execute(issued(&actions));
    handle_event(&mut state, &Event::SearchOutcome(outcome)).unwrap();

    (state, transport)
}

#[test]
fn weather_search_end_to_end() {
    let (state, transport) = search_with(direct_body());

    let seen = transport.seen.lock().unwrap();
    let params = &seen[0];
    assert!(params.contains(&("query".to_string(), "weather".to_string())));
    assert!(params.contains(&("startRecord".to_string(), "0".to_string())));

    assert_eq!(state.dialog.state(), DialogState::Open);
    let view = state.compute_viewmodel();
    assert_eq!(
        view.button_pane.unwrap().summary.text(),
        "Displaying result 1 to 10 of 1234 local results."
    );

    let overlay = render(&state);
    assert!(overlay.visible);
    assert!(overlay.body.contains("<a href='http://radar.example/' target='_blank'>Weather Radar</a>"));
    assert!(overlay.body.contains("<p class='date'>Tue, 06 Feb 2024 | 12 kbyte</p>"));
    assert!(overlay.body.contains("Forecast"));
    assert_eq!(overlay.button_pane.matches("class='ybpane'").count(), 2);
    assert!(overlay.side_panel.is_some());
}

#[test]
fn direct_and_wrapped_payloads_render_identically() {
    let (direct, _) = search_with(direct_body());
    let (wrapped, _) = search_with(wrapped_body());

    assert_eq!(render(&direct), render(&wrapped));
}

#[test]
fn jsonp_wrapped_body_is_unwrapped() {
    let transport = Arc::new(CannedTransport::new(format!("portal({});", direct_body())));
    let (worker, _outcomes) = SearchWorker::new(transport.clone());

    let mut partial = PartialConfig::with_url("http://peer.example:8090");
    partial.jsonp_callback = Some("portal".to_string());
    let mut state = initialize(&partial.resolve().unwrap(), HostForm::new("query"));

    let (_, actions) = handle_event(&mut state, &Event::Submit { query: "weather".into() }).unwrap();
    let request = issued(&actions);
    assert_eq!(request.param("callback"), Some("portal"));

    handle_event(&mut state, &Event::SearchOutcome(worker.execute(request))).unwrap();
    assert_eq!(state.dialog.state(), DialogState::Open);
    assert_eq!(state.results.as_ref().unwrap().total, 1234);
}

#[test]
fn follow_up_searches_replace_the_summary() {
    let transport = Arc::new(CannedTransport::new(direct_body()));
    let (worker, _outcomes) = SearchWorker::new(transport);
    let mut state = overlay();

    for event in [
        Event::Submit { query: "weather".into() },
        Event::KeyUp { key: Key::PageDown, query: "weather".into() },
    ] {
        let (_, actions) = handle_event(&mut state, &event).unwrap();
        if let Some(request) = actions.iter().find_map(|a| match a {
            Action::IssueRequest(r) => Some(r.clone()),
            _ => None,
        }) {
            handle_event(&mut state, &Event::SearchOutcome(worker.execute(request))).unwrap();
        }
    }

    // The PageDown release followed the submit, so the guard swallowed it.
    assert_eq!(state.query.start_record, 10);
    let (_, actions) = handle_event(&mut state, &Event::KeyUp { key: Key::PageDown, query: "weather".into() }).unwrap();
    handle_event(&mut state, &Event::SearchOutcome(worker.execute(issued(&actions)))).unwrap();

    let overlay = render(&state);
    assert_eq!(overlay.button_pane.matches("Displaying result").count(), 1);
    assert!(overlay.button_pane.contains("Displaying result 21 to 30"));
}

#[test]
fn empty_query_always_closes() {
    let (mut state, _) = search_with(direct_body());

    let (_, actions) = handle_event(&mut state, &Event::KeyUp { key: Key::Other, query: String::new() }).unwrap();
    assert_eq!(state.dialog.state(), DialogState::Closed);
    assert!(actions.contains(&Action::ClearQueryField));
    assert!(actions.contains(&Action::RemoveSidePanel));
    assert!(!actions.iter().any(|a| matches!(a, Action::IssueRequest(_))));

    let (_, actions) = handle_event(&mut state, &Event::Submit { query: String::new() }).unwrap();
    assert_eq!(state.dialog.state(), DialogState::Closed);
    assert!(actions.is_empty());
    assert!(!render(&state).visible);
}

#[test]
fn failed_request_can_be_retried() {
    let mut state = overlay();
    let (_, actions) = handle_event(&mut state, &Event::Submit { query: "weather".into() }).unwrap();
    let request = issued(&actions);

    handle_event(
        &mut state,
        &Event::SearchOutcome(SearchOutcome::Failed {
            ticket: request.ticket.clone(),
            message: "connection refused".to_string(),
        }),
    )
    .unwrap();
    assert_eq!(state.dialog.state(), DialogState::Error);
    assert!(render(&state).body.contains("class='yretry'"));

    let (_, actions) = handle_event(&mut state, &Event::Retry).unwrap();
    let retried = issued(&actions);
    assert_eq!(state.dialog.state(), DialogState::Loading);

    let transport = CannedTransport::new(direct_body());
    let (worker, _outcomes) = SearchWorker::new(Arc::new(transport));
    handle_event(&mut state, &Event::SearchOutcome(worker.execute(retried))).unwrap();
    assert_eq!(state.dialog.state(), DialogState::Open);
}
