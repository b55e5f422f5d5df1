//! Builds search requests from the host form and the overlay's query state.

use crate::client::messages::{RequestTicket, SearchRequest, TraceContext};
use crate::domain::form::RESOURCE_FIELD;
use crate::domain::{HostForm, QueryState, Scope};
use crate::Config;

/// Path of the search endpoint, appended to the configured base URL.
pub const SEARCH_ENDPOINT: &str = "/yacysearch.json";

/// Parameter carrying the pagination offset.
pub const START_RECORD_PARAM: &str = "startRecord";

/// Parameter carrying the JSONP callback name.
pub const CALLBACK_PARAM: &str = "callback";

/// Builds the request for one search.
///
/// Every form input is emitted in order. The `resource` input is forced to
/// `global` when its own value is `global` or when `requested` is global; in
/// both cases the request's effective scope is global. A local request never
/// downgrades an explicit global `resource`. `startRecord` follows the form
/// inputs, then `callback` when JSONP is configured.
///
/// # Examples
///
/// ```
/// use portalsearch::client::request::build_request;
/// use portalsearch::domain::{HostForm, QueryState, Scope};
/// use portalsearch::PartialConfig;
///
/// let config = PartialConfig::with_url("http://localhost:8090").resolve().unwrap();
/// let form = HostForm::new("query")
///     .with_field("query", "weather")
///     .with_field("resource", "local");
/// let request = build_request(&config, &form, &QueryState::new(10), Scope::Global, 1);
///
/// assert_eq!(request.endpoint, "http://localhost:8090/yacysearch.json");
/// assert_eq!(request.param("resource"), Some("global"));
/// assert_eq!(request.param("startRecord"), Some("0"));
/// ```
#[must_use]
pub fn build_request(
    config: &Config,
    form: &HostForm,
    query: &QueryState,
    requested: Scope,
    seq: u64,
) -> SearchRequest {
    let mut scope = requested;

    let mut params: Vec<(String, String)> = form
        .fields
        .iter()
        .map(|field| {
            if field.name == RESOURCE_FIELD {
                if field.value == Scope::Global.as_str() {
                    scope = Scope::Global;
                }
                if scope.is_global() {
                    return (field.name.clone(), Scope::Global.as_str().to_string());
                }
            }
            (field.name.clone(), field.value.clone())
        })
        .collect();

    params.push((START_RECORD_PARAM.to_string(), query.start_record.to_string()));

    if let Some(callback) = &config.jsonp_callback {
        params.push((CALLBACK_PARAM.to_string(), callback.clone()));
    }

    let mut snapshot = query.clone();
    snapshot.scope = scope;

    tracing::debug!(
        seq,
        scope = %scope,
        start_record = query.start_record,
        param_count = params.len(),
        "built search request"
    );

    SearchRequest {
        ticket: RequestTicket { seq, query: snapshot },
        endpoint: format!("{}{SEARCH_ENDPOINT}", config.url),
        params,
        scope,
        callback: config.jsonp_callback.clone(),
        trace_context: TraceContext::from_current(),
    }
}
