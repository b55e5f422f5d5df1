//! Background execution of search requests.
//!
//! [`SearchWorker`] runs each request on its own thread so the host's event loop
//! never blocks on the network. Outcomes are posted on a channel and the host
//! feeds them back into the overlay as events. There is no cancellation: a
//! request that is no longer wanted still completes and is discarded by the
//! handler's sequence fencing.

use crate::client::messages::{SearchOutcome, SearchRequest, TraceContext};
use crate::domain::error::{PortalSearchError, Result};
use crossbeam_channel::{Receiver, Sender};
use std::sync::Arc;
use std::time::Duration;

/// Fixed client-side timeout for one search request.
pub const REQUEST_TIMEOUT_SECS: u64 = 15;

/// Performs a GET against the search service.
///
/// The trait is the seam between the worker and the network stack; tests and
/// embedders can substitute their own implementation.
pub trait Transport: Send + Sync {
    /// Fetches `endpoint` with `params` and returns the response body.
    ///
    /// # Errors
    ///
    /// Returns [`PortalSearchError::Timeout`] when `timeout` elapses and
    /// [`PortalSearchError::Network`] for any other failure, including non-success
    /// status codes.
    fn get(&self, endpoint: &str, params: &[(String, String)], timeout: Duration) -> Result<String>;
}

/// HTTP transport backed by a blocking `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    /// Builds a client with the fixed request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`PortalSearchError::Network`] if the TLS backend cannot be
    /// initialized.
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(concat!("portalsearch/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| PortalSearchError::Network(format!("building http client: {e}")))?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn get(&self, endpoint: &str, params: &[(String, String)], timeout: Duration) -> Result<String> {
        let response = self
            .client
            .get(endpoint)
            .query(params)
            .timeout(timeout)
            .send()
            .map_err(|e| classify(&e, timeout))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PortalSearchError::Network(format!("search service returned {status}")));
        }

        response.text().map_err(|e| classify(&e, timeout))
    }
}

fn classify(error: &reqwest::Error, timeout: Duration) -> PortalSearchError {
    if error.is_timeout() {
        PortalSearchError::Timeout(timeout.as_secs())
    } else {
        PortalSearchError::Network(error.to_string())
    }
}

/// Executes requests off the caller's thread and reports outcomes on a channel.
#[derive(Clone)]
pub struct SearchWorker {
    transport: Arc<dyn Transport>,
    timeout: Duration,
    outcomes: Sender<SearchOutcome>,
}

impl SearchWorker {
    /// Creates a worker and the receiver its outcomes arrive on.
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> (Self, Receiver<SearchOutcome>) {
        let (outcomes, receiver) = crossbeam_channel::unbounded();
        let worker = Self {
            transport,
            timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            outcomes,
        };
        (worker, receiver)
    }

    /// Overrides the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Starts `request` on a new thread.
    pub fn dispatch(&self, request: SearchRequest) -> std::thread::JoinHandle<()> {
        let worker = self.clone();
        std::thread::spawn(move || {
            let outcome = worker.execute(request);
            if worker.outcomes.send(outcome).is_err() {
                tracing::debug!("outcome receiver dropped, discarding search outcome");
            }
        })
    }

    /// Runs `request` on the current thread.
    pub fn execute(&self, request: SearchRequest) -> SearchOutcome {
        let _context_guard = attach_parent_trace_context(request.trace_context.as_ref());

        let span = tracing::debug_span!(
            "search_request",
            seq = request.seq(),
            endpoint = %request.endpoint,
            scope = %request.scope
        );
        let _guard = span.entered();

        match self.transport.get(&request.endpoint, &request.params, self.timeout) {
            Ok(body) => {
                tracing::debug!(body_len = body.len(), "search request completed");
                SearchOutcome::Completed {
                    ticket: request.ticket,
                    scope: request.scope,
                    callback: request.callback,
                    body,
                }
            }
            Err(PortalSearchError::Timeout(after_secs)) => {
                tracing::debug!(after_secs, "search request timed out");
                SearchOutcome::TimedOut {
                    ticket: request.ticket,
                    after_secs,
                }
            }
            Err(e) => {
                tracing::debug!(error = %e, "search request failed");
                SearchOutcome::Failed {
                    ticket: request.ticket,
                    message: e.to_string(),
                }
            }
        }
    }
}

impl std::fmt::Debug for SearchWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchWorker")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// Re-attaches the issuing span as remote parent on the worker thread.
///
/// Returns a guard that must be held while the request runs.
fn attach_parent_trace_context(trace_context: Option<&TraceContext>) -> Option<opentelemetry::ContextGuard> {
    use opentelemetry::trace::{SpanContext, SpanId, TraceContextExt, TraceFlags, TraceId, TraceState};

    let trace_context = trace_context?;
    let trace_id = TraceId::from_hex(&trace_context.trace_id).ok()?;
    let span_id = SpanId::from_hex(&trace_context.parent_span_id).ok()?;

    let span_context = SpanContext::new(trace_id, span_id, TraceFlags::SAMPLED, true, TraceState::default());
    let otel_context = opentelemetry::Context::current().with_remote_span_context(span_context);

    Some(otel_context.attach())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::messages::RequestTicket;
    use crate::domain::{QueryState, Scope};
    use std::sync::Mutex;

    struct ScriptedTransport {
        answer: Mutex<Option<Result<String>>>,
        seen: Mutex<Vec<(String, Vec<(String, String)>)>>,
    }

    impl ScriptedTransport {
        fn new(answer: Result<String>) -> Self {
            Self {
                answer: Mutex::new(Some(answer)),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl Transport for ScriptedTransport {
        fn get(&self, endpoint: &str, params: &[(String, String)], _timeout: Duration) -> Result<String> {
            self.seen.lock().unwrap().push((endpoint.to_string(), params.to_vec()));
            self.answer.lock().unwrap().take().unwrap()
        }
    }

    fn request(seq: u64) -> SearchRequest {
        SearchRequest {
            ticket: RequestTicket {
                seq,
                query: QueryState::new(10),
            },
            endpoint: "http://peer.example/yacysearch.json".to_string(),
            params: vec![("query".to_string(), "weather".to_string())],
            scope: Scope::Local,
            callback: None,
            trace_context: None,
        }
    }

    #[test]
    fn completed_outcome_carries_body_and_ticket() {
        let transport = Arc::new(ScriptedTransport::new(Ok("{}".to_string())));
        let (worker, _rx) = SearchWorker::new(transport.clone());

        let outcome = worker.execute(request(3));
        match outcome {
            SearchOutcome::Completed { ticket, body, scope, .. } => {
                assert_eq!(ticket.seq, 3);
                assert_eq!(body, "{}");
                assert_eq!(scope, Scope::Local);
            }
            other => panic!("unexpected outcome {other:?}"),
        }

        let seen = transport.seen.lock().unwrap();
        assert_eq!(seen[0].0, "http://peer.example/yacysearch.json");
        assert_eq!(seen[0].1, vec![("query".to_string(), "weather".to_string())]);
    }

    #[test]
    fn timeout_maps_to_timed_out() {
        let transport = Arc::new(ScriptedTransport::new(Err(PortalSearchError::Timeout(15))));
        let (worker, _rx) = SearchWorker::new(transport);
        assert_eq!(
            worker.execute(request(1)),
            SearchOutcome::TimedOut {
                ticket: request(1).ticket,
                after_secs: 15
            }
        );
    }

    #[test]
    fn network_error_maps_to_failed() {
        let transport = Arc::new(ScriptedTransport::new(Err(PortalSearchError::Network(
            "connection refused".to_string(),
        ))));
        let (worker, _rx) = SearchWorker::new(transport);
        match worker.execute(request(2)) {
            SearchOutcome::Failed { ticket, message } => {
                assert_eq!(ticket.seq, 2);
                assert!(message.contains("connection refused"));
            }
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn dispatch_posts_outcome_on_channel() {
        let transport = Arc::new(ScriptedTransport::new(Ok("[]".to_string())));
        let (worker, rx) = SearchWorker::new(transport);

        worker.dispatch(request(9)).join().unwrap();
        let outcome = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(outcome.seq(), 9);
    }
}
