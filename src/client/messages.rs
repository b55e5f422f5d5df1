//! Request and outcome types exchanged with the search worker.
//!
//! A [`SearchRequest`] leaves the event handler as an action, is executed on a
//! worker thread, and comes back as a [`SearchOutcome`] event. Both carry the
//! request's [`RequestTicket`] so the handler can fence stale answers. Requests
//! also carry the caller's trace context so worker spans join the same trace.

use crate::domain::{QueryState, Scope};
use serde::{Deserialize, Serialize};

/// Distributed tracing context for cross-thread span propagation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceContext {
    /// OpenTelemetry trace ID as a hex string.
    pub trace_id: String,

    /// Parent span ID for linking spans across threads.
    pub parent_span_id: String,
}

impl TraceContext {
    /// Captures the trace and span IDs of the active span.
    ///
    /// Returns `None` when no valid OpenTelemetry span is active, which is the
    /// case whenever tracing has not been initialized.
    pub fn from_current() -> Option<Self> {
        use opentelemetry::trace::TraceContextExt;
        use tracing_opentelemetry::OpenTelemetrySpanExt;

        let span = tracing::Span::current();
        let otel_context = span.context();
        let span_ref = otel_context.span();
        let span_context = span_ref.span_context();

        if !span_context.is_valid() {
            return None;
        }

        Some(Self {
            trace_id: format!("{:032x}", span_context.trace_id()),
            parent_span_id: format!("{:016x}", span_context.span_id()),
        })
    }
}

/// Identity of one issued request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestTicket {
    /// Monotonically increasing per overlay instance, starting at 1.
    pub seq: u64,

    /// Query state at the moment the request was issued.
    pub query: QueryState,
}

/// A fully built search request, ready for a transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub ticket: RequestTicket,

    /// Endpoint without query string, e.g. `http://peer:8090/yacysearch.json`.
    pub endpoint: String,

    /// Query parameters in emission order.
    pub params: Vec<(String, String)>,

    /// Effective scope after the `resource` rule was applied.
    pub scope: Scope,

    /// JSONP callback name the body is wrapped in, if any.
    pub callback: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_context: Option<TraceContext>,
}

impl SearchRequest {
    #[must_use]
    pub const fn seq(&self) -> u64 {
        self.ticket.seq
    }

    /// Value of the first parameter named `name`.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Result of executing one [`SearchRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchOutcome {
    /// The service answered with a success status.
    Completed {
        ticket: RequestTicket,
        scope: Scope,
        callback: Option<String>,
        /// Raw response body, not yet normalized.
        body: String,
    },

    /// The request failed before a usable answer arrived.
    Failed {
        ticket: RequestTicket,
        message: String,
    },

    /// The request exceeded the client-side timeout.
    TimedOut {
        ticket: RequestTicket,
        after_secs: u64,
    },
}

impl SearchOutcome {
    #[must_use]
    pub const fn ticket(&self) -> &RequestTicket {
        match self {
            Self::Completed { ticket, .. }
            | Self::Failed { ticket, .. }
            | Self::TimedOut { ticket, .. } => ticket,
        }
    }

    #[must_use]
    pub const fn seq(&self) -> u64 {
        self.ticket().seq
    }
}
