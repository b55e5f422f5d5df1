//! Remote search client.
//!
//! # Architecture
//!
//! - `request`: builds [`SearchRequest`]s from the host form and query state
//! - `messages`: request/outcome protocol with trace context propagation
//! - `handler`: background worker and the HTTP transport

pub mod handler;
pub mod messages;
pub mod request;

pub use handler::{HttpTransport, SearchWorker, Transport, REQUEST_TIMEOUT_SECS};
pub use messages::{RequestTicket, SearchOutcome, SearchRequest, TraceContext};
pub use request::build_request;
