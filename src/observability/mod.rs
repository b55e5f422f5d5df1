//! OpenTelemetry tracing with file export.
//!
//! ```text
//! tracing → tracing-opentelemetry → OpenTelemetry SDK → JsonLinesExporter → rotating .jsonl file
//! ```
//!
//! Spans land in `portalsearch-trace.jsonl` under the platform data directory
//! (override with `PORTALSEARCH_DATA_DIR`), one JSON object per span. The file
//! rotates at 5 MB and three backups are kept.
//!
//! Worker threads join the submitting span's trace through the
//! [`TraceContext`](crate::client::TraceContext) carried on each request.
//!
//! Level resolution: `RUST_LOG`, then `trace_level` from the configuration, then
//! `info`.
//!
//! ```rust,no_run
//! use portalsearch::observability::init_tracing;
//! use portalsearch::PartialConfig;
//!
//! let mut partial = PartialConfig::with_url("http://localhost:8090");
//! partial.trace_level = Some("debug".to_string());
//! init_tracing(&partial.resolve()?);
//!
//! tracing::debug!("tracing is now active");
//! # Ok::<(), portalsearch::PortalSearchError>(())
//! ```

mod exporter;
mod file_writer;
mod init;
mod record;

pub use file_writer::RotatingWriter;
pub use init::{init_tracing, init_tracing_in, TRACE_FILE_NAME};
