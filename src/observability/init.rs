//! Tracing subscriber setup.

use super::exporter;
use crate::Config;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::resource::Resource;
use std::path::Path;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const SERVICE_NAME: &str = "portalsearch";

/// Name of the live trace file inside the data directory.
pub const TRACE_FILE_NAME: &str = "portalsearch-trace.jsonl";

/// Installs the global subscriber, exporting spans to the platform data
/// directory.
///
/// The filter comes from `RUST_LOG` when set, otherwise from
/// `config.trace_level`, otherwise `info`. Observability is optional: when the
/// data directory cannot be resolved or created nothing is installed. Only the
/// first successful call in a process takes effect.
///
/// Returns whether a subscriber was installed by this call.
pub fn init_tracing(config: &Config) -> bool {
    match crate::infrastructure::paths::get_data_dir() {
        Ok(dir) => init_tracing_in(&dir, config.trace_level.as_deref()),
        Err(_) => false,
    }
}

/// Like [`init_tracing`] but writes the trace file into `dir`.
pub fn init_tracing_in(dir: &Path, level: Option<&str>) -> bool {
    if std::fs::create_dir_all(dir).is_err() {
        return false;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.unwrap_or("info")));

    let resource = Resource::new(vec![opentelemetry::KeyValue::new("service.name", SERVICE_NAME)]);
    let provider = exporter::create_tracer_provider(SERVICE_NAME, dir.join(TRACE_FILE_NAME), resource);
    let tracer = provider.tracer(SERVICE_NAME);

    tracing_subscriber::registry()
        .with(filter)
        .with(OpenTelemetryLayer::new(tracer))
        .try_init()
        .is_ok()
}
