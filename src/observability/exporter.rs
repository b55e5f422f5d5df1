//! OpenTelemetry span exporter writing JSON lines to a rotating file.

use super::file_writer::RotatingWriter;
use super::record::SpanRecord;
use futures_util::future::BoxFuture;
use opentelemetry::trace::TraceError;
use opentelemetry_sdk::export::trace::{ExportResult, SpanData, SpanExporter};
use opentelemetry_sdk::resource::Resource;
use opentelemetry_sdk::trace::TracerProvider;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug)]
struct JsonLinesExporter {
    service: String,
    writer: RotatingWriter,
    is_shutdown: AtomicBool,
}

impl JsonLinesExporter {
    fn write_batch(&self, batch: &[SpanData]) -> Result<(), TraceError> {
        for span in batch {
            let record = SpanRecord::from_span(&self.service, span);
            let line = serde_json::to_string(&record).map_err(|e| TraceError::from(e.to_string()))?;
            self.writer
                .write_line(&line)
                .map_err(|e| TraceError::from(e.to_string()))?;
        }
        Ok(())
    }
}

impl SpanExporter for JsonLinesExporter {
    fn export(&mut self, batch: Vec<SpanData>) -> BoxFuture<'static, ExportResult> {
        let result = if self.is_shutdown.load(Ordering::SeqCst) {
            Err(TraceError::from("exporter is shut down"))
        } else {
            self.write_batch(&batch)
        };
        Box::pin(std::future::ready(result))
    }

    fn shutdown(&mut self) {
        self.is_shutdown.store(true, Ordering::SeqCst);
    }
}

/// Builds a provider that exports every finished span synchronously to `file_path`.
pub fn create_tracer_provider(service: &str, file_path: PathBuf, resource: Resource) -> TracerProvider {
    let exporter = JsonLinesExporter {
        service: service.to_string(),
        writer: RotatingWriter::new(file_path),
        is_shutdown: AtomicBool::new(false),
    };

    TracerProvider::builder()
        .with_config(opentelemetry_sdk::trace::Config::default().with_resource(resource))
        .with_simple_exporter(exporter)
        .build()
}
