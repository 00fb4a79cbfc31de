use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

/// Initialize structured logging for the listener process.
///
/// JSON output with span context gives every remote call a correlatable
/// trail; error detail for failed jobs is expected to be read here, not in
/// the user-facing outcome message.
pub fn init_telemetry() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(true)
                .with_span_list(true),
        )
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    tracing::info!("contact-intake telemetry initialized with structured logging");
    Ok(())
}

/// Generate a correlation ID for linking related operations
pub fn generate_correlation_id() -> String {
    Uuid::new_v4().to_string()
}

/// Create a span with common event-dispatch attributes
pub fn create_event_span(
    topic: &str,
    job_id: Option<&str>,
    correlation_id: Option<&str>,
) -> tracing::Span {
    tracing::info_span!(
        "platform_event",
        event.topic = topic,
        job.id = job_id,
        correlation.id = correlation_id,
        otel.kind = "internal"
    )
}

/// Shutdown telemetry gracefully
pub fn shutdown_telemetry() {
    // For structured logging, no explicit shutdown needed
    tracing::info!("contact-intake telemetry shutdown complete");
}
