use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::info;

/// Import platform API usage metrics
#[derive(Debug, Default)]
pub struct PlatformApiMetrics {
    pub total_requests: AtomicU64,
    pub errors: AtomicU64,
    pub jobs_completed: AtomicU64,
    pub jobs_failed: AtomicU64,
}

impl PlatformApiMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_request(&self) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_job_completed(&self) {
        self.jobs_completed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_job_failed(&self) {
        self.jobs_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get_stats(&self) -> PlatformApiStats {
        PlatformApiStats {
            total_requests: self.total_requests.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
            jobs_completed: self.jobs_completed.load(Ordering::Relaxed),
            jobs_failed: self.jobs_failed.load(Ordering::Relaxed),
        }
    }

    pub fn log_stats(&self) {
        let stats = self.get_stats();
        info!(
            "Platform API metrics: requests={}, errors={}, jobs_completed={}, jobs_failed={}",
            stats.total_requests, stats.errors, stats.jobs_completed, stats.jobs_failed
        );
    }
}

#[derive(Debug, Clone)]
pub struct PlatformApiStats {
    pub total_requests: u64,
    pub errors: u64,
    pub jobs_completed: u64,
    pub jobs_failed: u64,
}

/// Global metrics instance
static PLATFORM_METRICS: std::sync::LazyLock<PlatformApiMetrics> =
    std::sync::LazyLock::new(PlatformApiMetrics::new);

pub fn platform_metrics() -> &'static PlatformApiMetrics {
    &PLATFORM_METRICS
}

/// Create correlated spans for workflow executions
pub fn create_workflow_span(workflow: &str, correlation_id: &str) -> tracing::Span {
    tracing::info_span!(
        "workflow",
        workflow.name = workflow,
        correlation.id = correlation_id,
        otel.kind = "internal"
    )
}

/// Time an operation and record metrics
pub struct OperationTimer {
    operation: String,
    start: Instant,
}

impl OperationTimer {
    pub fn new(operation: &str) -> Self {
        Self {
            operation: operation.to_string(),
            start: Instant::now(),
        }
    }

    pub fn finish(self) {
        let duration = self.start.elapsed();
        info!(
            operation = %self.operation,
            duration_ms = duration.as_millis(),
            "Operation completed"
        );
    }
}
