//! Prometheus metrics for advisory-service.
//!
//! HTTP request metrics come from the `metrics` facade (see
//! `service_core::middleware::metrics`) and are rendered by the installed
//! Prometheus recorder; advisory-specific series live in a dedicated registry.
//! Recording before [`init_metrics`] is a no-op.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::sync::OnceLock;

pub static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();
pub static REGISTRY: OnceLock<Registry> = OnceLock::new();

pub static ADVISORY_REQUESTS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();
pub static ADVISORY_PROVIDER_LATENCY_SECONDS: OnceLock<HistogramVec> = OnceLock::new();
pub static ADVISORY_PROVIDER_ERRORS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();
pub static ADVISORY_TOKENS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();

/// Install the recorder and register advisory metrics. Call once at startup.
pub fn init_metrics() -> anyhow::Result<()> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("failed to install Prometheus recorder: {}", e))?;

    if METRICS_HANDLE.set(handle).is_err() {
        anyhow::bail!("metrics already initialized");
    }

    let registry = Registry::new();

    // Outcome: advisory, model_error, malformed_reply, timeout
    let requests_total = IntCounterVec::new(
        Opts::new(
            "advisory_requests_total",
            "Total advisory generations by outcome",
        ),
        &["outcome"],
    )?;

    let provider_latency = HistogramVec::new(
        HistogramOpts::new(
            "advisory_provider_latency_seconds",
            "Model provider call latency in seconds",
        )
        .buckets(vec![0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 20.0, 30.0, 60.0]),
        &["model"],
    )?;

    let provider_errors = IntCounterVec::new(
        Opts::new(
            "advisory_provider_errors_total",
            "Model provider errors by type",
        ),
        &["error_type"],
    )?;

    let tokens_total = IntCounterVec::new(
        Opts::new("advisory_tokens_total", "Total tokens processed"),
        &["model", "type"], // type: input, output
    )?;

    registry.register(Box::new(requests_total.clone()))?;
    registry.register(Box::new(provider_latency.clone()))?;
    registry.register(Box::new(provider_errors.clone()))?;
    registry.register(Box::new(tokens_total.clone()))?;

    let _ = ADVISORY_REQUESTS_TOTAL.set(requests_total);
    let _ = ADVISORY_PROVIDER_LATENCY_SECONDS.set(provider_latency);
    let _ = ADVISORY_PROVIDER_ERRORS_TOTAL.set(provider_errors);
    let _ = ADVISORY_TOKENS_TOTAL.set(tokens_total);
    let _ = REGISTRY.set(registry);

    Ok(())
}

/// Get metrics output in Prometheus text format.
pub fn get_metrics() -> String {
    let mut output = METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized\n".to_string());

    if let Some(registry) = REGISTRY.get() {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        if encoder.encode(&registry.gather(), &mut buffer).is_ok() {
            output.push_str(&String::from_utf8_lossy(&buffer));
        }
    }

    output
}

pub fn record_advisory_outcome(outcome: &str) {
    if let Some(counter) = ADVISORY_REQUESTS_TOTAL.get() {
        counter.with_label_values(&[outcome]).inc();
    }
}

pub fn record_provider_latency(model: &str, duration_secs: f64) {
    if let Some(histogram) = ADVISORY_PROVIDER_LATENCY_SECONDS.get() {
        histogram.with_label_values(&[model]).observe(duration_secs);
    }
}

pub fn record_provider_error(error_type: &str) {
    if let Some(counter) = ADVISORY_PROVIDER_ERRORS_TOTAL.get() {
        counter.with_label_values(&[error_type]).inc();
    }
}

pub fn record_tokens(model: &str, input_tokens: i32, output_tokens: i32) {
    if let Some(counter) = ADVISORY_TOKENS_TOTAL.get() {
        counter
            .with_label_values(&[model, "input"])
            .inc_by(input_tokens.max(0) as u64);
        counter
            .with_label_values(&[model, "output"])
            .inc_by(output_tokens.max(0) as u64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_without_init_is_a_no_op() {
        record_advisory_outcome("advisory");
        record_provider_latency("mock", 0.2);
        record_provider_error("api_error");
        record_tokens("mock", 10, 20);
        assert!(get_metrics().starts_with("# Metrics recorder not initialized"));
    }
}
