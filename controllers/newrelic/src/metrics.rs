//! Prometheus metrics and the probe/metrics HTTP server.
//!
//! # Metrics
//!
//! - `newrelic_provider_reconciliations_total{kind,result}` - reconciles by outcome
//! - `newrelic_provider_external_calls_total{kind,operation}` - create/update/delete calls to New Relic
//! - `newrelic_provider_reconcile_duration_seconds{kind}` - reconcile latency

use crate::error::ControllerError;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use prometheus::{CounterVec, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

/// Buckets for reconcile durations (in seconds). New Relic round trips dominate.
const RECONCILE_DURATION_BUCKETS: &[f64] = &[0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0];

pub struct Metrics {
    registry: Registry,
    /// Reconciles by kind and result (`success` or `error`).
    pub reconciliations: CounterVec,
    /// External calls by kind and operation.
    pub external_calls: CounterVec,
    pub reconcile_duration: HistogramVec,
}

impl Metrics {
    pub fn new() -> Result<Self, ControllerError> {
        let registry = Registry::new();

        let reconciliations = CounterVec::new(
            Opts::new("newrelic_provider_reconciliations_total", "Total reconciliations"),
            &["kind", "result"],
        )?;
        let external_calls = CounterVec::new(
            Opts::new(
                "newrelic_provider_external_calls_total",
                "Create, update and delete calls made to New Relic",
            ),
            &["kind", "operation"],
        )?;
        let reconcile_duration = HistogramVec::new(
            HistogramOpts::new("newrelic_provider_reconcile_duration_seconds", "Reconcile duration")
                .buckets(RECONCILE_DURATION_BUCKETS.to_vec()),
            &["kind"],
        )?;

        registry.register(Box::new(reconciliations.clone()))?;
        registry.register(Box::new(external_calls.clone()))?;
        registry.register(Box::new(reconcile_duration.clone()))?;

        Ok(Self {
            registry,
            reconciliations,
            external_calls,
            reconcile_duration,
        })
    }

    pub fn record_reconcile(&self, kind: &str, success: bool, seconds: f64) {
        let result = if success { "success" } else { "error" };
        self.reconciliations.with_label_values(&[kind, result]).inc();
        self.reconcile_duration.with_label_values(&[kind]).observe(seconds);
    }

    pub fn record_external_call(&self, kind: &str, operation: &str) {
        self.external_calls.with_label_values(&[kind, operation]).inc();
    }

    /// Text exposition format.
    pub fn encode(&self) -> Result<String, ControllerError> {
        Ok(TextEncoder::new().encode_to_string(&self.registry.gather())?)
    }
}

async fn metrics_handler(State(metrics): State<Arc<Metrics>>) -> (StatusCode, String) {
    match metrics.encode() {
        Ok(body) => (StatusCode::OK, body),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}

pub fn router(metrics: Arc<Metrics>) -> Router {
    Router::new()
        .route("/healthz", get(|| async { "ok" }))
        .route("/readyz", get(|| async { "ok" }))
        .route("/metrics", get(metrics_handler))
        .with_state(metrics)
}

/// Serve probes and metrics until the listener fails.
pub async fn serve(addr: SocketAddr, metrics: Arc<Metrics>) -> Result<(), ControllerError> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Metrics server listening on {}", addr);
    axum::serve(listener, router(metrics)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recorded_metrics_are_encoded() {
        let metrics = Metrics::new().expect("metrics");
        metrics.record_reconcile("Dashboard", true, 0.2);
        metrics.record_reconcile("Dashboard", false, 1.5);
        metrics.record_external_call("AlertsPolicy", "create");

        let text = metrics.encode().expect("encode");

        assert!(text.contains(r#"newrelic_provider_reconciliations_total{kind="Dashboard",result="success"} 1"#));
        assert!(text.contains(r#"newrelic_provider_reconciliations_total{kind="Dashboard",result="error"} 1"#));
        assert!(text.contains(r#"newrelic_provider_external_calls_total{kind="AlertsPolicy",operation="create"} 1"#));
        assert!(text.contains(r#"newrelic_provider_reconcile_duration_seconds_count{kind="Dashboard"} 2"#));
    }

    #[test]
    fn registries_are_independent() {
        let first = Metrics::new().expect("metrics");
        let second = Metrics::new().expect("metrics");
        first.record_external_call("Dashboard", "delete");

        let text = second.encode().expect("encode");
        assert!(!text.contains(r#"operation="delete""#));
    }
}
