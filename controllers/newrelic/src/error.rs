//! Controller-specific error types.
//!
//! This module defines error types specific to the New Relic provider
//! that are not covered by upstream library errors.

use kube::Error as KubeError;
use kube_runtime::finalizer::Error as FinalizerError;
use newrelic_client::NewRelicError;
use thiserror::Error;

/// Errors that can occur in the New Relic provider.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// Kubernetes API error
    #[error("Kubernetes error: {0}")]
    Kube(#[from] KubeError),

    /// New Relic API error
    #[error("{0}")]
    NewRelic(#[from] NewRelicError),

    /// JSON serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid configuration (environment, ProviderConfig or credentials)
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A cross-resource reference cannot be resolved yet
    #[error("Cannot resolve reference: {0}")]
    Reference(String),

    /// Finalizer add/remove or the wrapped reconcile failed
    #[error("Finalizer error: {0}")]
    Finalizer(#[source] Box<FinalizerError<ControllerError>>),

    /// Resource watch failed
    #[error("Resource watch failed: {0}")]
    Watch(String),

    /// Metric registration or encoding failed
    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    /// Metrics/probe server I/O failed
    #[error("Server error: {0}")]
    Server(#[from] std::io::Error),
}

impl ControllerError {
    /// True when the underlying New Relic error means the resource is gone.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ControllerError::NewRelic(e) if e.is_not_found())
    }
}
