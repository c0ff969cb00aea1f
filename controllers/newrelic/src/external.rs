//! The four-operation interface every New Relic resource adapter implements.
//!
//! An adapter owns a short-lived New Relic client and works on a mutable copy
//! of the custom resource. Identifier write-backs land on that copy; the
//! managed reconciler decides whether to persist them.

use crate::error::ControllerError;
use async_trait::async_trait;

/// Result of observing the external resource.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExternalObservation {
    pub resource_exists: bool,
    pub resource_up_to_date: bool,
}

impl ExternalObservation {
    pub fn absent() -> Self {
        Self::default()
    }

    pub fn present(resource_up_to_date: bool) -> Self {
        Self {
            resource_exists: true,
            resource_up_to_date,
        }
    }
}

/// Observe/Create/Update/Delete against one external resource.
#[async_trait]
pub trait ExternalClient<K: Send + Sync>: Send + Sync {
    /// Fetch the external resource and compare it with the desired state.
    async fn observe(&self, resource: &mut K) -> Result<ExternalObservation, ControllerError>;

    /// Create the external resource and write back its identifiers.
    async fn create(&self, resource: &mut K) -> Result<(), ControllerError>;

    /// Converge the external resource and write back its identifiers.
    async fn update(&self, resource: &mut K) -> Result<(), ControllerError>;

    /// Delete the external resource. Missing identifiers and "not found" are success.
    async fn delete(&self, resource: &mut K) -> Result<(), ControllerError>;
}
