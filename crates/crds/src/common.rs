//! Shared managed-resource metadata
//!
//! Every New Relic resource carries the same `ResourceSpec` (which
//! ProviderConfig to use, what to do on deletion) and the same
//! `ResourceStatus` condition list, mirroring the Crossplane managed
//! resource contract.

use chrono::{DateTime, Utc};
use kube::ResourceExt;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Annotation remembering the identifier New Relic assigned to a resource.
pub const EXTERNAL_NAME_ANNOTATION: &str = "crossplane.io/external-name";

/// API group shared by all provider CRDs.
pub const API_GROUP: &str = "newrelic.crossplane.io";

/// Common fields of every managed resource spec.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResourceSpec {
    /// ProviderConfig supplying account and credentials
    #[serde(default)]
    pub provider_config_ref: ProviderConfigReference,

    /// Whether the external resource is deleted together with the custom resource
    #[serde(default)]
    pub deletion_policy: DeletionPolicy,
}

/// Reference to a cluster-scoped ProviderConfig
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProviderConfigReference {
    pub name: String,
}

impl Default for ProviderConfigReference {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
        }
    }
}

/// What happens to the external resource when the custom resource is deleted
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Default)]
pub enum DeletionPolicy {
    #[default]
    Delete,
    Orphan,
}

/// Observed conditions shared by every managed resource status
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResourceStatus {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,
}

/// Condition type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub enum ConditionType {
    /// The external resource exists and is usable
    Ready,
    /// The last reconcile converged without error
    Synced,
}

/// Condition status, following the Kubernetes tri-state convention
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub enum ConditionStatus {
    True,
    False,
    Unknown,
}

/// A single status condition
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    #[serde(rename = "type")]
    pub condition_type: ConditionType,
    pub status: ConditionStatus,
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub last_transition_time: DateTime<Utc>,
}

impl Condition {
    fn new(condition_type: ConditionType, status: ConditionStatus, reason: &str) -> Self {
        Self {
            condition_type,
            status,
            reason: reason.to_string(),
            message: None,
            last_transition_time: Utc::now(),
        }
    }

    /// The external resource is available for use.
    pub fn available() -> Self {
        Self::new(ConditionType::Ready, ConditionStatus::True, "Available")
    }

    /// The external resource is being created.
    pub fn creating() -> Self {
        Self::new(ConditionType::Ready, ConditionStatus::False, "Creating")
    }

    /// The external resource is being deleted.
    pub fn deleting() -> Self {
        Self::new(ConditionType::Ready, ConditionStatus::False, "Deleting")
    }

    /// The last reconcile succeeded.
    pub fn reconcile_success() -> Self {
        Self::new(ConditionType::Synced, ConditionStatus::True, "ReconcileSuccess")
    }

    /// The last reconcile failed with `message`.
    pub fn reconcile_error(message: impl Into<String>) -> Self {
        let mut condition = Self::new(ConditionType::Synced, ConditionStatus::False, "ReconcileError");
        condition.message = Some(message.into());
        condition
    }

    /// Same status, reason and message, ignoring the transition time.
    pub fn equivalent(&self, other: &Condition) -> bool {
        self.condition_type == other.condition_type
            && self.status == other.status
            && self.reason == other.reason
            && self.message == other.message
    }
}

impl ResourceStatus {
    /// Returns the condition of the given type, if any.
    pub fn condition(&self, condition_type: ConditionType) -> Option<&Condition> {
        self.conditions
            .iter()
            .find(|c| c.condition_type == condition_type)
    }

    /// Sets conditions, replacing any existing condition of the same type.
    ///
    /// An equivalent existing condition is left untouched so its
    /// `lastTransitionTime` is stable across reconciles.
    pub fn set_conditions(&mut self, conditions: impl IntoIterator<Item = Condition>) {
        for condition in conditions {
            match self
                .conditions
                .iter_mut()
                .find(|c| c.condition_type == condition.condition_type)
            {
                Some(existing) if existing.equivalent(&condition) => {}
                Some(existing) => *existing = condition,
                None => self.conditions.push(condition),
            }
        }
    }
}

/// Accessors the generic reconciler needs on every managed resource.
pub trait Managed {
    /// Provider config and deletion policy.
    fn resource_spec(&self) -> &ResourceSpec;

    /// Current conditions, if a status has been written.
    fn resource_status(&self) -> Option<&ResourceStatus>;

    /// Identifier New Relic assigned to this resource, empty if unknown.
    fn external_id(&self) -> &str;

    /// JSON value written under `status.atProvider`.
    fn at_provider(&self) -> serde_json::Value;
}

/// Returns the external-name annotation, if set.
pub fn external_name<K: ResourceExt>(resource: &K) -> Option<&str> {
    resource
        .annotations()
        .get(EXTERNAL_NAME_ANNOTATION)
        .map(String::as_str)
}

/// Sets the external-name annotation. Returns whether the value changed.
pub fn set_external_name<K: ResourceExt>(resource: &mut K, name: &str) -> bool {
    if external_name(resource) == Some(name) {
        return false;
    }
    resource
        .annotations_mut()
        .insert(EXTERNAL_NAME_ANNOTATION.to_string(), name.to_string());
    true
}
