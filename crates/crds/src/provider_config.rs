//! ProviderConfig Custom Resource Definition
//!
//! Names the New Relic account to manage and where its User API key lives.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// ProviderConfigSpec selects a New Relic account and credentials
#[derive(CustomResource, Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "newrelic.crossplane.io",
    version = "v1alpha1",
    kind = "ProviderConfig"
)]
#[serde(rename_all = "camelCase")]
pub struct ProviderConfigSpec {
    /// New Relic account ID (numeric, kept as a string)
    pub account_id: String,

    /// Data center region, US when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<Region>,

    /// Where the User API key is read from
    pub credentials: ProviderCredentials,
}

/// New Relic data center region
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Default)]
pub enum Region {
    #[default]
    US,
    EU,
}

/// Credentials source
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProviderCredentials {
    /// Only `Secret` is supported
    #[serde(default)]
    pub source: CredentialsSource,

    /// Secret key holding the API key
    pub secret_ref: SecretKeySelector,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Default)]
pub enum CredentialsSource {
    #[default]
    Secret,
}

/// A key in a namespaced Secret
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SecretKeySelector {
    pub namespace: String,
    pub name: String,
    pub key: String,
}
