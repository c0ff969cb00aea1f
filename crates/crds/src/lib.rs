//! New Relic provider CRD definitions
//!
//! Kubernetes Custom Resource Definitions managed by the New Relic provider,
//! plus the shared managed-resource metadata every kind carries.

pub mod common;
pub mod references;
pub mod provider_config;
pub mod alerts_policy;
pub mod nrql_alert_condition;
pub mod dashboard;

pub use common::*;
pub use references::*;
pub use provider_config::*;
pub use alerts_policy::*;
pub use nrql_alert_condition::*;
pub use dashboard::*;
