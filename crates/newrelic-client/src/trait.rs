//! NewRelicClient trait for mocking
//!
//! The controllers only talk to New Relic through this trait so that the
//! lifecycle adapters can run against `MockNewRelicClient` in unit tests.

use crate::error::NewRelicError;
use crate::models::*;

/// Trait for New Relic API client operations
///
/// All async methods must be `Send` to work with Tokio's work-stealing runtime.
#[async_trait::async_trait]
pub trait NewRelicClientTrait: Send + Sync {
    // Alerts policies
    async fn get_policy(&self, account_id: i64, id: &str) -> Result<AlertsPolicy, NewRelicError>;
    async fn list_policies_by_name(&self, name: &str) -> Result<Vec<RestPolicy>, NewRelicError>;
    async fn create_policy(&self, account_id: i64, input: &AlertsPolicyInput) -> Result<AlertsPolicy, NewRelicError>;
    async fn update_policy(&self, account_id: i64, id: &str, input: &AlertsPolicyInput) -> Result<AlertsPolicy, NewRelicError>;
    async fn delete_policy(&self, account_id: i64, id: &str) -> Result<(), NewRelicError>;
    async fn update_policy_channels(&self, policy_id: i64, channel_ids: &[i64]) -> Result<PolicyChannels, NewRelicError>;

    // NRQL conditions
    async fn get_nrql_condition(&self, account_id: i64, id: &str) -> Result<NrqlAlertCondition, NewRelicError>;
    async fn search_nrql_conditions(&self, account_id: i64, criteria: &NrqlConditionsSearchCriteria) -> Result<Vec<NrqlAlertCondition>, NewRelicError>;
    async fn create_nrql_condition(&self, account_id: i64, policy_id: &str, input: &NrqlConditionCreateInput) -> Result<NrqlAlertCondition, NewRelicError>;
    async fn update_nrql_condition(&self, account_id: i64, id: &str, input: &NrqlConditionUpdateInput) -> Result<NrqlAlertCondition, NewRelicError>;
    async fn delete_nrql_condition(&self, account_id: i64, id: &str) -> Result<(), NewRelicError>;

    // Dashboards
    async fn get_dashboard_entity(&self, guid: &str) -> Result<DashboardEntity, NewRelicError>;
    async fn search_dashboards_by_name(&self, name: &str) -> Result<Vec<DashboardSearchResult>, NewRelicError>;
    async fn create_dashboard(&self, account_id: i64, input: &DashboardInput) -> Result<DashboardMutationResult, NewRelicError>;
    async fn update_dashboard(&self, guid: &str, input: &DashboardInput) -> Result<DashboardMutationResult, NewRelicError>;
    async fn delete_dashboard(&self, guid: &str) -> Result<(), NewRelicError>;
}
