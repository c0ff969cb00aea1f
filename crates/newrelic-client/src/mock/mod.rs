//! Mock NewRelicClient for unit testing
//!
//! This module provides a mock implementation of NewRelicClientTrait that can
//! be used in unit tests without a New Relic account.
//!
//! The mock is organized into domain-specific modules:
//! - `alerts.rs` - policies, policy channels and NRQL conditions
//! - `dashboards.rs` - dashboard entities
//!
//! Create and update build the observed shape from the request payload, the
//! way New Relic echoes it back, so translate/observe round trips can be
//! exercised end to end.

mod alerts;
mod dashboards;

use crate::error::NewRelicError;
use crate::models::*;
use crate::newrelic_trait::NewRelicClientTrait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Mock NewRelicClient for testing
#[derive(Clone, Default)]
pub struct MockNewRelicClient {
    pub(crate) policies: Arc<Mutex<HashMap<String, AlertsPolicy>>>,
    pub(crate) policy_channels: Arc<Mutex<HashMap<i64, Vec<i64>>>>,
    pub(crate) conditions: Arc<Mutex<HashMap<String, NrqlAlertCondition>>>,
    pub(crate) dashboards: Arc<Mutex<HashMap<String, DashboardEntity>>>,
    // Counter for generating IDs
    pub(crate) next_id: Arc<Mutex<u64>>,
    pub(crate) calls: Arc<Mutex<HashMap<String, usize>>>,
    pub(crate) missing_policy_on_condition_create: Arc<Mutex<bool>>,
    pub(crate) dashboard_mutation_error: Arc<Mutex<Option<String>>>,
}

impl MockNewRelicClient {
    /// Create a new, empty mock client
    pub fn new() -> Self {
        Self {
            next_id: Arc::new(Mutex::new(1)),
            ..Default::default()
        }
    }

    /// Add a policy to the mock store (for test setup)
    pub fn add_policy(&self, policy: AlertsPolicy) {
        self.policies.lock().unwrap().insert(policy.id.clone(), policy);
    }

    /// Add a NRQL condition to the mock store (for test setup)
    pub fn add_nrql_condition(&self, condition: NrqlAlertCondition) {
        self.conditions.lock().unwrap().insert(condition.id.clone(), condition);
    }

    /// Add a dashboard entity to the mock store (for test setup)
    pub fn add_dashboard(&self, dashboard: DashboardEntity) {
        self.dashboards.lock().unwrap().insert(dashboard.guid.clone(), dashboard);
    }

    pub fn policy(&self, id: &str) -> Option<AlertsPolicy> {
        self.policies.lock().unwrap().get(id).cloned()
    }

    pub fn nrql_condition(&self, id: &str) -> Option<NrqlAlertCondition> {
        self.conditions.lock().unwrap().get(id).cloned()
    }

    pub fn dashboard(&self, guid: &str) -> Option<DashboardEntity> {
        self.dashboards.lock().unwrap().get(guid).cloned()
    }

    /// Channel IDs last attached to a policy
    pub fn channels_for(&self, policy_id: i64) -> Option<Vec<i64>> {
        self.policy_channels.lock().unwrap().get(&policy_id).cloned()
    }

    /// Make condition creation fail as if the target policy had been deleted
    pub fn fail_condition_create_with_missing_policy(&self, fail: bool) {
        *self.missing_policy_on_condition_create.lock().unwrap() = fail;
    }

    /// Report `description` in `errors[]` of dashboard create/update
    pub fn fail_dashboard_mutations_with(&self, description: Option<&str>) {
        *self.dashboard_mutation_error.lock().unwrap() = description.map(str::to_string);
    }

    /// Number of times the named trait method was called
    pub fn call_count(&self, operation: &str) -> usize {
        self.calls.lock().unwrap().get(operation).copied().unwrap_or(0)
    }

    pub(crate) fn record(&self, operation: &str) {
        *self.calls.lock().unwrap().entry(operation.to_string()).or_insert(0) += 1;
    }

    /// Generate next ID
    pub(crate) fn next_id(&self) -> u64 {
        let mut id = self.next_id.lock().unwrap();
        let current = *id;
        *id += 1;
        current
    }
}

#[async_trait::async_trait]
impl NewRelicClientTrait for MockNewRelicClient {
    // Alerts operations - delegated to alerts module
    async fn get_policy(&self, account_id: i64, id: &str) -> Result<AlertsPolicy, NewRelicError> {
        self.record("get_policy");
        alerts::get_policy(self, account_id, id).await
    }

    async fn list_policies_by_name(&self, name: &str) -> Result<Vec<RestPolicy>, NewRelicError> {
        self.record("list_policies_by_name");
        alerts::list_policies_by_name(self, name).await
    }

    async fn create_policy(&self, account_id: i64, input: &AlertsPolicyInput) -> Result<AlertsPolicy, NewRelicError> {
        self.record("create_policy");
        alerts::create_policy(self, account_id, input).await
    }

    async fn update_policy(&self, account_id: i64, id: &str, input: &AlertsPolicyInput) -> Result<AlertsPolicy, NewRelicError> {
        self.record("update_policy");
        alerts::update_policy(self, account_id, id, input).await
    }

    async fn delete_policy(&self, account_id: i64, id: &str) -> Result<(), NewRelicError> {
        self.record("delete_policy");
        alerts::delete_policy(self, account_id, id).await
    }

    async fn update_policy_channels(&self, policy_id: i64, channel_ids: &[i64]) -> Result<PolicyChannels, NewRelicError> {
        self.record("update_policy_channels");
        alerts::update_policy_channels(self, policy_id, channel_ids).await
    }

    async fn get_nrql_condition(&self, account_id: i64, id: &str) -> Result<NrqlAlertCondition, NewRelicError> {
        self.record("get_nrql_condition");
        alerts::get_nrql_condition(self, account_id, id).await
    }

    async fn search_nrql_conditions(&self, account_id: i64, criteria: &NrqlConditionsSearchCriteria) -> Result<Vec<NrqlAlertCondition>, NewRelicError> {
        self.record("search_nrql_conditions");
        alerts::search_nrql_conditions(self, account_id, criteria).await
    }

    async fn create_nrql_condition(&self, account_id: i64, policy_id: &str, input: &NrqlConditionCreateInput) -> Result<NrqlAlertCondition, NewRelicError> {
        self.record("create_nrql_condition");
        alerts::create_nrql_condition(self, account_id, policy_id, input).await
    }

    async fn update_nrql_condition(&self, account_id: i64, id: &str, input: &NrqlConditionUpdateInput) -> Result<NrqlAlertCondition, NewRelicError> {
        self.record("update_nrql_condition");
        alerts::update_nrql_condition(self, account_id, id, input).await
    }

    async fn delete_nrql_condition(&self, account_id: i64, id: &str) -> Result<(), NewRelicError> {
        self.record("delete_nrql_condition");
        alerts::delete_nrql_condition(self, account_id, id).await
    }

    // Dashboard operations - delegated to dashboards module
    async fn get_dashboard_entity(&self, guid: &str) -> Result<DashboardEntity, NewRelicError> {
        self.record("get_dashboard_entity");
        dashboards::get_dashboard_entity(self, guid).await
    }

    async fn search_dashboards_by_name(&self, name: &str) -> Result<Vec<DashboardSearchResult>, NewRelicError> {
        self.record("search_dashboards_by_name");
        dashboards::search_dashboards_by_name(self, name).await
    }

    async fn create_dashboard(&self, account_id: i64, input: &DashboardInput) -> Result<DashboardMutationResult, NewRelicError> {
        self.record("create_dashboard");
        dashboards::create_dashboard(self, account_id, input).await
    }

    async fn update_dashboard(&self, guid: &str, input: &DashboardInput) -> Result<DashboardMutationResult, NewRelicError> {
        self.record("update_dashboard");
        dashboards::update_dashboard(self, guid, input).await
    }

    async fn delete_dashboard(&self, guid: &str) -> Result<(), NewRelicError> {
        self.record("delete_dashboard");
        dashboards::delete_dashboard(self, guid).await
    }
}
