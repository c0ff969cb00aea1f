//! New Relic API client
//!
//! NerdGraph covers policies, NRQL conditions and dashboards. Policy lookup
//! by name and channel association still go through REST v2.

use crate::common::{extract, HttpClient, Region};
use crate::error::NewRelicError;
use crate::models::*;
use crate::newrelic_trait::NewRelicClientTrait;
use crate::queries;
use reqwest::Client;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

/// New Relic API client
pub struct NewRelicClient {
    http: HttpClient,
}

impl NewRelicClient {
    /// Create a new New Relic client
    ///
    /// # Arguments
    /// * `api_key` - User API key
    /// * `region` - Data center the account lives in
    pub fn new(api_key: String, region: Region) -> Result<Self, NewRelicError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(NewRelicError::Http)?;

        Ok(Self {
            http: HttpClient::new(client, region, api_key),
        })
    }

    /// Region the client talks to
    pub fn region(&self) -> Region {
        self.http.region()
    }
}

/// Mutation names and input types for a condition of the given type.
/// BASELINE has its own mutations, everything else is static.
fn condition_mutation(condition_type: &str, create: bool) -> (&'static str, &'static str) {
    match (condition_type == "BASELINE", create) {
        (true, true) => ("alertsNrqlConditionBaselineCreate", "AlertsNrqlConditionBaselineInput"),
        (true, false) => ("alertsNrqlConditionBaselineUpdate", "AlertsNrqlConditionUpdateBaselineInput"),
        (false, true) => ("alertsNrqlConditionStaticCreate", "AlertsNrqlConditionStaticInput"),
        (false, false) => ("alertsNrqlConditionStaticUpdate", "AlertsNrqlConditionUpdateStaticInput"),
    }
}

#[async_trait::async_trait]
impl NewRelicClientTrait for NewRelicClient {
    async fn get_policy(&self, account_id: i64, id: &str) -> Result<AlertsPolicy, NewRelicError> {
        let data = self
            .http
            .graphql(queries::GET_POLICY, json!({ "accountId": account_id, "id": id }))
            .await?;
        extract(&data, "/actor/account/alerts/policy")?
            .ok_or_else(|| NewRelicError::NotFound(format!("policy {}", id)))
    }

    async fn list_policies_by_name(&self, name: &str) -> Result<Vec<RestPolicy>, NewRelicError> {
        let path = format!("/alerts_policies.json?filter[name]={}", urlencoding::encode(name));
        let list: RestPolicyList = self.http.get(&path).await?;
        debug!("Found {} policies named {}", list.policies.len(), name);
        Ok(list.policies)
    }

    async fn create_policy(&self, account_id: i64, input: &AlertsPolicyInput) -> Result<AlertsPolicy, NewRelicError> {
        let data = self
            .http
            .graphql(queries::CREATE_POLICY, json!({ "accountId": account_id, "policy": input }))
            .await?;
        extract(&data, "/alertsPolicyCreate")?
            .ok_or_else(|| NewRelicError::Api("alertsPolicyCreate returned no policy".to_string()))
    }

    async fn update_policy(&self, account_id: i64, id: &str, input: &AlertsPolicyInput) -> Result<AlertsPolicy, NewRelicError> {
        let data = self
            .http
            .graphql(
                queries::UPDATE_POLICY,
                json!({ "accountId": account_id, "policyId": id, "policy": input }),
            )
            .await?;
        extract(&data, "/alertsPolicyUpdate")?
            .ok_or_else(|| NewRelicError::Api("alertsPolicyUpdate returned no policy".to_string()))
    }

    async fn delete_policy(&self, account_id: i64, id: &str) -> Result<(), NewRelicError> {
        self.http
            .graphql(queries::DELETE_POLICY, json!({ "accountId": account_id, "id": id }))
            .await?;
        Ok(())
    }

    async fn update_policy_channels(&self, policy_id: i64, channel_ids: &[i64]) -> Result<PolicyChannels, NewRelicError> {
        let ids: Vec<String> = channel_ids.iter().map(|id| id.to_string()).collect();
        let path = format!(
            "/alerts_policy_channels.json?policy_id={}&channel_ids={}",
            policy_id,
            urlencoding::encode(&ids.join(","))
        );
        let response: PolicyChannelsResponse = self.http.put(&path).await?;
        Ok(response.policy)
    }

    async fn get_nrql_condition(&self, account_id: i64, id: &str) -> Result<NrqlAlertCondition, NewRelicError> {
        let data = self
            .http
            .graphql(
                &queries::get_nrql_condition(),
                json!({ "accountId": account_id, "id": id }),
            )
            .await?;
        extract(&data, "/actor/account/alerts/nrqlCondition")?
            .ok_or_else(|| NewRelicError::NotFound(format!("condition {}", id)))
    }

    async fn search_nrql_conditions(&self, account_id: i64, criteria: &NrqlConditionsSearchCriteria) -> Result<Vec<NrqlAlertCondition>, NewRelicError> {
        let data = self
            .http
            .graphql(
                &queries::search_nrql_conditions(),
                json!({ "accountId": account_id, "criteria": criteria }),
            )
            .await?;
        Ok(extract(&data, "/actor/account/alerts/nrqlConditionsSearch/nrqlConditions")?.unwrap_or_default())
    }

    async fn create_nrql_condition(&self, account_id: i64, policy_id: &str, input: &NrqlConditionCreateInput) -> Result<NrqlAlertCondition, NewRelicError> {
        let mut condition = input.clone();
        let condition_type = std::mem::take(&mut condition.condition_type);
        if condition_type == "BASELINE" {
            condition.value_function = None;
        } else {
            condition.baseline_direction = None;
        }
        let (mutation, input_type) = condition_mutation(&condition_type, true);
        debug!("Creating {} condition {} via {}", condition_type, input.name, mutation);

        let data = self
            .http
            .graphql(
                &queries::nrql_condition_mutation(mutation, input_type, "policyId"),
                json!({ "accountId": account_id, "policyId": policy_id, "condition": condition }),
            )
            .await?;
        extract(&data, &format!("/{}", mutation))?
            .ok_or_else(|| NewRelicError::Api(format!("{} returned no condition", mutation)))
    }

    async fn update_nrql_condition(&self, account_id: i64, id: &str, input: &NrqlConditionUpdateInput) -> Result<NrqlAlertCondition, NewRelicError> {
        let mut condition = input.clone();
        let condition_type = std::mem::take(&mut condition.condition_type);
        if condition_type == "BASELINE" {
            condition.value_function = None;
        } else {
            condition.baseline_direction = None;
        }
        let (mutation, input_type) = condition_mutation(&condition_type, false);
        debug!("Updating {} condition {} via {}", condition_type, id, mutation);

        let data = self
            .http
            .graphql(
                &queries::nrql_condition_mutation(mutation, input_type, "id"),
                json!({ "accountId": account_id, "id": id, "condition": condition }),
            )
            .await?;
        extract(&data, &format!("/{}", mutation))?
            .ok_or_else(|| NewRelicError::Api(format!("{} returned no condition", mutation)))
    }

    async fn delete_nrql_condition(&self, account_id: i64, id: &str) -> Result<(), NewRelicError> {
        self.http
            .graphql(queries::DELETE_CONDITION, json!({ "accountId": account_id, "id": id }))
            .await?;
        Ok(())
    }

    async fn get_dashboard_entity(&self, guid: &str) -> Result<DashboardEntity, NewRelicError> {
        let data = self
            .http
            .graphql(&queries::get_dashboard_entity(), json!({ "guid": guid }))
            .await?;
        match extract::<DashboardEntity>(&data, "/actor/entity")? {
            // A non-dashboard entity matches no fragment fields
            Some(entity) if !entity.guid.is_empty() => Ok(entity),
            _ => Err(NewRelicError::NotFound("entity not found".to_string())),
        }
    }

    async fn search_dashboards_by_name(&self, name: &str) -> Result<Vec<DashboardSearchResult>, NewRelicError> {
        let data = self
            .http
            .graphql(queries::SEARCH_DASHBOARDS, json!({ "name": name }))
            .await?;
        Ok(extract(&data, "/actor/entitySearch/results/entities")?.unwrap_or_default())
    }

    async fn create_dashboard(&self, account_id: i64, input: &DashboardInput) -> Result<DashboardMutationResult, NewRelicError> {
        let data = self
            .http
            .graphql(
                &queries::create_dashboard(),
                json!({ "accountId": account_id, "dashboard": input }),
            )
            .await?;
        Ok(extract(&data, "/dashboardCreate")?.unwrap_or_default())
    }

    async fn update_dashboard(&self, guid: &str, input: &DashboardInput) -> Result<DashboardMutationResult, NewRelicError> {
        let data = self
            .http
            .graphql(&queries::update_dashboard(), json!({ "guid": guid, "dashboard": input }))
            .await?;
        Ok(extract(&data, "/dashboardUpdate")?.unwrap_or_default())
    }

    async fn delete_dashboard(&self, guid: &str) -> Result<(), NewRelicError> {
        let data = self
            .http
            .graphql(queries::DELETE_DASHBOARD, json!({ "guid": guid }))
            .await?;
        let errors: Vec<DashboardMutationError> =
            extract(&data, "/dashboardDelete/errors")?.unwrap_or_default();
        match errors.first() {
            None => Ok(()),
            Some(e) if e.description.to_lowercase().contains("not found") => {
                Err(NewRelicError::NotFound(e.description.clone()))
            }
            Some(e) => Err(NewRelicError::Api(e.description.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baseline_conditions_use_baseline_mutations() {
        assert_eq!(
            condition_mutation("BASELINE", true).0,
            "alertsNrqlConditionBaselineCreate"
        );
        assert_eq!(
            condition_mutation("BASELINE", false).1,
            "AlertsNrqlConditionUpdateBaselineInput"
        );
        assert_eq!(condition_mutation("STATIC", true).0, "alertsNrqlConditionStaticCreate");
        assert_eq!(condition_mutation("", false).0, "alertsNrqlConditionStaticUpdate");
    }
}
