//! Alerts operations for MockNewRelicClient
//!
//! Handles policies, policy channels and NRQL conditions

use super::MockNewRelicClient;
use crate::error::NewRelicError;
use crate::models::*;

pub async fn get_policy(client: &MockNewRelicClient, _account_id: i64, id: &str) -> Result<AlertsPolicy, NewRelicError> {
    client.policies
        .lock()
        .unwrap()
        .get(id)
        .cloned()
        .ok_or_else(|| NewRelicError::NotFound(format!("policy {}", id)))
}

pub async fn list_policies_by_name(client: &MockNewRelicClient, name: &str) -> Result<Vec<RestPolicy>, NewRelicError> {
    let policies = client.policies.lock().unwrap();
    let mut matches: Vec<RestPolicy> = policies
        .values()
        .filter(|p| p.name == name)
        .filter_map(|p| {
            Some(RestPolicy {
                id: p.id.parse().ok()?,
                incident_preference: p.incident_preference.clone(),
                name: p.name.clone(),
            })
        })
        .collect();
    matches.sort_by_key(|p| p.id);
    Ok(matches)
}

pub async fn create_policy(client: &MockNewRelicClient, account_id: i64, input: &AlertsPolicyInput) -> Result<AlertsPolicy, NewRelicError> {
    let policy = AlertsPolicy {
        account_id: Some(account_id),
        id: client.next_id().to_string(),
        incident_preference: input.incident_preference.clone(),
        name: input.name.clone(),
    };
    client.add_policy(policy.clone());
    Ok(policy)
}

pub async fn update_policy(client: &MockNewRelicClient, _account_id: i64, id: &str, input: &AlertsPolicyInput) -> Result<AlertsPolicy, NewRelicError> {
    let mut policies = client.policies.lock().unwrap();
    let policy = policies
        .get_mut(id)
        .ok_or_else(|| NewRelicError::NotFound(format!("policy {}", id)))?;
    policy.incident_preference = input.incident_preference.clone();
    policy.name = input.name.clone();
    Ok(policy.clone())
}

pub async fn delete_policy(client: &MockNewRelicClient, _account_id: i64, id: &str) -> Result<(), NewRelicError> {
    client.policies
        .lock()
        .unwrap()
        .remove(id)
        .map(|_| ())
        .ok_or_else(|| NewRelicError::NotFound(format!("policy {}", id)))
}

pub async fn update_policy_channels(client: &MockNewRelicClient, policy_id: i64, channel_ids: &[i64]) -> Result<PolicyChannels, NewRelicError> {
    if !client.policies.lock().unwrap().contains_key(&policy_id.to_string()) {
        return Err(NewRelicError::NotFound(format!("policy {}", policy_id)));
    }
    client.policy_channels
        .lock()
        .unwrap()
        .insert(policy_id, channel_ids.to_vec());
    Ok(PolicyChannels {
        id: policy_id,
        channel_ids: channel_ids.to_vec(),
    })
}

pub async fn get_nrql_condition(client: &MockNewRelicClient, _account_id: i64, id: &str) -> Result<NrqlAlertCondition, NewRelicError> {
    client.conditions
        .lock()
        .unwrap()
        .get(id)
        .cloned()
        .ok_or_else(|| NewRelicError::NotFound(format!("condition {}", id)))
}

pub async fn search_nrql_conditions(client: &MockNewRelicClient, _account_id: i64, criteria: &NrqlConditionsSearchCriteria) -> Result<Vec<NrqlAlertCondition>, NewRelicError> {
    let conditions = client.conditions.lock().unwrap();
    let mut matches: Vec<NrqlAlertCondition> = conditions
        .values()
        .filter(|c| criteria.name.is_empty() || c.name == criteria.name)
        .filter(|c| criteria.policy_id.is_empty() || c.policy_id == criteria.policy_id)
        .cloned()
        .collect();
    matches.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(matches)
}

pub async fn create_nrql_condition(client: &MockNewRelicClient, _account_id: i64, policy_id: &str, input: &NrqlConditionCreateInput) -> Result<NrqlAlertCondition, NewRelicError> {
    if *client.missing_policy_on_condition_create.lock().unwrap() {
        return Err(NewRelicError::Api(format!("Policy with ID {} not found", policy_id)));
    }

    let condition = NrqlAlertCondition {
        id: client.next_id().to_string(),
        name: input.name.clone(),
        enabled: input.enabled,
        description: non_empty(&input.description),
        runbook_url: non_empty(&input.runbook_url),
        policy_id: policy_id.to_string(),
        condition_type: if input.condition_type.is_empty() {
            "STATIC".to_string()
        } else {
            input.condition_type.clone()
        },
        violation_time_limit_seconds: input.violation_time_limit_seconds,
        nrql: input.nrql.clone(),
        terms: input.terms.clone(),
        signal: input.signal.clone(),
        expiration: input.expiration.clone(),
        baseline_direction: input.baseline_direction.clone(),
    };
    client.add_nrql_condition(condition.clone());
    Ok(condition)
}

pub async fn update_nrql_condition(client: &MockNewRelicClient, _account_id: i64, id: &str, input: &NrqlConditionUpdateInput) -> Result<NrqlAlertCondition, NewRelicError> {
    let mut conditions = client.conditions.lock().unwrap();
    let condition = conditions
        .get_mut(id)
        .ok_or_else(|| NewRelicError::NotFound(format!("condition {}", id)))?;

    if let Some(name) = &input.name {
        condition.name = name.clone();
    }
    if let Some(enabled) = input.enabled {
        condition.enabled = enabled;
    }
    if let Some(description) = &input.description {
        condition.description = Some(description.clone());
    }
    if let Some(runbook_url) = &input.runbook_url {
        condition.runbook_url = Some(runbook_url.clone());
    }
    if input.violation_time_limit_seconds.is_some() {
        condition.violation_time_limit_seconds = input.violation_time_limit_seconds;
    }
    if let Some(nrql) = &input.nrql {
        condition.nrql = nrql.clone();
    }
    if let Some(terms) = &input.terms {
        condition.terms = terms.clone();
    }
    if input.signal.is_some() {
        condition.signal = input.signal.clone();
    }
    if input.expiration.is_some() {
        condition.expiration = input.expiration.clone();
    }
    if input.baseline_direction.is_some() {
        condition.baseline_direction = input.baseline_direction.clone();
    }
    Ok(condition.clone())
}

pub async fn delete_nrql_condition(client: &MockNewRelicClient, _account_id: i64, id: &str) -> Result<(), NewRelicError> {
    client.conditions
        .lock()
        .unwrap()
        .remove(id)
        .map(|_| ())
        .ok_or_else(|| NewRelicError::NotFound(format!("condition {}", id)))
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
