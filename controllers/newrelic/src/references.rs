//! Resolves a NrqlAlertCondition's policy from an AlertsPolicy resource.

use crate::error::ControllerError;
use crds::{AlertsPolicy, NrqlAlertCondition, Reference};
use kube::api::ListParams;
use kube::{Api, Client, ResourceExt};
use tracing::debug;

/// Fill `policyId` from `alertsPolicyRef` or `alertsPolicySelector`.
///
/// An already set `policyId` wins. A selector match is pinned as a reference
/// so later reconciles keep pointing at the same policy. Returns whether the
/// condition changed.
pub async fn resolve_policy_id(kube: &Client, condition: &mut NrqlAlertCondition) -> Result<bool, ControllerError> {
    let params = &condition.spec.for_provider;
    if !params.policy_id.is_empty() {
        return Ok(false);
    }

    let policies: Api<AlertsPolicy> = Api::all(kube.clone());
    let (policy, pinned) = match (&params.alerts_policy_ref, &params.alerts_policy_selector) {
        (Some(reference), _) => {
            let policy = policies.get(&reference.name).await.map_err(|e| {
                ControllerError::Reference(format!("AlertsPolicy '{}': {}", reference.name, e))
            })?;
            (policy, None)
        }
        (None, Some(selector)) => {
            let labels = selector.to_label_selector();
            let list = policies.list(&ListParams::default().labels(&labels)).await?;
            let policy = list.items.into_iter().next().ok_or_else(|| {
                ControllerError::Reference(format!("no AlertsPolicy matches labels '{}'", labels))
            })?;
            let name = policy.name_any();
            (policy, Some(Reference::new(name)))
        }
        (None, None) => {
            return Err(ControllerError::Reference(
                "one of policyId, alertsPolicyRef or alertsPolicySelector is required".to_string(),
            ));
        }
    };

    let policy_id = policy_id_from(&policy)?;
    debug!(
        "Resolved policyId {} for NrqlAlertCondition {} from AlertsPolicy {}",
        policy_id,
        condition.name_any(),
        policy.name_any()
    );
    apply_policy_id(condition, policy_id, pinned);
    Ok(true)
}

/// The referenced policy's ID, or an error while it has none yet.
pub fn policy_id_from(policy: &AlertsPolicy) -> Result<String, ControllerError> {
    let id = &policy.spec.for_provider.id;
    if id.is_empty() {
        return Err(ControllerError::Reference(format!(
            "AlertsPolicy '{}' has no ID yet",
            policy.name_any()
        )));
    }
    Ok(id.clone())
}

fn apply_policy_id(condition: &mut NrqlAlertCondition, policy_id: String, pinned: Option<Reference>) {
    let params = &mut condition.spec.for_provider;
    params.policy_id = policy_id;
    if let Some(reference) = pinned {
        params.alerts_policy_ref = Some(reference);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn policy_without_id_is_not_resolvable() {
        let policy = create_test_alerts_policy("checkout", "");
        assert!(matches!(
            policy_id_from(&policy),
            Err(ControllerError::Reference(msg)) if msg.contains("checkout")
        ));
    }

    #[test]
    fn policy_id_comes_from_for_provider() {
        let policy = create_test_alerts_policy("checkout", "12345");
        assert_eq!(policy_id_from(&policy).ok().as_deref(), Some("12345"));
    }

    #[test]
    fn selector_match_is_pinned_as_reference() {
        let mut condition = create_test_nrql_condition("errors", "");
        apply_policy_id(&mut condition, "777".to_string(), Some(Reference::new("checkout")));
        assert_eq!(condition.spec.for_provider.policy_id, "777");
        assert_eq!(
            condition.spec.for_provider.alerts_policy_ref,
            Some(Reference::new("checkout"))
        );
    }
}
