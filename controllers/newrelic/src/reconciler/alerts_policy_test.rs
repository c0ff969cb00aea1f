//! Unit tests for the AlertsPolicy adapter

#[cfg(test)]
mod tests {
    use crate::external::ExternalClient;
    use crate::reconciler::alerts_policy::*;
    use crate::test_utils::*;
    use crds::IncidentPreference;
    use newrelic_client::MockNewRelicClient;

    fn seeded_policy(id: &str, name: &str, preference: &str) -> newrelic_client::AlertsPolicy {
        newrelic_client::AlertsPolicy {
            account_id: Some(TEST_ACCOUNT_ID),
            id: id.to_string(),
            incident_preference: preference.to_string(),
            name: name.to_string(),
        }
    }

    #[tokio::test]
    async fn test_observe_missing_policy_reports_absent() {
        let mock = MockNewRelicClient::new();
        let external = AlertsPolicyExternal::new(mock_connection(&mock));
        let mut cr = create_test_alerts_policy("checkout", "");

        let observation = external.observe(&mut cr).await.expect("observe");

        assert!(!observation.resource_exists);
        assert!(cr.spec.for_provider.id.is_empty());
    }

    #[tokio::test]
    async fn test_create_writes_back_id_and_channels() {
        let mock = MockNewRelicClient::new();
        let external = AlertsPolicyExternal::new(mock_connection(&mock));
        let mut cr = create_test_alerts_policy("checkout", "");
        cr.spec.for_provider.channel_ids = vec![11, 12];

        external.create(&mut cr).await.expect("create");

        let id = cr.spec.for_provider.id.clone();
        assert!(!id.is_empty(), "ID must be written back");
        assert_eq!(crds::external_name(&cr), Some(id.as_str()));
        let numeric: i64 = id.parse().expect("numeric id");
        assert_eq!(mock.channels_for(numeric), Some(vec![11, 12]));

        let observation = external.observe(&mut cr).await.expect("observe");
        assert!(observation.resource_exists);
        assert!(observation.resource_up_to_date, "freshly created policy is up to date");
    }

    #[tokio::test]
    async fn test_create_without_channels_skips_channel_call() {
        let mock = MockNewRelicClient::new();
        let external = AlertsPolicyExternal::new(mock_connection(&mock));
        let mut cr = create_test_alerts_policy("checkout", "");

        external.create(&mut cr).await.expect("create");

        assert_eq!(mock.call_count("update_policy_channels"), 0);
    }

    #[tokio::test]
    async fn test_stale_id_is_repaired_by_name() {
        let mock = MockNewRelicClient::new();
        mock.add_policy(seeded_policy("900", "checkout-policy", "PER_POLICY"));
        let external = AlertsPolicyExternal::new(mock_connection(&mock));
        let mut cr = create_test_alerts_policy("checkout", "17");

        let observation = external.observe(&mut cr).await.expect("observe");

        assert!(observation.resource_exists);
        assert!(observation.resource_up_to_date);
        assert_eq!(cr.spec.for_provider.id, "900");
        assert_eq!(crds::external_name(&cr), Some("900"));
        assert_eq!(mock.call_count("list_policies_by_name"), 1);
    }

    #[tokio::test]
    async fn test_incident_preference_drift_needs_update() {
        let mock = MockNewRelicClient::new();
        mock.add_policy(seeded_policy("5", "checkout-policy", "PER_CONDITION"));
        let external = AlertsPolicyExternal::new(mock_connection(&mock));
        let mut cr = create_test_alerts_policy("checkout", "5");

        let observation = external.observe(&mut cr).await.expect("observe");
        assert!(observation.resource_exists);
        assert!(!observation.resource_up_to_date);

        external.update(&mut cr).await.expect("update");
        let stored = mock.policy("5").expect("stored policy");
        assert_eq!(stored.incident_preference, "PER_POLICY");

        let observation = external.observe(&mut cr).await.expect("observe");
        assert!(observation.resource_up_to_date);
    }

    #[tokio::test]
    async fn test_emptying_channels_detaches_all() {
        let mock = MockNewRelicClient::new();
        let external = AlertsPolicyExternal::new(mock_connection(&mock));
        let mut cr = create_test_alerts_policy("checkout", "");
        cr.spec.for_provider.channel_ids = vec![11, 12];
        external.create(&mut cr).await.expect("create");
        let numeric: i64 = cr.spec.for_provider.id.parse().expect("numeric id");

        cr.spec.for_provider.channel_ids = vec![];
        let observation = external.observe(&mut cr).await.expect("observe");
        assert!(!observation.resource_up_to_date, "channel removal is drift");

        external.update(&mut cr).await.expect("update");

        assert_eq!(mock.channels_for(numeric), Some(vec![]));
        let observation = external.observe(&mut cr).await.expect("observe");
        assert!(observation.resource_up_to_date);
    }

    #[tokio::test]
    async fn test_channel_change_needs_update() {
        let mock = MockNewRelicClient::new();
        let external = AlertsPolicyExternal::new(mock_connection(&mock));
        let mut cr = create_test_alerts_policy("checkout", "");
        cr.spec.for_provider.channel_ids = vec![11];
        external.create(&mut cr).await.expect("create");
        let numeric: i64 = cr.spec.for_provider.id.parse().expect("numeric id");

        cr.spec.for_provider.channel_ids = vec![13, 11];
        let observation = external.observe(&mut cr).await.expect("observe");
        assert!(!observation.resource_up_to_date);

        external.update(&mut cr).await.expect("update");

        assert_eq!(mock.channels_for(numeric), Some(vec![13, 11]));
        let recorded = cr.status.as_ref().and_then(|s| s.at_provider.channel_ids.clone());
        assert_eq!(recorded, Some(vec![11, 13]));
    }

    #[test]
    fn test_name_change_is_detected() {
        let cr = create_test_alerts_policy("checkout", "5");
        let observed = seeded_policy("5", "checkout-policy", "PER_POLICY");
        assert!(is_up_to_date(&cr, &observed));

        let mut renamed = cr.clone();
        renamed.spec.for_provider.name = "checkout-policy-v2".to_string();
        assert!(!is_up_to_date(&renamed, &observed));

        let mut preference = cr;
        preference.spec.for_provider.incident_preference = IncidentPreference::PerConditionAndTarget;
        assert!(!is_up_to_date(&preference, &observed));
    }

    #[tokio::test]
    async fn test_delete_without_id_is_noop() {
        let mock = MockNewRelicClient::new();
        let external = AlertsPolicyExternal::new(mock_connection(&mock));
        let mut cr = create_test_alerts_policy("checkout", "");

        external.delete(&mut cr).await.expect("delete");

        assert_eq!(mock.call_count("delete_policy"), 0);
    }

    #[tokio::test]
    async fn test_delete_not_found_is_success() {
        let mock = MockNewRelicClient::new();
        let external = AlertsPolicyExternal::new(mock_connection(&mock));
        let mut cr = create_test_alerts_policy("checkout", "404");

        external.delete(&mut cr).await.expect("already deleted is success");

        assert_eq!(mock.call_count("delete_policy"), 1);
    }

    #[tokio::test]
    async fn test_delete_removes_policy() {
        let mock = MockNewRelicClient::new();
        mock.add_policy(seeded_policy("8", "checkout-policy", "PER_POLICY"));
        let external = AlertsPolicyExternal::new(mock_connection(&mock));
        let mut cr = create_test_alerts_policy("checkout", "8");

        external.delete(&mut cr).await.expect("delete");

        assert!(mock.policy("8").is_none());
    }
}
