//! Unit tests for the Dashboard adapter

#[cfg(test)]
mod tests {
    use crate::external::ExternalClient;
    use crate::reconciler::dashboard::*;
    use crate::test_utils::*;
    use crds::{DashboardPermissions, RawConfiguration, WidgetConfiguration};
    use newrelic_client::MockNewRelicClient;

    async fn created(mock: &MockNewRelicClient) -> (DashboardExternal, crds::Dashboard) {
        let external = DashboardExternal::new(mock_connection(mock));
        let mut cr = create_test_dashboard("checkout");
        external.create(&mut cr).await.expect("create");
        (external, cr)
    }

    #[tokio::test]
    async fn test_create_writes_back_identifiers() {
        let mock = MockNewRelicClient::new();
        let (_, cr) = created(&mock).await;

        let params = &cr.spec.for_provider;
        assert!(!params.guid.is_empty());
        assert_eq!(crds::external_name(&cr), Some(params.guid.as_str()));
        assert!(mock.dashboard(&params.guid).is_some());
        for page in &params.pages {
            assert!(!page.guid.is_empty(), "page {} has a GUID", page.name);
            for widget in &page.widgets {
                assert!(widget.id.is_some(), "widget {} has an ID", widget.title);
            }
        }
    }

    #[tokio::test]
    async fn test_observe_after_create_is_up_to_date() {
        let mock = MockNewRelicClient::new();
        let (external, mut cr) = created(&mock).await;

        let observation = external.observe(&mut cr).await.expect("observe");

        assert!(observation.resource_exists);
        assert!(observation.resource_up_to_date);
    }

    #[tokio::test]
    async fn test_order_of_pages_widgets_and_thresholds_is_ignored() {
        let mock = MockNewRelicClient::new();
        let (external, mut cr) = created(&mock).await;

        let params = &mut cr.spec.for_provider;
        params.pages.reverse();
        for page in params.pages.iter_mut() {
            page.widgets.reverse();
            for widget in page.widgets.iter_mut() {
                if let Some(WidgetConfiguration::Billboard(billboard)) = widget.configuration.as_mut() {
                    billboard.thresholds.reverse();
                }
            }
        }

        let observation = external.observe(&mut cr).await.expect("observe");
        assert!(observation.resource_up_to_date);
    }

    #[tokio::test]
    async fn test_unset_permissions_equal_public_read_write() {
        let mock = MockNewRelicClient::new();
        let (external, mut cr) = created(&mock).await;
        let guid = cr.spec.for_provider.guid.clone();
        let stored = mock.dashboard(&guid).expect("stored dashboard");
        assert_eq!(stored.permissions.as_deref(), Some("PUBLIC_READ_WRITE"));

        cr.spec.for_provider.permissions = Some(DashboardPermissions::PublicReadWrite);
        assert!(external.observe(&mut cr).await.expect("observe").resource_up_to_date);

        cr.spec.for_provider.permissions = Some(DashboardPermissions::Private);
        assert!(!external.observe(&mut cr).await.expect("observe").resource_up_to_date);
    }

    #[tokio::test]
    async fn test_raw_configuration_is_not_compared() {
        let mock = MockNewRelicClient::new();
        let external = DashboardExternal::new(mock_connection(&mock));
        let mut cr = create_test_dashboard("checkout");
        cr.spec.for_provider.pages[0].widgets[1].configuration = Some(WidgetConfiguration::Raw(RawConfiguration {
            limit: Some(100.0),
            ..Default::default()
        }));
        external.create(&mut cr).await.expect("create");

        let guid = cr.spec.for_provider.guid.clone();
        let mut stored = mock.dashboard(&guid).expect("stored dashboard");
        for widget in stored.pages.iter_mut().flat_map(|p| p.widgets.iter_mut()) {
            if widget.raw_configuration.is_some() {
                widget.raw_configuration = Some(serde_json::json!({ "limit": 5, "platformOptions": {} }));
            }
        }
        mock.add_dashboard(stored);

        let observation = external.observe(&mut cr).await.expect("observe");
        assert!(observation.resource_up_to_date);
    }

    #[tokio::test]
    async fn test_name_change_is_detected() {
        let mock = MockNewRelicClient::new();
        let (external, mut cr) = created(&mock).await;

        cr.spec.for_provider.name = "test_dashboard_diff_name".to_string();

        let observation = external.observe(&mut cr).await.expect("observe");
        assert!(observation.resource_exists);
        assert!(!observation.resource_up_to_date);
    }

    #[tokio::test]
    async fn test_widget_change_is_updated_in_place() {
        let mock = MockNewRelicClient::new();
        let (external, mut cr) = created(&mock).await;
        let widget_id = cr.spec.for_provider.pages[0].widgets[0].id.clone();

        if let Some(WidgetConfiguration::Billboard(billboard)) = cr.spec.for_provider.pages[0].widgets[0].configuration.as_mut() {
            billboard.thresholds[0].value = "75".to_string();
        }
        assert!(!external.observe(&mut cr).await.expect("observe").resource_up_to_date);

        external.update(&mut cr).await.expect("update");

        assert_eq!(cr.spec.for_provider.pages[0].widgets[0].id, widget_id);
        assert!(external.observe(&mut cr).await.expect("observe").resource_up_to_date);
    }

    #[tokio::test]
    async fn test_mutation_error_is_surfaced() {
        let mock = MockNewRelicClient::new();
        mock.fail_dashboard_mutations_with(Some("Invalid widget configuration"));
        let external = DashboardExternal::new(mock_connection(&mock));
        let mut cr = create_test_dashboard("checkout");

        let err = external.create(&mut cr).await.expect_err("create must fail");

        assert!(err.to_string().contains("Invalid widget configuration"));
        assert!(cr.spec.for_provider.guid.is_empty());
    }

    #[tokio::test]
    async fn test_empty_guid_is_absent() {
        let mock = MockNewRelicClient::new();
        let external = DashboardExternal::new(mock_connection(&mock));
        let mut cr = create_test_dashboard("checkout");

        let observation = external.observe(&mut cr).await.expect("observe");

        assert!(!observation.resource_exists);
        assert_eq!(mock.call_count("get_dashboard_entity"), 0);
    }

    #[tokio::test]
    async fn test_stale_guid_is_repaired_by_name() {
        let mock = MockNewRelicClient::new();
        let (external, original) = created(&mock).await;

        let mut cr = create_test_dashboard("checkout");
        cr.spec.for_provider.guid = "stale-guid".to_string();
        let observation = external.observe(&mut cr).await.expect("observe");

        assert!(observation.resource_exists);
        assert_eq!(cr.spec.for_provider.guid, original.spec.for_provider.guid);
        assert_eq!(crds::external_name(&cr), Some(original.spec.for_provider.guid.as_str()));
    }

    #[tokio::test]
    async fn test_repair_ignores_other_accounts() {
        let mock = MockNewRelicClient::new();
        let (external, _) = created(&mock).await;

        let mut cr = create_test_dashboard("checkout");
        cr.spec.for_provider.guid = "stale-guid".to_string();
        cr.spec.for_provider.account_id = Some(TEST_ACCOUNT_ID + 1);

        let observation = external.observe(&mut cr).await.expect("observe");
        assert!(!observation.resource_exists);
    }

    #[tokio::test]
    async fn test_delete_not_found_is_success() {
        let mock = MockNewRelicClient::new();
        let external = DashboardExternal::new(mock_connection(&mock));
        let mut cr = create_test_dashboard("checkout");
        cr.spec.for_provider.guid = "gone".to_string();

        external.delete(&mut cr).await.expect("already deleted is success");

        assert_eq!(mock.call_count("delete_dashboard"), 1);
    }

    #[tokio::test]
    async fn test_delete_without_guid_is_noop() {
        let mock = MockNewRelicClient::new();
        let external = DashboardExternal::new(mock_connection(&mock));
        let mut cr = create_test_dashboard("checkout");

        external.delete(&mut cr).await.expect("delete");

        assert_eq!(mock.call_count("delete_dashboard"), 0);
    }

    #[tokio::test]
    async fn test_delete_removes_dashboard() {
        let mock = MockNewRelicClient::new();
        let (external, mut cr) = created(&mock).await;
        let guid = cr.spec.for_provider.guid.clone();

        external.delete(&mut cr).await.expect("delete");

        assert!(mock.dashboard(&guid).is_none());
    }
}
