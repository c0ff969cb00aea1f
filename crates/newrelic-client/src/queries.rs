//! NerdGraph documents used by the client

pub const GET_POLICY: &str = r#"
query($accountId: Int!, $id: ID!) {
  actor {
    account(id: $accountId) {
      alerts {
        policy(id: $id) { accountId id incidentPreference name }
      }
    }
  }
}"#;

pub const CREATE_POLICY: &str = r#"
mutation($accountId: Int!, $policy: AlertsPolicyInput!) {
  alertsPolicyCreate(accountId: $accountId, policy: $policy) { accountId id incidentPreference name }
}"#;

pub const UPDATE_POLICY: &str = r#"
mutation($accountId: Int!, $policyId: ID!, $policy: AlertsPolicyUpdateInput!) {
  alertsPolicyUpdate(accountId: $accountId, id: $policyId, policy: $policy) { accountId id incidentPreference name }
}"#;

pub const DELETE_POLICY: &str = r#"
mutation($accountId: Int!, $id: ID!) {
  alertsPolicyDelete(accountId: $accountId, id: $id) { id }
}"#;

const NRQL_CONDITION_FIELDS: &str = r#"
  id
  name
  enabled
  description
  runbookUrl
  policyId
  type
  violationTimeLimitSeconds
  nrql { query }
  terms { operator priority threshold thresholdDuration thresholdOccurrences }
  signal {
    aggregationWindow evaluationDelay evaluationOffset fillOption fillValue
    aggregationMethod aggregationDelay aggregationTimer
  }
  expiration { expirationDuration openViolationOnExpiration closeViolationsOnExpiration }
  ... on AlertsNrqlBaselineCondition { baselineDirection }
"#;

pub fn get_nrql_condition() -> String {
    format!(
        r#"
query($accountId: Int!, $id: ID!) {{
  actor {{
    account(id: $accountId) {{
      alerts {{
        nrqlCondition(id: $id) {{ {fields} }}
      }}
    }}
  }}
}}"#,
        fields = NRQL_CONDITION_FIELDS
    )
}

pub fn search_nrql_conditions() -> String {
    format!(
        r#"
query($accountId: Int!, $criteria: AlertsNrqlConditionsSearchCriteriaInput) {{
  actor {{
    account(id: $accountId) {{
      alerts {{
        nrqlConditionsSearch(searchCriteria: $criteria) {{
          nrqlConditions {{ {fields} }}
        }}
      }}
    }}
  }}
}}"#,
        fields = NRQL_CONDITION_FIELDS
    )
}

/// Create/update mutations for static and baseline conditions
pub fn nrql_condition_mutation(mutation: &str, input_type: &str, target: &str) -> String {
    format!(
        r#"
mutation($accountId: Int!, ${target}: ID!, $condition: {input_type}!) {{
  {mutation}(accountId: $accountId, {target}: ${target}, condition: $condition) {{ {fields} }}
}}"#,
        mutation = mutation,
        input_type = input_type,
        target = target,
        fields = NRQL_CONDITION_FIELDS
    )
}

pub const DELETE_CONDITION: &str = r#"
mutation($accountId: Int!, $id: ID!) {
  alertsConditionDelete(accountId: $accountId, id: $id) { id }
}"#;

const DASHBOARD_FIELDS: &str = r#"
  guid
  accountId
  name
  description
  permissions
  pages {
    guid
    name
    description
    widgets {
      id
      title
      layout { column height row width }
      visualization { id }
      rawConfiguration
      configuration {
        area { nrqlQueries { accountId query } }
        bar { nrqlQueries { accountId query } }
        billboard { nrqlQueries { accountId query } thresholds { alertSeverity value } }
        line { nrqlQueries { accountId query } }
        markdown { text }
        pie { nrqlQueries { accountId query } }
        table { nrqlQueries { accountId query } }
      }
    }
  }
  variables {
    defaultValues { value { string } }
    isMultiSelection
    items { title value }
    name
    nrqlQuery { accountIds query }
    replacementStrategy
    title
    type
  }
"#;

pub fn get_dashboard_entity() -> String {
    format!(
        r#"
query($guid: EntityGuid!) {{
  actor {{
    entity(guid: $guid) {{
      ... on DashboardEntity {{ {fields} }}
    }}
  }}
}}"#,
        fields = DASHBOARD_FIELDS
    )
}

pub const SEARCH_DASHBOARDS: &str = r#"
query($name: String!) {
  actor {
    entitySearch(queryBuilder: { name: $name, type: DASHBOARD }) {
      results { entities { guid name accountId } }
    }
  }
}"#;

pub fn create_dashboard() -> String {
    format!(
        r#"
mutation($accountId: Int!, $dashboard: DashboardInput!) {{
  dashboardCreate(accountId: $accountId, dashboard: $dashboard) {{
    entityResult {{ {fields} }}
    errors {{ description type }}
  }}
}}"#,
        fields = DASHBOARD_FIELDS
    )
}

pub fn update_dashboard() -> String {
    format!(
        r#"
mutation($guid: EntityGuid!, $dashboard: DashboardInput!) {{
  dashboardUpdate(guid: $guid, dashboard: $dashboard) {{
    entityResult {{ {fields} }}
    errors {{ description type }}
  }}
}}"#,
        fields = DASHBOARD_FIELDS
    )
}

pub const DELETE_DASHBOARD: &str = r#"
mutation($guid: EntityGuid!) {
  dashboardDelete(guid: $guid) {
    status
    errors { description type }
  }
}"#;
