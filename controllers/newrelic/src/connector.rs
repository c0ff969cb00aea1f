//! Builds a New Relic connection for one reconcile.
//!
//! The ProviderConfig named by the resource selects the account, region and
//! the Secret key holding the User API key. A fresh client is built on every
//! call; nothing is cached between reconciles.

use crate::error::ControllerError;
use crds::{Managed, ProviderConfig, ProviderConfigSpec, SecretKeySelector};
use k8s_openapi::api::core::v1::Secret;
use kube::{Api, Client};
use newrelic_client::{NewRelicClient, NewRelicClientTrait, Region};
use std::sync::Arc;
use tracing::debug;

/// A New Relic client bound to one account.
#[derive(Clone)]
pub struct Connection {
    pub client: Arc<dyn NewRelicClientTrait>,
    pub account_id: i64,
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("account_id", &self.account_id)
            .finish_non_exhaustive()
    }
}

/// Resolve the resource's ProviderConfig and credentials into a connection.
pub async fn connect<K: Managed>(kube: &Client, resource: &K) -> Result<Connection, ControllerError> {
    let config_name = &resource.resource_spec().provider_config_ref.name;
    let configs: Api<ProviderConfig> = Api::all(kube.clone());
    let config = configs.get(config_name).await.map_err(|e| {
        ControllerError::InvalidConfig(format!("cannot get ProviderConfig '{}': {}", config_name, e))
    })?;

    let account_id = parse_account_id(&config.spec.account_id)?;
    let api_key = read_api_key(kube, &config.spec.credentials.secret_ref).await?;
    let region = region_of(&config.spec);

    debug!(
        "Connecting to New Relic account {} in region {:?} via ProviderConfig {}",
        account_id, region, config_name
    );
    let client = NewRelicClient::new(api_key, region)?;

    Ok(Connection {
        client: Arc::new(client),
        account_id,
    })
}

async fn read_api_key(kube: &Client, selector: &SecretKeySelector) -> Result<String, ControllerError> {
    let secrets: Api<Secret> = Api::namespaced(kube.clone(), &selector.namespace);
    let secret = secrets.get(&selector.name).await.map_err(|e| {
        ControllerError::InvalidConfig(format!(
            "cannot get credentials Secret {}/{}: {}",
            selector.namespace, selector.name, e
        ))
    })?;
    api_key_from_secret(&secret, selector)
}

/// Parse the ProviderConfig account ID.
pub fn parse_account_id(account_id: &str) -> Result<i64, ControllerError> {
    let trimmed = account_id.trim();
    if trimmed.is_empty() {
        return Err(ControllerError::InvalidConfig(
            "cannot get accountId from ProviderConfig: empty".to_string(),
        ));
    }
    trimmed.parse::<i64>().map_err(|e| {
        ControllerError::InvalidConfig(format!(
            "cannot get accountId from ProviderConfig: '{}': {}",
            account_id, e
        ))
    })
}

/// Extract and trim the API key stored under `selector.key`.
pub fn api_key_from_secret(secret: &Secret, selector: &SecretKeySelector) -> Result<String, ControllerError> {
    let missing = || {
        ControllerError::InvalidConfig(format!(
            "Secret {}/{} has no key '{}'",
            selector.namespace, selector.name, selector.key
        ))
    };

    let bytes = secret
        .data
        .as_ref()
        .and_then(|data| data.get(&selector.key))
        .ok_or_else(missing)?;
    let key = String::from_utf8(bytes.0.clone()).map_err(|e| {
        ControllerError::InvalidConfig(format!("credentials are not valid UTF-8: {}", e))
    })?;

    let key = key.trim();
    if key.is_empty() {
        return Err(missing());
    }
    Ok(key.to_string())
}

fn region_of(spec: &ProviderConfigSpec) -> Region {
    match spec.region.unwrap_or_default() {
        crds::Region::US => Region::US,
        crds::Region::EU => Region::EU,
    }
}
