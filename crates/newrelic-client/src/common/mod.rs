//! Common utilities for the New Relic client
//!
//! Provides the authenticated transport shared by every API module:
//! NerdGraph (GraphQL over POST) and the REST v2 endpoints that NerdGraph
//! does not cover yet.

use crate::error::NewRelicError;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// New Relic data center region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Region {
    #[default]
    US,
    EU,
}

impl Region {
    /// NerdGraph endpoint for the region
    pub fn graphql_url(&self) -> &'static str {
        match self {
            Region::US => "https://api.newrelic.com/graphql",
            Region::EU => "https://api.eu.newrelic.com/graphql",
        }
    }

    /// REST v2 base URL for the region
    pub fn rest_url(&self) -> &'static str {
        match self {
            Region::US => "https://api.newrelic.com/v2",
            Region::EU => "https://api.eu.newrelic.com/v2",
        }
    }
}

impl FromStr for Region {
    type Err = NewRelicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "US" => Ok(Region::US),
            "EU" => Ok(Region::EU),
            other => Err(NewRelicError::InvalidRequest(format!(
                "unknown region '{}', expected US or EU",
                other
            ))),
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Region::US => write!(f, "US"),
            Region::EU => write!(f, "EU"),
        }
    }
}

#[derive(Debug, Serialize)]
struct GraphQlRequest<'a> {
    query: &'a str,
    variables: &'a serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    #[serde(default)]
    data: Option<serde_json::Value>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

/// A single entry of a GraphQL `errors[]` array
#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlError {
    pub message: String,
    #[serde(default)]
    pub extensions: Option<serde_json::Value>,
}

impl GraphQlError {
    fn is_not_found(&self) -> bool {
        if self.message.to_lowercase().contains("not found") {
            return true;
        }
        self.extensions
            .as_ref()
            .and_then(|e| e.get("errorClass"))
            .and_then(|c| c.as_str())
            == Some("NOT_FOUND")
    }
}

/// HTTP client wrapper with authentication
pub struct HttpClient {
    client: Client,
    region: Region,
    api_key: String,
}

impl HttpClient {
    /// Create a new HTTP client wrapper
    pub fn new(client: Client, region: Region, api_key: String) -> Self {
        Self {
            client,
            region,
            api_key,
        }
    }

    /// Region the client talks to
    pub fn region(&self) -> Region {
        self.region
    }

    /// Run a NerdGraph query or mutation and return its `data` member.
    pub async fn graphql(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<serde_json::Value, NewRelicError> {
        let url = self.region.graphql_url();
        debug!("POST {} variables: {}", url, variables);

        let response = self
            .client
            .post(url)
            .header("API-Key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&GraphQlRequest {
                query,
                variables: &variables,
            })
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            let body = response.text().await.unwrap_or_default();
            return Err(NewRelicError::Authentication(format!("{} - {}", status, body)));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NewRelicError::Api(format!(
                "NerdGraph request failed: {} - {}",
                status, body
            )));
        }

        let body: GraphQlResponse = response.json().await?;
        if let Some(error) = body.errors.iter().find(|e| e.is_not_found()) {
            return Err(NewRelicError::NotFound(error.message.clone()));
        }
        if !body.errors.is_empty() {
            let messages: Vec<&str> = body.errors.iter().map(|e| e.message.as_str()).collect();
            return Err(NewRelicError::Api(messages.join("; ")));
        }

        Ok(body.data.unwrap_or(serde_json::Value::Null))
    }

    /// Make a GET request against the REST v2 API
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, NewRelicError> {
        let url = format!("{}{}", self.region.rest_url(), path);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .header("Api-Key", &self.api_key)
            .header("Accept", "application/json")
            .send()
            .await?;

        Self::rest_response(response, "GET", path).await
    }

    /// Make a PUT request against the REST v2 API
    pub async fn put<T: DeserializeOwned>(&self, path: &str) -> Result<T, NewRelicError> {
        let url = format!("{}{}", self.region.rest_url(), path);
        debug!("PUT {}", url);

        let response = self
            .client
            .put(&url)
            .header("Api-Key", &self.api_key)
            .header("Accept", "application/json")
            .send()
            .await?;

        Self::rest_response(response, "PUT", path).await
    }

    async fn rest_response<T: DeserializeOwned>(
        response: reqwest::Response,
        method: &str,
        path: &str,
    ) -> Result<T, NewRelicError> {
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            let body = response.text().await.unwrap_or_default();
            return Err(NewRelicError::NotFound(format!(
                "Resource not found: {} - {}",
                path, body
            )));
        }
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            let body = response.text().await.unwrap_or_default();
            return Err(NewRelicError::Authentication(format!("{} - {}", status, body)));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NewRelicError::Api(format!(
                "{} {} failed: {} - {}",
                method, path, status, body
            )));
        }

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            NewRelicError::Api(format!(
                "error decoding response body: {} - Response (first 500 chars): {}",
                e,
                text.chars().take(500).collect::<String>()
            ))
        })
    }
}

/// Deserialize the value at `pointer` inside a GraphQL `data` object.
///
/// Returns `Ok(None)` when the value is missing or `null`.
pub fn extract<T: DeserializeOwned>(
    data: &serde_json::Value,
    pointer: &str,
) -> Result<Option<T>, NewRelicError> {
    match data.pointer(pointer) {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(value) => Ok(Some(serde_json::from_value(value.clone())?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_parses_case_insensitively() {
        assert_eq!("eu".parse::<Region>().ok(), Some(Region::EU));
        assert_eq!("US".parse::<Region>().ok(), Some(Region::US));
        assert!("APAC".parse::<Region>().is_err());
        assert_eq!(Region::EU.graphql_url(), "https://api.eu.newrelic.com/graphql");
    }

    #[test]
    fn extract_treats_null_as_missing() {
        let data = serde_json::json!({ "actor": { "entity": null, "count": 3 } });
        let missing: Option<u32> = extract(&data, "/actor/entity").expect("extract");
        assert!(missing.is_none());
        let absent: Option<u32> = extract(&data, "/actor/other").expect("extract");
        assert!(absent.is_none());
        let count: Option<u32> = extract(&data, "/actor/count").expect("extract");
        assert_eq!(count, Some(3));
    }

    #[test]
    fn not_found_detection_uses_message_or_error_class() {
        let by_message = GraphQlError {
            message: "Not Found".to_string(),
            extensions: None,
        };
        let by_class = GraphQlError {
            message: "condition missing".to_string(),
            extensions: Some(serde_json::json!({ "errorClass": "NOT_FOUND" })),
        };
        let other = GraphQlError {
            message: "Argument \"policyId\" has invalid value".to_string(),
            extensions: Some(serde_json::json!({ "errorClass": "BAD_USER_INPUT" })),
        };
        assert!(by_message.is_not_found());
        assert!(by_class.is_not_found());
        assert!(!other.is_not_found());
    }

    #[test]
    fn not_found_message_ignores_case() {
        for message in ["entity not found", "Policy with ID 42 not found", "NOT FOUND"] {
            let error = GraphQlError {
                message: message.to_string(),
                extensions: None,
            };
            assert!(error.is_not_found(), "{message}");
        }
    }
}
