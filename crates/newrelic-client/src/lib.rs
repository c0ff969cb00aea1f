//! New Relic API Client
//!
//! A Rust client library for the New Relic NerdGraph (GraphQL) API and the
//! REST v2 endpoints still needed for alerts policies.
//!
//! # Example
//!
//! ```no_run
//! use newrelic_client::{AlertsPolicyInput, NewRelicClient, NewRelicClientTrait, Region};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = NewRelicClient::new("NRAK-XXXX".to_string(), Region::US)?;
//!
//! let policy = client
//!     .create_policy(
//!         1234567,
//!         &AlertsPolicyInput {
//!             incident_preference: "PER_POLICY".to_string(),
//!             name: "checkout".to_string(),
//!         },
//!     )
//!     .await?;
//!
//! let fetched = client.get_policy(1234567, &policy.id).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - **Alerts**: policies, policy channels and NRQL conditions (static and baseline)
//! - **Dashboards**: dashboard entities with pages, widgets and variables
//! - **Regions**: US and EU data centers
//! - **Mocking**: `MockNewRelicClient` behind the `test-util` feature

pub mod client;
pub mod common;
pub mod error;
pub mod models;
#[path = "trait.rs"]
pub mod newrelic_trait;
pub mod queries;
#[cfg(feature = "test-util")]
pub mod mock;

pub use client::NewRelicClient;
pub use common::{HttpClient, Region};
pub use error::NewRelicError;
pub use models::*;
pub use newrelic_trait::NewRelicClientTrait;
#[cfg(feature = "test-util")]
pub use mock::MockNewRelicClient;
