//! New Relic API models
//!
//! Request payloads and observed shapes for the NerdGraph and REST v2 APIs.

mod alerts;
mod dashboards;

pub use alerts::*;
pub use dashboards::*;
