//! Response types for the carrier tracking API.

use serde::{Deserialize, Serialize};

/// Current state of one shipment, with its scan history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingInfo {
    pub code: String,
    pub status: String,
    #[serde(default)]
    pub events: Vec<TrackingEvent>,
}

/// One carrier scan event, oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingEvent {
    #[serde(default)]
    pub timestamp: Option<String>,
    pub status: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}
