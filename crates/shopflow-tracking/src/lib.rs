//! Client for the parcel-carrier tracking API.
//!
//! A thin read-only wrapper: one `GET /track?code=...` endpoint, no
//! transformation logic. Responses are forwarded to callers as-is.

pub mod client;
pub mod error;
pub mod types;

pub use client::TrackingClient;
pub use error::TrackingError;
pub use types::{TrackingEvent, TrackingInfo};
