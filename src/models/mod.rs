//! Models Module
//!
//! DTOs for the HTTP surface: incoming chat event payloads and outgoing
//! response bodies.

mod events;
mod responses;

pub use events::{EventPayload, MessageEvent};
pub use responses::{ChallengeResponse, HealthResponse, StatsResponse};
