//! OpenStreetMap API client.
//!
//! This module wraps `reqwest` behind a trait-based gateway so the queue
//! processor and the listing loop can be exercised against mocks. The real
//! implementation attaches the bearer token, treats any non-2xx response as a
//! failure carrying the status line, and keeps response bodies for debug
//! logging only.

pub mod error;
pub mod gateway;
pub mod listing;
pub mod models;

pub use error::ApiError;
pub use gateway::{HttpGateway, OsmGateway};
pub use listing::{PAGE_SIZE, ids_newest_first, list_all_changesets};
pub use models::{Changeset, ChangesetId, Comment, User};

#[cfg(test)]
pub use gateway::MockOsmGateway;

#[cfg(test)]
mod tests;
