//! Data models for users, changesets, and discussion comments.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::ApiError;

/// Changeset identifier wrapper enforcing positivity.
///
/// Serializes transparently as its numeric value so a queue file remains a
/// plain JSON array of integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct ChangesetId(u64);

impl ChangesetId {
    /// Validates that the identifier is a positive integer.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidUrl`] when the value is zero, since a zero
    /// id can never address a changeset resource.
    pub fn new(value: u64) -> Result<Self, ApiError> {
        if value == 0 {
            return Err(ApiError::InvalidUrl {
                message: "changeset id must be a positive integer".to_owned(),
            });
        }
        Ok(Self(value))
    }

    /// Returns the numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl TryFrom<u64> for ChangesetId {
    type Error = ApiError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ChangesetId> for u64 {
    fn from(value: ChangesetId) -> Self {
        value.get()
    }
}

impl fmt::Display for ChangesetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Authenticated user details.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct User {
    /// Numeric user id.
    pub id: u64,
    /// Display name shown on openstreetmap.org.
    pub display_name: String,
}

/// One entry in a changeset discussion thread.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Comment {
    /// Comment body.
    pub text: String,
    /// Id of the commenting user, when the API includes it.
    #[serde(default)]
    pub uid: Option<u64>,
    /// Comment timestamp, when the API includes it.
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

/// A changeset as returned by the listing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Changeset {
    /// Changeset id.
    pub id: u64,
    /// Creation timestamp; drives the pagination upper bound.
    pub created_at: DateTime<Utc>,
    /// Close timestamp; open changesets have none.
    #[serde(default)]
    pub closed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ApiUserDetails {
    pub(super) user: User,
}

#[derive(Debug, Deserialize)]
pub(super) struct ApiChangesetEnvelope {
    pub(super) changeset: ApiChangesetDiscussion,
}

#[derive(Debug, Deserialize)]
pub(super) struct ApiChangesetDiscussion {
    #[serde(default)]
    pub(super) comments: Vec<Comment>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ApiChangesetsPage {
    pub(super) changesets: Vec<Changeset>,
}
