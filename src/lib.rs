//! Heckle library crate: resumable batch commenting on OSM changesets.
//!
//! The library covers the durable job-queue processor, the device-style
//! OAuth2 login, the thin OpenStreetMap API client, and the persistence
//! boundaries (credential store and queue file) the CLI wires together.

pub mod auth;
pub mod config;
pub mod credentials;
pub mod error;
pub mod osm;
pub mod queue;

pub use auth::{AccessToken, AuthError, Authenticator, ClientCredentials, CodePrompt, StdinPrompt};
pub use config::{HeckleConfig, Instance, OperationMode, QueueSource};
pub use credentials::{CredentialError, CredentialStore, Credentials, JsonFileStore};
pub use error::HeckleError;
pub use osm::{ApiError, Changeset, ChangesetId, Comment, HttpGateway, OsmGateway, User};
pub use queue::{
    FileQueueSink, JobQueue, NullQueueSink, Processor, QueueError, QueueSink, RetryPolicy,
};
