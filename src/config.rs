//! Application configuration loaded from CLI, environment, and files.
//!
//! This module provides a unified configuration struct that merges values
//! from command-line arguments, environment variables, and configuration
//! files using ortho-config's layered approach.
//!
//! # Precedence
//!
//! Configuration values are loaded with the following precedence (lowest to
//! highest):
//!
//! 1. **Defaults** – Built-in application defaults
//! 2. **Configuration file** – `.heckle.toml` in current directory, home
//!    directory, or XDG config directory
//! 3. **Environment variables** – `HECKLE_COMMENT`, `HECKLE_CLIENT_ID`, ...
//! 4. **Command-line arguments** – `--comment-file`, `--queue-file`, ...

use std::fs;
use std::time::Duration;

use camino::Utf8PathBuf;
use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

use crate::auth::ClientCredentials;
use crate::error::HeckleError;
use crate::queue::JobQueue;

/// OpenStreetMap instance selection.
///
/// The dev instance is the default so a misconfigured run cannot spam the
/// production site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instance {
    /// openstreetmap.org production servers.
    Prod,
    /// master.apis.dev.openstreetmap.org sandbox.
    Dev,
}

impl Instance {
    /// Base URL of the editing API.
    #[must_use]
    pub const fn api_base(self) -> &'static str {
        match self {
            Self::Prod => "https://api.openstreetmap.org",
            Self::Dev => "https://master.apis.dev.openstreetmap.org",
        }
    }

    /// Base URL of the OAuth2 server.
    #[must_use]
    pub const fn auth_base(self) -> &'static str {
        match self {
            Self::Prod => "https://www.openstreetmap.org",
            Self::Dev => "https://master.apis.dev.openstreetmap.org",
        }
    }
}

/// Operation mode determined by CLI arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationMode {
    /// Post the run comment to every queued changeset.
    CommentRun,
    /// List all changesets of a user into a queue-file-shaped JSON array.
    ListChangesets(u64),
}

/// Where the run's queue comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueSource {
    /// Inline comma-separated ids; ephemeral, never persisted.
    Inline(JobQueue),
    /// A queue file; persisted and resumable.
    File(Utf8PathBuf),
}

/// Application configuration supporting CLI, environment, and file sources.
///
/// # Environment Variables
///
/// - `HECKLE_COMMENT` or `--comment`: Inline comment text
/// - `HECKLE_COMMENT_FILE` or `--comment-file`: File holding the comment
/// - `HECKLE_CHANGESETS` or `--changesets`: Inline id list (ephemeral)
/// - `HECKLE_QUEUE_FILE` or `--queue-file`: Resumable queue file
/// - `HECKLE_LIST_USER` or `--list-user`: Switch to listing mode
/// - `HECKLE_PROD` or `--prod`: Target the production instance
/// - `HECKLE_CLIENT_ID` / `HECKLE_CLIENT_SECRET`: OAuth client credentials
#[derive(Debug, Clone, Default, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "HECKLE",
    discovery(
        dotfile_name = ".heckle.toml",
        config_file_name = "heckle.toml",
        app_name = "heckle"
    )
)]
pub struct HeckleConfig {
    /// Comment text posted to every queued changeset.
    #[ortho_config(cli_short = 'm')]
    pub comment: Option<String>,

    /// Path of a text file whose trimmed contents are the comment.
    pub comment_file: Option<Utf8PathBuf>,

    /// Inline comma-separated changeset ids (ephemeral queue).
    #[ortho_config(cli_short = 's')]
    pub changesets: Option<String>,

    /// Path of a JSON-array queue file (persisted, resumable queue).
    #[ortho_config(cli_short = 'q')]
    pub queue_file: Option<Utf8PathBuf>,

    /// Lists all changesets of this user id instead of running the queue.
    pub list_user: Option<u64>,

    /// Targets the production instance instead of the dev sandbox.
    pub prod: bool,

    /// OAuth client id used for the authorization-code exchange.
    pub client_id: Option<String>,

    /// OAuth client secret used for the authorization-code exchange.
    pub client_secret: Option<String>,

    /// Courtesy delay between items, in milliseconds.
    pub request_interval_ms: Option<u64>,

    /// Initial backoff unit after a failure, in milliseconds.
    pub error_sleep_ms: Option<u64>,
}

impl HeckleConfig {
    /// Returns the targeted OpenStreetMap instance.
    #[must_use]
    pub const fn instance(&self) -> Instance {
        if self.prod { Instance::Prod } else { Instance::Dev }
    }

    /// Determines the operation mode based on provided configuration.
    #[must_use]
    pub const fn operation_mode(&self) -> OperationMode {
        match self.list_user {
            Some(user) => OperationMode::ListChangesets(user),
            None => OperationMode::CommentRun,
        }
    }

    /// Resolves the run comment from the inline value or the comment file.
    ///
    /// # Errors
    ///
    /// Returns [`HeckleError::Usage`] when neither source is configured and
    /// [`HeckleError::BadComment`] when the source is unreadable or resolves
    /// to an empty comment.
    pub fn resolve_comment(&self) -> Result<String, HeckleError> {
        let raw = match (&self.comment, &self.comment_file) {
            (Some(inline), _) => inline.clone(),
            (None, Some(path)) => {
                fs::read_to_string(path).map_err(|error| HeckleError::BadComment {
                    message: format!("could not read {path}: {error}"),
                })?
            }
            (None, None) => {
                return Err(HeckleError::Usage {
                    message: "a comment is required (use --comment or --comment-file)".to_owned(),
                });
            }
        };

        let comment = raw.trim();
        if comment.is_empty() {
            return Err(HeckleError::BadComment {
                message: "comment text is empty".to_owned(),
            });
        }
        Ok(comment.to_owned())
    }

    /// Resolves the queue source from the inline list or the queue file.
    ///
    /// # Errors
    ///
    /// Returns [`HeckleError::Usage`] when neither source is configured or
    /// the inline list holds an invalid id.
    pub fn queue_source(&self) -> Result<QueueSource, HeckleError> {
        match (&self.changesets, &self.queue_file) {
            (Some(list), _) => {
                let queue = JobQueue::parse_inline(list).map_err(|error| HeckleError::Usage {
                    message: error.to_string(),
                })?;
                Ok(QueueSource::Inline(queue))
            }
            (None, Some(path)) => Ok(QueueSource::File(path.clone())),
            (None, None) => Err(HeckleError::Usage {
                message: "a changeset list is required (use --changesets or --queue-file)"
                    .to_owned(),
            }),
        }
    }

    /// Returns the configured OAuth client credentials.
    ///
    /// # Errors
    ///
    /// Returns [`HeckleError::Auth`] when either value is missing or blank.
    pub fn client_credentials(&self) -> Result<ClientCredentials, HeckleError> {
        let credentials = ClientCredentials::new(
            self.client_id.as_deref().unwrap_or_default(),
            self.client_secret.as_deref().unwrap_or_default(),
        )?;
        Ok(credentials)
    }

    /// Courtesy delay between items.
    #[must_use]
    pub fn request_interval(&self) -> Duration {
        self.request_interval_ms
            .map_or(crate::queue::DEFAULT_REQUEST_INTERVAL, Duration::from_millis)
    }

    /// Initial backoff unit after a failure.
    #[must_use]
    pub fn error_sleep(&self) -> Duration {
        self.error_sleep_ms
            .map_or(crate::queue::DEFAULT_ERROR_SLEEP, Duration::from_millis)
    }
}
