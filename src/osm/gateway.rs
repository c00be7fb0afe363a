//! Gateway trait and `reqwest` implementation for the OpenStreetMap API.
//!
//! The trait-based design enables mocking in tests while [`HttpGateway`]
//! performs real HTTP requests against a prod or dev instance.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use url::Url;

use crate::auth::AccessToken;

use super::error::ApiError;
use super::models::{
    ApiChangesetEnvelope, ApiChangesetsPage, ApiUserDetails, Changeset, ChangesetId, Comment, User,
};

/// Lower bound used for the `time` range parameter when paginating.
///
/// The listing endpoint takes a closed `from,to` range; the epoch-ish lower
/// bound keeps the window open on the left while the upper bound walks
/// backwards through the user's history.
const TIME_RANGE_FLOOR: &str = "2001-01-01";

/// Gateway that can perform the remote operations the tool needs.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OsmGateway: Send + Sync {
    /// Fetch details of the authenticated user.
    async fn user_details(&self) -> Result<User, ApiError>;

    /// Fetch the discussion comments of one changeset.
    ///
    /// A changeset without discussion yields an empty vector, never an error.
    async fn changeset_comments(&self, changeset: ChangesetId) -> Result<Vec<Comment>, ApiError>;

    /// Post a discussion comment on one changeset.
    ///
    /// Not idempotent: every successful call appends a comment. Idempotency
    /// is enforced by the queue processor's pre-check.
    async fn add_comment(&self, changeset: ChangesetId, text: &str) -> Result<(), ApiError>;

    /// Fetch one page (up to [`super::PAGE_SIZE`] entries) of a user's
    /// changesets, optionally bounded above by a creation timestamp.
    async fn changesets_page(
        &self,
        user: u64,
        created_before: Option<DateTime<Utc>>,
    ) -> Result<Vec<Changeset>, ApiError>;
}

/// Gateway implementation backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
    api_base: Url,
    token: Option<AccessToken>,
}

impl HttpGateway {
    /// Creates a gateway bound to one API base URL and an optional token.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidUrl`] when the base URL does not parse and
    /// [`ApiError::Client`] when the HTTP client cannot be constructed.
    pub fn new(api_base: &str, token: Option<AccessToken>) -> Result<Self, ApiError> {
        let api_base = Url::parse(api_base).map_err(|error| ApiError::InvalidUrl {
            message: error.to_string(),
        })?;
        let client = reqwest::Client::builder()
            .build()
            .map_err(|error| ApiError::Client {
                message: error.to_string(),
            })?;
        Ok(Self {
            client,
            api_base,
            token,
        })
    }

    fn endpoint(&self, path_and_query: &str) -> Result<Url, ApiError> {
        self.api_base
            .join(path_and_query)
            .map_err(|error| ApiError::InvalidUrl {
                message: error.to_string(),
            })
    }

    fn authorise(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token.value()),
            None => request,
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path_and_query: &str) -> Result<T, ApiError> {
        let url = self.endpoint(path_and_query)?;
        let response = self
            .authorise(self.client.get(url))
            .send()
            .await
            .map_err(|error| ApiError::from_reqwest(&error))?;
        decode_response(path_and_query, response).await
    }
}

#[async_trait]
impl OsmGateway for HttpGateway {
    async fn user_details(&self) -> Result<User, ApiError> {
        let details: ApiUserDetails = self.get_json("/api/0.6/user/details.json").await?;
        Ok(details.user)
    }

    async fn changeset_comments(&self, changeset: ChangesetId) -> Result<Vec<Comment>, ApiError> {
        let envelope: ApiChangesetEnvelope = self
            .get_json(&format!(
                "/api/0.6/changeset/{changeset}.json?include_discussion=true"
            ))
            .await?;
        Ok(envelope.changeset.comments)
    }

    async fn add_comment(&self, changeset: ChangesetId, text: &str) -> Result<(), ApiError> {
        let url = self.endpoint(&format!("/api/0.6/changeset/{changeset}/comment.json"))?;
        let response = self
            .authorise(self.client.post(url))
            .form(&[("text", text)])
            .send()
            .await
            .map_err(|error| ApiError::from_reqwest(&error))?;
        acknowledge_response(&format!("POST changeset/{changeset}/comment"), response).await
    }

    async fn changesets_page(
        &self,
        user: u64,
        created_before: Option<DateTime<Utc>>,
    ) -> Result<Vec<Changeset>, ApiError> {
        let mut url = self.endpoint("/api/0.6/changesets.json")?;
        url.query_pairs_mut().append_pair("user", &user.to_string());
        if let Some(bound) = created_before {
            let upper = bound.to_rfc3339_opts(SecondsFormat::Secs, true);
            url.query_pairs_mut()
                .append_pair("time", &format!("{TIME_RANGE_FLOOR},{upper}"));
        }
        let response = self
            .authorise(self.client.get(url))
            .send()
            .await
            .map_err(|error| ApiError::from_reqwest(&error))?;
        let page: ApiChangesetsPage = decode_response("GET changesets", response).await?;
        Ok(page.changesets)
    }
}

async fn decode_response<T: DeserializeOwned>(
    operation: &str,
    response: reqwest::Response,
) -> Result<T, ApiError> {
    let status = response.status();
    if status.is_success() {
        tracing::debug!("{operation}: {status}");
        response
            .json::<T>()
            .await
            .map_err(|error| ApiError::from_reqwest(&error))
    } else {
        Err(status_failure(operation, status, response).await)
    }
}

async fn acknowledge_response(
    operation: &str,
    response: reqwest::Response,
) -> Result<(), ApiError> {
    let status = response.status();
    if status.is_success() {
        tracing::debug!("{operation}: {status}");
        Ok(())
    } else {
        Err(status_failure(operation, status, response).await)
    }
}

/// Builds the status error, keeping the body for the debug log only.
async fn status_failure(
    operation: &str,
    status: reqwest::StatusCode,
    response: reqwest::Response,
) -> ApiError {
    let body = response.text().await.unwrap_or_default();
    tracing::debug!("{operation}: {status}\n{body}");
    ApiError::Status {
        status: status.as_u16(),
        status_text: status.canonical_reason().unwrap_or_default().to_owned(),
    }
}
