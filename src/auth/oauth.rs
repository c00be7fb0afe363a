//! Authorization-code exchange against the OpenStreetMap OAuth2 server.

use serde::Deserialize;
use tracing::{debug, error, info};
use url::Url;

use super::error::AuthError;
use super::prompt::CodePrompt;
use super::token::AccessToken;

/// Out-of-band redirect marker for clients without a redirect URI.
const REDIRECT_OOB: &str = "urn:ietf:wg:oauth:2.0:oob";

/// Scopes required to read preferences and post changeset comments.
const SCOPES: &str = "write_changeset_comments read_prefs";

/// Well-known path of the OAuth2 server metadata document.
const DISCOVERY_PATH: &str = "/.well-known/oauth-authorization-server";

/// OAuth client id and secret pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientCredentials {
    client_id: String,
    client_secret: String,
}

impl ClientCredentials {
    /// Validates that both credentials are present and non-blank.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::MissingClientId`] or
    /// [`AuthError::MissingClientSecret`] for a blank value.
    pub fn new(client_id: impl AsRef<str>, client_secret: impl AsRef<str>) -> Result<Self, AuthError> {
        let id = client_id.as_ref().trim();
        if id.is_empty() {
            return Err(AuthError::MissingClientId);
        }
        let secret = client_secret.as_ref().trim();
        if secret.is_empty() {
            return Err(AuthError::MissingClientSecret);
        }
        Ok(Self {
            client_id: id.to_owned(),
            client_secret: secret.to_owned(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct ServerMetadata {
    authorization_endpoint: Url,
    token_endpoint: Url,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Performs the discovery, manual code entry, and code exchange steps.
pub struct Authenticator<'prompt, Prompt>
where
    Prompt: CodePrompt,
{
    client: reqwest::Client,
    auth_base: Url,
    credentials: ClientCredentials,
    prompt: &'prompt Prompt,
}

impl<'prompt, Prompt> Authenticator<'prompt, Prompt>
where
    Prompt: CodePrompt,
{
    /// Creates an authenticator bound to one OAuth server base URL.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Discovery`] when the base URL does not parse or
    /// the HTTP client cannot be constructed.
    pub fn new(
        auth_base: &str,
        credentials: ClientCredentials,
        prompt: &'prompt Prompt,
    ) -> Result<Self, AuthError> {
        let auth_base = Url::parse(auth_base).map_err(|parse_error| AuthError::Discovery {
            message: format!("invalid auth base URL: {parse_error}"),
        })?;
        let client = reqwest::Client::builder()
            .build()
            .map_err(|build_error| AuthError::Discovery {
                message: format!("failed to configure HTTP client: {build_error}"),
            })?;
        Ok(Self {
            client,
            auth_base,
            credentials,
            prompt,
        })
    }

    /// Runs the full login flow and returns the issued bearer token.
    ///
    /// # Errors
    ///
    /// Returns an [`AuthError`] when discovery, the interactive prompt, or
    /// the code exchange fails. No step is retried.
    pub async fn login(&self) -> Result<AccessToken, AuthError> {
        let metadata = self.discover().await?;

        let authorization_url = self.authorization_url(&metadata);
        info!("Login here: {authorization_url}");
        let code = self.prompt.read_code(&authorization_url)?;

        self.exchange(&metadata, &code).await
    }

    async fn discover(&self) -> Result<ServerMetadata, AuthError> {
        let url = self
            .auth_base
            .join(DISCOVERY_PATH)
            .map_err(|join_error| AuthError::Discovery {
                message: join_error.to_string(),
            })?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|send_error| AuthError::Discovery {
                message: send_error.to_string(),
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(AuthError::Discovery {
                message: format!("discovery document request returned {status}"),
            });
        }
        let metadata: ServerMetadata =
            response
                .json()
                .await
                .map_err(|decode_error| AuthError::Discovery {
                    message: decode_error.to_string(),
                })?;
        debug!(
            "discovered endpoints: authorization={} token={}",
            metadata.authorization_endpoint, metadata.token_endpoint
        );
        Ok(metadata)
    }

    fn authorization_url(&self, metadata: &ServerMetadata) -> Url {
        let mut url = metadata.authorization_endpoint.clone();
        url.query_pairs_mut()
            .append_pair("response_type", "code")
            .append_pair("client_id", &self.credentials.client_id)
            .append_pair("redirect_uri", REDIRECT_OOB)
            .append_pair("scope", SCOPES);
        url
    }

    async fn exchange(
        &self,
        metadata: &ServerMetadata,
        code: &str,
    ) -> Result<AccessToken, AuthError> {
        let response = self
            .client
            .post(metadata.token_endpoint.clone())
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", REDIRECT_OOB),
                ("client_id", &self.credentials.client_id),
                ("client_secret", &self.credentials.client_secret),
            ])
            .send()
            .await
            .map_err(|send_error| AuthError::ExchangeTransport {
                message: send_error.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Failed to get token: {status}\n{body}");
            return Err(AuthError::Exchange {
                status: status.as_u16(),
                body,
            });
        }

        let issued: TokenResponse =
            response
                .json()
                .await
                .map_err(|decode_error| AuthError::Exchange {
                    status: status.as_u16(),
                    body: decode_error.to_string(),
                })?;
        AccessToken::new(issued.access_token)
    }
}
