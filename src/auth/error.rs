//! Error types for the OAuth2 login flow.

use thiserror::Error;

/// Errors surfaced while obtaining a bearer token.
///
/// None of these are retried internally: a failed login attempt propagates to
/// the top level, which logs it and terminates.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    /// The OAuth client id was not configured.
    #[error("OAuth client id is required (set HECKLE_CLIENT_ID)")]
    MissingClientId,

    /// The OAuth client secret was not configured.
    #[error("OAuth client secret is required (set HECKLE_CLIENT_SECRET)")]
    MissingClientSecret,

    /// The discovery document could not be fetched or decoded.
    #[error("OAuth server discovery failed: {message}")]
    Discovery {
        /// Network or decode error detail.
        message: String,
    },

    /// The operator closed the prompt without entering a code.
    #[error("authorization code prompt was closed before a code was entered")]
    PromptClosed,

    /// Reading the authorization code failed.
    #[error("failed to read authorization code: {message}")]
    PromptIo {
        /// I/O error detail from the prompt.
        message: String,
    },

    /// Networking failed before the token endpoint answered.
    #[error("token exchange failed: {message}")]
    ExchangeTransport {
        /// Transport-level error detail.
        message: String,
    },

    /// The token endpoint rejected the code exchange.
    #[error("token exchange failed with status {status}: {body}")]
    Exchange {
        /// Numeric HTTP status returned by the token endpoint.
        status: u16,
        /// Response body, kept verbatim for diagnostics.
        body: String,
    },

    /// The issued or stored token was empty.
    #[error("access token must not be empty")]
    EmptyToken,
}
