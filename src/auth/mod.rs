//! Device-style OAuth2 authorization-code login.
//!
//! The flow is a linear state machine with no retries: discover the server
//! metadata, present the authorization URL to the operator, block on a manual
//! code entry, then exchange the code for a bearer token. Any failure is
//! fatal to the attempt and surfaces as an [`AuthError`].

pub mod error;
pub mod oauth;
pub mod prompt;
pub mod token;

pub use error::AuthError;
pub use oauth::{Authenticator, ClientCredentials};
pub use prompt::{CodePrompt, StdinPrompt};
pub use token::AccessToken;

#[cfg(test)]
mod tests;
