//! Bearer token wrapper enforcing presence.

use super::error::AuthError;

/// Opaque bearer token issued by the token endpoint.
///
/// The tool tracks no expiry: once stored, a token is reused until the
/// operator removes it from the credential store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Validates that the token is non-empty and trims whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::EmptyToken`] when the supplied string is blank.
    pub fn new(token: impl AsRef<str>) -> Result<Self, AuthError> {
        let trimmed = token.as_ref().trim();
        if trimmed.is_empty() {
            return Err(AuthError::EmptyToken);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the token value.
    #[must_use]
    pub const fn value(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for AccessToken {
    fn as_ref(&self) -> &str {
        self.value()
    }
}
