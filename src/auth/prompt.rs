//! Interactive prompt for the out-of-band authorization code.

use std::io::{self, BufRead, Write};

use super::error::AuthError;

/// Source of the operator-entered authorization code.
///
/// This is the system's only interactive suspension point; tests substitute a
/// canned implementation.
pub trait CodePrompt: Send + Sync {
    /// Blocks until the operator supplies an authorization code.
    ///
    /// The authorization URL the operator must visit is passed through so
    /// implementations can display it alongside the question.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::PromptClosed`] when the input is closed without a
    /// code and [`AuthError::PromptIo`] on read failures.
    fn read_code(&self, authorization_url: &url::Url) -> Result<String, AuthError>;
}

/// Prompt reading one line from standard input.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinPrompt;

impl CodePrompt for StdinPrompt {
    fn read_code(&self, _authorization_url: &url::Url) -> Result<String, AuthError> {
        let mut stdout = io::stdout().lock();
        write!(stdout, "Authorization code? ").map_err(|error| AuthError::PromptIo {
            message: error.to_string(),
        })?;
        stdout.flush().map_err(|error| AuthError::PromptIo {
            message: error.to_string(),
        })?;

        let mut line = String::new();
        let read = io::stdin()
            .lock()
            .read_line(&mut line)
            .map_err(|error| AuthError::PromptIo {
                message: error.to_string(),
            })?;
        if read == 0 {
            return Err(AuthError::PromptClosed);
        }

        let code = line.trim();
        if code.is_empty() {
            return Err(AuthError::PromptClosed);
        }
        Ok(code.to_owned())
    }
}
