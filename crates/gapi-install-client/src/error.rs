//! Client error types.

use std::path::Path;

use gapi_install_auth::{AuthError, AuthErrorCode};
use thiserror::Error;

use crate::tracing::TracingError;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur in the client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Configuration file problem.
    #[error("configuration error: {0}")]
    Config(String),

    /// Failure inside the authorization flow.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Writing operator output failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Logging could not be set up.
    #[error(transparent)]
    Tracing(#[from] TracingError),
}

impl ClientError {
    /// Operator guidance to print after the error message, if any.
    pub fn hint(&self) -> Option<String> {
        let Self::Auth(err) = self else {
            return None;
        };

        match err.code() {
            AuthErrorCode::MissingCredentials => Some(setup_instructions(
                err.path().unwrap_or(Path::new("credentials.json")),
            )),
            AuthErrorCode::MissingAuthCode => Some(format!(
                "Please save the authorization code in {}.",
                err.path().unwrap_or(Path::new("auth-code.txt")).display()
            )),
            AuthErrorCode::TokenCorrupt => err
                .path()
                .map(|p| format!("Delete {} and run again to re-authorize.", p.display())),
            _ => None,
        }
    }
}

/// Steps for creating an OAuth client in the Google Cloud Console.
pub fn setup_instructions(credentials_path: &Path) -> String {
    format!(
        "Please follow these steps:\n\
         1. Go to Google Cloud Console (https://console.cloud.google.com)\n\
         2. Create a new project or select an existing one\n\
         3. Enable Gmail API and Google Calendar API\n\
         4. Configure OAuth consent screen\n\
         5. Create OAuth client ID credentials\n\
         6. Download the credentials and save them as {}",
        credentials_path.display()
    )
}
