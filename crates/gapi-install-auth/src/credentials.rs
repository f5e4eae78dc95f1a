//! OAuth client secrets as issued by the Google Cloud Console.

use std::path::Path;

use serde::Deserialize;

use crate::error::{AuthError, AuthResult};

/// The OAuth client registration used for both the authorization URL and
/// the code exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSecret {
    /// The OAuth 2.0 client ID.
    pub client_id: String,
    /// The OAuth 2.0 client secret.
    pub client_secret: String,
    /// The first redirect URI registered for the client.
    pub redirect_uri: String,
}

/// Structure of Google's credentials JSON file.
///
/// Google issues either an `installed` (desktop) or a `web` section
/// depending on the application type.
#[derive(Debug, Deserialize)]
struct CredentialsFile {
    installed: Option<ClientSection>,
    web: Option<ClientSection>,
}

#[derive(Debug, Deserialize)]
struct ClientSection {
    client_id: String,
    client_secret: String,
    #[serde(default)]
    redirect_uris: Vec<String>,
}

impl ClientSecret {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: redirect_uri.into(),
        }
    }

    /// Loads the client secret from a credentials JSON file.
    ///
    /// A missing file is reported as [`AuthErrorCode::MissingCredentials`]
    /// so the caller can print setup instructions.
    ///
    /// [`AuthErrorCode::MissingCredentials`]: crate::error::AuthErrorCode::MissingCredentials
    pub fn from_file(path: impl AsRef<Path>) -> AuthResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(AuthError::missing_credentials(path));
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            AuthError::io("failed to read credentials file")
                .with_path(path)
                .with_source(e)
        })?;
        Self::from_json(&content).map_err(|e| e.with_path(path))
    }

    /// Parses a client secret from credentials JSON.
    ///
    /// The `installed` section wins over `web` when both are present.
    pub fn from_json(json: &str) -> AuthResult<Self> {
        let file: CredentialsFile = serde_json::from_str(json).map_err(|e| {
            AuthError::configuration("failed to parse credentials JSON").with_source(e)
        })?;

        let section = file.installed.or(file.web).ok_or_else(|| {
            AuthError::configuration("credentials file needs an 'installed' or 'web' section")
        })?;

        let redirect_uri = section.redirect_uris.into_iter().next().ok_or_else(|| {
            AuthError::configuration("credentials file does not list any redirect_uris")
        })?;

        Ok(Self::new(section.client_id, section.client_secret, redirect_uri))
    }
}
