//! The two-phase authorization flow.
//!
//! ```text
//! NO_TOKEN --obtain()--> AWAITING_CODE --save_token()--> HAS_TOKEN
//! ```
//!
//! [`Authorizer::obtain`] either returns the saved credentials or prints
//! nothing and hands back the consent URL; it never blocks for input.
//! [`Authorizer::save_token`] consumes the code the operator pasted into
//! the auth-code file.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::credentials::ClientSecret;
use crate::error::{AuthError, AuthResult};
use crate::oauth::{TokenExchange, build_auth_url, default_scopes};
use crate::token::{StoredToken, TokenStore};

/// Locations of the files the flow reads and writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthPaths {
    /// OAuth client secret downloaded from the Cloud Console.
    pub credentials: PathBuf,
    /// Where the `authorized_user` token is written.
    pub token: PathBuf,
    /// Operator-created file holding the authorization code.
    pub auth_code: PathBuf,
}

impl AuthPaths {
    pub const DEFAULT_CREDENTIALS: &'static str = "credentials.json";
    pub const DEFAULT_TOKEN: &'static str = "token.json";
    pub const DEFAULT_AUTH_CODE: &'static str = "auth-code.txt";

    /// Places all three files in `dir` under their default names.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            credentials: dir.join(Self::DEFAULT_CREDENTIALS),
            token: dir.join(Self::DEFAULT_TOKEN),
            auth_code: dir.join(Self::DEFAULT_AUTH_CODE),
        }
    }
}

impl Default for AuthPaths {
    fn default() -> Self {
        Self {
            credentials: PathBuf::from(Self::DEFAULT_CREDENTIALS),
            token: PathBuf::from(Self::DEFAULT_TOKEN),
            auth_code: PathBuf::from(Self::DEFAULT_AUTH_CODE),
        }
    }
}

/// Credentials loaded from a stored token, ready for a consuming application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizedClient {
    token: StoredToken,
}

impl AuthorizedClient {
    pub fn from_token(token: StoredToken) -> Self {
        Self { token }
    }

    pub fn client_id(&self) -> &str {
        &self.token.client_id
    }

    pub fn client_secret(&self) -> &str {
        &self.token.client_secret
    }

    pub fn refresh_token(&self) -> &str {
        &self.token.refresh_token
    }

    pub fn token(&self) -> &StoredToken {
        &self.token
    }
}

/// Result of [`Authorizer::obtain`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Obtained {
    /// A saved token was found.
    Authorized(AuthorizedClient),
    /// No token yet; the operator must visit `auth_url` and paste the code
    /// into `auth_code_path`.
    AwaitingCode {
        auth_url: String,
        auth_code_path: PathBuf,
    },
}

/// Drives the bootstrap flow over a set of injected paths.
pub struct Authorizer<E> {
    paths: AuthPaths,
    scopes: Vec<String>,
    exchange: E,
}

impl<E: TokenExchange> Authorizer<E> {
    /// Creates an authorizer requesting the default Gmail and Calendar scopes.
    pub fn new(paths: AuthPaths, exchange: E) -> Self {
        Self {
            paths,
            scopes: default_scopes(),
            exchange,
        }
    }

    pub fn with_scopes(mut self, scopes: Vec<String>) -> Self {
        self.scopes = scopes;
        self
    }

    pub fn paths(&self) -> &AuthPaths {
        &self.paths
    }

    pub fn scopes(&self) -> &[String] {
        &self.scopes
    }

    /// Returns the saved credentials, or the consent URL if there are none.
    ///
    /// Never touches the network.
    pub fn obtain(&self) -> AuthResult<Obtained> {
        if let Some(token) = TokenStore::new(&self.paths.token).load()? {
            debug!("using stored token for client {}", token.client_id);
            return Ok(Obtained::Authorized(AuthorizedClient::from_token(token)));
        }

        let secret = ClientSecret::from_file(&self.paths.credentials)?;
        if self.scopes.is_empty() {
            return Err(AuthError::configuration("at least one OAuth scope is required"));
        }

        let auth_url = build_auth_url(&secret.client_id, &secret.redirect_uri, &self.scopes);
        info!("no stored token, authorization required");
        debug!("authorization URL: {}", auth_url);

        Ok(Obtained::AwaitingCode {
            auth_url,
            auth_code_path: self.paths.auth_code.clone(),
        })
    }

    /// Exchanges the pasted authorization code and writes the token file.
    ///
    /// The auth-code file is removed only once the token is on disk, so a
    /// failed run can be retried with the same file in place.
    pub async fn save_token(&self) -> AuthResult<StoredToken> {
        let code = read_auth_code(&self.paths.auth_code)?;
        let secret = ClientSecret::from_file(&self.paths.credentials)?;

        let grant = self.exchange.exchange(&secret, &code).await?;
        let refresh_token = grant.refresh_token.ok_or_else(|| {
            AuthError::authentication(
                "token response did not include a refresh token; \
                 revoke the app's access in your Google account and authorize again",
            )
        })?;

        let token = StoredToken::new(&secret, refresh_token);
        TokenStore::new(&self.paths.token).save(&token)?;
        info!("token stored at {:?}", self.paths.token);

        if let Err(e) = fs::remove_file(&self.paths.auth_code) {
            warn!(
                "could not remove consumed auth code {:?}: {}",
                self.paths.auth_code, e
            );
        }

        Ok(token)
    }
}

/// Reads and trims the operator-supplied authorization code.
fn read_auth_code(path: &Path) -> AuthResult<String> {
    if !path.exists() {
        return Err(AuthError::missing_auth_code(path));
    }

    let content = fs::read_to_string(path).map_err(|e| {
        AuthError::io("failed to read authorization code")
            .with_path(path)
            .with_source(e)
    })?;

    let code = content.trim();
    if code.is_empty() {
        return Err(AuthError::configuration("authorization code file is empty").with_path(path));
    }
    Ok(code.to_string())
}
