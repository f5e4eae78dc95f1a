//! Authorization URL construction and authorization-code exchange.
//!
//! The operator visits the URL built by [`build_auth_url`], grants access,
//! and copies the returned code into a file. [`TokenExchange`] turns that
//! code into a [`TokenGrant`]; [`GoogleTokenEndpoint`] is the production
//! implementation.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, info};

use crate::credentials::ClientSecret;
use crate::error::{AuthError, AuthResult};

/// Google OAuth endpoints.
pub const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Scopes requested by default: Gmail read and send, Calendar read/write.
pub const DEFAULT_SCOPES: [&str; 4] = [
    "https://www.googleapis.com/auth/gmail.readonly",
    "https://www.googleapis.com/auth/gmail.send",
    "https://www.googleapis.com/auth/calendar",
    "https://www.googleapis.com/auth/calendar.events",
];

/// Default request timeout for the token exchange.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// A boxed future, used so [`TokenExchange`] stays object safe.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Returns [`DEFAULT_SCOPES`] as owned strings.
pub fn default_scopes() -> Vec<String> {
    DEFAULT_SCOPES.iter().map(|s| s.to_string()).collect()
}

/// Builds the Google consent URL for offline access.
pub fn build_auth_url(client_id: &str, redirect_uri: &str, scopes: &[String]) -> String {
    let scope = scopes.join(" ");

    format!(
        "{}?access_type=offline&scope={}&response_type=code&client_id={}&redirect_uri={}",
        GOOGLE_AUTH_URL,
        urlencoding::encode(&scope),
        urlencoding::encode(client_id),
        urlencoding::encode(redirect_uri),
    )
}

/// Tokens returned by the token endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenGrant {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// Exchanges an authorization code for tokens.
///
/// Implementations perform the only network call of the bootstrap.
pub trait TokenExchange: Send + Sync {
    fn exchange<'a>(
        &'a self,
        secret: &'a ClientSecret,
        code: &'a str,
    ) -> BoxFuture<'a, AuthResult<TokenGrant>>;
}

/// Token exchange against Google's OAuth 2.0 token endpoint.
#[derive(Debug, Clone)]
pub struct GoogleTokenEndpoint {
    token_url: String,
    http_client: reqwest::Client,
}

impl GoogleTokenEndpoint {
    /// Creates an exchanger for the production token endpoint.
    pub fn new(timeout: Duration) -> AuthResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(format!("gapi-install/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AuthError::internal("failed to create HTTP client").with_source(e))?;

        Ok(Self {
            token_url: GOOGLE_TOKEN_URL.to_string(),
            http_client,
        })
    }

    /// Points the exchanger at a different token endpoint.
    pub fn with_token_url(mut self, url: impl Into<String>) -> Self {
        self.token_url = url.into();
        self
    }

    async fn exchange_code(&self, secret: &ClientSecret, code: &str) -> AuthResult<TokenGrant> {
        let params = [
            ("code", code),
            ("client_id", secret.client_id.as_str()),
            ("client_secret", secret.client_secret.as_str()),
            ("redirect_uri", secret.redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
        ];

        debug!("exchanging authorization code at {}", self.token_url);
        let response = self
            .http_client
            .post(&self.token_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| AuthError::network("token exchange request failed").with_source(e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AuthError::network("failed to read token response").with_source(e))?;

        if !status.is_success() {
            return Err(AuthError::authentication(format!(
                "token exchange failed ({}): {}",
                status, body
            )));
        }

        let grant: TokenGrant = serde_json::from_str(&body).map_err(|e| {
            AuthError::invalid_response("invalid token response").with_source(e)
        })?;

        info!("obtained tokens from authorization code");
        Ok(grant)
    }
}

impl TokenExchange for GoogleTokenEndpoint {
    fn exchange<'a>(
        &'a self,
        secret: &'a ClientSecret,
        code: &'a str,
    ) -> BoxFuture<'a, AuthResult<TokenGrant>> {
        Box::pin(self.exchange_code(secret, code))
    }
}
