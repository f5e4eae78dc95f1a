//! Google OAuth credential bootstrap.
//!
//! This crate obtains a long-lived refresh token for a Google API client
//! (Gmail and Calendar) in two operator-driven phases:
//!
//! 1. [`Authorizer::obtain`] returns saved credentials if a token file
//!    exists, otherwise the consent URL the operator has to visit.
//! 2. [`Authorizer::save_token`] exchanges the code the operator pasted into
//!    the auth-code file and writes an `authorized_user` token file.
//!
//! ```ignore
//! use gapi_install_auth::{AuthPaths, Authorizer, GoogleTokenEndpoint, Obtained};
//!
//! let endpoint = GoogleTokenEndpoint::new(gapi_install_auth::oauth::DEFAULT_TIMEOUT)?;
//! let authorizer = Authorizer::new(AuthPaths::default(), endpoint);
//! match authorizer.obtain()? {
//!     Obtained::Authorized(client) => println!("ready: {}", client.client_id()),
//!     Obtained::AwaitingCode { auth_url, .. } => println!("visit {}", auth_url),
//! }
//! ```

pub mod authorizer;
pub mod credentials;
pub mod error;
pub mod oauth;
pub mod token;

pub use authorizer::{AuthPaths, AuthorizedClient, Authorizer, Obtained};
pub use credentials::ClientSecret;
pub use error::{AuthError, AuthErrorCode, AuthResult};
pub use oauth::{
    BoxFuture, DEFAULT_SCOPES, GoogleTokenEndpoint, TokenExchange, TokenGrant, build_auth_url,
    default_scopes,
};
pub use token::{StoredToken, TokenStore, TokenType};
