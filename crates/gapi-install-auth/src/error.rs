//! Error types for the credential bootstrap.
//!
//! Every failure carries an [`AuthErrorCode`] so callers can tell the
//! operator-facing cases (missing credentials file, missing auth-code file)
//! apart from propagated failures such as malformed JSON or a rejected
//! token exchange.

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// The category of an authorization error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthErrorCode {
    /// The OAuth client-secret file does not exist.
    MissingCredentials,
    /// The authorization-code file does not exist.
    MissingAuthCode,
    /// A token file exists but cannot be read or parsed.
    TokenCorrupt,
    /// A file is present but its contents are not usable.
    ConfigurationError,
    /// The token endpoint rejected the exchange.
    AuthenticationFailed,
    /// The token endpoint could not be reached.
    NetworkError,
    /// The token endpoint answered with something we cannot parse.
    InvalidResponse,
    /// A local filesystem operation failed.
    IoError,
    /// Unexpected internal state.
    InternalError,
}

impl AuthErrorCode {
    /// Returns a stable machine-readable name for this code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingCredentials => "missing_credentials",
            Self::MissingAuthCode => "missing_auth_code",
            Self::TokenCorrupt => "token_corrupt",
            Self::ConfigurationError => "configuration_error",
            Self::AuthenticationFailed => "authentication_failed",
            Self::NetworkError => "network_error",
            Self::InvalidResponse => "invalid_response",
            Self::IoError => "io_error",
            Self::InternalError => "internal_error",
        }
    }
}

impl fmt::Display for AuthErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An error raised while obtaining or finalizing credentials.
#[derive(Debug, Error)]
pub struct AuthError {
    code: AuthErrorCode,
    message: String,
    /// File the error refers to, if any.
    path: Option<PathBuf>,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AuthError {
    /// Creates a new error with the given code and message.
    pub fn new(code: AuthErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: None,
            source: None,
        }
    }

    /// The client-secret file is missing.
    pub fn missing_credentials(path: impl AsRef<Path>) -> Self {
        Self::new(AuthErrorCode::MissingCredentials, "credentials file not found")
            .with_path(path)
    }

    /// The authorization-code file is missing.
    pub fn missing_auth_code(path: impl AsRef<Path>) -> Self {
        Self::new(AuthErrorCode::MissingAuthCode, "authorization code file not found")
            .with_path(path)
    }

    pub fn token_corrupt(message: impl Into<String>) -> Self {
        Self::new(AuthErrorCode::TokenCorrupt, message)
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(AuthErrorCode::ConfigurationError, message)
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(AuthErrorCode::AuthenticationFailed, message)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(AuthErrorCode::NetworkError, message)
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(AuthErrorCode::InvalidResponse, message)
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::new(AuthErrorCode::IoError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(AuthErrorCode::InternalError, message)
    }

    /// Attaches the file path this error refers to.
    pub fn with_path(mut self, path: impl AsRef<Path>) -> Self {
        self.path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the underlying cause.
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    pub fn code(&self) -> AuthErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(ref path) = self.path {
            write!(f, " ({})", path.display())?;
        }
        if let Some(ref source) = self.source {
            write!(f, ": {}", source)?;
        }
        Ok(())
    }
}

/// A specialized Result type for authorization operations.
pub type AuthResult<T> = Result<T, AuthError>;
