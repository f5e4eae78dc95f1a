//! Persisted refresh-token storage.
//!
//! The token file uses Google's `authorized_user` JSON shape so that other
//! Google client libraries can load it directly.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::credentials::ClientSecret;
use crate::error::{AuthError, AuthResult};

/// Discriminator written into the `type` field of the token file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenType {
    #[serde(rename = "authorized_user")]
    AuthorizedUser,
}

/// The persisted authorization artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredToken {
    #[serde(rename = "type")]
    pub token_type: TokenType,
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
}

impl StoredToken {
    /// Merges a refresh token with the client registration it was issued to.
    pub fn new(secret: &ClientSecret, refresh_token: impl Into<String>) -> Self {
        Self {
            token_type: TokenType::AuthorizedUser,
            client_id: secret.client_id.clone(),
            client_secret: secret.client_secret.clone(),
            refresh_token: refresh_token.into(),
        }
    }
}

/// File-backed token storage.
///
/// Writes go through a temporary file and a rename, so a reader never sees
/// a half-written token.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Loads the stored token.
    ///
    /// Returns `Ok(None)` when no token file exists. A file that exists but
    /// cannot be read or parsed is a [`TokenCorrupt`] error rather than
    /// "no token", so `obtain` stops instead of asking for a fresh
    /// authorization. A later [`save`](Self::save) still overwrites it.
    ///
    /// [`TokenCorrupt`]: crate::error::AuthErrorCode::TokenCorrupt
    pub fn load(&self) -> AuthResult<Option<StoredToken>> {
        if !self.path.exists() {
            debug!("no token file at {:?}", self.path);
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path).map_err(|e| {
            AuthError::token_corrupt("failed to read token file")
                .with_path(&self.path)
                .with_source(e)
        })?;

        let token: StoredToken = serde_json::from_str(&content).map_err(|e| {
            AuthError::token_corrupt("failed to parse token file")
                .with_path(&self.path)
                .with_source(e)
        })?;

        info!("loaded token from {:?}", self.path);
        Ok(Some(token))
    }

    /// Writes the token, replacing any previous one.
    pub fn save(&self, token: &StoredToken) -> AuthResult<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| {
                AuthError::io("failed to create token directory")
                    .with_path(parent)
                    .with_source(e)
            })?;
        }

        let content = serde_json::to_string(token)
            .map_err(|e| AuthError::internal("failed to serialize token").with_source(e))?;

        let temp_path = self.path.with_extension("json.tmp");
        write_private(&temp_path, content.as_bytes())?;

        fs::rename(&temp_path, &self.path).map_err(|e| {
            AuthError::io("failed to move token file into place")
                .with_path(&self.path)
                .with_source(e)
        })?;

        debug!("saved token to {:?}", self.path);
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Writes `bytes` to `path`, readable by the owner only on Unix.
///
/// The mode is set when the file is created and reapplied to the open
/// handle, so a stale file left behind by an earlier run is narrowed too.
fn write_private(path: &Path, bytes: &[u8]) -> AuthResult<()> {
    let io_err = |message: &'static str| {
        move |e: std::io::Error| AuthError::io(message).with_path(path).with_source(e)
    };

    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path).map_err(io_err("failed to create token file"))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(0o600))
            .map_err(io_err("failed to restrict token file permissions"))?;
    }

    file.write_all(bytes).map_err(io_err("failed to write token file"))?;
    file.sync_all().map_err(io_err("failed to flush token file"))?;
    Ok(())
}
