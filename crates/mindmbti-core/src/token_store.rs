// Durable token storage: a single file under the platform data directory.
//
// The API client never touches this; the orchestrator saves the token after
// a successful login and clears it on logout.

use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use thiserror::Error;
use tracing::debug;

use crate::session::AuthToken;

/// Environment variable that overrides the token file location.
pub const TOKEN_FILE_ENV: &str = "MINDMBTI_TOKEN_FILE";

#[derive(Debug, Error)]
pub enum TokenStoreError {
    #[error("could not determine a data directory for the token file")]
    NoDataDir,

    #[error("token file I/O failed at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn at(path: impl Into<PathBuf>) -> Self {
        TokenStore { path: path.into() }
    }

    /// `$MINDMBTI_TOKEN_FILE` if set, otherwise `<data_dir>/token`.
    pub fn default_location() -> Result<Self, TokenStoreError> {
        if let Some(path) = std::env::var_os(TOKEN_FILE_ENV) {
            return Ok(TokenStore::at(path));
        }
        let dirs = ProjectDirs::from("", "", "mindmbti").ok_or(TokenStoreError::NoDataDir)?;
        Ok(TokenStore::at(dirs.data_dir().join("token")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored token. A missing or blank file means "logged out".
    pub fn load(&self) -> Result<Option<AuthToken>, TokenStoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(text) => Ok(AuthToken::new(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.io_error(e)),
        }
    }

    pub fn save(&self, token: &AuthToken) -> Result<(), TokenStoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
            }
        }
        let mut file = owner_only_options()
            .open(&self.path)
            .map_err(|e| self.io_error(e))?;
        // The creation mode does not apply to a file that already exists.
        restrict_permissions(&self.path).map_err(|e| self.io_error(e))?;
        file.write_all(token.expose().as_bytes())
            .map_err(|e| self.io_error(e))?;
        debug!(path = %self.path.display(), "token saved");
        Ok(())
    }

    pub fn clear(&self) -> Result<(), TokenStoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "token cleared");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }

    fn io_error(&self, source: std::io::Error) -> TokenStoreError {
        TokenStoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

fn owner_only_options() -> OpenOptions {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    options
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}
