//! Credential store
//!
//! Keeps the signed-in user's credential in a single durable slot: a JSON
//! file holding `{"username": ..., "password": ...}`. Written at login,
//! read at start, removed at logout.

use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

use crate::client::Credential;

/// Name of the durable slot
pub const AUTH_KEY: &str = "auth";

/// File-backed credential slot
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Store whose slot lives at `<dir>/auth.json`
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(format!("{}.json", AUTH_KEY)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored credential.
    ///
    /// A missing or unreadable slot means signed out.
    pub fn load(&self) -> Option<Credential> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!("Unable to read session file {:?}: {}", self.path, e);
                return None;
            }
        };

        match serde_json::from_str::<Credential>(&contents) {
            Ok(credential) => Some(credential),
            Err(e) => {
                tracing::warn!("Ignoring corrupt session file {:?}: {}", self.path, e);
                None
            }
        }
    }

    /// Persist a credential, replacing any previous one
    pub fn login(
        &self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Credential, SessionError> {
        let credential = Credential::new(username, password);
        self.save(&credential)?;
        tracing::info!(username = %credential.username, "Signed in");
        Ok(credential)
    }

    /// Remove the stored credential. Signing out twice is not an error.
    pub fn logout(&self) -> Result<(), SessionError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::info!("Signed out");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, credential: &Credential) -> Result<(), SessionError> {
        let parent = self
            .path
            .parent()
            .ok_or_else(|| SessionError::InvalidPath(self.path.clone()))?;
        std::fs::create_dir_all(parent)?;

        // Write beside the slot, then rename over it
        let mut temp = NamedTempFile::new_in(parent)?;
        temp.write_all(serde_json::to_string(credential)?.as_bytes())?;
        temp.as_file().sync_all()?;
        temp.persist(&self.path).map_err(|e| SessionError::Io(e.error))?;

        Ok(())
    }
}

/// Errors from the credential store
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid session path: {0:?}")]
    InvalidPath(PathBuf),
}
