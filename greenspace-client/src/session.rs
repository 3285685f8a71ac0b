//! Persisted login session
//!
//! A JSON file holding the bearer token, the user and the last wallet
//! snapshot, so the app can start signed in and show a balance before
//! the first network round trip.

use serde::{Deserialize, Serialize};
use shared::client::UserInfo;
use std::fs;
use std::path::{Path, PathBuf};

use crate::wallet::WalletSnapshot;

const SESSION_FILE: &str = "session.json";

/// Session contents
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: UserInfo,
    #[serde(default)]
    pub wallet: Option<WalletSnapshot>,
    /// Unix seconds
    pub saved_at: i64,
}

impl Session {
    pub fn new(token: String, user: UserInfo) -> Self {
        Self {
            token,
            user,
            wallet: None,
            saved_at: chrono::Utc::now().timestamp(),
        }
    }
}

/// Session file storage
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            path: base_path.into().join(SESSION_FILE),
        }
    }

    fn ensure_dir(&self) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    pub fn save(&self, session: &Session) -> std::io::Result<()> {
        self.ensure_dir()?;
        let json = serde_json::to_string_pretty(session)?;
        fs::write(&self.path, json)
    }

    /// Load the session; a missing or unreadable file yields `None`.
    pub fn load(&self) -> Option<Session> {
        if !self.path.exists() {
            return None;
        }
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Could not read session file");
                return None;
            }
        };
        match serde_json::from_str(&json) {
            Ok(session) => Some(session),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Discarding unreadable session file");
                None
            }
        }
    }

    /// Replace the cached wallet snapshot of the stored session.
    pub fn update_wallet(&self, wallet: &WalletSnapshot) -> std::io::Result<()> {
        if let Some(mut session) = self.load() {
            session.wallet = Some(wallet.clone());
            self.save(&session)?;
        }
        Ok(())
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    pub fn delete(&self) -> std::io::Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
