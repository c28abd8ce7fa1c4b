//! Session persistence (user object + bearer token)

use std::sync::Arc;

use fleet_shared::constants::{SESSION_TOKEN_KEY, SESSION_USER_KEY};
use fleet_shared::utils::mask_email;
use tracing::{info, warn};
use validator::Validate;

use crate::domain::{Session, SessionUser};
use crate::error::AccessError;
use crate::storage::LocalStorage;

pub struct SessionStore {
    storage: Arc<dyn LocalStorage>,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn LocalStorage>) -> Self {
        Self { storage }
    }

    /// Stored session, if both the user and the token are present and readable.
    pub fn load(&self) -> Option<Session> {
        let user = self.user()?;
        let token = self.token()?;
        Some(Session { user, token })
    }

    pub fn user(&self) -> Option<SessionUser> {
        let raw = self.read(SESSION_USER_KEY)?;
        match serde_json::from_str::<SessionUser>(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                warn!("Malformed session user in storage: {}", e);
                None
            }
        }
    }

    pub fn token(&self) -> Option<String> {
        self.read(SESSION_TOKEN_KEY)
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
    }

    pub fn save(&self, session: &Session) -> Result<(), AccessError> {
        session
            .user
            .validate()
            .map_err(|e| AccessError::InvalidSession(e.to_string()))?;
        if session.token.trim().is_empty() {
            return Err(AccessError::InvalidSession("token is empty".into()));
        }

        let raw = serde_json::to_string(&session.user)?;
        self.storage.set_item(SESSION_USER_KEY, &raw)?;
        self.storage.set_item(SESSION_TOKEN_KEY, session.token.trim())?;

        info!(
            "Session stored for {} (role: {})",
            mask_email(&session.user.email),
            session.user.role
        );
        Ok(())
    }

    pub fn clear(&self) -> Result<(), AccessError> {
        self.storage.remove_item(SESSION_USER_KEY)?;
        self.storage.remove_item(SESSION_TOKEN_KEY)?;
        info!("Session cleared");
        Ok(())
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.storage.get_item(key) {
            Ok(value) => value,
            Err(e) => {
                warn!("Failed to read {} from storage: {}", key, e);
                None
            }
        }
    }
}
