use std::sync::{Arc, PoisonError, RwLock};

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::models::UserProfile;
use crate::storage::{LocalStorage, TOKEN_KEY, USER_INFO_KEY};

/// In-memory view of who is signed in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub token: String,
    pub user_info: UserProfile,
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        !self.token.is_empty()
    }
}

/// Single source of truth for the signed-in user, mirrored into durable
/// storage.
///
/// Created once at startup and shared by `Arc` handle. Locks are only held
/// for the duration of a read or write, never across an `.await`.
pub struct SessionContext {
    storage: Arc<dyn LocalStorage>,
    state: RwLock<SessionState>,
}

impl SessionContext {
    /// Build the session from durable storage.
    ///
    /// If either entry is missing or the profile cannot be read, the session
    /// starts unauthenticated with both values empty.
    pub fn restore(storage: Arc<dyn LocalStorage>) -> Self {
        let state = match Self::read_stored(storage.as_ref()) {
            Ok(Some(state)) => state,
            Ok(None) => SessionState::default(),
            Err(e) => {
                warn!(error = %e, "Ignoring unreadable stored session");
                SessionState::default()
            }
        };
        debug!(authenticated = state.is_authenticated(), "Session restored");
        Self {
            storage,
            state: RwLock::new(state),
        }
    }

    fn read_stored(storage: &dyn LocalStorage) -> Result<Option<SessionState>> {
        let token = storage.get_item(TOKEN_KEY)?.filter(|t| !t.is_empty());
        let user_info = storage.get_item(USER_INFO_KEY)?;
        match (token, user_info) {
            (Some(token), Some(raw)) => {
                let user_info: UserProfile =
                    serde_json::from_str(&raw).context("Failed to parse stored user info")?;
                Ok(Some(SessionState { token, user_info }))
            }
            _ => Ok(None),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().is_authenticated()
    }

    /// The bearer credential, if signed in.
    pub fn token(&self) -> Option<String> {
        let state = self.read();
        if state.token.is_empty() {
            None
        } else {
            Some(state.token.clone())
        }
    }

    pub fn user_info(&self) -> UserProfile {
        self.read().user_info.clone()
    }

    pub fn snapshot(&self) -> SessionState {
        self.read().clone()
    }

    /// Set the credential in memory and persist it.
    pub fn set_token(&self, token: &str) -> Result<()> {
        self.write().token = token.to_string();
        self.storage
            .set_item(TOKEN_KEY, token)
            .context("Failed to persist token")
    }

    /// Set the profile in memory and persist it.
    pub fn set_user_info(&self, user_info: UserProfile) -> Result<()> {
        let raw = serde_json::to_string(&user_info)?;
        self.write().user_info = user_info;
        self.storage
            .set_item(USER_INFO_KEY, &raw)
            .context("Failed to persist user info")
    }

    /// Replace credential and profile together, in memory only.
    pub fn apply(&self, token: &str, user_info: UserProfile) {
        let mut state = self.write();
        state.token = token.to_string();
        state.user_info = user_info;
    }

    /// Write the in-memory state to storage.
    ///
    /// An authenticated session writes both entries; otherwise both are
    /// removed.
    pub fn persist(&self) -> Result<()> {
        let state = self.snapshot();
        if state.is_authenticated() {
            let raw = serde_json::to_string(&state.user_info)?;
            self.storage
                .set_item(TOKEN_KEY, &state.token)
                .context("Failed to persist token")?;
            self.storage
                .set_item(USER_INFO_KEY, &raw)
                .context("Failed to persist user info")?;
        } else {
            self.storage
                .remove_item(TOKEN_KEY)
                .context("Failed to remove stored token")?;
            self.storage
                .remove_item(USER_INFO_KEY)
                .context("Failed to remove stored user info")?;
        }
        Ok(())
    }

    /// Replace credential and profile together and persist both.
    pub fn establish(&self, token: &str, user_info: UserProfile) -> Result<()> {
        self.apply(token, user_info);
        self.persist()
    }

    /// Forget the signed-in user in memory and in storage. Never fails;
    /// storage errors are logged.
    pub fn clear(&self) {
        *self.write() = SessionState::default();
        if let Err(e) = self.persist() {
            warn!(error = %e, "Failed to clear stored session");
        }
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, SessionState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, SessionState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use serde_json::json;

    fn profile() -> UserProfile {
        serde_json::from_value(json!({"id": 1, "username": "ada", "email": "ada@example.com"}))
            .unwrap()
    }

    #[test]
    fn test_restore_from_empty_storage() {
        let session = SessionContext::restore(Arc::new(MemoryStorage::new()));
        assert!(!session.is_authenticated());
        assert_eq!(session.token(), None);
        assert!(session.user_info().is_empty());
    }

    #[test]
    fn test_set_token_and_user_info_round_trip() {
        let storage = Arc::new(MemoryStorage::new());
        let session = SessionContext::restore(storage.clone());
        session.set_token("jwt-1").unwrap();
        session.set_user_info(profile()).unwrap();

        let reloaded = SessionContext::restore(storage);
        assert_eq!(reloaded.token().as_deref(), Some("jwt-1"));
        assert_eq!(reloaded.user_info(), profile());
    }

    #[test]
    fn test_token_without_profile_is_unauthenticated() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set_item(TOKEN_KEY, "jwt-1").unwrap();

        let session = SessionContext::restore(storage);
        assert!(!session.is_authenticated());
        assert!(session.user_info().is_empty());
    }

    #[test]
    fn test_profile_without_token_is_unauthenticated() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set_item(USER_INFO_KEY, r#"{"id":1}"#).unwrap();

        let session = SessionContext::restore(storage);
        assert!(!session.is_authenticated());
        assert!(session.user_info().is_empty());
    }

    #[test]
    fn test_unreadable_profile_is_unauthenticated() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set_item(TOKEN_KEY, "jwt-1").unwrap();
        storage.set_item(USER_INFO_KEY, "{not json").unwrap();

        let session = SessionContext::restore(storage);
        assert!(!session.is_authenticated());
        assert_eq!(session.token(), None);
    }

    #[test]
    fn test_apply_does_not_touch_storage_until_persist() {
        let storage = Arc::new(MemoryStorage::new());
        let session = SessionContext::restore(storage.clone());

        session.apply("jwt-2", profile());
        assert!(session.is_authenticated());
        assert_eq!(storage.get_item(TOKEN_KEY).unwrap(), None);

        session.persist().unwrap();
        assert_eq!(storage.get_item(TOKEN_KEY).unwrap().as_deref(), Some("jwt-2"));
        assert!(storage.get_item(USER_INFO_KEY).unwrap().is_some());
    }

    #[test]
    fn test_clear_removes_both_entries() {
        let storage = Arc::new(MemoryStorage::new());
        let session = SessionContext::restore(storage.clone());
        session.establish("jwt-3", profile()).unwrap();

        session.clear();
        assert!(!session.is_authenticated());
        assert!(session.user_info().is_empty());
        assert!(storage.is_empty());

        session.clear();
        assert_eq!(session.snapshot(), SessionState::default());
        assert!(storage.is_empty());
    }
}
