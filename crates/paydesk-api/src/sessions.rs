use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use uuid::Uuid;

use paydesk_types::models::AdminUser;

/// Process-wide token→user mapping behind the admin surface. Constructed at
/// startup and injected through the app state; tokens live until explicit
/// logout or process restart.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<String, AdminUser>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint an opaque token and bind it to the user.
    pub fn issue(&self, user: AdminUser) -> String {
        let token = Uuid::new_v4().to_string();
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(token.clone(), user);
        token
    }

    /// Absent or unknown tokens are simply unauthenticated.
    pub fn authenticate(&self, token: &str) -> Option<AdminUser> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(token)
            .cloned()
    }

    /// Revoking an already-absent token is a no-op.
    pub fn revoke(&self, token: &str) {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> AdminUser {
        AdminUser {
            id: 1,
            login: "admin".to_string(),
        }
    }

    #[test]
    fn issued_token_authenticates() {
        let sessions = SessionStore::new();
        let token = sessions.issue(user());
        assert_eq!(sessions.authenticate(&token).unwrap().login, "admin");
    }

    #[test]
    fn tokens_are_unique_per_login() {
        let sessions = SessionStore::new();
        let a = sessions.issue(user());
        let b = sessions.issue(user());
        assert_ne!(a, b);
        assert!(sessions.authenticate(&a).is_some());
        assert!(sessions.authenticate(&b).is_some());
    }

    #[test]
    fn unknown_token_is_unauthenticated() {
        let sessions = SessionStore::new();
        assert!(sessions.authenticate("nope").is_none());
    }

    #[test]
    fn revoked_token_stops_authenticating() {
        let sessions = SessionStore::new();
        let token = sessions.issue(user());
        sessions.revoke(&token);
        assert!(sessions.authenticate(&token).is_none());
    }

    #[test]
    fn double_revoke_is_a_noop() {
        let sessions = SessionStore::new();
        let token = sessions.issue(user());
        sessions.revoke(&token);
        sessions.revoke(&token);
        assert!(sessions.authenticate(&token).is_none());
    }
}
