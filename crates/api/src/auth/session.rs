//! In-memory session tokens.

use std::collections::HashMap;

use tokio::sync::RwLock;

use crate::middleware::auth::AuthUser;

/// Maps opaque bearer tokens to authenticated users.
///
/// Thread-safe via interior `RwLock`; designed to be wrapped in `Arc` and
/// shared across the application. Sessions live until logout or process
/// restart — there is no expiry, matching the single-site-office deployment.
#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, AuthUser>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session for a user, returning the new bearer token.
    pub async fn create(&self, user: AuthUser) -> String {
        let token = uuid::Uuid::new_v4().to_string();
        self.sessions.write().await.insert(token.clone(), user);
        token
    }

    /// Resolve a bearer token to its user, if the session exists.
    pub async fn resolve(&self, token: &str) -> Option<AuthUser> {
        self.sessions.read().await.get(token).cloned()
    }

    /// Remove a session. Returns whether the token existed.
    pub async fn revoke(&self, token: &str) -> bool {
        self.sessions.write().await.remove(token).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitedesk_core::roles::Role;

    fn user() -> AuthUser {
        AuthUser {
            username: "pm".into(),
            display_name: "Project Manager".into(),
            role: Role::ProjectManager,
        }
    }

    #[tokio::test]
    async fn create_resolve_revoke_cycle() {
        let store = SessionStore::new();
        let token = store.create(user()).await;

        let resolved = store.resolve(&token).await.unwrap();
        assert_eq!(resolved.role, Role::ProjectManager);

        assert!(store.revoke(&token).await);
        assert!(store.resolve(&token).await.is_none());
        assert!(!store.revoke(&token).await);
    }

    #[tokio::test]
    async fn unknown_token_does_not_resolve() {
        let store = SessionStore::new();
        assert!(store.resolve("not-a-token").await.is_none());
    }
}
