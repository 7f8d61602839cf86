//! # auth-adapters
//!
//! Argon2-based implementation of `IdentityProvider` that also answers
//! `CurrentUser` for the session it holds, plus a fixed `StaticUser`.

use std::sync::RwLock;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use async_trait::async_trait;
use dashmap::DashMap;
use domains::{CurrentUser, DomainError, DomainResult, IdentityProvider, UserId};
use uuid::Uuid;

struct Account {
    user_id: UserId,
    password_hash: String,
}

/// Email/password accounts kept in memory, with a single active session.
#[derive(Default)]
pub struct LocalIdentityProvider {
    /// Keyed by lowercased email
    accounts: DashMap<String, Account>,
    session: RwLock<Option<UserId>>,
}

impl LocalIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    fn set_session(&self, user: Option<UserId>) -> DomainResult<()> {
        let mut session = self
            .session
            .write()
            .map_err(|_| DomainError::Store("session lock poisoned".into()))?;
        *session = user;
        Ok(())
    }
}

fn hash_password(password: &str) -> DomainResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| DomainError::Store(format!("password hashing failed: {e}")))
}

/// Verifies a password against a stored Argon2 hash.
fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(p) => p,
        Err(_) => return false,
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

#[async_trait]
impl IdentityProvider for LocalIdentityProvider {
    async fn sign_up(&self, email: &str, password: &str) -> DomainResult<UserId> {
        let key = email.to_lowercase();
        if self.accounts.contains_key(&key) {
            return Err(DomainError::Conflict(format!("email {email} already in use")));
        }
        let account = Account {
            user_id: UserId::new(Uuid::new_v4().simple().to_string()),
            password_hash: hash_password(password)?,
        };
        let user_id = account.user_id.clone();
        self.accounts.insert(key, account);
        self.set_session(Some(user_id.clone()))?;
        tracing::info!(user_id = %user_id, "account created");
        Ok(user_id)
    }

    async fn sign_in(&self, email: &str, password: &str) -> DomainResult<UserId> {
        let user_id = {
            let account = self
                .accounts
                .get(&email.to_lowercase())
                .ok_or_else(|| DomainError::not_found("User", email))?;
            if !verify_password(password, &account.password_hash) {
                return Err(DomainError::Unauthorized("wrong password".into()));
            }
            account.user_id.clone()
        };
        self.set_session(Some(user_id.clone()))?;
        tracing::info!(user_id = %user_id, "signed in");
        Ok(user_id)
    }

    async fn sign_out(&self) -> DomainResult<()> {
        self.set_session(None)
    }
}

impl CurrentUser for LocalIdentityProvider {
    fn user_id(&self) -> Option<UserId> {
        self.session.read().ok().and_then(|s| s.clone())
    }
}

/// A `CurrentUser` that never changes. `None` models a signed-out shell.
#[derive(Debug, Clone, Default)]
pub struct StaticUser(pub Option<UserId>);

impl StaticUser {
    pub fn signed_in(id: impl Into<String>) -> Self {
        Self(Some(UserId::new(id)))
    }

    pub fn anonymous() -> Self {
        Self(None)
    }
}

impl CurrentUser for StaticUser {
    fn user_id(&self) -> Option<UserId> {
        self.0.clone()
    }
}
