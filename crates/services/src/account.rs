//! # Accounts
//!
//! Registration, sign-in/out and profile lookup on top of the identity and
//! profile ports. Forms are validated before any port is called.

use std::sync::Arc;

use chrono::Utc;
use domains::{
    CurrentUser, DomainResult, IdentityProvider, ProfileStore, RegistrationForm, SignInForm,
    UserId, UserProfile,
};
use tracing::info;

pub struct AccountService {
    identity: Arc<dyn IdentityProvider>,
    profiles: Arc<dyn ProfileStore>,
    user: Arc<dyn CurrentUser>,
}

impl AccountService {
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        profiles: Arc<dyn ProfileStore>,
        user: Arc<dyn CurrentUser>,
    ) -> Self {
        Self {
            identity,
            profiles,
            user,
        }
    }

    /// Creates the account, signs it in and stores the profile.
    pub async fn register(&self, form: RegistrationForm) -> DomainResult<UserId> {
        form.validate()?;
        let user = self.identity.sign_up(&form.email, &form.password).await?;

        let profile = UserProfile {
            name: form.name,
            surname: form.surname,
            email: form.email,
            gender: form.gender,
            created_at: Utc::now().timestamp_millis(),
        };
        self.profiles.put(&user, profile).await?;
        info!(user_id = %user, "user registered");
        Ok(user)
    }

    pub async fn sign_in(&self, form: SignInForm) -> DomainResult<UserId> {
        form.validate()?;
        self.identity.sign_in(&form.email, &form.password).await
    }

    pub async fn sign_out(&self) -> DomainResult<()> {
        self.identity.sign_out().await?;
        info!("signed out");
        Ok(())
    }

    /// Profile of the signed-in user, if any.
    pub async fn profile(&self) -> DomainResult<Option<UserProfile>> {
        match self.user.user_id() {
            Some(user) => self.profiles.get(&user).await,
            None => Ok(None),
        }
    }
}
