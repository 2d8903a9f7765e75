use regex::Regex;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::auth::password::{MAX_PASSWORD_BYTES, PasswordHasher};
use crate::auth::token::TokenIssuer;
use crate::core::error::{self, Error};
use crate::core::store::{self, UserStore, within};
use crate::types::request::{LoginData, RegisterData};
use crate::types::response::{Profile, PublicUser};
use crate::types::user::{AuthenticatedUser, Identity, Role};

const MAX_USERNAME_CHARS: usize = 64;

#[derive(Clone)]
pub(crate) struct UserController {
    store: Arc<dyn UserStore>,
    hasher: PasswordHasher,
    issuer: TokenIssuer,
    store_timeout: Duration,
    email_pattern: Regex,
}

impl std::fmt::Debug for UserController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserController")
            .field("hasher", &self.hasher)
            .field("store_timeout", &self.store_timeout)
            .field("email_pattern", &self.email_pattern.as_str())
            .finish_non_exhaustive()
    }
}

impl UserController {
    pub(crate) fn new(
        store: Arc<dyn UserStore>,
        hasher: PasswordHasher,
        issuer: TokenIssuer,
        store_timeout: Duration,
    ) -> Result<Self, error::ConfigError> {
        Ok(Self {
            store,
            hasher,
            issuer,
            store_timeout,
            email_pattern: Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$")?,
        })
    }

    pub(crate) async fn register(&self, data: RegisterData) -> Result<(PublicUser, String), Error> {
        let email = normalize_email(&data.email);

        if !self.email_pattern.is_match(&email) {
            return Err(Error::InvalidEmail);
        }

        let username = data.username.trim();

        if username.is_empty() || username.chars().count() > MAX_USERNAME_CHARS {
            return Err(Error::InvalidUsername);
        }

        if data.password.is_empty() {
            return Err(Error::InvalidPassword("Password must not be empty"));
        }

        if data.password.len() > MAX_PASSWORD_BYTES {
            return Err(Error::InvalidPassword("Password is too long"));
        }

        let deadline = store::deadline(self.store_timeout);

        // Fails fast before hashing; the store's constraint still decides races.
        if within(deadline, self.store.find_by_email(&email))
            .await?
            .is_some()
        {
            return Err(Error::UserAlreadyExists);
        }

        let password_hash = self.hasher.hash_blocking(data.password).await?;

        let identity = Identity {
            id: Uuid::new_v4(),
            email,
            username: username.to_owned(),
            password_hash,
            role: Role::User,
            has_completed_setup: false,
        };

        within(deadline, self.store.insert(&identity)).await?;

        let token = self.issuer.issue(identity.id, identity.role)?;

        tracing::info!(user_id = %identity.id, "registered user");

        Ok((PublicUser::from(&identity), token))
    }

    pub(crate) async fn login(&self, data: LoginData) -> Result<(PublicUser, String), Error> {
        let email = normalize_email(&data.email);

        let lookup = self.store.find_by_email(&email);

        let identity = match within(store::deadline(self.store_timeout), lookup).await? {
            Some(identity) => identity,
            None => {
                tracing::debug!("login attempt for unknown email");
                return Err(Error::InvalidCredentials);
            }
        };

        if !self
            .hasher
            .verify_blocking(identity.password_hash.clone(), data.password)
            .await?
        {
            tracing::debug!(user_id = %identity.id, "login attempt with wrong password");
            return Err(Error::InvalidCredentials);
        }

        let token = self.issuer.issue(identity.id, identity.role)?;

        Ok((PublicUser::from(&identity), token))
    }

    pub(crate) async fn profile(&self, user: &AuthenticatedUser) -> Result<Profile, Error> {
        within(store::deadline(self.store_timeout), self.store.profile(user.id))
            .await?
            .ok_or(Error::UserNotFound)
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
