use std::sync::Arc;
use std::time::Duration;

use crate::auth::password::PasswordHasher;
use crate::auth::token::{SigningSecret, TokenIssuer, TokenVerifier};
use crate::controllers::genre::GenreController;
use crate::controllers::musician::MusicianController;
use crate::controllers::user::UserController;
use crate::core::error::ConfigError;
use crate::core::store::UserStore;

#[derive(Clone, Debug)]
pub(crate) struct AppState {
    pub(crate) verifier: TokenVerifier,
    pub(crate) user_controller: UserController,
    pub(crate) genre_controller: GenreController,
    pub(crate) musician_controller: MusicianController,
}

impl AppState {
    pub(crate) fn new(
        store: Arc<dyn UserStore>,
        secret: &SigningSecret,
        hasher: PasswordHasher,
        store_timeout: Duration,
    ) -> Result<Self, ConfigError> {
        Ok(AppState {
            verifier: TokenVerifier::new(secret),
            user_controller: UserController::new(
                store.clone(),
                hasher,
                TokenIssuer::new(secret),
                store_timeout,
            )?,
            genre_controller: GenreController::new(store.clone(), store_timeout),
            musician_controller: MusicianController::new(store, store_timeout),
        })
    }
}
