use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::core::error::Error;
use crate::core::store::{self, UserStore, within};
use crate::types::response::Musician;
use crate::types::user::AuthenticatedUser;

#[derive(Clone)]
pub(crate) struct MusicianController {
    store: Arc<dyn UserStore>,
    store_timeout: Duration,
}

impl std::fmt::Debug for MusicianController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MusicianController")
            .field("store_timeout", &self.store_timeout)
            .finish_non_exhaustive()
    }
}

impl MusicianController {
    pub(crate) fn new(store: Arc<dyn UserStore>, store_timeout: Duration) -> Self {
        Self {
            store,
            store_timeout,
        }
    }

    pub(crate) async fn suggested_for(
        &self,
        user: &AuthenticatedUser,
    ) -> Result<Vec<Musician>, Error> {
        within(
            store::deadline(self.store_timeout),
            self.store.musicians_for(user.id),
        )
        .await
    }

    /// Follows the chosen musicians, which completes the caller's account setup.
    pub(crate) async fn follow(
        &self,
        user: &AuthenticatedUser,
        mut musician_ids: Vec<Uuid>,
    ) -> Result<(), Error> {
        if musician_ids.is_empty() {
            return Err(Error::NoMusiciansSelected);
        }

        musician_ids.sort_unstable();
        musician_ids.dedup();

        within(
            store::deadline(self.store_timeout),
            self.store.follow_musicians(user.id, &musician_ids),
        )
        .await?;

        tracing::info!(user_id = %user.id, count = musician_ids.len(), "completed setup");

        Ok(())
    }
}
