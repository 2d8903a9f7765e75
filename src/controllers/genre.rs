use std::sync::Arc;
use std::time::Duration;

use crate::core::error::Error;
use crate::core::store::{self, UserStore, within};
use crate::types::response::Genre;
use crate::types::user::AuthenticatedUser;

#[derive(Clone)]
pub(crate) struct GenreController {
    store: Arc<dyn UserStore>,
    store_timeout: Duration,
}

impl std::fmt::Debug for GenreController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenreController")
            .field("store_timeout", &self.store_timeout)
            .finish_non_exhaustive()
    }
}

impl GenreController {
    pub(crate) fn new(store: Arc<dyn UserStore>, store_timeout: Duration) -> Self {
        Self {
            store,
            store_timeout,
        }
    }

    pub(crate) async fn get_all(&self) -> Result<Vec<Genre>, Error> {
        within(store::deadline(self.store_timeout), self.store.genres()).await
    }

    /// Replaces the caller's genre selection; repeated ids are collapsed.
    pub(crate) async fn set_for_user(
        &self,
        user: &AuthenticatedUser,
        mut genre_ids: Vec<i32>,
    ) -> Result<(), Error> {
        genre_ids.sort_unstable();
        genre_ids.dedup();

        within(
            store::deadline(self.store_timeout),
            self.store.replace_user_genres(user.id, &genre_ids),
        )
        .await?;

        tracing::info!(user_id = %user.id, count = genre_ids.len(), "updated user genres");

        Ok(())
    }
}
