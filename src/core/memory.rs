use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap};
use std::sync::Mutex;
use uuid::Uuid;

use crate::core::error::Error;
use crate::core::store::{DEFAULT_AVATAR_PATH, DEFAULT_BACKGROUND_PATH, UserStore};
use crate::types::response::{Genre, Musician, Profile};
use crate::types::user::Identity;

struct MusicianEntry {
    id: Uuid,
    user_id: Uuid,
    name: String,
    genre_ids: Vec<i32>,
}

/// In-process store enforcing the same constraints as the PostgreSQL schema.
///
/// Locks are always taken in the order users, musicians, following.
pub(crate) struct MemoryStore {
    users: Mutex<HashMap<Uuid, Identity>>,
    musicians: Mutex<Vec<MusicianEntry>>,
    following: Mutex<HashMap<Uuid, BTreeSet<Uuid>>>,
    user_genres: Mutex<HashMap<Uuid, Vec<i32>>>,
    genres: Vec<Genre>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        let genres = ["Rock", "Jazz", "Hip-Hop", "Electronic"]
            .into_iter()
            .zip(1..)
            .map(|(name, id)| Genre {
                id,
                name: name.into(),
            })
            .collect();

        Self {
            users: Mutex::default(),
            musicians: Mutex::default(),
            following: Mutex::default(),
            user_genres: Mutex::default(),
            genres,
        }
    }
}

impl MemoryStore {
    /// Removes the identity and everything that cascades from it.
    pub(crate) fn remove(&self, id: Uuid) {
        self.users.lock().unwrap().remove(&id);

        let mut musicians = self.musicians.lock().unwrap();
        let removed: Vec<Uuid> = musicians
            .iter()
            .filter(|musician| musician.user_id == id)
            .map(|musician| musician.id)
            .collect();
        musicians.retain(|musician| musician.user_id != id);

        let mut following = self.following.lock().unwrap();
        following.remove(&id);
        for followed in following.values_mut() {
            followed.retain(|musician_id| !removed.contains(musician_id));
        }

        self.user_genres.lock().unwrap().remove(&id);
    }

    pub(crate) fn len(&self) -> usize {
        self.users.lock().unwrap().len()
    }

    pub(crate) fn password_hash(&self, id: Uuid) -> Option<String> {
        self.users
            .lock()
            .unwrap()
            .get(&id)
            .map(|identity| identity.password_hash.clone())
    }

    /// Tags the musician profile owned by `user_id` with genres.
    pub(crate) fn tag_musician(&self, user_id: Uuid, genre_ids: &[i32]) {
        for musician in self.musicians.lock().unwrap().iter_mut() {
            if musician.user_id == user_id {
                musician.genre_ids = genre_ids.to_vec();
            }
        }
    }

    pub(crate) fn followed_by(&self, user_id: Uuid) -> Vec<Uuid> {
        self.following
            .lock()
            .unwrap()
            .get(&user_id)
            .map(|followed| followed.iter().copied().collect())
            .unwrap_or_default()
    }

    fn genre_names(&self, genre_ids: &[i32]) -> Vec<String> {
        let mut names: Vec<String> = self
            .genres
            .iter()
            .filter(|genre| genre_ids.contains(&genre.id))
            .map(|genre| genre.name.clone())
            .collect();
        names.sort();

        names
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, Error> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|identity| identity.email == email)
            .cloned())
    }

    async fn insert(&self, identity: &Identity) -> Result<(), Error> {
        let mut users = self.users.lock().unwrap();

        if users.values().any(|existing| existing.email == identity.email) {
            return Err(Error::UserAlreadyExists);
        }

        users.insert(identity.id, identity.clone());

        self.musicians.lock().unwrap().push(MusicianEntry {
            id: Uuid::new_v4(),
            user_id: identity.id,
            name: identity.username.clone(),
            genre_ids: Vec::new(),
        });

        Ok(())
    }

    async fn profile(&self, id: Uuid) -> Result<Option<Profile>, Error> {
        let Some(identity) = self.users.lock().unwrap().get(&id).cloned() else {
            return Ok(None);
        };

        let genre_ids = self
            .user_genres
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .unwrap_or_default();

        Ok(Some(Profile {
            id: identity.id,
            username: identity.username,
            email: identity.email,
            avatar_url: DEFAULT_AVATAR_PATH.into(),
            background_url: DEFAULT_BACKGROUND_PATH.into(),
            genres: self.genre_names(&genre_ids),
            has_completed_setup: identity.has_completed_setup,
            ..Profile::default()
        }))
    }

    async fn genres(&self) -> Result<Vec<Genre>, Error> {
        Ok(self.genres.clone())
    }

    async fn replace_user_genres(&self, id: Uuid, genre_ids: &[i32]) -> Result<(), Error> {
        let users = self.users.lock().unwrap();

        if !users.contains_key(&id) {
            return Err(Error::UserNotFound);
        }

        if genre_ids
            .iter()
            .any(|id| !self.genres.iter().any(|genre| genre.id == *id))
        {
            return Err(Error::UnknownGenre);
        }

        self.user_genres
            .lock()
            .unwrap()
            .insert(id, genre_ids.to_vec());

        Ok(())
    }

    async fn musicians_for(&self, id: Uuid) -> Result<Vec<Musician>, Error> {
        let genre_ids = self
            .user_genres
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .unwrap_or_default();

        let mut musicians: Vec<Musician> = self
            .musicians
            .lock()
            .unwrap()
            .iter()
            .filter(|musician| musician.genre_ids.iter().any(|id| genre_ids.contains(id)))
            .map(|musician| Musician {
                id: musician.id,
                user_id: musician.user_id,
                name: musician.name.clone(),
                avatar_url: DEFAULT_AVATAR_PATH.into(),
                genres: self.genre_names(&musician.genre_ids),
            })
            .collect();
        musicians.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));

        Ok(musicians)
    }

    async fn follow_musicians(&self, id: Uuid, musician_ids: &[Uuid]) -> Result<(), Error> {
        let mut users = self.users.lock().unwrap();

        let Some(identity) = users.get_mut(&id) else {
            return Err(Error::UserNotFound);
        };

        let musicians = self.musicians.lock().unwrap();

        if musician_ids
            .iter()
            .any(|id| !musicians.iter().any(|musician| musician.id == *id))
        {
            return Err(Error::UnknownMusician);
        }

        self.following
            .lock()
            .unwrap()
            .entry(id)
            .or_default()
            .extend(musician_ids);

        identity.has_completed_setup = true;

        Ok(())
    }
}
