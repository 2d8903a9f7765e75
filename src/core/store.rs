use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::{Postgres, Row, Transaction};
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use uuid::Uuid;

use crate::core::error::{ConfigError, Error};
use crate::types::response::{Genre, Musician, Profile};
use crate::types::user::{Identity, Role};

pub(crate) const DEFAULT_AVATAR_PATH: &str = "/avatarUser/defaultAvatar.png";
pub(crate) const DEFAULT_BACKGROUND_PATH: &str = "/backgroundUser/defaultBackground.png";

/// Relational store holding identities and their profile data.
#[async_trait]
pub(crate) trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, Error>;

    /// Fails with `UserAlreadyExists` when the email is taken, even if a
    /// concurrent registration got there first.
    async fn insert(&self, identity: &Identity) -> Result<(), Error>;

    async fn profile(&self, id: Uuid) -> Result<Option<Profile>, Error>;

    async fn genres(&self) -> Result<Vec<Genre>, Error>;

    /// Fails with `UserNotFound` when the user is gone, whatever the ids.
    async fn replace_user_genres(&self, id: Uuid, genre_ids: &[i32]) -> Result<(), Error>;

    /// Musicians sharing at least one genre with the user.
    async fn musicians_for(&self, id: Uuid) -> Result<Vec<Musician>, Error>;

    /// Follows the musicians and marks the user's setup as complete, atomically.
    async fn follow_musicians(&self, id: Uuid, musician_ids: &[Uuid]) -> Result<(), Error>;
}

/// Deadline shared by every store call of one request.
pub(crate) fn deadline(limit: Duration) -> Instant {
    Instant::now() + limit
}

pub(crate) async fn within<T>(
    deadline: Instant,
    operation: impl Future<Output = Result<T, Error>>,
) -> Result<T, Error> {
    match tokio::time::timeout_at(deadline, operation).await {
        Ok(result) => result,
        Err(_) => Err(Error::StoreTimeout),
    }
}

#[derive(Clone, Debug)]
pub(crate) struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub(crate) async fn connect(
        database_url: &str,
        max_connections: u32,
        acquire_timeout: Duration,
    ) -> Result<Self, ConfigError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(acquire_timeout)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    pub(crate) fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, Error> {
        match sqlx::query(
            "SELECT id, email, username, password_hash, role, has_completed_setup
            FROM users
            WHERE email = $1;",
        )
        .bind(email)
        .try_map(map_identity)
        .fetch_one(&self.pool)
        .await
        {
            Ok(identity) => Ok(Some(identity)),
            Err(sqlx::Error::RowNotFound) => Ok(None),
            Err(e) => Err(Error::Sql(e)),
        }
    }

    async fn insert(&self, identity: &Identity) -> Result<(), Error> {
        let mut transaction = self.pool.begin().await?;

        match sqlx::query(
            "INSERT INTO users (
                id,
                email,
                username,
                password_hash,
                role,
                has_completed_setup,
                avatar_path,
                background_path
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8);",
        )
        .bind(identity.id)
        .bind(&identity.email)
        .bind(&identity.username)
        .bind(&identity.password_hash)
        .bind(identity.role.as_str())
        .bind(identity.has_completed_setup)
        .bind(DEFAULT_AVATAR_PATH)
        .bind(DEFAULT_BACKGROUND_PATH)
        .execute(&mut *transaction)
        .await
        {
            Ok(_) => (),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                return Err(Error::UserAlreadyExists);
            }
            Err(e) => return Err(Error::Sql(e)),
        }

        sqlx::query(
            "INSERT INTO musicians (id, user_id, name, name_lower, avatar_path)
            VALUES ($1, $2, $3, $4, $5);",
        )
        .bind(Uuid::new_v4())
        .bind(identity.id)
        .bind(&identity.username)
        .bind(identity.username.to_lowercase())
        .bind(DEFAULT_AVATAR_PATH)
        .execute(&mut *transaction)
        .await?;

        transaction.commit().await?;

        Ok(())
    }

    async fn profile(&self, id: Uuid) -> Result<Option<Profile>, Error> {
        let Some(mut profile) = sqlx::query(
            "SELECT
                id,
                username,
                email,
                avatar_path,
                COALESCE(background_path, '') AS background_path,
                COALESCE(description, '') AS description,
                has_completed_setup
            FROM users
            WHERE id = $1;",
        )
        .bind(id)
        .map(map_profile)
        .fetch_optional(&self.pool)
        .await?
        else {
            return Ok(None);
        };

        profile.genres = sqlx::query(
            "SELECT genres.name
            FROM genres
            JOIN user_genres ON genres.id = user_genres.genre_id
            WHERE user_genres.user_id = $1
            ORDER BY genres.name;",
        )
        .bind(id)
        .map(|row: PgRow| -> String { row.get("name") })
        .fetch_all(&self.pool)
        .await?;

        profile.social_links = sqlx::query(
            "SELECT social_networks.name, user_social_networks.profile_url
            FROM social_networks
            JOIN user_social_networks
                ON social_networks.id = user_social_networks.social_network_id
            WHERE user_social_networks.user_id = $1;",
        )
        .bind(id)
        .map(|row: PgRow| -> (String, String) { (row.get("name"), row.get("profile_url")) })
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .collect();

        Ok(Some(profile))
    }

    async fn genres(&self) -> Result<Vec<Genre>, Error> {
        Ok(
            sqlx::query_as::<_, Genre>("SELECT id, name FROM genres ORDER BY id;")
                .fetch_all(&self.pool)
                .await?,
        )
    }

    async fn replace_user_genres(&self, id: Uuid, genre_ids: &[i32]) -> Result<(), Error> {
        let mut transaction = self.pool.begin().await?;

        lock_user(&mut transaction, id).await?;

        sqlx::query("DELETE FROM user_genres WHERE user_id = $1;")
            .bind(id)
            .execute(&mut *transaction)
            .await?;

        sqlx::query(
            "INSERT INTO user_genres (user_id, genre_id)
            SELECT $1, genre_id FROM UNNEST($2::INTEGER[]) AS genre_id;",
        )
        .bind(id)
        .bind(genre_ids)
        .execute(&mut *transaction)
        .await
        .map_err(|e| foreign_key_error(e, "user_genres_genre_id_fkey", Error::UnknownGenre))?;

        transaction.commit().await?;

        Ok(())
    }

    async fn musicians_for(&self, id: Uuid) -> Result<Vec<Musician>, Error> {
        Ok(sqlx::query(
            "SELECT
                musicians.id,
                musicians.user_id,
                musicians.name,
                musicians.avatar_path,
                ARRAY(
                    SELECT genres.name
                    FROM genres
                    JOIN musician_genres AS tagged ON genres.id = tagged.genre_id
                    WHERE tagged.musician_id = musicians.id
                    ORDER BY genres.name
                ) AS genres
            FROM musicians
            WHERE EXISTS (
                SELECT 1
                FROM musician_genres
                JOIN user_genres ON musician_genres.genre_id = user_genres.genre_id
                WHERE musician_genres.musician_id = musicians.id
                    AND user_genres.user_id = $1
            )
            ORDER BY musicians.name, musicians.id;",
        )
        .bind(id)
        .map(map_musician)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn follow_musicians(&self, id: Uuid, musician_ids: &[Uuid]) -> Result<(), Error> {
        let mut transaction = self.pool.begin().await?;

        lock_user(&mut transaction, id).await?;

        sqlx::query(
            "INSERT INTO user_following (user_id, musician_id)
            SELECT $1, musician_id FROM UNNEST($2::UUID[]) AS musician_id
            ON CONFLICT DO NOTHING;",
        )
        .bind(id)
        .bind(musician_ids)
        .execute(&mut *transaction)
        .await
        .map_err(|e| {
            foreign_key_error(e, "user_following_musician_id_fkey", Error::UnknownMusician)
        })?;

        sqlx::query("UPDATE users SET has_completed_setup = TRUE WHERE id = $1;")
            .bind(id)
            .execute(&mut *transaction)
            .await?;

        transaction.commit().await?;

        Ok(())
    }
}

/// Holds the user's row until commit so it cannot vanish mid-write.
async fn lock_user(transaction: &mut Transaction<'_, Postgres>, id: Uuid) -> Result<(), Error> {
    sqlx::query("SELECT id FROM users WHERE id = $1 FOR UPDATE;")
        .bind(id)
        .fetch_optional(&mut **transaction)
        .await?
        .map(|_| ())
        .ok_or(Error::UserNotFound)
}

/// A violation of `constraint` means the referenced row is missing; any other
/// foreign key on these tables points at the user.
fn foreign_key_error(err: sqlx::Error, constraint: &str, missing: Error) -> Error {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_foreign_key_violation() {
            return match db_err.constraint() {
                Some(name) if name == constraint => missing,
                _ => Error::UserNotFound,
            };
        }
    }

    Error::Sql(err)
}

fn map_identity(row: PgRow) -> Result<Identity, sqlx::Error> {
    let role: String = row.try_get("role")?;

    Ok(Identity {
        id: row.try_get("id")?,
        email: row.try_get("email")?,
        username: row.try_get("username")?,
        password_hash: row.try_get("password_hash")?,
        role: role
            .parse::<Role>()
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?,
        has_completed_setup: row.try_get("has_completed_setup")?,
    })
}

fn map_profile(row: PgRow) -> Profile {
    Profile {
        id: row.get("id"),
        username: row.get("username"),
        email: row.get("email"),
        avatar_url: row.get("avatar_path"),
        background_url: row.get("background_path"),
        description: row.get("description"),
        has_completed_setup: row.get("has_completed_setup"),
        ..Profile::default()
    }
}

fn map_musician(row: PgRow) -> Musician {
    Musician {
        id: row.get("id"),
        user_id: row.get("user_id"),
        name: row.get("name"),
        avatar_url: row.get("avatar_path"),
        genres: row.get("genres"),
    }
}
