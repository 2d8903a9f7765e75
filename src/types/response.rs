use serde::Serialize;
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::types::user::Identity;

#[derive(Serialize)]
pub(crate) struct ErrorBody {
    error: &'static str,
}

impl ErrorBody {
    pub(crate) fn new(error: &'static str) -> Self {
        Self { error }
    }
}

/// Identity as shown to its owner right after login or registration.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PublicUser {
    pub(crate) id: Uuid,
    pub(crate) email: String,
    pub(crate) username: String,
    pub(crate) has_completed_setup: bool,
}

impl From<&Identity> for PublicUser {
    fn from(identity: &Identity) -> Self {
        Self {
            id: identity.id,
            email: identity.email.clone(),
            username: identity.username.clone(),
            has_completed_setup: identity.has_completed_setup,
        }
    }
}

#[derive(Serialize)]
pub(crate) struct Auth {
    pub(crate) token: String,
    pub(crate) user: PublicUser,
}

impl Auth {
    pub(crate) fn new(token: String, user: PublicUser) -> Self {
        Self { token, user }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Profile {
    pub(crate) id: Uuid,
    pub(crate) username: String,
    pub(crate) email: String,
    pub(crate) avatar_url: String,
    pub(crate) background_url: String,
    pub(crate) description: String,
    pub(crate) genres: Vec<String>,
    pub(crate) social_links: BTreeMap<String, String>,
    pub(crate) has_completed_setup: bool,
}

#[derive(Serialize)]
pub(crate) struct Me {
    pub(crate) user: Profile,
}

#[derive(Clone, Debug, PartialEq, Serialize, sqlx::FromRow)]
pub(crate) struct Genre {
    pub(crate) id: i32,
    pub(crate) name: String,
}

/// Musician suggested on the setup screen.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Musician {
    pub(crate) id: Uuid,
    pub(crate) user_id: Uuid,
    pub(crate) name: String,
    pub(crate) avatar_url: String,
    pub(crate) genres: Vec<String>,
}
