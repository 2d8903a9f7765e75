use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Role {
    User,
}

impl Role {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown role: {0}")]
pub(crate) struct UnknownRole(String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "user" => Ok(Role::User),
            other => Err(UnknownRole(other.to_owned())),
        }
    }
}

/// An account as held by the credential store.
#[derive(Clone)]
pub(crate) struct Identity {
    pub(crate) id: Uuid,
    pub(crate) email: String,
    pub(crate) username: String,
    pub(crate) password_hash: String,
    pub(crate) role: Role,
    pub(crate) has_completed_setup: bool,
}

impl std::fmt::Debug for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Identity")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("username", &self.username)
            .field("role", &self.role)
            .field("has_completed_setup", &self.has_completed_setup)
            .finish_non_exhaustive()
    }
}

/// The caller established by the authorization gate, read by secured handlers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct AuthenticatedUser {
    pub(crate) id: Uuid,
    pub(crate) role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trips_through_text() {
        assert_eq!("user".parse::<Role>().unwrap(), Role::User);
        assert_eq!(Role::User.to_string(), "user");
        assert!("admin".parse::<Role>().is_err());
    }

    #[test]
    fn test_identity_debug_hides_password_hash() {
        let identity = Identity {
            id: Uuid::new_v4(),
            email: "a@x.com".into(),
            username: "ann".into(),
            password_hash: "$2b$04$secretsecretsecretsecre".into(),
            role: Role::User,
            has_completed_setup: false,
        };

        assert!(!format!("{:?}", identity).contains("$2b$"));
    }
}
