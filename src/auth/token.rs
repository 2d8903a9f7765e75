use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{self, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::error::{ConfigError, Error};
use crate::types::user::{AuthenticatedUser, Role};

const ISSUER: &str = "musicvibe";
const TOKEN_LIFETIME_HOURS: i64 = 24;

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub(crate) struct Claims {
    pub(crate) sub: Uuid,
    pub(crate) role: Role,
    pub(crate) iat: i64,
    pub(crate) exp: i64,
    pub(crate) iss: String,
}

impl From<Claims> for AuthenticatedUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            role: claims.role,
        }
    }
}

/// Symmetric key shared by the issuer and the verifier.
#[derive(Clone)]
pub(crate) struct SigningSecret(Vec<u8>);

impl SigningSecret {
    pub(crate) const MIN_LENGTH: usize = 32;

    pub(crate) fn new(secret: impl Into<Vec<u8>>) -> Result<Self, ConfigError> {
        let secret = secret.into();

        if secret.len() < Self::MIN_LENGTH {
            return Err(ConfigError::WeakSecret(Self::MIN_LENGTH));
        }

        Ok(Self(secret))
    }
}

impl std::fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SigningSecret(..)")
    }
}

#[derive(Clone)]
pub(crate) struct TokenIssuer {
    encoding_key: EncodingKey,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer").finish_non_exhaustive()
    }
}

impl TokenIssuer {
    pub(crate) fn new(secret: &SigningSecret) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(&secret.0),
        }
    }

    pub(crate) fn issue(&self, subject: Uuid, role: Role) -> Result<String, Error> {
        self.issue_at(subject, role, Utc::now())
    }

    pub(crate) fn issue_at(
        &self,
        subject: Uuid,
        role: Role,
        now: DateTime<Utc>,
    ) -> Result<String, Error> {
        let expiration_time = now + Duration::hours(TOKEN_LIFETIME_HOURS);

        let claims = Claims {
            sub: subject,
            role,
            iat: now.timestamp(),
            exp: expiration_time.timestamp(),
            iss: ISSUER.into(),
        };

        jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &self.encoding_key,
        )
        .map_err(Error::Signing)
    }
}

#[derive(Clone)]
pub(crate) struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenVerifier").finish_non_exhaustive()
    }
}

impl TokenVerifier {
    pub(crate) fn new(secret: &SigningSecret) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked in `verify_at` so the clock can be supplied.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub", "iss"]);
        validation.set_issuer(&[ISSUER]);

        Self {
            decoding_key: DecodingKey::from_secret(&secret.0),
            validation,
        }
    }

    pub(crate) fn verify(&self, token: &str) -> Result<Claims, Error> {
        self.verify_at(token, Utc::now())
    }

    pub(crate) fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, Error> {
        let claims = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(Error::InvalidToken)?
            .claims;

        if now.timestamp() >= claims.exp {
            return Err(Error::ExpiredJWT);
        }

        Ok(claims)
    }
}
