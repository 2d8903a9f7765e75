use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::http::header::ToStrError;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::types::response::ErrorBody;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Database migration error: {0}")]
    DatabaseMigration(#[from] sqlx::migrate::MigrateError),
    #[error("IO error: {0}")]
    IO(#[from] std::io::Error),
    #[error("SQL error: {0}")]
    Sql(#[from] sqlx::Error),
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
    #[error("Signing secret must be at least {0} bytes")]
    WeakSecret(usize),
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid request body: {0}")]
    InvalidBody(#[from] JsonRejection),
    #[error("Invalid email")]
    InvalidEmail,
    #[error("Invalid username")]
    InvalidUsername,
    #[error("Invalid password: {0}")]
    InvalidPassword(&'static str),
    #[error("Unknown genre")]
    UnknownGenre,
    #[error("Unknown musician")]
    UnknownMusician,
    #[error("No musicians selected")]
    NoMusiciansSelected,
    #[error("No credentials provided")]
    NoCredentials,
    #[error("Unsupported authorization scheme")]
    InvalidScheme,
    #[error("Header decode error: {0}")]
    HeaderDecode(#[from] ToStrError),
    #[error("Invalid JWT: {0}")]
    InvalidToken(jsonwebtoken::errors::Error),
    #[error("Expired JWT")]
    ExpiredJWT,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("User already exists")]
    UserAlreadyExists,
    #[error("User not found")]
    UserNotFound,
    #[error("SQL error: {0}")]
    Sql(#[from] sqlx::Error),
    #[error("Bcrypt error: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),
    #[error("JWT signing error: {0}")]
    Signing(jsonwebtoken::errors::Error),
    #[error("Credential store timed out")]
    StoreTimeout,
    #[error("Blocking task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl Error {
    pub(crate) fn status(&self) -> StatusCode {
        match self {
            Error::InvalidBody(_)
            | Error::InvalidEmail
            | Error::InvalidUsername
            | Error::InvalidPassword(_)
            | Error::UnknownGenre
            | Error::UnknownMusician
            | Error::NoMusiciansSelected => StatusCode::BAD_REQUEST,
            Error::NoCredentials
            | Error::InvalidScheme
            | Error::HeaderDecode(_)
            | Error::InvalidToken(_)
            | Error::ExpiredJWT
            | Error::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Error::UserAlreadyExists => StatusCode::CONFLICT,
            Error::UserNotFound => StatusCode::NOT_FOUND,
            Error::Sql(_)
            | Error::Bcrypt(_)
            | Error::Signing(_)
            | Error::StoreTimeout
            | Error::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> &'static str {
        match self {
            Error::InvalidBody(_) => "Invalid input",
            Error::InvalidEmail => "Invalid email",
            Error::InvalidUsername => "Invalid username",
            Error::InvalidPassword(reason) => *reason,
            Error::UnknownGenre => "Unknown genre",
            Error::UnknownMusician => "Unknown musician",
            Error::NoMusiciansSelected => "No musicians selected",
            Error::NoCredentials | Error::InvalidScheme | Error::HeaderDecode(_) => {
                "Missing or invalid Authorization header"
            }
            Error::InvalidToken(_) | Error::ExpiredJWT => "Invalid token",
            Error::InvalidCredentials => "Invalid credentials",
            Error::UserAlreadyExists => "User already exists",
            Error::UserNotFound => "User not found",
            Error::Sql(_)
            | Error::Bcrypt(_)
            | Error::Signing(_)
            | Error::StoreTimeout
            | Error::Task(_) => "Internal server error",
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!("{:?}", self);
        } else {
            tracing::warn!("{}", self);
        }

        (status, Json(ErrorBody::new(self.message()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_internal_errors_are_opaque() {
        let errors = [
            Error::Sql(sqlx::Error::PoolTimedOut),
            Error::StoreTimeout,
            Error::Bcrypt(bcrypt::BcryptError::CostNotAllowed(99)),
        ];

        for error in errors {
            assert_eq!(error.status(), StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(error.message(), "Internal server error");
        }
    }

    #[test]
    fn test_setup_selection_errors_are_bad_requests() {
        for error in [
            Error::UnknownGenre,
            Error::UnknownMusician,
            Error::NoMusiciansSelected,
        ] {
            assert_eq!(error.status(), StatusCode::BAD_REQUEST);
        }

        assert_eq!(Error::UserNotFound.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_expired_and_invalid_tokens_share_a_message() {
        assert_eq!(Error::ExpiredJWT.message(), "Invalid token");
        assert_eq!(Error::ExpiredJWT.status(), StatusCode::UNAUTHORIZED);
    }
}
