use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::{HeaderMap, Response, header};
use axum::middleware::Next;

use crate::core::error::Error;
use crate::core::state::AppState;
use crate::types::user::AuthenticatedUser;

const BEARER_PREFIX: &str = "Bearer ";

pub(crate) fn bearer_token(headers: &HeaderMap) -> Result<&str, Error> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(Error::NoCredentials)?
        .to_str()?;

    value.strip_prefix(BEARER_PREFIX).ok_or(Error::InvalidScheme)
}

/// Verifies the bearer token in memory and attaches the caller to the request.
/// The credential store is not consulted; the role is trusted until the token expires.
pub(crate) async fn authorize(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response<Body>, Error> {
    let token = bearer_token(request.headers())?;

    let claims = state.verifier.verify(token)?;

    let user = AuthenticatedUser::from(claims);

    tracing::debug!(user_id = %user.id, role = %user.role, "authorized request");

    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}
