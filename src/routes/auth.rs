use axum::extract::rejection::JsonRejection;
use axum::extract::{Extension, Json, State};
use axum::http::StatusCode;

use crate::core::error::Error;
use crate::core::state::AppState;
use crate::types::request::{LoginData, RegisterData};
use crate::types::response;
use crate::types::user::AuthenticatedUser;

#[tracing::instrument(skip_all)]
pub(crate) async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterData>, JsonRejection>,
) -> Result<(StatusCode, Json<response::Auth>), Error> {
    let Json(params) = payload?;

    let (user, token) = state.user_controller.register(params).await?;

    Ok((StatusCode::CREATED, Json(response::Auth::new(token, user))))
}

#[tracing::instrument(skip_all)]
pub(crate) async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginData>, JsonRejection>,
) -> Result<Json<response::Auth>, Error> {
    let Json(params) = payload?;

    let (user, token) = state.user_controller.login(params).await?;

    Ok(Json(response::Auth::new(token, user)))
}

#[tracing::instrument(skip_all, fields(user_id = %user.id))]
pub(crate) async fn me(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<response::Me>, Error> {
    let profile = state.user_controller.profile(&user).await?;

    Ok(Json(response::Me { user: profile }))
}
