use axum::extract::rejection::JsonRejection;
use axum::extract::{Extension, Json, State};
use axum::http::StatusCode;

use crate::core::error::Error;
use crate::core::state::AppState;
use crate::types::request::FollowingData;
use crate::types::response::Musician;
use crate::types::user::AuthenticatedUser;

#[tracing::instrument(skip_all, fields(user_id = %user.id))]
pub(crate) async fn suggested(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<Musician>>, Error> {
    let musicians = state.musician_controller.suggested_for(&user).await?;

    Ok(Json(musicians))
}

#[tracing::instrument(skip_all, fields(user_id = %user.id))]
pub(crate) async fn follow(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    payload: Result<Json<FollowingData>, JsonRejection>,
) -> Result<StatusCode, Error> {
    let Json(params) = payload?;

    state
        .musician_controller
        .follow(&user, params.musician_ids)
        .await?;

    Ok(StatusCode::CREATED)
}
