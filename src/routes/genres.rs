use axum::extract::rejection::JsonRejection;
use axum::extract::{Extension, Json, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::core::error::Error;
use crate::core::state::AppState;
use crate::types::request::UserGenresData;
use crate::types::user::AuthenticatedUser;

#[tracing::instrument(skip_all)]
pub(crate) async fn get_all(State(state): State<AppState>) -> Result<impl IntoResponse, Error> {
    let genres = state.genre_controller.get_all().await?;

    Ok(Json(genres))
}

#[tracing::instrument(skip_all, fields(user_id = %user.id))]
pub(crate) async fn set_for_user(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    payload: Result<Json<UserGenresData>, JsonRejection>,
) -> Result<StatusCode, Error> {
    let Json(params) = payload?;

    state
        .genre_controller
        .set_for_user(&user, params.genre_ids)
        .await?;

    Ok(StatusCode::OK)
}
