use axum::{extract::State, response::IntoResponse, Json};
use crate::state::AppState;
use crate::error::AppError;
use crate::api::dtos::responses::PublicUser;
use crate::api::extractors::auth::AdminUser;
use std::sync::Arc;
use serde_json::json;
use tracing::debug;

pub async fn list_users(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
) -> Result<impl IntoResponse, AppError> {
    let users: Vec<PublicUser> = state.user_repo.list().await?
        .into_iter()
        .map(PublicUser::from)
        .collect();
    debug!(admin_id = %admin.user_id, count = users.len(), "Listed users");

    Ok(Json(json!({ "users": users })))
}
