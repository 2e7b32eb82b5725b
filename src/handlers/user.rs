use std::collections::HashMap;

use axum::Json;
use axum::extract::{Path, State};
use sea_orm::*;
use tracing::instrument;

use crate::entity::{snippet, user};
use crate::error::{AppError, ErrorBody};
use crate::models::user::UserResponse;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/",
    tag = "Users",
    operation_id = "listUsers",
    summary = "List all users",
    description = "Returns every known identity with its id, username, and owned snippet ids. \
        No authentication required; credentials are never exposed.",
    responses(
        (status = 200, description = "List of users", body = Vec<UserResponse>),
    ),
)]
#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    let users = user::Entity::find()
        .order_by_asc(user::Column::Id)
        .all(&state.db)
        .await?;

    // One pass over (snippet id, owner id) pairs instead of a query per user.
    let rows: Vec<(i32, Option<i32>)> = snippet::Entity::find()
        .select_only()
        .column(snippet::Column::Id)
        .column(snippet::Column::OwnerId)
        .order_by_asc(snippet::Column::Id)
        .into_tuple::<(i32, Option<i32>)>()
        .all(&state.db)
        .await?;

    let mut by_owner: HashMap<i32, Vec<i32>> = HashMap::new();
    for (snippet_id, owner_id) in rows {
        if let Some(owner_id) = owner_id {
            by_owner.entry(owner_id).or_default().push(snippet_id);
        }
    }

    let items: Vec<UserResponse> = users
        .into_iter()
        .map(|u| {
            let snippets = by_owner.remove(&u.id).unwrap_or_default();
            UserResponse::from_model(u, snippets)
        })
        .collect();

    Ok(Json(items))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Users",
    operation_id = "getUser",
    summary = "Get a user by ID",
    description = "Returns the public projection of one identity. No authentication required.",
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User details", body = UserResponse),
        (status = 404, description = "User not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<UserResponse>, AppError> {
    let user = user::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    let snippets: Vec<i32> = snippet::Entity::find()
        .filter(snippet::Column::OwnerId.eq(user.id))
        .select_only()
        .column(snippet::Column::Id)
        .order_by_asc(snippet::Column::Id)
        .into_tuple::<i32>()
        .all(&state.db)
        .await?;

    Ok(Json(UserResponse::from_model(user, snippets)))
}
