use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::*;
use tracing::instrument;

use crate::entity::{snippet, user};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::snippet::{SnippetRequest, SnippetResponse, validate_snippet_request};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/",
    tag = "Snippets",
    operation_id = "listSnippets",
    summary = "List all snippets",
    description = "Returns every snippet in creation order. No authentication required; never errors.",
    responses(
        (status = 200, description = "List of snippets", body = Vec<SnippetResponse>),
    ),
)]
#[instrument(skip(state))]
pub async fn list_snippets(
    State(state): State<AppState>,
) -> Result<Json<Vec<SnippetResponse>>, AppError> {
    let rows = snippet::Entity::find()
        .find_also_related(user::Entity)
        .order_by_asc(snippet::Column::Id)
        .all(&state.db)
        .await?;

    let items: Vec<SnippetResponse> = rows.into_iter().map(SnippetResponse::from).collect();
    Ok(Json(items))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Snippets",
    operation_id = "createSnippet",
    summary = "Create a new snippet",
    description = "Creates a snippet owned by the caller. Anonymous callers are forbidden. \
        Unset optional fields take their defaults (empty title, linenos off, language \"python\", style \"friendly\").",
    request_body = SnippetRequest,
    responses(
        (status = 201, description = "Snippet created", body = SnippetResponse),
        (status = 400, description = "Validation error with per-field reasons (VALIDATION_ERROR)", body = ErrorBody),
        (status = 403, description = "Anonymous caller (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(username = %auth_user.username))]
pub async fn create_snippet(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<SnippetRequest>,
) -> Result<impl IntoResponse, AppError> {
    let fields = validate_snippet_request(&payload)?;

    let new_snippet = snippet::ActiveModel {
        title: Set(fields.title),
        code: Set(fields.code),
        linenos: Set(fields.linenos),
        language: Set(fields.language),
        style: Set(fields.style),
        owner_id: Set(Some(auth_user.user_id)),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    let model = new_snippet.insert(&state.db).await?;

    Ok((
        StatusCode::CREATED,
        Json(SnippetResponse::from_model(model, Some(auth_user.username))),
    ))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Snippets",
    operation_id = "getSnippet",
    summary = "Get a snippet by ID",
    description = "Returns the full public field set. Read access is never restricted by ownership.",
    params(("id" = i32, Path, description = "Snippet ID")),
    responses(
        (status = 200, description = "Snippet details", body = SnippetResponse),
        (status = 404, description = "Snippet not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn get_snippet(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<SnippetResponse>, AppError> {
    let row = snippet::Entity::find_by_id(id)
        .find_also_related(user::Entity)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Snippet not found".into()))?;

    Ok(Json(SnippetResponse::from(row)))
}

#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Snippets",
    operation_id = "updateSnippet",
    summary = "Replace a snippet",
    description = "Full-replace of the mutable fields (title, code, linenos, language, style); \
        unset optional fields take their defaults, code remains mandatory. Only the owner may \
        update; `id` and `owner` are preserved. Existence is checked before ownership, so a \
        non-owner probing a nonexistent id receives 404, not 403.",
    params(("id" = i32, Path, description = "Snippet ID")),
    request_body = SnippetRequest,
    responses(
        (status = 200, description = "Snippet updated", body = SnippetResponse),
        (status = 400, description = "Validation error with per-field reasons (VALIDATION_ERROR)", body = ErrorBody),
        (status = 403, description = "Anonymous caller or non-owner (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Snippet not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id, username = %auth_user.username))]
pub async fn update_snippet(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<SnippetRequest>,
) -> Result<Json<SnippetResponse>, AppError> {
    let txn = state.db.begin().await?;

    // Existence first, identity second.
    let existing = find_snippet_for_update(&txn, id).await?;
    ensure_owner(&existing, &auth_user)?;

    let fields = validate_snippet_request(&payload)?;

    let mut active: snippet::ActiveModel = existing.into();
    active.title = Set(fields.title);
    active.code = Set(fields.code);
    active.linenos = Set(fields.linenos);
    active.language = Set(fields.language);
    active.style = Set(fields.style);

    let model = active.update(&txn).await?;
    txn.commit().await?;

    Ok(Json(SnippetResponse::from_model(
        model,
        Some(auth_user.username),
    )))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Snippets",
    operation_id = "deleteSnippet",
    summary = "Delete a snippet",
    description = "Irrevocably removes the snippet. Only the owner may delete. \
        Repeating a successful delete yields 404.",
    params(("id" = i32, Path, description = "Snippet ID")),
    responses(
        (status = 204, description = "Snippet deleted"),
        (status = 403, description = "Anonymous caller or non-owner (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Snippet not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id, username = %auth_user.username))]
pub async fn delete_snippet(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let txn = state.db.begin().await?;

    let existing = find_snippet_for_update(&txn, id).await?;
    ensure_owner(&existing, &auth_user)?;

    snippet::Entity::delete_by_id(existing.id).exec(&txn).await?;
    txn.commit().await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Reject callers that do not own the record. An owner-less record has no
/// identity permitted to mutate it.
fn ensure_owner(snippet: &snippet::Model, auth_user: &AuthUser) -> Result<(), AppError> {
    if snippet.owner_id != Some(auth_user.user_id) {
        return Err(AppError::PermissionDenied);
    }
    Ok(())
}

/// Fetch a snippet under a row lock so concurrent Update/Delete on the same
/// id serialize to one full outcome.
async fn find_snippet_for_update(
    txn: &DatabaseTransaction,
    id: i32,
) -> Result<snippet::Model, AppError> {
    use sea_orm::sea_query::LockType;
    snippet::Entity::find_by_id(id)
        .lock(LockType::Update)
        .one(txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Snippet not found".into()))
}
