// src/handlers/tasks.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use crate::{
    common::{
        db_utils::{clamp_limit, offset_or_zero},
        error::AppError,
    },
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::crm::{CreateTaskPayload, UpdateTaskPayload},
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTasksQuery {
    pub contact_id: Option<i32>,
    pub assigned_to_id: Option<i32>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

// GET /api/tasks (query: contactId, assignedToId, limit, offset)
pub async fn list_tasks(
    State(app_state): State<AppState>,
    AuthenticatedUser(auth): AuthenticatedUser,
    Query(params): Query<ListTasksQuery>,
) -> Result<impl IntoResponse, AppError> {
    let limit = clamp_limit(params.limit, 50, 100);
    let offset = offset_or_zero(params.offset);

    let list = app_state
        .task_repo
        .list(
            auth.tenant_id,
            params.contact_id,
            params.assigned_to_id,
            limit,
            offset,
        )
        .await?;

    Ok(Json(list))
}

// GET /api/tasks/{id}
pub async fn get_task(
    State(app_state): State<AppState>,
    AuthenticatedUser(auth): AuthenticatedUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let task = app_state
        .task_repo
        .find(id, auth.tenant_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Tarefa não encontrada".to_string()))?;

    Ok(Json(task))
}

// POST /api/tasks
pub async fn create_task(
    State(app_state): State<AppState>,
    AuthenticatedUser(auth): AuthenticatedUser,
    Json(payload): Json<CreateTaskPayload>,
) -> Result<impl IntoResponse, AppError> {
    let task = app_state.task_repo.create(auth.tenant_id, &payload).await?;

    Ok((StatusCode::CREATED, Json(task)))
}

// PATCH /api/tasks/{id}
pub async fn update_task(
    State(app_state): State<AppState>,
    AuthenticatedUser(auth): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateTaskPayload>,
) -> Result<impl IntoResponse, AppError> {
    let task = app_state
        .task_repo
        .update(id, auth.tenant_id, &payload)
        .await?
        .ok_or_else(|| AppError::NotFound("Tarefa não encontrada".to_string()))?;

    Ok(Json(task))
}

// DELETE /api/tasks/{id}
pub async fn delete_task(
    State(app_state): State<AppState>,
    AuthenticatedUser(auth): AuthenticatedUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    if !app_state.task_repo.delete(id, auth.tenant_id).await? {
        return Err(AppError::NotFound("Tarefa não encontrada".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
