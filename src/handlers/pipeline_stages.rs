// src/handlers/pipeline_stages.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use crate::{
    common::error::AppError, config::AppState, middleware::auth::AuthenticatedUser,
};

// ---
// Payloads
// ---

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStagePayload {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub sort_order: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStagePayload {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub sort_order: Option<i32>,
}

// GET /api/pipeline-stages (ordenado por sortOrder)
pub async fn list_stages(
    State(app_state): State<AppState>,
    AuthenticatedUser(auth): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let list = app_state.pipeline_repo.list(auth.tenant_id).await?;

    Ok(Json(list))
}

// GET /api/pipeline-stages/{id}
pub async fn get_stage(
    State(app_state): State<AppState>,
    AuthenticatedUser(auth): AuthenticatedUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let stage = app_state
        .pipeline_repo
        .find(id, auth.tenant_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Etapa não encontrada".to_string()))?;

    Ok(Json(stage))
}

// POST /api/pipeline-stages
pub async fn create_stage(
    State(app_state): State<AppState>,
    AuthenticatedUser(auth): AuthenticatedUser,
    Json(payload): Json<CreateStagePayload>,
) -> Result<impl IntoResponse, AppError> {
    let name = payload.name.as_deref().filter(|name| !name.is_empty());
    let slug = payload.slug.as_deref().filter(|slug| !slug.is_empty());
    let (Some(name), Some(slug)) = (name, slug) else {
        return Err(AppError::BadRequest("name e slug obrigatórios".to_string()));
    };

    let stage = app_state
        .pipeline_repo
        .create(auth.tenant_id, name, slug, payload.sort_order.unwrap_or(0))
        .await?;

    Ok((StatusCode::CREATED, Json(stage)))
}

// PATCH /api/pipeline-stages/{id}
pub async fn update_stage(
    State(app_state): State<AppState>,
    AuthenticatedUser(auth): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateStagePayload>,
) -> Result<impl IntoResponse, AppError> {
    let existing = app_state
        .pipeline_repo
        .find(id, auth.tenant_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Etapa não encontrada".to_string()))?;

    // Corpo sem nenhum campo reconhecido devolve a etapa como está.
    if payload.name.is_none() && payload.slug.is_none() && payload.sort_order.is_none() {
        return Ok(Json(existing));
    }

    let stage = app_state
        .pipeline_repo
        .update(
            id,
            auth.tenant_id,
            payload.name.as_deref(),
            payload.slug.as_deref(),
            payload.sort_order,
        )
        .await?
        .ok_or_else(|| AppError::NotFound("Etapa não encontrada".to_string()))?;

    Ok(Json(stage))
}

// DELETE /api/pipeline-stages/{id}
pub async fn delete_stage(
    State(app_state): State<AppState>,
    AuthenticatedUser(auth): AuthenticatedUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    if !app_state.pipeline_repo.delete(id, auth.tenant_id).await? {
        return Err(AppError::NotFound("Etapa não encontrada".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
