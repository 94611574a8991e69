// src/handlers/properties.rs

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
    models::crm::{CreatePropertyPayload, PropertyWithPhotos, UpdatePropertyPayload},
};

// =============================================================================
//  ÁREA 1: IMÓVEIS
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPropertiesQuery {
    pub status: Option<String>,
    pub r#type: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

// GET /api/properties (query: status, type, limit, offset)
pub async fn list_properties(
    State(app_state): State<AppState>,
    AuthenticatedUser(auth): AuthenticatedUser,
    Query(params): Query<ListPropertiesQuery>,
) -> Result<impl IntoResponse, AppError> {
    let limit = clamp_limit(params.limit, 50, 100);
    let offset = offset_or_zero(params.offset);

    let list = app_state
        .property_repo
        .list(
            auth.tenant_id,
            params.status.as_deref(),
            params.r#type.as_deref(),
            limit,
            offset,
        )
        .await?;

    Ok(Json(list))
}

// GET /api/properties/{id} (detalhe com fotos)
pub async fn get_property(
    State(app_state): State<AppState>,
    AuthenticatedUser(auth): AuthenticatedUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let property = app_state
        .property_repo
        .find(id, auth.tenant_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Imóvel não encontrado".to_string()))?;

    let photos = app_state.property_repo.list_photos(id).await?;

    Ok(Json(PropertyWithPhotos { property, photos }))
}

// POST /api/properties
pub async fn create_property(
    State(app_state): State<AppState>,
    AuthenticatedUser(auth): AuthenticatedUser,
    Json(payload): Json<CreatePropertyPayload>,
) -> Result<impl IntoResponse, AppError> {
    let property = app_state
        .property_repo
        .create(auth.tenant_id, &payload)
        .await?;

    Ok((StatusCode::CREATED, Json(property)))
}

// PATCH /api/properties/{id}
pub async fn update_property(
    State(app_state): State<AppState>,
    AuthenticatedUser(auth): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(payload): Json<UpdatePropertyPayload>,
) -> Result<impl IntoResponse, AppError> {
    let property = app_state
        .property_repo
        .update(id, auth.tenant_id, &payload)
        .await?
        .ok_or_else(|| AppError::NotFound("Imóvel não encontrado".to_string()))?;

    Ok(Json(property))
}

// DELETE /api/properties/{id}
pub async fn delete_property(
    State(app_state): State<AppState>,
    AuthenticatedUser(auth): AuthenticatedUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    if !app_state.property_repo.exists(id, auth.tenant_id).await? {
        return Err(AppError::NotFound("Imóvel não encontrado".to_string()));
    }

    app_state.property_repo.delete(id, auth.tenant_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  ÁREA 2: FOTOS DO IMÓVEL
// =============================================================================
// O escopo de tenant das fotos passa sempre pelo imóvel pai.

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePhotoPayload {
    pub url: Option<String>,
    pub sort_order: Option<i32>,
}

// GET /api/properties/{id}/photos
pub async fn list_photos(
    State(app_state): State<AppState>,
    AuthenticatedUser(auth): AuthenticatedUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    if !app_state.property_repo.exists(id, auth.tenant_id).await? {
        return Err(AppError::NotFound("Imóvel não encontrado".to_string()));
    }

    let photos = app_state.property_repo.list_photos(id).await?;

    Ok(Json(photos))
}

// POST /api/properties/{id}/photos
pub async fn add_photo(
    State(app_state): State<AppState>,
    AuthenticatedUser(auth): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(payload): Json<CreatePhotoPayload>,
) -> Result<impl IntoResponse, AppError> {
    if !app_state.property_repo.exists(id, auth.tenant_id).await? {
        return Err(AppError::NotFound("Imóvel não encontrado".to_string()));
    }

    let Some(url) = payload.url.as_deref().filter(|url| !url.is_empty()) else {
        return Err(AppError::BadRequest("url obrigatória".to_string()));
    };

    let photo = app_state
        .property_repo
        .add_photo(id, url, payload.sort_order.unwrap_or(0))
        .await?;

    Ok((StatusCode::CREATED, Json(photo)))
}

// DELETE /api/properties/{id}/photos/{photo_id}
pub async fn delete_photo(
    State(app_state): State<AppState>,
    AuthenticatedUser(auth): AuthenticatedUser,
    Path((id, photo_id)): Path<(i32, i32)>,
) -> Result<impl IntoResponse, AppError> {
    if !app_state.property_repo.exists(id, auth.tenant_id).await? {
        return Err(AppError::NotFound("Imóvel não encontrado".to_string()));
    }

    if !app_state.property_repo.delete_photo(photo_id, id).await? {
        return Err(AppError::NotFound("Foto não encontrada".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
