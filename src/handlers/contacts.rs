// src/handlers/contacts.rs

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
    models::crm::{ContactWithTags, CreateContactPayload, UpdateContactPayload},
};

// =============================================================================
//  ÁREA 1: CONTATOS
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListContactsQuery {
    pub pipeline_stage_id: Option<i32>,
    pub tag_id: Option<i32>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

// GET /api/contacts (query: pipelineStageId, tagId, limit, offset)
pub async fn list_contacts(
    State(app_state): State<AppState>,
    AuthenticatedUser(auth): AuthenticatedUser,
    Query(params): Query<ListContactsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let limit = clamp_limit(params.limit, 50, 100);
    let offset = offset_or_zero(params.offset);

    // A listagem não embute tags; só o detalhe faz isso.
    let list = app_state
        .contact_repo
        .list(
            auth.tenant_id,
            params.pipeline_stage_id,
            params.tag_id,
            limit,
            offset,
        )
        .await?;

    Ok(Json(list))
}

// GET /api/contacts/{id} (detalhe com tags)
pub async fn get_contact(
    State(app_state): State<AppState>,
    AuthenticatedUser(auth): AuthenticatedUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let contact = app_state
        .contact_repo
        .find(id, auth.tenant_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Contato não encontrado".to_string()))?;

    let tags = app_state
        .contact_repo
        .tags_for_contact(id, auth.tenant_id)
        .await?;

    Ok(Json(ContactWithTags { contact, tags }))
}

// POST /api/contacts
pub async fn create_contact(
    State(app_state): State<AppState>,
    AuthenticatedUser(auth): AuthenticatedUser,
    Json(payload): Json<CreateContactPayload>,
) -> Result<impl IntoResponse, AppError> {
    let contact = app_state
        .contact_repo
        .create(auth.tenant_id, &payload)
        .await?;

    // Sem tagIds a resposta é o contato puro, sem o campo tags.
    let tag_ids = payload.tag_ids.as_deref().unwrap_or(&[]);
    if tag_ids.is_empty() {
        return Ok((StatusCode::CREATED, Json(contact)).into_response());
    }

    app_state.contact_repo.add_tags(contact.id, tag_ids).await?;
    let tags = app_state
        .tag_repo
        .find_by_ids(tag_ids, auth.tenant_id)
        .await?;

    Ok((StatusCode::CREATED, Json(ContactWithTags { contact, tags })).into_response())
}

// PATCH /api/contacts/{id}
pub async fn update_contact(
    State(app_state): State<AppState>,
    AuthenticatedUser(auth): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateContactPayload>,
) -> Result<impl IntoResponse, AppError> {
    if !app_state.contact_repo.exists(id, auth.tenant_id).await? {
        return Err(AppError::NotFound("Contato não encontrado".to_string()));
    }

    // tagIds presente troca o conjunto inteiro de relações.
    if let Some(tag_ids) = &payload.tag_ids {
        app_state.contact_repo.replace_tags(id, tag_ids).await?;
    }

    let contact = app_state
        .contact_repo
        .update(id, auth.tenant_id, &payload)
        .await?
        .ok_or_else(|| AppError::NotFound("Contato não encontrado".to_string()))?;

    let tags = app_state
        .contact_repo
        .tags_for_contact(id, auth.tenant_id)
        .await?;

    Ok(Json(ContactWithTags { contact, tags }))
}

// DELETE /api/contacts/{id}
pub async fn delete_contact(
    State(app_state): State<AppState>,
    AuthenticatedUser(auth): AuthenticatedUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    // Confere a posse antes de apagar as relações de tag.
    if !app_state.contact_repo.exists(id, auth.tenant_id).await? {
        return Err(AppError::NotFound("Contato não encontrado".to_string()));
    }

    app_state.contact_repo.delete(id, auth.tenant_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  ÁREA 2: RELAÇÕES CONTATO <-> TAG
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachTagPayload {
    pub tag_id: Option<i32>,
}

// POST /api/contacts/{id}/tags (body: { tagId })
pub async fn attach_tag(
    State(app_state): State<AppState>,
    AuthenticatedUser(auth): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(payload): Json<AttachTagPayload>,
) -> Result<impl IntoResponse, AppError> {
    let Some(tag_id) = payload.tag_id else {
        return Err(AppError::BadRequest(
            "contact id e tagId obrigatórios".to_string(),
        ));
    };

    if !app_state.contact_repo.exists(id, auth.tenant_id).await? {
        return Err(AppError::NotFound("Contato não encontrado".to_string()));
    }
    if !app_state.tag_repo.exists(tag_id, auth.tenant_id).await? {
        return Err(AppError::NotFound("Tag não encontrada".to_string()));
    }

    app_state.contact_repo.add_tag(id, tag_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

// DELETE /api/contacts/{id}/tags/{tag_id}
pub async fn detach_tag(
    State(app_state): State<AppState>,
    AuthenticatedUser(auth): AuthenticatedUser,
    Path((id, tag_id)): Path<(i32, i32)>,
) -> Result<impl IntoResponse, AppError> {
    if !app_state.contact_repo.exists(id, auth.tenant_id).await? {
        return Err(AppError::NotFound("Contato não encontrado".to_string()));
    }

    if !app_state.contact_repo.remove_tag(id, tag_id).await? {
        return Err(AppError::NotFound("Relação não encontrada".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
