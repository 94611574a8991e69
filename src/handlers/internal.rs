// src/handlers/internal.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::{
    common::{
        db_utils::{clamp_limit, offset_or_zero},
        error::AppError,
    },
    config::AppState,
    models::crm::{CreateTaskPayload, PropertyWithPhotos},
};

// ---
// Canal server-to-server usado pelas tools MCP. Sem JWT: o tenant vem
// explícito na query/corpo (snake_case) e é validado em toda rota.
// ---

fn require_tenant_id(tenant_id: Option<i32>) -> Result<i32, AppError> {
    match tenant_id {
        Some(tenant_id) if tenant_id >= 1 => Ok(tenant_id),
        _ => Err(AppError::BadRequest(
            "tenant_id obrigatório e deve ser inteiro positivo".to_string(),
        )),
    }
}

#[derive(Debug, Deserialize)]
pub struct InternalPropertiesQuery {
    pub tenant_id: Option<i32>,
    pub neighborhood: Option<String>,
    pub r#type: Option<String>,
    pub max_value: Option<Decimal>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct InternalTenantQuery {
    pub tenant_id: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct InternalListQuery {
    pub tenant_id: Option<i32>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

// GET /api/internal/properties (busca de imóveis para as tools MCP)
// Query: tenant_id (obrigatório), neighborhood, type, max_value, limit, offset
pub async fn list_properties(
    State(app_state): State<AppState>,
    Query(params): Query<InternalPropertiesQuery>,
) -> Result<impl IntoResponse, AppError> {
    let tenant_id = require_tenant_id(params.tenant_id)?;
    let neighborhood = params
        .neighborhood
        .as_deref()
        .map(str::trim)
        .filter(|neighborhood| !neighborhood.is_empty());
    let kind = params
        .r#type
        .as_deref()
        .map(str::trim)
        .filter(|kind| !kind.is_empty());
    let max_value = params.max_value.filter(|value| *value > Decimal::ZERO);
    let limit = clamp_limit(params.limit, 20, 50);
    let offset = offset_or_zero(params.offset);

    let list = app_state
        .property_repo
        .search(tenant_id, neighborhood, kind, max_value, limit, offset)
        .await?;

    Ok(Json(list))
}

// GET /api/internal/properties/{id} (detalhe com fotos)
pub async fn get_property(
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
    Query(params): Query<InternalTenantQuery>,
) -> Result<impl IntoResponse, AppError> {
    let tenant_id = require_tenant_id(params.tenant_id)?;

    let property = app_state
        .property_repo
        .find(id, tenant_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Imóvel não encontrado".to_string()))?;

    let photos = app_state.property_repo.list_photos(id).await?;

    Ok(Json(PropertyWithPhotos { property, photos }))
}

// GET /api/internal/contacts
pub async fn list_contacts(
    State(app_state): State<AppState>,
    Query(params): Query<InternalListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let tenant_id = require_tenant_id(params.tenant_id)?;
    let limit = clamp_limit(params.limit, 20, 50);
    let offset = offset_or_zero(params.offset);

    let list = app_state
        .contact_repo
        .list(tenant_id, None, None, limit, offset)
        .await?;

    Ok(Json(list))
}

// GET /api/internal/contacts/{id} (detalhe simples, sem tags)
pub async fn get_contact(
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
    Query(params): Query<InternalTenantQuery>,
) -> Result<impl IntoResponse, AppError> {
    let tenant_id = require_tenant_id(params.tenant_id)?;

    let contact = app_state
        .contact_repo
        .find(id, tenant_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Contato não encontrado".to_string()))?;

    Ok(Json(contact))
}

// GET /api/internal/tasks
pub async fn list_tasks(
    State(app_state): State<AppState>,
    Query(params): Query<InternalListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let tenant_id = require_tenant_id(params.tenant_id)?;
    let limit = clamp_limit(params.limit, 20, 50);
    let offset = offset_or_zero(params.offset);

    let list = app_state
        .task_repo
        .list(tenant_id, None, None, limit, offset)
        .await?;

    Ok(Json(list))
}

#[derive(Debug, Deserialize)]
pub struct InternalCreateTaskPayload {
    pub tenant_id: Option<i32>,
    pub title: Option<String>,
    pub r#type: Option<String>,
    pub contact_id: Option<i32>,
    pub property_id: Option<i32>,
    pub due_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

// POST /api/internal/tasks (corpo em snake_case, vindo das tools MCP)
pub async fn create_task(
    State(app_state): State<AppState>,
    Json(payload): Json<InternalCreateTaskPayload>,
) -> Result<impl IntoResponse, AppError> {
    let tenant_id = require_tenant_id(payload.tenant_id)?;

    let task = app_state
        .task_repo
        .create(
            tenant_id,
            &CreateTaskPayload {
                contact_id: payload.contact_id,
                property_id: payload.property_id,
                title: payload.title,
                r#type: payload.r#type,
                due_at: payload.due_at,
                notes: payload.notes,
                ..Default::default()
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(task)))
}

#[derive(Debug, Deserialize)]
pub struct InternalCompleteTaskPayload {
    pub tenant_id: Option<i32>,
}

// PATCH /api/internal/tasks/{id} (marca como concluída)
pub async fn complete_task(
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<InternalCompleteTaskPayload>,
) -> Result<impl IntoResponse, AppError> {
    let tenant_id = require_tenant_id(payload.tenant_id)?;

    let task = app_state
        .task_repo
        .complete(id, tenant_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Tarefa não encontrada".to_string()))?;

    Ok(Json(task))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tenant_id_precisa_ser_positivo() {
        assert!(require_tenant_id(None).is_err());
        assert!(require_tenant_id(Some(0)).is_err());
        assert!(require_tenant_id(Some(-3)).is_err());
        assert_eq!(require_tenant_id(Some(1)).unwrap(), 1);
    }

    #[test]
    fn corpo_de_tarefa_interna_usa_snake_case() {
        let body: InternalCreateTaskPayload = serde_json::from_str(
            r#"{"tenant_id": 2, "title": "Ligar para a Beatriz", "contact_id": 7, "due_at": "2025-06-01T15:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(body.tenant_id, Some(2));
        assert_eq!(body.title.as_deref(), Some("Ligar para a Beatriz"));
        assert_eq!(body.contact_id, Some(7));
        assert!(body.due_at.is_some());
        assert!(body.notes.is_none());
    }
}
