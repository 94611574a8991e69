// src/handlers/tags.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use crate::{
    common::{error::AppError, serde_utils::double_option},
    config::AppState,
    middleware::auth::AuthenticatedUser,
};

// ---
// Payloads
// ---

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTagPayload {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub color: Option<String>,
    pub category: Option<String>,
}

// name é NOT NULL; os demais aceitam null explícito para limpar.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTagPayload {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub slug: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub color: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub category: Option<Option<String>>,
}

// Slug padrão: nome em minúsculas, espaços viram hífen.
fn slugify(name: &str) -> String {
    name.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

// GET /api/tags
pub async fn list_tags(
    State(app_state): State<AppState>,
    AuthenticatedUser(auth): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let list = app_state.tag_repo.list(auth.tenant_id).await?;

    Ok(Json(list))
}

// GET /api/tags/{id}
pub async fn get_tag(
    State(app_state): State<AppState>,
    AuthenticatedUser(auth): AuthenticatedUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let tag = app_state
        .tag_repo
        .find(id, auth.tenant_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Tag não encontrada".to_string()))?;

    Ok(Json(tag))
}

// POST /api/tags
pub async fn create_tag(
    State(app_state): State<AppState>,
    AuthenticatedUser(auth): AuthenticatedUser,
    Json(payload): Json<CreateTagPayload>,
) -> Result<impl IntoResponse, AppError> {
    let Some(name) = payload.name.filter(|name| !name.is_empty()) else {
        return Err(AppError::BadRequest("name obrigatório".to_string()));
    };

    let slug = payload.slug.unwrap_or_else(|| slugify(&name));

    let tag = app_state
        .tag_repo
        .create(
            auth.tenant_id,
            &name,
            &slug,
            payload.color.as_deref(),
            payload.category.as_deref(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(tag)))
}

// PATCH /api/tags/{id}
pub async fn update_tag(
    State(app_state): State<AppState>,
    AuthenticatedUser(auth): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateTagPayload>,
) -> Result<impl IntoResponse, AppError> {
    let existing = app_state
        .tag_repo
        .find(id, auth.tenant_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Tag não encontrada".to_string()))?;

    // Corpo sem nenhum campo reconhecido devolve a tag como está.
    if payload.name.is_none()
        && payload.slug.is_none()
        && payload.color.is_none()
        && payload.category.is_none()
    {
        return Ok(Json(existing));
    }

    let tag = app_state
        .tag_repo
        .update(
            id,
            auth.tenant_id,
            payload.name.as_deref(),
            payload.slug.as_ref().map(|slug| slug.as_deref()),
            payload.color.as_ref().map(|color| color.as_deref()),
            payload.category.as_ref().map(|category| category.as_deref()),
        )
        .await?
        .ok_or_else(|| AppError::NotFound("Tag não encontrada".to_string()))?;

    Ok(Json(tag))
}

// DELETE /api/tags/{id}
pub async fn delete_tag(
    State(app_state): State<AppState>,
    AuthenticatedUser(auth): AuthenticatedUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    if !app_state.tag_repo.delete(id, auth.tenant_id).await? {
        return Err(AppError::NotFound("Tag não encontrada".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_padrao_vem_do_nome() {
        assert_eq!(slugify("Lead Quente"), "lead-quente");
        assert_eq!(slugify("Comprador"), "comprador");
        assert_eq!(slugify("Busca  Urgente"), "busca-urgente");
    }

    #[test]
    fn patch_distingue_null_de_ausente_no_slug() {
        let body: UpdateTagPayload =
            serde_json::from_str(r#"{"name": "VIP", "slug": null}"#).unwrap();
        assert_eq!(body.name.as_deref(), Some("VIP"));
        assert_eq!(body.slug, Some(None)); // null limpa a coluna
        assert!(body.color.is_none()); // ausente não mexe
    }
}
