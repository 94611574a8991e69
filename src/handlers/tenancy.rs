// src/handlers/tenancy.rs

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::tenancy::UpdateTenantPayload,
};

// GET /api/plans (rota pública, só os planos ativos)
pub async fn list_plans(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let plans = app_state.tenant_repo.list_active_plans().await?;

    Ok(Json(plans))
}

// GET /api/tenants (o tenant do próprio usuário)
pub async fn get_my_tenant(
    State(app_state): State<AppState>,
    AuthenticatedUser(auth): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let tenant = app_state
        .tenant_repo
        .find_by_id(auth.tenant_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Tenant não encontrado".to_string()))?;

    Ok(Json(tenant))
}

// GET /api/tenants/{id} (só o próprio tenant)
pub async fn get_tenant(
    State(app_state): State<AppState>,
    AuthenticatedUser(auth): AuthenticatedUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    if id != auth.tenant_id {
        return Err(AppError::Forbidden("Acesso negado".to_string()));
    }

    let tenant = app_state
        .tenant_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Tenant não encontrado".to_string()))?;

    Ok(Json(tenant))
}

// PATCH /api/tenants/{id} (só o próprio tenant)
pub async fn update_tenant(
    State(app_state): State<AppState>,
    AuthenticatedUser(auth): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateTenantPayload>,
) -> Result<impl IntoResponse, AppError> {
    if id != auth.tenant_id {
        return Err(AppError::Forbidden("Acesso negado".to_string()));
    }

    let tenant = app_state
        .tenant_repo
        .update(id, &payload)
        .await?
        .ok_or_else(|| AppError::NotFound("Tenant não encontrado".to_string()))?;

    Ok(Json(tenant))
}
