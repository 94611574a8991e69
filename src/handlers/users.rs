// src/handlers/users.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::auth::{CreateUserPayload, UpdateUserPayload},
};

// role/isActive só podem ser mexidos por admin ou gestor.
fn can_manage_users(role: &str) -> bool {
    role == "admin" || role == "gestor"
}

// GET /api/users
pub async fn list_users(
    State(app_state): State<AppState>,
    AuthenticatedUser(auth): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let list = app_state.user_repo.list(auth.tenant_id).await?;

    Ok(Json(list))
}

// GET /api/users/{id} (só do mesmo tenant)
pub async fn get_user(
    State(app_state): State<AppState>,
    AuthenticatedUser(auth): AuthenticatedUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let user = app_state
        .user_repo
        .find_in_tenant(id, auth.tenant_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Usuário não encontrado".to_string()))?;

    Ok(Json(user))
}

// POST /api/users (restrito a admin/gestor)
pub async fn create_user(
    State(app_state): State<AppState>,
    AuthenticatedUser(auth): AuthenticatedUser,
    Json(payload): Json<CreateUserPayload>,
) -> Result<impl IntoResponse, AppError> {
    if !can_manage_users(&auth.role) {
        return Err(AppError::Forbidden(
            "Sem permissão para criar usuário".to_string(),
        ));
    }

    let email = payload.email.as_deref().filter(|email| !email.is_empty());
    let password = payload
        .password
        .as_deref()
        .filter(|password| !password.is_empty());
    let (Some(email), Some(password)) = (email, password) else {
        return Err(AppError::BadRequest(
            "Email e senha obrigatórios".to_string(),
        ));
    };

    if app_state
        .user_repo
        .email_exists_in_tenant(email, auth.tenant_id)
        .await?
    {
        return Err(AppError::Conflict(
            "Email já existe neste tenant".to_string(),
        ));
    }

    let password_hash = app_state.auth_service.hash_password(password).await?;
    let user = app_state
        .user_repo
        .create(
            &app_state.db_pool,
            auth.tenant_id,
            email,
            payload.name.as_deref(),
            &password_hash,
            payload.role.as_deref().unwrap_or("corretor"),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(user)))
}

// PATCH /api/users/{id} (só do mesmo tenant)
pub async fn update_user(
    State(app_state): State<AppState>,
    AuthenticatedUser(auth): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateUserPayload>,
) -> Result<impl IntoResponse, AppError> {
    // Quem não é admin/gestor tem role e isActive silenciosamente ignorados.
    let can_manage = can_manage_users(&auth.role);
    let role = payload.role.as_deref().filter(|_| can_manage);
    let is_active = payload.is_active.filter(|_| can_manage);

    let password_hash = match payload.password.as_deref() {
        Some(password) if !password.is_empty() => {
            Some(app_state.auth_service.hash_password(password).await?)
        }
        _ => None,
    };

    let user = app_state
        .user_repo
        .update(
            id,
            auth.tenant_id,
            payload.name.as_ref().map(|name| name.as_deref()),
            role,
            is_active,
            password_hash.as_deref(),
        )
        .await?
        .ok_or_else(|| AppError::NotFound("Usuário não encontrado".to_string()))?;

    Ok(Json(user))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gestor_e_admin_gerenciam_usuarios() {
        assert!(can_manage_users("admin"));
        assert!(can_manage_users("gestor"));
        assert!(!can_manage_users("corretor"));
        assert!(!can_manage_users(""));
    }
}
