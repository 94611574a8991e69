// src/handlers/auth.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::auth::{LoginPayload, RegisterPayload},
};

// POST /api/auth/login (body: { email, password }, retorna token + user)
pub async fn login(
    State(app_state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<impl IntoResponse, AppError> {
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

    // O e-mail resolve a conta; a resposta não diz se o que falhou foi
    // o e-mail, a senha ou um usuário desativado.
    let user = app_state
        .user_repo
        .find_by_email(email)
        .await?
        .filter(|user| user.is_active)
        .ok_or(AppError::InvalidCredentials)?;

    let ok = app_state
        .auth_service
        .verify_password(password, &user.password_hash)
        .await?;
    if !ok {
        return Err(AppError::InvalidCredentials);
    }

    let tenant = app_state.tenant_repo.find_by_id(user.tenant_id).await?;
    let token = app_state.auth_service.create_token(&user)?;

    Ok(Json(json!({
        "token": token,
        "user": {
            "id": user.id,
            "email": user.email,
            "name": user.name,
            "role": user.role,
            "tenantId": user.tenant_id,
            "tenant": tenant.map(|tenant| json!({
                "id": tenant.id,
                "companyName": tenant.company_name,
            })),
        },
    })))
}

// POST /api/auth/register (cria tenant + primeiro usuário admin)
pub async fn register(
    State(app_state): State<AppState>,
    Json(payload): Json<RegisterPayload>,
) -> Result<impl IntoResponse, AppError> {
    let company_name = payload
        .company_name
        .as_deref()
        .filter(|name| !name.is_empty());
    let email = payload.email.as_deref().filter(|email| !email.is_empty());
    let password = payload
        .password
        .as_deref()
        .filter(|password| !password.is_empty());
    let (Some(company_name), Some(email), Some(password)) = (company_name, email, password) else {
        return Err(AppError::BadRequest(
            "companyName, email e senha obrigatórios".to_string(),
        ));
    };

    let plan_id = payload.plan_id.unwrap_or(1);

    // E-mail é único no sistema inteiro, não só dentro do tenant.
    if app_state.user_repo.email_exists(email).await? {
        return Err(AppError::Conflict("Email já cadastrado".to_string()));
    }

    let password_hash = app_state.auth_service.hash_password(password).await?;

    // Tenant e usuário admin nascem juntos ou nada é gravado.
    let mut tx = app_state.db_pool.begin().await?;
    let tenant = app_state
        .tenant_repo
        .create(&mut *tx, plan_id, company_name, email)
        .await?;
    app_state
        .user_repo
        .create(
            &mut *tx,
            tenant.id,
            email,
            Some(company_name),
            &password_hash,
            "admin",
        )
        .await?;
    tx.commit().await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Conta criada. Faça login em POST /api/auth/login.",
            "tenantId": tenant.id,
        })),
    ))
}

// GET /api/auth/me (requer Bearer token)
pub async fn get_me(
    State(app_state): State<AppState>,
    AuthenticatedUser(auth): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let user = app_state
        .user_repo
        .find_by_id(auth.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Usuário não encontrado".to_string()))?;

    let tenant = app_state.tenant_repo.find_by_id(auth.tenant_id).await?;

    Ok(Json(json!({
        "user": {
            "id": user.id,
            "email": user.email,
            "name": user.name,
            "role": user.role,
            "tenantId": user.tenant_id,
        },
        "tenant": tenant.map(|tenant| json!({
            "id": tenant.id,
            "companyName": tenant.company_name,
            "status": tenant.status,
        })),
    })))
}
