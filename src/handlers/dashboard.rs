// src/handlers/dashboard.rs

use axum::{extract::State, response::IntoResponse, Json};

use crate::{common::error::AppError, config::AppState, middleware::auth::AuthenticatedUser};

// GET /api/dashboard (totais do tenant para o painel)
pub async fn get_summary(
    State(app_state): State<AppState>,
    AuthenticatedUser(auth): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let counts = app_state.dashboard_repo.counts(auth.tenant_id).await?;

    Ok(Json(counts))
}
