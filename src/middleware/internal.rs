// src/middleware/internal.rs

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};

use crate::{common::error::AppError, config::AppState};

// Guard do canal server-to-server (ex.: MCP server): exige X-Internal-Key
// igual à chave configurada. Sem chave configurada, nega tudo.
pub async fn internal_key_guard(
    State(app_state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let sent = request
        .headers()
        .get("x-internal-key")
        .and_then(|value| value.to_str().ok());

    if !key_matches(app_state.internal_key.as_deref(), sent) {
        return Err(AppError::InternalKeyRejected);
    }

    Ok(next.run(request).await)
}

fn key_matches(configured: Option<&str>, sent: Option<&str>) -> bool {
    match (configured, sent) {
        (Some(configured), Some(sent)) if !configured.is_empty() => configured == sent,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sem_chave_configurada_nega_tudo() {
        assert!(!key_matches(None, Some("qualquer")));
        assert!(!key_matches(None, None));
        assert!(!key_matches(Some(""), Some("")));
    }

    #[test]
    fn chave_correta_passa_e_errada_nega() {
        assert!(key_matches(Some("s3gr3d0"), Some("s3gr3d0")));
        assert!(!key_matches(Some("s3gr3d0"), Some("errada")));
        assert!(!key_matches(Some("s3gr3d0"), None));
    }
}
