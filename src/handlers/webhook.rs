// src/handlers/webhook.rs

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::{
    config::AppState,
    services::intent::{classify, Intent},
};

// Payload genérico para teste e futura integração Evolution/Chatwoot.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookMessagePayload {
    pub from: Option<String>,
    pub message: Option<String>,
    pub tenant_id: Option<i32>,
}

// POST /api/webhook/message (body: { from, message, tenantId? }, resposta: { reply })
// Mesmo em erro a resposta mantém o formato { reply }, nunca o { error }
// padrão da API: quem lê é o canal de mensagens, não o painel.
pub async fn receive_message(
    State(app_state): State<AppState>,
    Json(payload): Json<WebhookMessagePayload>,
) -> Response {
    let text = payload.message.as_deref().unwrap_or("").trim().to_string();
    let from = payload.from.as_deref().unwrap_or("unknown");
    let tenant = tenant_or_default(payload.tenant_id);

    let reply = match classify(&text) {
        Intent::Help => {
            return Json(json!({
                "reply": "Olá! Envie uma mensagem. Ex.: \"buscar imóveis\" ou um número para ver detalhes de um imóvel.",
            }))
            .into_response();
        }
        Intent::SearchProperties {
            neighborhood,
            property_type,
            max_value,
        } => {
            let mut arguments = Map::new();
            arguments.insert("tenant_id".to_string(), json!(tenant));
            if let Some(neighborhood) = neighborhood {
                arguments.insert("neighborhood".to_string(), json!(neighborhood));
            }
            if let Some(property_type) = property_type {
                arguments.insert("property_type".to_string(), json!(property_type));
            }
            if let Some(max_value) = max_value {
                arguments.insert("max_value".to_string(), json!(max_value));
            }
            match app_state
                .mcp_client
                .call_tool("search_properties", Value::Object(arguments))
                .await
            {
                Ok(result) if result.is_error => format!("Erro: {}", result.text),
                Ok(result) => result.text,
                Err(err) => return failure_reply(err.to_string()),
            }
        }
        Intent::GetProperty { property_id } => {
            let arguments = json!({ "property_id": property_id, "tenant_id": tenant });
            match app_state.mcp_client.call_tool("get_property", arguments).await {
                Ok(result) if result.is_error => format!("Erro: {}", result.text),
                Ok(result) => result.text,
                Err(err) => return failure_reply(err.to_string()),
            }
        }
        Intent::Fallback => {
            "Não entendi. Digite \"buscar imóveis\" para listar ou um número (ex.: 1) para ver detalhes de um imóvel."
                .to_string()
        }
    };

    tracing::info!(
        "[webhook] from={} message=\"{}\" reply_len={}",
        from,
        text.chars().take(50).collect::<String>(),
        reply.len()
    );

    Json(json!({ "reply": reply })).into_response()
}

// Mensagem sem tenant (ou com id inválido) cai no tenant 1.
fn tenant_or_default(tenant_id: Option<i32>) -> i32 {
    tenant_id.filter(|id| *id > 0).unwrap_or(1)
}

fn failure_reply(message: String) -> Response {
    tracing::error!("[webhook] {}", message);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "reply": format!("Desculpe, ocorreu um erro: {}. Tente novamente.", message),
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn resposta_de_falha_mantem_o_formato_reply() {
        let response =
            failure_reply("MCP server inacessível (http://localhost:8000): timeout".to_string());
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            body["reply"],
            "Desculpe, ocorreu um erro: MCP server inacessível (http://localhost:8000): timeout. Tente novamente."
        );
        assert!(body.get("error").is_none());
    }

    #[test]
    fn tenant_padrao_quando_ausente_ou_invalido() {
        assert_eq!(tenant_or_default(None), 1);
        assert_eq!(tenant_or_default(Some(0)), 1);
        assert_eq!(tenant_or_default(Some(-2)), 1);
        assert_eq!(tenant_or_default(Some(5)), 5);
    }
}
