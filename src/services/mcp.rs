// src/services/mcp.rs

use chrono::Utc;
use reqwest::{header, StatusCode};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use thiserror::Error;

// ---
// Cliente das tools do servidor MCP (JSON-RPC 2.0 sobre HTTP)
// ---
// Transport Streamable HTTP (2025-03-26): exige initialize antes de
// tools/call, e a resposta pode vir como JSON puro ou como stream SSE.

const MCP_PROTOCOL_VERSION: &str = "2025-03-26";

#[derive(Debug, Error)]
pub enum McpError {
    #[error("MCP server inacessível ({url}): {message}")]
    Unreachable { url: String, message: String },
    #[error("MCP resposta inválida (não JSON): {0}")]
    InvalidResponse(String),
    #[error("MCP retornou {status}: {body}")]
    ErrorBody { status: u16, body: String },
    #[error("MCP initialize falhou ({status}): {message}")]
    InitializeFailed { status: u16, message: String },
    #[error("MCP initialize: {0}")]
    InitializeRejected(String),
    #[error("MCP retornou {0}")]
    CallFailed(String),
    #[error("{0}")]
    Rpc(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct McpToolResult {
    pub text: String,
    pub is_error: bool,
}

// Sessão em memória (evita initialize a cada request). Um slot por cliente,
// compartilhado entre os clones que vivem no AppState.
#[derive(Clone, Default)]
pub struct SessionCache {
    inner: Arc<Mutex<Option<String>>>,
}

impl SessionCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn get(&self) -> Option<String> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set(&self, session_id: String) {
        *self.inner.lock().unwrap_or_else(PoisonError::into_inner) = Some(session_id);
    }

    fn clear(&self) {
        *self.inner.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

struct RawResponse {
    status: StatusCode,
    session_header: Option<String>,
    data: Option<Value>,
}

#[derive(Clone)]
pub struct McpClient {
    http: reqwest::Client,
    base_url: String,
    session: SessionCache,
}

impl McpClient {
    pub fn new(base_url: String) -> Self {
        Self::with_session_cache(base_url, SessionCache::new())
    }

    pub fn with_session_cache(base_url: String, session: SessionCache) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("não foi possível construir o cliente HTTP do MCP");
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        }
    }

    /// Chama uma tool no servidor MCP. Faz initialize na primeira chamada e
    /// reutiliza o Mcp-Session-Id; em 404 limpa a sessão e repete uma vez.
    pub async fn call_tool(&self, name: &str, arguments: Value) -> Result<McpToolResult, McpError> {
        let session_id = self.ensure_session().await?;

        let body = json!({
            "jsonrpc": "2.0",
            "id": Utc::now().timestamp_millis(),
            "method": "tools/call",
            "params": { "name": name, "arguments": arguments },
        });

        let mut response = self.post(&body, session_id.as_deref()).await?;

        if response.status == StatusCode::NOT_FOUND && session_id.is_some() {
            self.session.clear();
            let new_session_id = self.ensure_session().await?;
            response = self.post(&body, new_session_id.as_deref()).await?;
        }

        if !response.status.is_success() {
            let message = response
                .data
                .as_ref()
                .and_then(|data| data.pointer("/error/message"))
                .and_then(Value::as_str)
                .filter(|m| !m.is_empty());
            let detail = match message {
                Some(message) => format!("{}: {}", response.status.as_u16(), message),
                None => response.status.as_u16().to_string(),
            };
            return Err(McpError::CallFailed(detail));
        }

        let data = response.data.unwrap_or(Value::Null);
        if let Some(error) = data.get("error") {
            let message = error
                .get("message")
                .and_then(Value::as_str)
                .filter(|m| !m.is_empty())
                .unwrap_or("Erro ao chamar tool MCP");
            return Err(McpError::Rpc(message.to_string()));
        }

        let text = data
            .pointer("/result/content")
            .and_then(Value::as_array)
            .and_then(|items| {
                items
                    .iter()
                    .find(|item| item.get("type").and_then(Value::as_str) == Some("text"))
            })
            .and_then(|item| item.get("text"))
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_string();
        let is_error = data
            .pointer("/result/isError")
            .and_then(Value::as_bool)
            .unwrap_or(false);

        Ok(McpToolResult { text, is_error })
    }

    // Handshake initialize; guarda o Mcp-Session-Id se o servidor mandar um.
    async fn ensure_session(&self) -> Result<Option<String>, McpError> {
        if let Some(session_id) = self.session.get() {
            return Ok(Some(session_id));
        }

        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "initialize",
            "params": {
                "protocolVersion": MCP_PROTOCOL_VERSION,
                "capabilities": {},
                "clientInfo": { "name": "backend-webhook", "version": "0.1" },
            },
        });

        let response = self.post(&body, None).await?;

        let rpc_error = response
            .data
            .as_ref()
            .and_then(|data| data.pointer("/error/message"))
            .and_then(Value::as_str)
            .map(str::to_string);

        if !response.status.is_success() {
            let message = rpc_error.unwrap_or_else(|| {
                response
                    .status
                    .canonical_reason()
                    .unwrap_or("erro desconhecido")
                    .to_string()
            });
            return Err(McpError::InitializeFailed {
                status: response.status.as_u16(),
                message,
            });
        }
        if let Some(message) = rpc_error {
            return Err(McpError::InitializeRejected(message));
        }

        if let Some(session_id) = &response.session_header {
            self.session.set(session_id.clone());
        }
        Ok(response.session_header)
    }

    async fn post(&self, body: &Value, session_id: Option<&str>) -> Result<RawResponse, McpError> {
        let mut request = self
            .http
            .post(format!("{}/mcp/", self.base_url))
            .header(header::ACCEPT, "application/json, text/event-stream")
            .json(body);
        if let Some(session_id) = session_id {
            request = request.header("Mcp-Session-Id", session_id);
        }

        let response = request.send().await.map_err(|e| McpError::Unreachable {
            url: self.base_url.clone(),
            message: e.to_string(),
        })?;

        let status = response.status();
        let session_header = response
            .headers()
            .get("mcp-session-id")
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("")
            .to_string();
        let text = response.text().await.map_err(|e| McpError::Unreachable {
            url: self.base_url.clone(),
            message: e.to_string(),
        })?;

        let data = if content_type.contains("text/event-stream") {
            parse_sse(&text)
        } else if text.is_empty() {
            None
        } else {
            match serde_json::from_str::<Value>(&text) {
                Ok(value) => Some(value),
                Err(_) => {
                    let snippet: String = text.chars().take(200).collect();
                    if !status.is_success() {
                        return Err(McpError::ErrorBody {
                            status: status.as_u16(),
                            body: snippet,
                        });
                    }
                    return Err(McpError::InvalidResponse(snippet));
                }
            }
        };

        Ok(RawResponse {
            status,
            session_header,
            data,
        })
    }
}

// Extrai o JSON-RPC de uma resposta SSE (event: message \n data: {...}).
// Vale a última linha "data:" parseável; as demais são ignoradas.
fn parse_sse(text: &str) -> Option<Value> {
    let mut last = None;
    for line in text.lines() {
        if let Some(raw) = line.strip_prefix("data:") {
            let raw = raw.trim();
            if raw.is_empty() || raw == "[DONE]" {
                continue;
            }
            if let Ok(value) = serde_json::from_str::<Value>(raw) {
                last = Some(value);
            }
        }
    }
    last
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::State,
        http::HeaderMap,
        response::{IntoResponse, Response},
        routing::post,
        Json, Router,
    };

    #[derive(Default)]
    struct MockState {
        initialize_count: usize,
        tool_call_count: usize,
        last_session_header: Option<String>,
        expire_first_tool_call: bool,
        sse_reply: bool,
        rpc_error: bool,
        tool_is_error: bool,
    }

    async fn mock_mcp(
        State(state): State<Arc<Mutex<MockState>>>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> Response {
        let method = body.get("method").and_then(Value::as_str).unwrap_or("");
        let mut mock = state.lock().unwrap();

        if method == "initialize" {
            mock.initialize_count += 1;
            let session = format!("sessao-{}", mock.initialize_count);
            return (
                [("Mcp-Session-Id", session)],
                Json(json!({
                    "jsonrpc": "2.0",
                    "id": 1,
                    "result": { "protocolVersion": MCP_PROTOCOL_VERSION },
                })),
            )
                .into_response();
        }

        mock.tool_call_count += 1;
        mock.last_session_header = headers
            .get("mcp-session-id")
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        if mock.expire_first_tool_call && mock.tool_call_count == 1 {
            return StatusCode::NOT_FOUND.into_response();
        }
        if mock.rpc_error {
            return Json(json!({
                "jsonrpc": "2.0",
                "id": 2,
                "error": { "code": -32000, "message": "tool explodiu" },
            }))
            .into_response();
        }

        let reply = json!({
            "jsonrpc": "2.0",
            "id": 2,
            "result": {
                "content": [{ "type": "text", "text": "Imóveis encontrados (2)" }],
                "isError": mock.tool_is_error,
            },
        });

        if mock.sse_reply {
            let ignored = json!({
                "jsonrpc": "2.0",
                "id": 2,
                "result": { "content": [{ "type": "text", "text": "ignorada" }] },
            });
            let body = format!("event: message\ndata: {}\n\ndata: {}\n\n", ignored, reply);
            return ([(header::CONTENT_TYPE.as_str(), "text/event-stream")], body).into_response();
        }

        Json(reply).into_response()
    }

    async fn spawn_mock(state: Arc<Mutex<MockState>>) -> String {
        let app = Router::new().route("/mcp/", post(mock_mcp)).with_state(state);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn initialize_acontece_uma_unica_vez() {
        let state = Arc::new(Mutex::new(MockState::default()));
        let base_url = spawn_mock(state.clone()).await;
        let client = McpClient::new(base_url);

        let first = client
            .call_tool("search_properties", json!({ "tenant_id": 1 }))
            .await
            .unwrap();
        let second = client
            .call_tool("search_properties", json!({ "tenant_id": 1 }))
            .await
            .unwrap();

        assert_eq!(first.text, "Imóveis encontrados (2)");
        assert!(!second.is_error);

        let mock = state.lock().unwrap();
        assert_eq!(mock.initialize_count, 1);
        assert_eq!(mock.tool_call_count, 2);
        assert_eq!(mock.last_session_header.as_deref(), Some("sessao-1"));
    }

    #[tokio::test]
    async fn sessao_expirada_refaz_o_handshake_uma_vez() {
        let state = Arc::new(Mutex::new(MockState {
            expire_first_tool_call: true,
            ..Default::default()
        }));
        let base_url = spawn_mock(state.clone()).await;
        let client = McpClient::new(base_url);

        let result = client.call_tool("get_property", json!({ "property_id": 1 })).await.unwrap();
        assert_eq!(result.text, "Imóveis encontrados (2)");

        let mock = state.lock().unwrap();
        assert_eq!(mock.initialize_count, 2); // primeiro handshake + 1 retry
        assert_eq!(mock.tool_call_count, 2); // 404 + reenvio
        assert_eq!(mock.last_session_header.as_deref(), Some("sessao-2"));
    }

    #[tokio::test]
    async fn resposta_sse_usa_a_ultima_linha_data() {
        let state = Arc::new(Mutex::new(MockState {
            sse_reply: true,
            ..Default::default()
        }));
        let base_url = spawn_mock(state.clone()).await;
        let client = McpClient::new(base_url);

        let result = client.call_tool("list_contacts", json!({})).await.unwrap();
        assert_eq!(result.text, "Imóveis encontrados (2)");
    }

    #[tokio::test]
    async fn erro_rpc_vira_mensagem() {
        let state = Arc::new(Mutex::new(MockState {
            rpc_error: true,
            ..Default::default()
        }));
        let base_url = spawn_mock(state.clone()).await;
        let client = McpClient::new(base_url);

        let err = client.call_tool("list_tasks", json!({})).await.unwrap_err();
        assert!(matches!(err, McpError::Rpc(ref m) if m == "tool explodiu"));
    }

    #[tokio::test]
    async fn is_error_propaga_no_resultado() {
        let state = Arc::new(Mutex::new(MockState {
            tool_is_error: true,
            ..Default::default()
        }));
        let base_url = spawn_mock(state.clone()).await;
        let client = McpClient::new(base_url);

        let result = client.call_tool("get_contact", json!({})).await.unwrap();
        assert!(result.is_error);
    }

    #[tokio::test]
    async fn servidor_fora_do_ar_vira_erro_claro() {
        let client = McpClient::new("http://127.0.0.1:9".to_string());
        let err = client.call_tool("search_properties", json!({})).await.unwrap_err();
        assert!(err.to_string().contains("MCP server inacessível (http://127.0.0.1:9)"));
    }

    #[test]
    fn parse_sse_pega_a_ultima_linha_valida() {
        let body = "event: message\ndata: não é json\ndata: {\"a\": 1}\n\ndata: {\"a\": 2}\n";
        assert_eq!(parse_sse(body), Some(json!({ "a": 2 })));

        assert_eq!(parse_sse(""), None);
        assert_eq!(parse_sse("data: [DONE]\n"), None);
        assert_eq!(parse_sse("sem prefixo\n"), None);
    }
}
