// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// Representa um usuário vindo do banco de dados
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i32,
    pub tenant_id: i32,
    pub email: String,
    pub name: Option<String>,

    #[serde(skip_serializing)] // IMPORTANTE para segurança
    pub password_hash: String,

    pub role: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Projeção usada na listagem de usuários
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: i32,
    pub email: String,
    pub name: Option<String>,
    pub role: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

// Dados para criação de conta (tenant + usuário admin).
// Campos opcionais: a rota responde 400 com mensagem própria quando faltam.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPayload {
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub plan_id: Option<i32>,
}

// Dados para login
#[derive(Debug, Deserialize)]
pub struct LoginPayload {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

// Criação de usuário dentro do tenant (rota restrita a admin/gestor)
#[derive(Debug, Deserialize)]
pub struct CreateUserPayload {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

// Atualização de usuário: name aceita null para limpar; role e isActive só
// são aplicados quando quem chama é admin/gestor; password não vazio é
// re-hasheado.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserPayload {
    #[serde(default, deserialize_with = "crate::common::serde_utils::double_option")]
    pub name: Option<Option<String>>,
    pub role: Option<String>,
    pub is_active: Option<bool>,
    pub password: Option<String>,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub sub: i32, // ID do usuário
    pub tenant_id: i32,
    pub role: String,
    pub email: String,
    pub exp: usize, // Expiration time (quando o token expira)
    pub iat: usize, // Issued At (quando o token foi criado)
}

// Identidade extraída do token e inserida nas "extensions" da requisição.
// O guard só decodifica o JWT; nenhuma consulta ao banco por requisição.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: i32,
    pub tenant_id: i32,
    pub role: String,
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usuario_serializado_nao_expoe_hash() {
        let user = User {
            id: 7,
            tenant_id: 1,
            email: "ana@imob.com".to_string(),
            name: Some("Ana".to_string()),
            password_hash: "$2b$10$abcdef".to_string(),
            role: "corretor".to_string(),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["tenantId"], 1);
        assert_eq!(json["isActive"], true);
    }

    #[test]
    fn claims_usam_camel_case() {
        let claims = Claims {
            sub: 3,
            tenant_id: 9,
            role: "admin".to_string(),
            email: "dona@imob.com".to_string(),
            exp: 2_000_000_000,
            iat: 1_700_000_000,
        };

        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["sub"], 3);
        assert_eq!(json["tenantId"], 9);
        assert!(json.get("tenant_id").is_none());
    }

    #[test]
    fn payload_de_registro_aceita_plan_id_nulo() {
        let payload: RegisterPayload = serde_json::from_str(
            r#"{"companyName": "Imob Sol", "email": "sol@imob.com", "password": "s3nh4", "planId": null}"#,
        )
        .unwrap();
        assert_eq!(payload.company_name.as_deref(), Some("Imob Sol"));
        assert!(payload.plan_id.is_none());
    }
}
