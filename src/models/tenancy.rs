// src/models/tenancy.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::common::serde_utils::double_option;

// Plano de assinatura (tabela global, sem tenant)
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub stripe_price_id: Option<String>,
    pub price_monthly: i32,
    pub max_properties: Option<i32>,
    pub max_contacts: Option<i32>,
    pub max_dispatches_per_month: Option<i32>,
    pub max_agents: Option<i32>,
    pub max_users: Option<i32>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Campos editáveis do próprio tenant. Null explícito limpa as colunas
// anuláveis; companyName e email só aceitam valor.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTenantPayload {
    pub company_name: Option<String>,
    pub email: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub subdomain: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub evolution_instance_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub evolution_api_key: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub chatwoot_agent_id: Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option")]
    pub chatwoot_agent_bot_id: Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option")]
    pub chatwoot_agent_bot_token: Option<Option<String>>,
}

// A conta raiz de cada imobiliária / corretor
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    pub id: i32,
    pub plan_id: i32,
    pub company_name: String,
    pub email: String,
    pub subdomain: Option<String>,
    pub status: String,

    #[serde(skip_serializing)] // IMPORTANTE para segurança
    pub password_hash: Option<String>,

    pub is_activated: bool,

    // Integrações (Evolution API / Chatwoot / Stripe)
    pub evolution_instance_name: Option<String>,
    pub evolution_api_key: Option<String>,
    pub chatwoot_agent_id: Option<i32>,
    pub chatwoot_agent_bot_id: Option<i32>,
    pub chatwoot_agent_bot_token: Option<String>,
    pub stripe_customer_id: Option<String>,
    pub stripe_subscription_id: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
