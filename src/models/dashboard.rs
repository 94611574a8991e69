// src/models/dashboard.rs

use serde::Serialize;
use sqlx::FromRow;

// Contadores do painel, preenchidos por uma única consulta com subselects
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DashboardCounts {
    pub properties: i32,
    pub contacts: i32,
    pub tasks_pending: i32,
}
