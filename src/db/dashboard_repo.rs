// src/db/dashboard_repo.rs

use sqlx::PgPool;

use crate::{common::error::AppError, models::dashboard::DashboardCounts};

#[derive(Clone)]
pub struct DashboardRepository {
    pool: PgPool,
}

impl DashboardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Uma ida só ao banco para os três totais do painel.
    pub async fn counts(&self, tenant_id: i32) -> Result<DashboardCounts, AppError> {
        let counts = sqlx::query_as::<_, DashboardCounts>(
            r#"
            SELECT
                (SELECT COUNT(*)::int FROM properties WHERE tenant_id = $1) AS properties,
                (SELECT COUNT(*)::int FROM contacts WHERE tenant_id = $1) AS contacts,
                (SELECT COUNT(*)::int FROM tasks WHERE tenant_id = $1 AND completed_at IS NULL) AS tasks_pending
            "#,
        )
        .bind(tenant_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(counts)
    }
}
