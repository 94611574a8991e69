// src/db/tenancy_repo.rs

use sqlx::{Executor, PgPool, Postgres, QueryBuilder};

use crate::{
    common::error::AppError,
    models::tenancy::{Plan, Tenant, UpdateTenantPayload},
};

#[derive(Clone)]
pub struct TenantRepository {
    pool: PgPool,
}

impl TenantRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<Tenant>, AppError> {
        let maybe_tenant = sqlx::query_as::<_, Tenant>("SELECT * FROM tenants WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(maybe_tenant)
    }

    // O registro cria o tenant e o usuário admin na mesma transação,
    // por isso recebe um executor genérico (pool ou transação).
    pub async fn create<'e, E>(
        &self,
        executor: E,
        plan_id: i32,
        company_name: &str,
        email: &str,
    ) -> Result<Tenant, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let tenant = sqlx::query_as::<_, Tenant>(
            r#"
            INSERT INTO tenants (plan_id, company_name, email, status, is_activated)
            VALUES ($1, $2, $3, 'active', TRUE)
            RETURNING *
            "#,
        )
        .bind(plan_id)
        .bind(company_name)
        .bind(email)
        .fetch_one(executor)
        .await?;
        Ok(tenant)
    }

    // O handler já garantiu que id é o tenant do próprio chamador; a linha
    // do tenant é o próprio escopo.
    pub async fn update(
        &self,
        id: i32,
        payload: &UpdateTenantPayload,
    ) -> Result<Option<Tenant>, AppError> {
        let mut qb: QueryBuilder<Postgres> =
            QueryBuilder::new("UPDATE tenants SET updated_at = now()");
        if let Some(company_name) = &payload.company_name {
            qb.push(", company_name = ").push_bind(company_name.as_str());
        }
        if let Some(email) = &payload.email {
            qb.push(", email = ").push_bind(email.as_str());
        }
        if let Some(subdomain) = &payload.subdomain {
            qb.push(", subdomain = ").push_bind(subdomain.as_deref());
        }
        if let Some(instance) = &payload.evolution_instance_name {
            qb.push(", evolution_instance_name = ")
                .push_bind(instance.as_deref());
        }
        if let Some(api_key) = &payload.evolution_api_key {
            qb.push(", evolution_api_key = ").push_bind(api_key.as_deref());
        }
        if let Some(agent_id) = &payload.chatwoot_agent_id {
            qb.push(", chatwoot_agent_id = ").push_bind(*agent_id);
        }
        if let Some(bot_id) = &payload.chatwoot_agent_bot_id {
            qb.push(", chatwoot_agent_bot_id = ").push_bind(*bot_id);
        }
        if let Some(bot_token) = &payload.chatwoot_agent_bot_token {
            qb.push(", chatwoot_agent_bot_token = ")
                .push_bind(bot_token.as_deref());
        }
        qb.push(" WHERE id = ").push_bind(id);
        qb.push(" RETURNING *");

        let tenant = qb
            .build_query_as::<Tenant>()
            .fetch_optional(&self.pool)
            .await?;
        Ok(tenant)
    }

    pub async fn list_active_plans(&self) -> Result<Vec<Plan>, AppError> {
        let list = sqlx::query_as::<_, Plan>("SELECT * FROM plans WHERE is_active = TRUE")
            .fetch_all(&self.pool)
            .await?;
        Ok(list)
    }
}
