// src/db/pipeline_repo.rs

use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{common::error::AppError, models::crm::PipelineStage};

#[derive(Clone)]
pub struct PipelineStageRepository {
    pool: PgPool,
}

impl PipelineStageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, tenant_id: i32) -> Result<Vec<PipelineStage>, AppError> {
        let list = sqlx::query_as::<_, PipelineStage>(
            "SELECT * FROM pipeline_stages WHERE tenant_id = $1 ORDER BY sort_order ASC, id ASC",
        )
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(list)
    }

    pub async fn find(&self, id: i32, tenant_id: i32) -> Result<Option<PipelineStage>, AppError> {
        let maybe_stage = sqlx::query_as::<_, PipelineStage>(
            "SELECT * FROM pipeline_stages WHERE id = $1 AND tenant_id = $2",
        )
        .bind(id)
        .bind(tenant_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe_stage)
    }

    pub async fn create(
        &self,
        tenant_id: i32,
        name: &str,
        slug: &str,
        sort_order: i32,
    ) -> Result<PipelineStage, AppError> {
        let stage = sqlx::query_as::<_, PipelineStage>(
            r#"
            INSERT INTO pipeline_stages (tenant_id, name, slug, sort_order)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(tenant_id)
        .bind(name)
        .bind(slug)
        .bind(sort_order)
        .fetch_one(&self.pool)
        .await?;
        Ok(stage)
    }

    // O handler garante ao menos um campo presente antes de chamar aqui.
    pub async fn update(
        &self,
        id: i32,
        tenant_id: i32,
        name: Option<&str>,
        slug: Option<&str>,
        sort_order: Option<i32>,
    ) -> Result<Option<PipelineStage>, AppError> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE pipeline_stages SET ");
        let mut fields = qb.separated(", ");
        if let Some(name) = name {
            fields.push("name = ").push_bind_unseparated(name);
        }
        if let Some(slug) = slug {
            fields.push("slug = ").push_bind_unseparated(slug);
        }
        if let Some(sort_order) = sort_order {
            fields.push("sort_order = ").push_bind_unseparated(sort_order);
        }
        qb.push(" WHERE id = ").push_bind(id);
        qb.push(" AND tenant_id = ").push_bind(tenant_id);
        qb.push(" RETURNING *");

        let stage = qb
            .build_query_as::<PipelineStage>()
            .fetch_optional(&self.pool)
            .await?;
        Ok(stage)
    }

    pub async fn delete(&self, id: i32, tenant_id: i32) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM pipeline_stages WHERE id = $1 AND tenant_id = $2")
            .bind(id)
            .bind(tenant_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
