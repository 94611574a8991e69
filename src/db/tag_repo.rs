// src/db/tag_repo.rs

use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{common::error::AppError, models::crm::Tag};

#[derive(Clone)]
pub struct TagRepository {
    pool: PgPool,
}

impl TagRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, tenant_id: i32) -> Result<Vec<Tag>, AppError> {
        let list = sqlx::query_as::<_, Tag>("SELECT * FROM tags WHERE tenant_id = $1")
            .bind(tenant_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(list)
    }

    pub async fn find(&self, id: i32, tenant_id: i32) -> Result<Option<Tag>, AppError> {
        let maybe_tag =
            sqlx::query_as::<_, Tag>("SELECT * FROM tags WHERE id = $1 AND tenant_id = $2")
                .bind(id)
                .bind(tenant_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(maybe_tag)
    }

    pub async fn find_by_ids(&self, ids: &[i32], tenant_id: i32) -> Result<Vec<Tag>, AppError> {
        let tags =
            sqlx::query_as::<_, Tag>("SELECT * FROM tags WHERE id = ANY($1) AND tenant_id = $2")
                .bind(ids)
                .bind(tenant_id)
                .fetch_all(&self.pool)
                .await?;
        Ok(tags)
    }

    pub async fn exists(&self, id: i32, tenant_id: i32) -> Result<bool, AppError> {
        let row: Option<(i32,)> =
            sqlx::query_as("SELECT id FROM tags WHERE id = $1 AND tenant_id = $2")
                .bind(id)
                .bind(tenant_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.is_some())
    }

    pub async fn create(
        &self,
        tenant_id: i32,
        name: &str,
        slug: &str,
        color: Option<&str>,
        category: Option<&str>,
    ) -> Result<Tag, AppError> {
        let tag = sqlx::query_as::<_, Tag>(
            r#"
            INSERT INTO tags (tenant_id, name, slug, color, category)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(tenant_id)
        .bind(name)
        .bind(slug)
        .bind(color)
        .bind(category)
        .fetch_one(&self.pool)
        .await?;
        Ok(tag)
    }

    // O handler garante ao menos um campo presente antes de chamar aqui,
    // senão o SET ficaria vazio.
    pub async fn update(
        &self,
        id: i32,
        tenant_id: i32,
        name: Option<&str>,
        slug: Option<Option<&str>>,
        color: Option<Option<&str>>,
        category: Option<Option<&str>>,
    ) -> Result<Option<Tag>, AppError> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE tags SET ");
        let mut fields = qb.separated(", ");
        if let Some(name) = name {
            fields.push("name = ").push_bind_unseparated(name);
        }
        if let Some(slug) = slug {
            fields.push("slug = ").push_bind_unseparated(slug);
        }
        if let Some(color) = color {
            fields.push("color = ").push_bind_unseparated(color);
        }
        if let Some(category) = category {
            fields.push("category = ").push_bind_unseparated(category);
        }
        qb.push(" WHERE id = ").push_bind(id);
        qb.push(" AND tenant_id = ").push_bind(tenant_id);
        qb.push(" RETURNING *");

        let tag = qb.build_query_as::<Tag>().fetch_optional(&self.pool).await?;
        Ok(tag)
    }

    // As relações contato<->tag caem junto pelo ON DELETE CASCADE.
    pub async fn delete(&self, id: i32, tenant_id: i32) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM tags WHERE id = $1 AND tenant_id = $2")
            .bind(id)
            .bind(tenant_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
