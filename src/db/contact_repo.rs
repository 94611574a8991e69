// src/db/contact_repo.rs

use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{
    common::error::AppError,
    models::crm::{Contact, CreateContactPayload, Tag, UpdateContactPayload},
};

#[derive(Clone)]
pub struct ContactRepository {
    pool: PgPool,
}

impl ContactRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Filtro por tag resolve primeiro os ids relacionados; sem relação alguma,
    // a lista é vazia sem tocar na tabela de contatos.
    pub async fn list(
        &self,
        tenant_id: i32,
        pipeline_stage_id: Option<i32>,
        tag_id: Option<i32>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Contact>, AppError> {
        let contact_ids = match tag_id {
            Some(tag_id) => {
                let rows: Vec<(i32,)> = sqlx::query_as(
                    "SELECT contact_id FROM contact_tag_relations WHERE tag_id = $1",
                )
                .bind(tag_id)
                .fetch_all(&self.pool)
                .await?;
                if rows.is_empty() {
                    return Ok(Vec::new());
                }
                Some(rows.into_iter().map(|(id,)| id).collect::<Vec<i32>>())
            }
            None => None,
        };

        let mut qb: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT * FROM contacts WHERE tenant_id = ");
        qb.push_bind(tenant_id);
        if let Some(stage_id) = pipeline_stage_id {
            qb.push(" AND pipeline_stage_id = ").push_bind(stage_id);
        }
        if let Some(ids) = contact_ids {
            qb.push(" AND id = ANY(").push_bind(ids);
            qb.push(")");
        }
        qb.push(" ORDER BY created_at DESC LIMIT ").push_bind(limit);
        qb.push(" OFFSET ").push_bind(offset);

        let list = qb
            .build_query_as::<Contact>()
            .fetch_all(&self.pool)
            .await?;
        Ok(list)
    }

    pub async fn find(&self, id: i32, tenant_id: i32) -> Result<Option<Contact>, AppError> {
        let maybe_contact =
            sqlx::query_as::<_, Contact>("SELECT * FROM contacts WHERE id = $1 AND tenant_id = $2")
                .bind(id)
                .bind(tenant_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(maybe_contact)
    }

    pub async fn exists(&self, id: i32, tenant_id: i32) -> Result<bool, AppError> {
        let row: Option<(i32,)> =
            sqlx::query_as("SELECT id FROM contacts WHERE id = $1 AND tenant_id = $2")
                .bind(id)
                .bind(tenant_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.is_some())
    }

    // Tags embutidas no detalhe; o filtro de tenant na tag barra relações
    // que apontem para etiqueta de outra conta.
    pub async fn tags_for_contact(
        &self,
        contact_id: i32,
        tenant_id: i32,
    ) -> Result<Vec<Tag>, AppError> {
        let tags = sqlx::query_as::<_, Tag>(
            r#"
            SELECT t.*
            FROM tags t
            JOIN contact_tag_relations r ON r.tag_id = t.id
            WHERE r.contact_id = $1 AND t.tenant_id = $2
            "#,
        )
        .bind(contact_id)
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(tags)
    }

    pub async fn create(
        &self,
        tenant_id: i32,
        payload: &CreateContactPayload,
    ) -> Result<Contact, AppError> {
        let contact = sqlx::query_as::<_, Contact>(
            r#"
            INSERT INTO contacts (
                tenant_id, name, phone, email, source,
                pipeline_stage_id, lead_score, opt_in, notes, metadata
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(tenant_id)
        .bind(payload.name.as_deref())
        .bind(payload.phone.as_deref().unwrap_or(""))
        .bind(payload.email.as_deref())
        .bind(payload.source.as_deref())
        .bind(payload.pipeline_stage_id)
        .bind(payload.lead_score.unwrap_or(0))
        .bind(payload.opt_in.unwrap_or(true))
        .bind(payload.notes.as_deref())
        .bind(payload.metadata.as_ref())
        .fetch_one(&self.pool)
        .await?;
        Ok(contact)
    }

    pub async fn update(
        &self,
        id: i32,
        tenant_id: i32,
        payload: &UpdateContactPayload,
    ) -> Result<Option<Contact>, AppError> {
        let mut qb: QueryBuilder<Postgres> =
            QueryBuilder::new("UPDATE contacts SET updated_at = now()");
        if let Some(phone) = &payload.phone {
            qb.push(", phone = ").push_bind(phone.as_str());
        }
        if let Some(name) = &payload.name {
            qb.push(", name = ").push_bind(name.as_deref());
        }
        if let Some(email) = &payload.email {
            qb.push(", email = ").push_bind(email.as_deref());
        }
        if let Some(source) = &payload.source {
            qb.push(", source = ").push_bind(source.as_deref());
        }
        if let Some(stage_id) = &payload.pipeline_stage_id {
            qb.push(", pipeline_stage_id = ").push_bind(*stage_id);
        }
        if let Some(lead_score) = &payload.lead_score {
            qb.push(", lead_score = ").push_bind(*lead_score);
        }
        if let Some(opt_in) = &payload.opt_in {
            qb.push(", opt_in = ").push_bind(*opt_in);
        }
        if let Some(opt_in_at) = &payload.opt_in_at {
            qb.push(", opt_in_at = ").push_bind(*opt_in_at);
        }
        if let Some(validated) = &payload.whatsapp_validated {
            qb.push(", whatsapp_validated = ").push_bind(*validated);
        }
        if let Some(notes) = &payload.notes {
            qb.push(", notes = ").push_bind(notes.as_deref());
        }
        if let Some(metadata) = &payload.metadata {
            qb.push(", metadata = ").push_bind(metadata.as_ref());
        }
        qb.push(" WHERE id = ").push_bind(id);
        qb.push(" AND tenant_id = ").push_bind(tenant_id);
        qb.push(" RETURNING *");

        let contact = qb
            .build_query_as::<Contact>()
            .fetch_optional(&self.pool)
            .await?;
        Ok(contact)
    }

    // O handler já confirmou que o contato pertence ao tenant.
    pub async fn delete(&self, id: i32, tenant_id: i32) -> Result<(), AppError> {
        sqlx::query("DELETE FROM contact_tag_relations WHERE contact_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        sqlx::query("DELETE FROM contacts WHERE id = $1 AND tenant_id = $2")
            .bind(id)
            .bind(tenant_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    // =========================================================================
    //  RELAÇÕES CONTATO <-> TAG
    // =========================================================================

    pub async fn add_tags(&self, contact_id: i32, tag_ids: &[i32]) -> Result<(), AppError> {
        if tag_ids.is_empty() {
            return Ok(());
        }
        let mut qb: QueryBuilder<Postgres> =
            QueryBuilder::new("INSERT INTO contact_tag_relations (contact_id, tag_id) ");
        qb.push_values(tag_ids, |mut row, tag_id| {
            row.push_bind(contact_id).push_bind(*tag_id);
        });
        qb.build().execute(&self.pool).await?;
        Ok(())
    }

    // Troca completa do conjunto de tags: apaga tudo e reinsere.
    pub async fn replace_tags(&self, contact_id: i32, tag_ids: &[i32]) -> Result<(), AppError> {
        sqlx::query("DELETE FROM contact_tag_relations WHERE contact_id = $1")
            .bind(contact_id)
            .execute(&self.pool)
            .await?;
        self.add_tags(contact_id, tag_ids).await
    }

    pub async fn add_tag(&self, contact_id: i32, tag_id: i32) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO contact_tag_relations (contact_id, tag_id)
            VALUES ($1, $2)
            ON CONFLICT (contact_id, tag_id) DO NOTHING
            "#,
        )
        .bind(contact_id)
        .bind(tag_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn remove_tag(&self, contact_id: i32, tag_id: i32) -> Result<bool, AppError> {
        let result =
            sqlx::query("DELETE FROM contact_tag_relations WHERE contact_id = $1 AND tag_id = $2")
                .bind(contact_id)
                .bind(tag_id)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
