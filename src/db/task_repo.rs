// src/db/task_repo.rs

use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{
    common::error::AppError,
    models::crm::{CreateTaskPayload, Task, UpdateTaskPayload},
};

#[derive(Clone)]
pub struct TaskRepository {
    pool: PgPool,
}

impl TaskRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Tarefas com prazo vêm primeiro, das mais futuras para as vencidas.
    pub async fn list(
        &self,
        tenant_id: i32,
        contact_id: Option<i32>,
        assigned_to_id: Option<i32>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Task>, AppError> {
        let mut qb: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT * FROM tasks WHERE tenant_id = ");
        qb.push_bind(tenant_id);
        if let Some(contact_id) = contact_id {
            qb.push(" AND contact_id = ").push_bind(contact_id);
        }
        if let Some(assigned_to_id) = assigned_to_id {
            qb.push(" AND assigned_to_id = ").push_bind(assigned_to_id);
        }
        qb.push(" ORDER BY due_at DESC, created_at DESC LIMIT ")
            .push_bind(limit);
        qb.push(" OFFSET ").push_bind(offset);

        let list = qb.build_query_as::<Task>().fetch_all(&self.pool).await?;
        Ok(list)
    }

    pub async fn find(&self, id: i32, tenant_id: i32) -> Result<Option<Task>, AppError> {
        let maybe_task =
            sqlx::query_as::<_, Task>("SELECT * FROM tasks WHERE id = $1 AND tenant_id = $2")
                .bind(id)
                .bind(tenant_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(maybe_task)
    }

    pub async fn create(
        &self,
        tenant_id: i32,
        payload: &CreateTaskPayload,
    ) -> Result<Task, AppError> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (tenant_id, contact_id, property_id, assigned_to_id,
                               title, type, due_at, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(tenant_id)
        .bind(payload.contact_id)
        .bind(payload.property_id)
        .bind(payload.assigned_to_id)
        .bind(payload.title.as_deref().unwrap_or("Tarefa"))
        .bind(payload.r#type.as_deref())
        .bind(payload.due_at)
        .bind(payload.notes.as_deref())
        .fetch_one(&self.pool)
        .await?;
        Ok(task)
    }

    pub async fn update(
        &self,
        id: i32,
        tenant_id: i32,
        payload: &UpdateTaskPayload,
    ) -> Result<Option<Task>, AppError> {
        let mut qb: QueryBuilder<Postgres> =
            QueryBuilder::new("UPDATE tasks SET updated_at = now()");
        if let Some(title) = &payload.title {
            qb.push(", title = ").push_bind(title.as_str());
        }
        if let Some(contact_id) = &payload.contact_id {
            qb.push(", contact_id = ").push_bind(*contact_id);
        }
        if let Some(property_id) = &payload.property_id {
            qb.push(", property_id = ").push_bind(*property_id);
        }
        if let Some(assigned_to_id) = &payload.assigned_to_id {
            qb.push(", assigned_to_id = ").push_bind(*assigned_to_id);
        }
        if let Some(kind) = &payload.r#type {
            qb.push(", type = ").push_bind(kind.as_deref());
        }
        if let Some(due_at) = &payload.due_at {
            qb.push(", due_at = ").push_bind(*due_at);
        }
        if let Some(completed_at) = &payload.completed_at {
            qb.push(", completed_at = ").push_bind(*completed_at);
        }
        if let Some(notes) = &payload.notes {
            qb.push(", notes = ").push_bind(notes.as_deref());
        }
        qb.push(" WHERE id = ").push_bind(id);
        qb.push(" AND tenant_id = ").push_bind(tenant_id);
        qb.push(" RETURNING *");

        let task = qb
            .build_query_as::<Task>()
            .fetch_optional(&self.pool)
            .await?;
        Ok(task)
    }

    pub async fn delete(&self, id: i32, tenant_id: i32) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND tenant_id = $2")
            .bind(id)
            .bind(tenant_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // Usada pelo canal interno: concluir é sempre "agora".
    pub async fn complete(&self, id: i32, tenant_id: i32) -> Result<Option<Task>, AppError> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks SET updated_at = now(), completed_at = now()
            WHERE id = $1 AND tenant_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(tenant_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(task)
    }
}
