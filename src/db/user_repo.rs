// src/db/user_repo.rs

use sqlx::{Executor, PgPool, Postgres, QueryBuilder};

use crate::{
    common::error::AppError,
    models::auth::{User, UserSummary},
};

// O repositório de usuários, responsável por todas as interações com a tabela 'users'
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Busca global por e-mail: o login não conhece o tenant de antemão,
    // é o e-mail que resolve a conta.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let maybe_user =
            sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1 LIMIT 1")
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;
        Ok(maybe_user)
    }

    // Usado pelo /me: o id vem do token, então a busca é só por id
    pub async fn find_by_id(&self, id: i32) -> Result<Option<User>, AppError> {
        let maybe_user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(maybe_user)
    }

    pub async fn find_in_tenant(
        &self,
        id: i32,
        tenant_id: i32,
    ) -> Result<Option<User>, AppError> {
        let maybe_user =
            sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1 AND tenant_id = $2")
                .bind(id)
                .bind(tenant_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(maybe_user)
    }

    pub async fn list(&self, tenant_id: i32) -> Result<Vec<UserSummary>, AppError> {
        let list = sqlx::query_as::<_, UserSummary>(
            "SELECT id, email, name, role, is_active, created_at FROM users WHERE tenant_id = $1",
        )
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(list)
    }

    pub async fn email_exists(&self, email: &str) -> Result<bool, AppError> {
        let row: Option<(i32,)> =
            sqlx::query_as("SELECT id FROM users WHERE email = $1 LIMIT 1")
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.is_some())
    }

    pub async fn email_exists_in_tenant(
        &self,
        email: &str,
        tenant_id: i32,
    ) -> Result<bool, AppError> {
        let row: Option<(i32,)> =
            sqlx::query_as("SELECT id FROM users WHERE tenant_id = $1 AND email = $2 LIMIT 1")
                .bind(tenant_id)
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.is_some())
    }

    // Aceita um executor genérico para participar da transação de registro
    // (tenant + primeiro usuário nascem juntos).
    pub async fn create<'e, E>(
        &self,
        executor: E,
        tenant_id: i32,
        email: &str,
        name: Option<&str>,
        password_hash: &str,
        role: &str,
    ) -> Result<User, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (tenant_id, email, name, password_hash, role)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(tenant_id)
        .bind(email)
        .bind(name)
        .bind(password_hash)
        .bind(role)
        .fetch_one(executor)
        .await?;
        Ok(user)
    }

    // PATCH parcial: só os campos presentes entram no SET. O gate de
    // role/isActive (admin/gestor) é decidido pelo handler, que passa None
    // para o que o chamador não pode alterar.
    pub async fn update(
        &self,
        id: i32,
        tenant_id: i32,
        name: Option<Option<&str>>,
        role: Option<&str>,
        is_active: Option<bool>,
        password_hash: Option<&str>,
    ) -> Result<Option<User>, AppError> {
        let mut qb: QueryBuilder<Postgres> =
            QueryBuilder::new("UPDATE users SET updated_at = now()");
        if let Some(name) = name {
            qb.push(", name = ").push_bind(name);
        }
        if let Some(role) = role {
            qb.push(", role = ").push_bind(role);
        }
        if let Some(is_active) = is_active {
            qb.push(", is_active = ").push_bind(is_active);
        }
        if let Some(hash) = password_hash {
            qb.push(", password_hash = ").push_bind(hash);
        }
        qb.push(" WHERE id = ").push_bind(id);
        qb.push(" AND tenant_id = ").push_bind(tenant_id);
        qb.push(" RETURNING *");

        let user = qb
            .build_query_as::<User>()
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }
}
