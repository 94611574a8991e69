// src/config.rs

use crate::{
    db::{
        ContactRepository, DashboardRepository, PipelineStageRepository, PropertyRepository,
        TagRepository, TaskRepository, TenantRepository, UserRepository,
    },
    services::{auth::AuthService, mcp::McpClient},
};
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, time::Duration};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    // Chave compartilhada do canal server-to-server; sem ela, /api/internal
    // responde 401 para tudo.
    pub internal_key: Option<String>,
    pub auth_service: AuthService,
    pub mcp_client: McpClient,
    pub user_repo: UserRepository,
    pub tenant_repo: TenantRepository,
    pub property_repo: PropertyRepository,
    pub contact_repo: ContactRepository,
    pub tag_repo: TagRepository,
    pub pipeline_repo: PipelineStageRepository,
    pub task_repo: TaskRepository,
    pub dashboard_repo: DashboardRepository,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let jwt_secret = env::var("JWT_SECRET")
            .unwrap_or_else(|_| "dev-secret-change-in-production".to_string());
        let internal_key = env::var("BACKEND_INTERNAL_KEY").ok();
        let mcp_server_url =
            env::var("MCP_SERVER_URL").unwrap_or_else(|_| "http://localhost:8000".to_string());

        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let auth_service = AuthService::new(jwt_secret);
        let mcp_client = McpClient::new(mcp_server_url);
        let user_repo = UserRepository::new(db_pool.clone());
        let tenant_repo = TenantRepository::new(db_pool.clone());
        let property_repo = PropertyRepository::new(db_pool.clone());
        let contact_repo = ContactRepository::new(db_pool.clone());
        let tag_repo = TagRepository::new(db_pool.clone());
        let pipeline_repo = PipelineStageRepository::new(db_pool.clone());
        let task_repo = TaskRepository::new(db_pool.clone());
        let dashboard_repo = DashboardRepository::new(db_pool.clone());

        Ok(Self {
            db_pool,
            internal_key,
            auth_service,
            mcp_client,
            user_repo,
            tenant_repo,
            property_repo,
            contact_repo,
            tag_repo,
            pipeline_repo,
            task_repo,
            dashboard_repo,
        })
    }
}
