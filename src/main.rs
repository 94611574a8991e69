//src/main.rs

use axum::{
    middleware as axum_middleware,
    routing::{delete, get, patch, post},
    Json, Router,
};
use chrono::{SecondsFormat, Utc};
use serde_json::json;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

// Declaração dos nossos módulos
mod common;
mod config;
mod db;
mod handlers;
mod middleware;
mod models;
mod services;

// Importações principais
use crate::config::AppState;
use crate::middleware::{auth::auth_guard, internal::internal_key_guard};

#[tokio::main]
async fn main() {
    // Inicializa o logger, que movemos para o main.
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Roda as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Rotas públicas de autenticação
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login));

    // /me exige o Bearer token, então vive num router próprio
    let me_routes = Router::new()
        .route("/me", get(handlers::auth::get_me))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let user_routes = Router::new()
        .route(
            "/",
            post(handlers::users::create_user).get(handlers::users::list_users),
        )
        .route(
            "/{id}",
            get(handlers::users::get_user).patch(handlers::users::update_user),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let tenant_routes = Router::new()
        .route("/", get(handlers::tenancy::get_my_tenant))
        .route(
            "/{id}",
            get(handlers::tenancy::get_tenant).patch(handlers::tenancy::update_tenant),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let property_routes = Router::new()
        .route(
            "/",
            post(handlers::properties::create_property).get(handlers::properties::list_properties),
        )
        .route(
            "/{id}",
            get(handlers::properties::get_property)
                .patch(handlers::properties::update_property)
                .delete(handlers::properties::delete_property),
        )
        .route(
            "/{id}/photos",
            get(handlers::properties::list_photos).post(handlers::properties::add_photo),
        )
        .route(
            "/{id}/photos/{photo_id}",
            delete(handlers::properties::delete_photo),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let contact_routes = Router::new()
        .route(
            "/",
            post(handlers::contacts::create_contact).get(handlers::contacts::list_contacts),
        )
        .route(
            "/{id}",
            get(handlers::contacts::get_contact)
                .patch(handlers::contacts::update_contact)
                .delete(handlers::contacts::delete_contact),
        )
        .route("/{id}/tags", post(handlers::contacts::attach_tag))
        .route("/{id}/tags/{tag_id}", delete(handlers::contacts::detach_tag))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let tag_routes = Router::new()
        .route(
            "/",
            post(handlers::tags::create_tag).get(handlers::tags::list_tags),
        )
        .route(
            "/{id}",
            get(handlers::tags::get_tag)
                .patch(handlers::tags::update_tag)
                .delete(handlers::tags::delete_tag),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let pipeline_routes = Router::new()
        .route(
            "/",
            post(handlers::pipeline_stages::create_stage).get(handlers::pipeline_stages::list_stages),
        )
        .route(
            "/{id}",
            get(handlers::pipeline_stages::get_stage)
                .patch(handlers::pipeline_stages::update_stage)
                .delete(handlers::pipeline_stages::delete_stage),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let task_routes = Router::new()
        .route(
            "/",
            post(handlers::tasks::create_task).get(handlers::tasks::list_tasks),
        )
        .route(
            "/{id}",
            get(handlers::tasks::get_task)
                .patch(handlers::tasks::update_task)
                .delete(handlers::tasks::delete_task),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let dashboard_routes = Router::new()
        .route("/", get(handlers::dashboard::get_summary))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // O webhook é público: quem chama é o gateway de mensagens
    let webhook_routes = Router::new().route("/message", post(handlers::webhook::receive_message));

    // Canal server-to-server do MCP, protegido pela chave interna
    let internal_routes = Router::new()
        .route("/properties", get(handlers::internal::list_properties))
        .route("/properties/{id}", get(handlers::internal::get_property))
        .route("/contacts", get(handlers::internal::list_contacts))
        .route("/contacts/{id}", get(handlers::internal::get_contact))
        .route(
            "/tasks",
            get(handlers::internal::list_tasks).post(handlers::internal::create_task),
        )
        .route("/tasks/{id}", patch(handlers::internal::complete_task))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            internal_key_guard,
        ));

    // Combina tudo no router principal
    let app = Router::new()
        .route(
            "/api/health",
            get(|| async {
                Json(json!({
                    "status": "ok",
                    "service": "plataforma-imobiliaria-backend",
                    "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
                }))
            }),
        )
        .route("/api/plans", get(handlers::tenancy::list_plans))
        .nest("/api/auth", auth_routes)
        .nest("/api/auth", me_routes)
        .nest("/api/users", user_routes)
        .nest("/api/tenants", tenant_routes)
        .nest("/api/properties", property_routes)
        .nest("/api/contacts", contact_routes)
        .nest("/api/tags", tag_routes)
        .nest("/api/pipeline-stages", pipeline_routes)
        .nest("/api/tasks", task_routes)
        .nest("/api/dashboard", dashboard_routes)
        .nest("/api/webhook", webhook_routes)
        .nest("/api/internal", internal_routes)
        // O frontend mora em outro domínio e chama a API pelo navegador
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Inicia o servidor
    let port = std::env::var("PORT")
        .ok()
        .and_then(|port| port.parse::<u16>().ok())
        .unwrap_or(3000);
    let addr = format!("0.0.0.0:{}", port);
    let listener = TcpListener::bind(&addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app)
        .await
        .expect("Erro no servidor Axum");
}
