// src/main.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

// Declaração dos nossos módulos
mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::AppState;
use crate::docs::ApiDoc;
use crate::middleware::auth::auth_guard;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_target(false).compact().init();

    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Roda as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Rotas de autenticação (públicas)
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login));

    // Rotas de usuário (protegidas)
    let user_routes = Router::new()
        .route("/", post(handlers::auth::create_usuario))
        .route("/me", get(handlers::auth::get_me))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let filial_routes = Router::new()
        .route(
            "/",
            post(handlers::organizacao::create_filial).get(handlers::organizacao::list_filiais),
        )
        .route(
            "/{id}",
            get(handlers::organizacao::get_filial).put(handlers::organizacao::update_filial),
        )
        .route(
            "/{id}/desativar",
            post(handlers::organizacao::desativar_filial),
        )
        .route(
            "/{id}/reativar",
            post(handlers::organizacao::reativar_filial),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let deposito_routes = Router::new()
        .route(
            "/",
            post(handlers::organizacao::create_deposito).get(handlers::organizacao::list_depositos),
        )
        .route(
            "/{id}",
            get(handlers::organizacao::get_deposito).put(handlers::organizacao::update_deposito),
        )
        .route(
            "/{id}/desativar",
            post(handlers::organizacao::desativar_deposito),
        )
        .route(
            "/{id}/reativar",
            post(handlers::organizacao::reativar_deposito),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let setor_routes = Router::new()
        .route(
            "/",
            post(handlers::catalogo::create_setor).get(handlers::catalogo::list_setores),
        )
        .route("/{id}", axum::routing::put(handlers::catalogo::update_setor))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let cargo_routes = Router::new()
        .route(
            "/",
            post(handlers::catalogo::create_cargo).get(handlers::catalogo::list_cargos),
        )
        .route("/{id}", axum::routing::put(handlers::catalogo::update_cargo))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let ferramenta_routes = Router::new()
        .route(
            "/",
            post(handlers::ferramentas::create_ferramenta)
                .get(handlers::ferramentas::list_ferramentas),
        )
        .route(
            "/{id}",
            get(handlers::ferramentas::get_ferramenta)
                .put(handlers::ferramentas::update_ferramenta),
        )
        .route(
            "/{id}/desativar",
            post(handlers::ferramentas::desativar_ferramenta),
        )
        .route(
            "/{id}/reativar",
            post(handlers::ferramentas::reativar_ferramenta),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let funcionario_routes = Router::new()
        .route(
            "/",
            post(handlers::funcionarios::create_funcionario)
                .get(handlers::funcionarios::list_funcionarios),
        )
        .route(
            "/{id}",
            get(handlers::funcionarios::get_funcionario)
                .put(handlers::funcionarios::update_funcionario),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let emprestimo_routes = Router::new()
        .route(
            "/",
            post(handlers::emprestimos::create_emprestimo)
                .get(handlers::emprestimos::list_emprestimos),
        )
        .route(
            "/{id}",
            get(handlers::emprestimos::get_emprestimo)
                .patch(handlers::emprestimos::update_emprestimo)
                .delete(handlers::emprestimos::delete_emprestimo),
        )
        .route(
            "/{id}/encerrar",
            post(handlers::emprestimos::encerrar_emprestimo),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let manutencao_routes = Router::new()
        .route(
            "/",
            post(handlers::manutencoes::create_manutencao)
                .get(handlers::manutencoes::list_manutencoes),
        )
        .route(
            "/{id}",
            get(handlers::manutencoes::get_manutencao)
                .patch(handlers::manutencoes::update_manutencao)
                .delete(handlers::manutencoes::delete_manutencao),
        )
        .route(
            "/{id}/encerrar",
            post(handlers::manutencoes::encerrar_manutencao),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let dashboard_routes = Router::new()
        .route("/resumo", get(handlers::dashboard::get_resumo))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Combina tudo no router principal
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .nest("/api/users", user_routes)
        .nest("/api/filiais", filial_routes)
        .nest("/api/depositos", deposito_routes)
        .nest("/api/setores", setor_routes)
        .nest("/api/cargos", cargo_routes)
        .nest("/api/ferramentas", ferramenta_routes)
        .nest("/api/funcionarios", funcionario_routes)
        .nest("/api/emprestimos", emprestimo_routes)
        .nest("/api/manutencoes", manutencao_routes)
        .nest("/api/dashboard", dashboard_routes)
        .merge(SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", ApiDoc::openapi()))
        .with_state(app_state);

    // Inicia o servidor
    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app)
        .await
        .expect("Erro no servidor Axum");
}
