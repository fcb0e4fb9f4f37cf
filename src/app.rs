// src/app.rs

use axum::{
    routing::{delete, get, post, put},
    Json, Router,
};
use utoipa::OpenApi;

use crate::{config::AppState, docs::ApiDoc, handlers};

// Monta o router completo. Usado pelo main.rs e pelos testes de API.
pub fn build_app(app_state: AppState) -> Router {
    let produto_routes = Router::new()
        .route("/obter-todos", get(handlers::produto::obter_todos))
        .route("/obter-por-id/{id}", get(handlers::produto::obter_por_id))
        .route("/gravar-produto", post(handlers::produto::gravar_produto))
        .route(
            "/atualizar-dados-produto/{id}",
            put(handlers::produto::atualizar_dados_produto),
        )
        .route("/inativar-produto/{id}", put(handlers::produto::inativar_produto))
        .route("/deletar-produto/{id}", delete(handlers::produto::deletar_produto));

    let estoque_routes = Router::new()
        .route("/obter-todos", get(handlers::estoque::obter_todos))
        .route("/obter-por-id/{id}", get(handlers::estoque::obter_por_id))
        .route("/gravar-estoque", post(handlers::estoque::gravar_estoque))
        .route(
            "/atualizar-estoque/{id}/{quantidade}",
            put(handlers::estoque::atualizar_estoque),
        )
        .route("/inativar-estoque/{id}", put(handlers::estoque::inativar_estoque))
        .route("/deletar-estoque/{id}", delete(handlers::estoque::deletar_estoque));

    let mut app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/produto", produto_routes)
        .nest("/api/estoque", estoque_routes);

    // Documentação só em desenvolvimento
    if app_state.docs_enabled {
        app = app.route(
            "/api-docs/openapi.json",
            get(|| async { Json(ApiDoc::openapi()) }),
        );
    }

    app.with_state(app_state)
}
