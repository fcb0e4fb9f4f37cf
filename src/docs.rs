// src/docs.rs

use utoipa::OpenApi;
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Protheus API",
        version = "2023.1.0.0",
        description = "Cadastro de produto e atualização de estoque",
        contact(name = "Protheus API"),
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    paths(
        // --- Produto ---
        handlers::produto::obter_todos,
        handlers::produto::obter_por_id,
        handlers::produto::gravar_produto,
        handlers::produto::atualizar_dados_produto,
        handlers::produto::inativar_produto,
        handlers::produto::deletar_produto,

        // --- Estoque ---
        handlers::estoque::obter_todos,
        handlers::estoque::obter_por_id,
        handlers::estoque::gravar_estoque,
        handlers::estoque::atualizar_estoque,
        handlers::estoque::inativar_estoque,
        handlers::estoque::deletar_estoque,
    ),
    components(
        schemas(
            models::Produto,
            models::Estoque,

            // --- Payloads ---
            handlers::produto::ProdutoPayload,
            handlers::estoque::EstoquePayload,
        )
    ),
    tags(
        (name = "Produto", description = "Cadastro de Produtos"),
        (name = "Estoque", description = "Atualização de Estoque")
    )
)]
pub struct ApiDoc;
