// src/handlers/produto.rs

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path,
    },
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::rota_invalida;
use crate::{
    common::{
        error::AppError,
        validation::{validate_not_blank, validate_preco},
    },
    db::DbContext,
    models::Produto,
};

// ---
// Payload: cadastro e atualização de produto
// ---
// Campos ausentes caem no default e são barrados pela validação.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProdutoPayload {
    #[serde(default)]
    #[validate(
        custom(function = "validate_not_blank", message = "Não é possível gravar um produto sem nome."),
        length(max = 255, message = "O nome deve ter no máximo 255 caracteres.")
    )]
    pub nome: String,

    #[serde(default)]
    #[validate(
        custom(function = "validate_not_blank", message = "Não é possível gravar um produto sem uma descrição."),
        length(max = 255, message = "A descrição deve ter no máximo 255 caracteres.")
    )]
    pub descricao: String,

    #[serde(default)]
    #[schema(value_type = f64)]
    #[validate(custom(function = "validate_preco"))]
    pub preco: Decimal,

    #[serde(default)]
    #[validate(
        custom(function = "validate_not_blank", message = "Não é possível gravar um produto sem unidade."),
        length(max = 2, message = "A unidade deve ter no máximo 2 caracteres.")
    )]
    pub unidade: String,

    #[serde(default)]
    pub sku: String,
}

// Corpo ausente ou JSON malformado
fn payload_invalido(rejection: JsonRejection) -> AppError {
    tracing::debug!("Corpo rejeitado: {}", rejection);
    AppError::PayloadInvalido(
        "Não foi possível gravar o novo produto, verifique os parâmetros fornecidos.".into(),
    )
}

#[utoipa::path(
    get,
    path = "/api/produto/obter-todos",
    tag = "Produto",
    responses(
        (status = 200, description = "Todos os produtos cadastrados", body = Vec<Produto>)
    )
)]
pub async fn obter_todos(mut ctx: DbContext) -> Result<Json<Vec<Produto>>, AppError> {
    let produtos = ctx.produtos().get_all().await?;
    Ok(Json(produtos))
}

#[utoipa::path(
    get,
    path = "/api/produto/obter-por-id/{id}",
    tag = "Produto",
    params(("id" = Uuid, Path, description = "Id do produto")),
    responses(
        (status = 200, description = "O produto encontrado, ou null", body = Produto)
    )
)]
pub async fn obter_por_id(
    mut ctx: DbContext,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Option<Produto>>, AppError> {
    let Path(id) = path.map_err(rota_invalida)?;
    let produto = ctx.produtos().get_by_id(id).await?;
    Ok(Json(produto))
}

#[utoipa::path(
    post,
    path = "/api/produto/gravar-produto",
    tag = "Produto",
    request_body = ProdutoPayload,
    responses(
        (status = 200, description = "O novo produto cadastrado", body = Produto),
        (status = 400, description = "Parâmetros inválidos")
    )
)]
pub async fn gravar_produto(
    mut ctx: DbContext,
    payload: Result<Json<ProdutoPayload>, JsonRejection>,
) -> Result<Json<Produto>, AppError> {
    let Json(payload) = payload.map_err(payload_invalido)?;
    payload.validate()?;

    let produto = Produto::novo(
        &payload.nome,
        &payload.descricao,
        payload.preco,
        &payload.unidade,
        &payload.sku,
    );

    let mut repo = ctx.produtos();
    repo.add(produto.clone());
    repo.save_changes().await?;

    tracing::info!("Produto {} cadastrado", produto.id);
    Ok(Json(produto))
}

#[utoipa::path(
    put,
    path = "/api/produto/atualizar-dados-produto/{id}",
    tag = "Produto",
    request_body = ProdutoPayload,
    params(("id" = Uuid, Path, description = "Id do produto")),
    responses(
        (status = 200, description = "O produto atualizado", body = Produto),
        (status = 400, description = "Parâmetros inválidos"),
        (status = 404, description = "Produto não encontrado")
    )
)]
pub async fn atualizar_dados_produto(
    mut ctx: DbContext,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<ProdutoPayload>, JsonRejection>,
) -> Result<Json<Produto>, AppError> {
    let Path(id) = path.map_err(rota_invalida)?;
    let Json(payload) = payload.map_err(payload_invalido)?;
    payload.validate()?;

    let mut repo = ctx.produtos();
    let mut produto = repo
        .get_by_id(id)
        .await?
        .ok_or(AppError::ProdutoNaoEncontrado)?;

    produto.atualizar_dados(
        &payload.nome,
        &payload.descricao,
        payload.preco,
        &payload.unidade,
        &payload.sku,
    );
    repo.update(&produto).await?;

    tracing::info!("Produto {} atualizado", produto.id);
    Ok(Json(produto))
}

#[utoipa::path(
    put,
    path = "/api/produto/inativar-produto/{id}",
    tag = "Produto",
    params(("id" = Uuid, Path, description = "Id do produto")),
    responses(
        (status = 200, description = "O produto inativado, junto com o seu estoque", body = Produto),
        (status = 404, description = "Produto não encontrado")
    )
)]
pub async fn inativar_produto(
    mut ctx: DbContext,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Produto>, AppError> {
    let Path(id) = path.map_err(rota_invalida)?;
    let mut repo = ctx.produtos();
    let mut produto = repo
        .get_by_id(id)
        .await?
        .ok_or(AppError::ProdutoNaoEncontrado)?;

    produto.inativar();
    repo.update(&produto).await?;

    tracing::info!("Produto {} inativado", produto.id);
    Ok(Json(produto))
}

#[utoipa::path(
    delete,
    path = "/api/produto/deletar-produto/{id}",
    tag = "Produto",
    params(("id" = Uuid, Path, description = "Id do produto")),
    responses(
        (status = 204, description = "Produto removido"),
        (status = 404, description = "Produto não encontrado")
    )
)]
pub async fn deletar_produto(
    mut ctx: DbContext,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Path(id) = path.map_err(rota_invalida)?;
    let mut repo = ctx.produtos();
    let produto = repo
        .get_by_id(id)
        .await?
        .ok_or(AppError::ProdutoNaoEncontrado)?;

    repo.delete(&produto).await?;

    tracing::info!("Produto {} removido", produto.id);
    Ok(StatusCode::NO_CONTENT)
}
