// src/handlers/estoque.rs

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
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
        validation::{fits_scale, validate_not_nil, validate_quantidade},
    },
    config::AppState,
    db::{mapping::QUANTIDADE_NUMERIC, DbContext},
    models::Estoque,
};

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EstoquePayload {
    #[serde(default)]
    #[validate(custom(
        function = "validate_not_nil",
        message = "Não é possível gravar um estoque sem um produto."
    ))]
    pub produto_id: Uuid,

    #[serde(default)]
    #[schema(value_type = f64)]
    #[validate(custom(function = "validate_quantidade"))]
    pub quantidade: Decimal,
}

#[utoipa::path(
    get,
    path = "/api/estoque/obter-todos",
    tag = "Estoque",
    responses(
        (status = 200, description = "Todos os estoques cadastrados", body = Vec<Estoque>)
    )
)]
pub async fn obter_todos(mut ctx: DbContext) -> Result<Json<Vec<Estoque>>, AppError> {
    let estoques = ctx.estoques().get_all().await?;
    Ok(Json(estoques))
}

#[utoipa::path(
    get,
    path = "/api/estoque/obter-por-id/{id}",
    tag = "Estoque",
    params(("id" = Uuid, Path, description = "Id do estoque")),
    responses(
        (status = 200, description = "O estoque encontrado, ou null", body = Estoque)
    )
)]
pub async fn obter_por_id(
    mut ctx: DbContext,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Option<Estoque>>, AppError> {
    let Path(id) = path.map_err(rota_invalida)?;
    let estoque = ctx.estoques().get_by_id(id).await?;
    Ok(Json(estoque))
}

#[utoipa::path(
    post,
    path = "/api/estoque/gravar-estoque",
    tag = "Estoque",
    request_body = EstoquePayload,
    responses(
        (status = 200, description = "O novo estoque cadastrado", body = Estoque),
        (status = 400, description = "Parâmetros inválidos"),
        (status = 404, description = "Produto não encontrado"),
        (status = 409, description = "O produto já possui estoque")
    )
)]
pub async fn gravar_estoque(
    mut ctx: DbContext,
    payload: Result<Json<EstoquePayload>, JsonRejection>,
) -> Result<Json<Estoque>, AppError> {
    let Json(payload) = payload.map_err(|rejection| {
        tracing::debug!("Corpo rejeitado: {}", rejection);
        AppError::PayloadInvalido(
            "Não foi possível gravar o novo estoque, verifique os parâmetros fornecidos.".into(),
        )
    })?;
    payload.validate()?;

    // A FK e a unicidade também são garantidas pelo banco; aqui só antecipamos a resposta.
    let produto = ctx
        .produtos()
        .get_by_id(payload.produto_id)
        .await?
        .ok_or(AppError::ProdutoNaoEncontrado)?;
    if produto.estoque.is_some() {
        return Err(AppError::EstoqueJaCadastrado);
    }

    let estoque = Estoque::novo(produto.id, payload.quantidade);

    let mut repo = ctx.estoques();
    repo.add(estoque.clone());
    repo.save_changes().await?;

    tracing::info!("Estoque {} cadastrado para o produto {}", estoque.id, produto.id);
    Ok(Json(estoque))
}

#[utoipa::path(
    put,
    path = "/api/estoque/atualizar-estoque/{id}/{quantidade}",
    tag = "Estoque",
    params(
        ("id" = Uuid, Path, description = "Id do estoque"),
        ("quantidade" = String, Path, description = "Nova quantidade, no formato da cultura configurada")
    ),
    responses(
        (status = 200, description = "O estoque atualizado", body = Estoque),
        (status = 400, description = "Quantidade inválida"),
        (status = 404, description = "Estoque não encontrado")
    )
)]
pub async fn atualizar_estoque(
    State(app_state): State<AppState>,
    mut ctx: DbContext,
    path: Result<Path<(Uuid, String)>, PathRejection>,
) -> Result<Json<Estoque>, AppError> {
    let Path((id, quantidade)) = path.map_err(rota_invalida)?;
    let quantidade = app_state.culture.parse_decimal(&quantidade)?;
    // Zero é permitido: estoque esgotado.
    if quantidade < Decimal::ZERO {
        return Err(AppError::PayloadInvalido(
            "Não é possível atualizar um estoque com quantidade negativa.".into(),
        ));
    }
    if !fits_scale(&quantidade, QUANTIDADE_NUMERIC.1) {
        return Err(AppError::PayloadInvalido(
            "A quantidade deve ter no máximo 5 casas decimais.".into(),
        ));
    }

    let mut repo = ctx.estoques();
    let mut estoque = repo
        .get_by_id(id)
        .await?
        .ok_or(AppError::EstoqueNaoEncontrado)?;

    estoque.atualizar_quantidade(quantidade);
    repo.update(&estoque).await?;

    tracing::info!("Estoque {} atualizado para {}", estoque.id, estoque.quantidade);
    Ok(Json(estoque))
}

#[utoipa::path(
    put,
    path = "/api/estoque/inativar-estoque/{id}",
    tag = "Estoque",
    params(("id" = Uuid, Path, description = "Id do estoque")),
    responses(
        (status = 204, description = "Estoque inativado"),
        (status = 404, description = "Estoque não encontrado")
    )
)]
pub async fn inativar_estoque(
    mut ctx: DbContext,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Path(id) = path.map_err(rota_invalida)?;
    let mut repo = ctx.estoques();
    let mut estoque = repo
        .get_by_id(id)
        .await?
        .ok_or(AppError::EstoqueNaoEncontrado)?;

    estoque.inativar();
    repo.update(&estoque).await?;

    tracing::info!("Estoque {} inativado", estoque.id);
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/api/estoque/deletar-estoque/{id}",
    tag = "Estoque",
    params(("id" = Uuid, Path, description = "Id do estoque")),
    responses(
        (status = 204, description = "Estoque removido"),
        (status = 404, description = "Estoque não encontrado")
    )
)]
pub async fn deletar_estoque(
    mut ctx: DbContext,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Path(id) = path.map_err(rota_invalida)?;
    let mut repo = ctx.estoques();
    let estoque = repo
        .get_by_id(id)
        .await?
        .ok_or(AppError::EstoqueNaoEncontrado)?;

    repo.delete(&estoque).await?;

    tracing::info!("Estoque {} removido", estoque.id);
    Ok(StatusCode::NO_CONTENT)
}
