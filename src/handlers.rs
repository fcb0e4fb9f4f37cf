pub mod estoque;
pub mod produto;

use axum::extract::rejection::PathRejection;

use crate::common::error::AppError;

// Id que não é um uuid (ou segmento de rota que não pôde ser lido)
pub(crate) fn rota_invalida(rejection: PathRejection) -> AppError {
    tracing::debug!("Rota rejeitada: {}", rejection);
    AppError::PayloadInvalido("O id fornecido não é um identificador válido.".into())
}
