// src/common/error.rs

use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Tipo de erro único da aplicação. Cada variante sabe qual status HTTP devolver.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // Corpo ou parâmetro de rota que não pôde ser interpretado
    #[error("{0}")]
    PayloadInvalido(String),

    #[error("Não foi possível localizar um produto com o id fornecido.")]
    ProdutoNaoEncontrado,

    #[error("Não foi possível localizar um estoque com o id fornecido.")]
    EstoqueNaoEncontrado,

    #[error("Já existe um estoque cadastrado para este produto.")]
    EstoqueJaCadastrado,

    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Falhas do store que não vêm do sqlx (ex.: store em memória)
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::PayloadInvalido(_) => StatusCode::BAD_REQUEST,
            AppError::ProdutoNaoEncontrado | AppError::EstoqueNaoEncontrado => StatusCode::NOT_FOUND,
            AppError::EstoqueJaCadastrado => StatusCode::CONFLICT,
            AppError::DatabaseError(_) | AppError::InternalServerError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let error_message = match self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = BTreeMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (status, body).into_response();
            }

            // Erros internos não vazam detalhes para o cliente; o log guarda a causa.
            ref e @ (AppError::DatabaseError(_) | AppError::InternalServerError(_)) => {
                tracing::error!("Erro Interno do Servidor: {:?}", e);
                "Ocorreu um erro inesperado.".to_string()
            }

            other => other.to_string(),
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
