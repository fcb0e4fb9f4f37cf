// src/models/estoque.rs

use chrono::{DateTime, SubsecRound, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// Representa a tabela "Estoques". Um estoque por produto.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Estoque {
    #[sqlx(rename = "Id")]
    pub id: Uuid,

    #[sqlx(rename = "DataCadastro")]
    pub data_cadastro: DateTime<Utc>,

    #[sqlx(rename = "ProdutoId")]
    pub produto_id: Uuid,

    #[sqlx(rename = "Quantidade")]
    #[schema(value_type = f64, example = 10)]
    pub quantidade: Decimal,

    #[sqlx(rename = "Inativo")]
    pub inativo: bool,
}

impl Estoque {
    pub fn novo(produto_id: Uuid, quantidade: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            data_cadastro: Utc::now().trunc_subsecs(6),
            produto_id,
            quantidade,
            inativo: false,
        }
    }

    pub fn atualizar_quantidade(&mut self, quantidade: Decimal) {
        self.quantidade = quantidade;
    }

    pub fn inativar(&mut self) {
        self.inativo = true;
    }
}
