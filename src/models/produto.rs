// src/models/produto.rs

use chrono::{DateTime, SubsecRound, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::estoque::Estoque;

// Representa a tabela "Produtos". O estoque (1:1) é carregado à parte.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Produto {
    #[sqlx(rename = "Id")]
    pub id: Uuid,

    #[sqlx(rename = "DataCadastro")]
    pub data_cadastro: DateTime<Utc>,

    #[sqlx(rename = "Nome")]
    #[schema(example = "Água mineral")]
    pub nome: String,

    #[sqlx(rename = "Descricao")]
    #[schema(example = "Água mineral da fonte de Palmeiras")]
    pub descricao: String,

    #[sqlx(rename = "Preco")]
    #[schema(value_type = f64, example = 1.5)]
    pub preco: Decimal,

    #[sqlx(rename = "Unidade")]
    #[schema(example = "ML")]
    pub unidade: String,

    #[sqlx(rename = "SKU")]
    #[schema(example = "3453EEE")]
    pub sku: String,

    #[sqlx(rename = "Inativo")]
    pub inativo: bool,

    #[sqlx(skip)]
    pub estoque: Option<Estoque>,
}

impl Produto {
    pub fn novo(nome: &str, descricao: &str, preco: Decimal, unidade: &str, sku: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            // O banco guarda microssegundos
            data_cadastro: Utc::now().trunc_subsecs(6),
            nome: nome.to_string(),
            descricao: descricao.to_string(),
            preco,
            unidade: unidade.to_string(),
            sku: sku.to_string(),
            inativo: false,
            estoque: None,
        }
    }

    /// Sobrescreve os dados cadastrais. Id, data de cadastro, flag e estoque ficam como estão.
    pub fn atualizar_dados(
        &mut self,
        nome: &str,
        descricao: &str,
        preco: Decimal,
        unidade: &str,
        sku: &str,
    ) {
        self.nome = nome.to_string();
        self.descricao = descricao.to_string();
        self.preco = preco;
        self.unidade = unidade.to_string();
        self.sku = sku.to_string();
    }

    /// Inativa o produto e, se houver, o seu estoque.
    pub fn inativar(&mut self) {
        self.inativo = true;
        if let Some(estoque) = self.estoque.as_mut() {
            estoque.inativar();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agua() -> Produto {
        Produto::novo("Água", "Água mineral", Decimal::new(15, 1), "ML", "X1")
    }

    #[test]
    fn new_products_are_active_and_without_stock() {
        let produto = agua();
        assert!(!produto.inativo);
        assert!(produto.estoque.is_none());
        assert_eq!(produto.preco, Decimal::new(15, 1));
    }

    #[test]
    fn every_product_gets_its_own_id() {
        assert_ne!(agua().id, agua().id);
    }

    #[test]
    fn deactivating_cascades_to_stock() {
        let mut produto = agua();
        produto.estoque = Some(Estoque::novo(produto.id, Decimal::from(10)));

        produto.inativar();

        assert!(produto.inativo);
        assert!(produto.estoque.as_ref().unwrap().inativo);
    }

    #[test]
    fn deactivating_without_stock_only_flags_the_product() {
        let mut produto = agua();
        produto.inativar();
        assert!(produto.inativo);
        assert!(produto.estoque.is_none());
    }

    #[test]
    fn updating_keeps_identity() {
        let mut produto = agua();
        let (id, data) = (produto.id, produto.data_cadastro);

        produto.atualizar_dados("Suco", "Suco de uva", Decimal::from(7), "LT", "S9");

        assert_eq!(produto.id, id);
        assert_eq!(produto.data_cadastro, data);
        assert_eq!(produto.nome, "Suco");
        assert_eq!(produto.unidade, "LT");
        assert_eq!(produto.sku, "S9");
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let json = serde_json::to_value(agua()).unwrap();
        assert_eq!(json["nome"], "Água");
        assert_eq!(json["inativo"], false);
        assert!(json.get("dataCadastro").is_some());
        assert!(json["estoque"].is_null());
    }
}
