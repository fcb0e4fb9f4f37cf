// src/db/memory.rs

// Store em memória com as mesmas regras de schema da migração:
// chave primária, tamanho das colunas, NUMERIC(p, s), FK única com cascade.
// Usado pelos testes no lugar do Postgres.

use std::{collections::BTreeMap, sync::Arc};

use anyhow::anyhow;
use async_trait::async_trait;
use rust_decimal::{Decimal, RoundingStrategy};
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{
        mapping::{
            DESCRICAO_MAX_LEN, NOME_MAX_LEN, PRECO_NUMERIC, QUANTIDADE_NUMERIC, UNIDADE_MAX_LEN,
        },
        store::{Change, Record, Store, StoreTransaction},
    },
    models::{Estoque, Produto},
};

#[derive(Debug, Clone, Default)]
struct Tables {
    // Produtos são guardados sem o estoque; a associação é refeita na leitura.
    produtos: BTreeMap<Uuid, Produto>,
    estoques: BTreeMap<Uuid, Estoque>,
}

fn check_length(column: &str, value: &str, max: usize) -> Result<(), AppError> {
    if value.chars().count() > max {
        return Err(anyhow!("valor muito longo para a coluna \"{column}\" (máximo {max})").into());
    }
    Ok(())
}

// Arredonda para a escala e rejeita estouro de precisão, como o NUMERIC do Postgres.
fn fit_numeric(column: &str, value: Decimal, (precision, scale): (u32, u32)) -> Result<Decimal, AppError> {
    let rounded = value.round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero);
    let limit = Decimal::from(10u64.pow(precision - scale));
    if rounded.trunc().abs() >= limit {
        return Err(anyhow!("estouro numérico na coluna \"{column}\"").into());
    }
    Ok(rounded)
}

impl Tables {
    fn with_estoque(&self, mut produto: Produto) -> Produto {
        produto.estoque = self
            .estoques
            .values()
            .find(|e| e.produto_id == produto.id)
            .cloned();
        produto
    }

    fn normalize_produto(p: &Produto) -> Result<Produto, AppError> {
        check_length("Nome", &p.nome, NOME_MAX_LEN)?;
        check_length("Descricao", &p.descricao, DESCRICAO_MAX_LEN)?;
        check_length("Unidade", &p.unidade, UNIDADE_MAX_LEN)?;

        let mut row = p.clone();
        row.preco = fit_numeric("Preco", p.preco, PRECO_NUMERIC)?;
        row.estoque = None;
        Ok(row)
    }

    fn normalize_estoque(&self, e: &Estoque) -> Result<Estoque, AppError> {
        // FK "ProdutoId" -> "Produtos"."Id"
        if !self.produtos.contains_key(&e.produto_id) {
            return Err(AppError::ProdutoNaoEncontrado);
        }
        // UNIQUE ("ProdutoId")
        if self
            .estoques
            .values()
            .any(|other| other.produto_id == e.produto_id && other.id != e.id)
        {
            return Err(AppError::EstoqueJaCadastrado);
        }

        let mut row = e.clone();
        row.quantidade = fit_numeric("Quantidade", e.quantidade, QUANTIDADE_NUMERIC)?;
        Ok(row)
    }

    fn insert_produto(&mut self, p: &Produto) -> Result<u64, AppError> {
        if self.produtos.contains_key(&p.id) {
            return Err(anyhow!("chave duplicada em \"Produtos\": {}", p.id).into());
        }
        let row = Self::normalize_produto(p)?;
        self.produtos.insert(row.id, row);

        let mut affected = 1;
        if let Some(e) = &p.estoque {
            affected += self.insert_estoque(e)?;
        }
        Ok(affected)
    }

    fn update_produto(&mut self, p: &Produto) -> Result<u64, AppError> {
        if !self.produtos.contains_key(&p.id) {
            return Err(AppError::ProdutoNaoEncontrado);
        }
        let row = Self::normalize_produto(p)?;
        self.produtos.insert(row.id, row);

        let mut affected = 1;
        if let Some(e) = &p.estoque {
            affected += self.update_estoque(e)?;
        }
        Ok(affected)
    }

    fn delete_produto(&mut self, id: Uuid) -> Result<u64, AppError> {
        if self.produtos.remove(&id).is_none() {
            return Err(AppError::ProdutoNaoEncontrado);
        }
        // ON DELETE CASCADE
        self.estoques.retain(|_, e| e.produto_id != id);
        Ok(1)
    }

    fn insert_estoque(&mut self, e: &Estoque) -> Result<u64, AppError> {
        if self.estoques.contains_key(&e.id) {
            return Err(anyhow!("chave duplicada em \"Estoques\": {}", e.id).into());
        }
        let row = self.normalize_estoque(e)?;
        self.estoques.insert(row.id, row);
        Ok(1)
    }

    fn update_estoque(&mut self, e: &Estoque) -> Result<u64, AppError> {
        if !self.estoques.contains_key(&e.id) {
            return Err(AppError::EstoqueNaoEncontrado);
        }
        let row = self.normalize_estoque(e)?;
        self.estoques.insert(row.id, row);
        Ok(1)
    }

    fn delete_estoque(&mut self, id: Uuid) -> Result<u64, AppError> {
        match self.estoques.remove(&id) {
            Some(_) => Ok(1),
            None => Err(AppError::EstoqueNaoEncontrado),
        }
    }

    fn apply(&mut self, change: &Change) -> Result<u64, AppError> {
        match change {
            Change::Insert(Record::Produto(p)) => self.insert_produto(p),
            Change::Insert(Record::Estoque(e)) => self.insert_estoque(e),
            Change::Update(Record::Produto(p)) => self.update_produto(p),
            Change::Update(Record::Estoque(e)) => self.update_estoque(e),
            Change::Delete(Record::Produto(p)) => self.delete_produto(p.id),
            Change::Delete(Record::Estoque(e)) => self.delete_estoque(e.id),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    // A transação segura o lock até o commit/rollback: as escritas são serializadas.
    async fn begin(&self) -> Result<Box<dyn StoreTransaction>, AppError> {
        let guard = self.tables.clone().lock_owned().await;
        let snapshot = guard.clone();
        Ok(Box::new(MemoryTransaction {
            guard,
            snapshot: Some(snapshot),
        }))
    }

    async fn produtos(&self) -> Result<Vec<Produto>, AppError> {
        let tables = self.tables.lock().await;
        let mut produtos: Vec<Produto> = tables
            .produtos
            .values()
            .map(|p| tables.with_estoque(p.clone()))
            .collect();
        produtos.sort_by_key(|p| (p.data_cadastro, p.id));
        Ok(produtos)
    }

    async fn produto(&self, id: Uuid) -> Result<Option<Produto>, AppError> {
        let tables = self.tables.lock().await;
        Ok(tables.produtos.get(&id).map(|p| tables.with_estoque(p.clone())))
    }

    async fn estoques(&self) -> Result<Vec<Estoque>, AppError> {
        let tables = self.tables.lock().await;
        let mut estoques: Vec<Estoque> = tables.estoques.values().cloned().collect();
        estoques.sort_by_key(|e| (e.data_cadastro, e.id));
        Ok(estoques)
    }

    async fn estoque(&self, id: Uuid) -> Result<Option<Estoque>, AppError> {
        let tables = self.tables.lock().await;
        Ok(tables.estoques.get(&id).cloned())
    }
}

pub struct MemoryTransaction {
    guard: OwnedMutexGuard<Tables>,
    // Estado anterior ao begin; `None` depois do commit.
    snapshot: Option<Tables>,
}

impl MemoryTransaction {
    fn restore(&mut self) {
        if let Some(snapshot) = self.snapshot.take() {
            *self.guard = snapshot;
        }
    }
}

impl Drop for MemoryTransaction {
    fn drop(&mut self) {
        self.restore();
    }
}

#[async_trait]
impl StoreTransaction for MemoryTransaction {
    async fn apply(&mut self, change: &Change) -> Result<u64, AppError> {
        self.guard.apply(change)
    }

    async fn commit(self: Box<Self>) -> Result<(), AppError> {
        let mut tx = self;
        tx.snapshot = None;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), AppError> {
        let mut tx = self;
        tx.restore();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn produto() -> Produto {
        Produto::novo("Água", "Água mineral", Decimal::new(15, 1), "ML", "X1")
    }

    async fn insert(store: &MemoryStore, change: Change) -> Result<u64, AppError> {
        let mut tx = store.begin().await?;
        let affected = tx.apply(&change).await?;
        tx.commit().await?;
        Ok(affected)
    }

    #[tokio::test]
    async fn stock_requires_an_existing_product() {
        let store = MemoryStore::new();
        let orfao = Estoque::novo(Uuid::new_v4(), Decimal::from(1));

        let err = insert(&store, Change::Insert(Record::Estoque(orfao))).await.unwrap_err();
        assert!(matches!(err, AppError::ProdutoNaoEncontrado));
    }

    #[tokio::test]
    async fn only_one_stock_per_product() {
        let store = MemoryStore::new();
        let p = produto();
        insert(&store, Change::Insert(Record::Produto(p.clone()))).await.unwrap();
        insert(&store, Change::Insert(Record::Estoque(Estoque::novo(p.id, Decimal::from(1)))))
            .await
            .unwrap();

        let err = insert(&store, Change::Insert(Record::Estoque(Estoque::novo(p.id, Decimal::from(2)))))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::EstoqueJaCadastrado));
    }

    #[tokio::test]
    async fn column_lengths_are_enforced() {
        let store = MemoryStore::new();
        let mut p = produto();
        p.unidade = "LTS".into();

        let err = insert(&store, Change::Insert(Record::Produto(p))).await.unwrap_err();
        assert!(matches!(err, AppError::InternalServerError(_)));
    }

    #[tokio::test]
    async fn quantity_is_rounded_to_five_places() {
        let store = MemoryStore::new();
        let p = produto();
        insert(&store, Change::Insert(Record::Produto(p.clone()))).await.unwrap();
        let e = Estoque::novo(p.id, Decimal::new(1_234_567, 6));
        insert(&store, Change::Insert(Record::Estoque(e.clone()))).await.unwrap();

        let stored = store.estoque(e.id).await.unwrap().unwrap();
        assert_eq!(stored.quantidade, Decimal::new(123_457, 5));
    }

    #[tokio::test]
    async fn price_midpoint_rounds_away_from_zero() {
        let store = MemoryStore::new();
        let mut p = produto();
        p.preco = Decimal::new(125, 3);
        insert(&store, Change::Insert(Record::Produto(p.clone()))).await.unwrap();

        let stored = store.produto(p.id).await.unwrap().unwrap();
        assert_eq!(stored.preco, Decimal::new(13, 2));
    }

    #[tokio::test]
    async fn quantity_overflow_is_rejected() {
        let store = MemoryStore::new();
        let p = produto();
        insert(&store, Change::Insert(Record::Produto(p.clone()))).await.unwrap();
        let e = Estoque::novo(p.id, Decimal::from(10u64.pow(13)));

        assert!(insert(&store, Change::Insert(Record::Estoque(e))).await.is_err());
    }

    #[tokio::test]
    async fn dropping_an_open_transaction_discards_its_writes() {
        let store = MemoryStore::new();
        let p = produto();
        {
            let mut tx = store.begin().await.unwrap();
            tx.apply(&Change::Insert(Record::Produto(p.clone()))).await.unwrap();
        }
        assert!(store.produto(p.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn deleting_a_product_cascades_to_its_stock() {
        let store = MemoryStore::new();
        let p = produto();
        let e = Estoque::novo(p.id, Decimal::from(5));
        insert(&store, Change::Insert(Record::Produto(p.clone()))).await.unwrap();
        insert(&store, Change::Insert(Record::Estoque(e.clone()))).await.unwrap();

        insert(&store, Change::Delete(Record::Produto(p))).await.unwrap();

        assert!(store.estoque(e.id).await.unwrap().is_none());
        assert!(store.estoques().await.unwrap().is_empty());
    }
}
