// src/db/store.rs

use std::{future::Future, pin::Pin};

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{Estoque, Produto},
};

pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, AppError>> + Send + 'a>>;

/// Uma linha de qualquer tabela mapeada.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Produto(Produto),
    Estoque(Estoque),
}

/// Alteração pendente, aplicada no próximo flush do contexto.
#[derive(Debug, Clone, PartialEq)]
pub enum Change {
    Insert(Record),
    Update(Record),
    Delete(Record),
}

/// O banco relacional, visto como uma caixa preta com leituras e transações.
///
/// As leituras de produto já trazem o estoque associado (carga antecipada).
#[async_trait]
pub trait Store: Send + Sync {
    async fn begin(&self) -> Result<Box<dyn StoreTransaction>, AppError>;

    async fn produtos(&self) -> Result<Vec<Produto>, AppError>;

    async fn produto(&self, id: Uuid) -> Result<Option<Produto>, AppError>;

    async fn estoques(&self) -> Result<Vec<Estoque>, AppError>;

    async fn estoque(&self, id: Uuid) -> Result<Option<Estoque>, AppError>;
}

/// Transação aberta. Descartar sem `commit` equivale a `rollback`.
#[async_trait]
pub trait StoreTransaction: Send {
    /// Aplica uma alteração e devolve o número de linhas afetadas.
    async fn apply(&mut self, change: &Change) -> Result<u64, AppError>;

    async fn commit(self: Box<Self>) -> Result<(), AppError>;

    async fn rollback(self: Box<Self>) -> Result<(), AppError>;
}

/// Abre uma transação, executa a unidade de trabalho e faz commit.
/// Qualquer erro da unidade de trabalho provoca rollback e é devolvido intacto.
pub async fn with_transaction<T, F>(store: &dyn Store, work: F) -> Result<T, AppError>
where
    T: Send,
    F: for<'t> FnOnce(&'t mut dyn StoreTransaction) -> StoreFuture<'t, T> + Send,
{
    let mut tx = store.begin().await?;

    match work(tx.as_mut()).await {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                tracing::error!("Falha ao desfazer a transação: {:?}", rollback_err);
            }
            Err(err)
        }
    }
}
