// src/db/postgres.rs

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{postgres::PgArguments, query::Query, PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{
        mapping::{ESTOQUES_POR_PRODUTOS, ESTOQUES_SQL, ESTOQUE_PRODUTO_UNIQUE, PRODUTOS_SQL},
        store::{Change, Record, Store, StoreTransaction},
    },
    models::{Estoque, Produto},
};

// O store de produção: tabelas "Produtos" e "Estoques" no Postgres.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Carrega os estoques de todos os produtos com uma única consulta.
    async fn attach_estoques(&self, produtos: &mut [Produto]) -> Result<(), AppError> {
        if produtos.is_empty() {
            return Ok(());
        }

        let ids: Vec<Uuid> = produtos.iter().map(|p| p.id).collect();
        let estoques = sqlx::query_as::<_, Estoque>(&ESTOQUES_POR_PRODUTOS)
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;

        let mut por_produto: HashMap<Uuid, Estoque> =
            estoques.into_iter().map(|e| (e.produto_id, e)).collect();

        for produto in produtos.iter_mut() {
            produto.estoque = por_produto.remove(&produto.id);
        }
        Ok(())
    }
}

#[async_trait]
impl Store for PgStore {
    async fn begin(&self) -> Result<Box<dyn StoreTransaction>, AppError> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgStoreTransaction { tx }))
    }

    async fn produtos(&self) -> Result<Vec<Produto>, AppError> {
        let mut produtos = sqlx::query_as::<_, Produto>(&PRODUTOS_SQL.select_all)
            .fetch_all(&self.pool)
            .await?;
        self.attach_estoques(&mut produtos).await?;
        Ok(produtos)
    }

    async fn produto(&self, id: Uuid) -> Result<Option<Produto>, AppError> {
        let produto = sqlx::query_as::<_, Produto>(&PRODUTOS_SQL.select_by_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match produto {
            Some(p) => {
                let mut encontrados = [p];
                self.attach_estoques(&mut encontrados).await?;
                let [p] = encontrados;
                Ok(Some(p))
            }
            None => Ok(None),
        }
    }

    async fn estoques(&self) -> Result<Vec<Estoque>, AppError> {
        let estoques = sqlx::query_as::<_, Estoque>(&ESTOQUES_SQL.select_all)
            .fetch_all(&self.pool)
            .await?;
        Ok(estoques)
    }

    async fn estoque(&self, id: Uuid) -> Result<Option<Estoque>, AppError> {
        let estoque = sqlx::query_as::<_, Estoque>(&ESTOQUES_SQL.select_by_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(estoque)
    }
}

pub struct PgStoreTransaction {
    tx: Transaction<'static, Postgres>,
}

// Parâmetros na ordem de mapping::PRODUTOS.columns
fn bind_produto<'q>(sql: &'q str, p: &Produto) -> Query<'q, Postgres, PgArguments> {
    sqlx::query(sql)
        .bind(p.id)
        .bind(p.data_cadastro)
        .bind(p.nome.clone())
        .bind(p.descricao.clone())
        .bind(p.preco)
        .bind(p.unidade.clone())
        .bind(p.sku.clone())
        .bind(p.inativo)
}

// Parâmetros na ordem de mapping::ESTOQUES.columns
fn bind_estoque<'q>(sql: &'q str, e: &Estoque) -> Query<'q, Postgres, PgArguments> {
    sqlx::query(sql)
        .bind(e.id)
        .bind(e.data_cadastro)
        .bind(e.produto_id)
        .bind(e.quantidade)
        .bind(e.inativo)
}

// Converte violações de constraint em erros de domínio.
fn translate(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation()
            && db_err.constraint().unwrap_or_default() == ESTOQUE_PRODUTO_UNIQUE
        {
            return AppError::EstoqueJaCadastrado;
        }
        if db_err.is_foreign_key_violation() {
            return AppError::ProdutoNaoEncontrado;
        }
    }
    err.into()
}

impl PgStoreTransaction {
    async fn execute(&mut self, query: Query<'_, Postgres, PgArguments>) -> Result<u64, AppError> {
        let result = query.execute(&mut *self.tx).await.map_err(translate)?;
        Ok(result.rows_affected())
    }

    async fn insert(&mut self, record: &Record) -> Result<u64, AppError> {
        match record {
            Record::Produto(p) => {
                let mut affected = self.execute(bind_produto(&PRODUTOS_SQL.insert, p)).await?;
                if let Some(e) = &p.estoque {
                    affected += self.execute(bind_estoque(&ESTOQUES_SQL.insert, e)).await?;
                }
                Ok(affected)
            }
            Record::Estoque(e) => self.execute(bind_estoque(&ESTOQUES_SQL.insert, e)).await,
        }
    }

    // Atualiza também o estoque anexado ao produto (inativação em cascata).
    async fn update(&mut self, record: &Record) -> Result<u64, AppError> {
        match record {
            Record::Produto(p) => {
                let mut affected = self.execute(bind_produto(&PRODUTOS_SQL.update, p)).await?;
                if affected == 0 {
                    return Err(AppError::ProdutoNaoEncontrado);
                }
                if let Some(e) = &p.estoque {
                    affected += self.update_estoque(e).await?;
                }
                Ok(affected)
            }
            Record::Estoque(e) => self.update_estoque(e).await,
        }
    }

    async fn update_estoque(&mut self, e: &Estoque) -> Result<u64, AppError> {
        let affected = self.execute(bind_estoque(&ESTOQUES_SQL.update, e)).await?;
        if affected == 0 {
            return Err(AppError::EstoqueNaoEncontrado);
        }
        Ok(affected)
    }

    // O estoque do produto sai junto via ON DELETE CASCADE.
    async fn delete(&mut self, record: &Record) -> Result<u64, AppError> {
        let (sql, id, not_found) = match record {
            Record::Produto(p) => (&PRODUTOS_SQL.delete, p.id, AppError::ProdutoNaoEncontrado),
            Record::Estoque(e) => (&ESTOQUES_SQL.delete, e.id, AppError::EstoqueNaoEncontrado),
        };

        let affected = self.execute(sqlx::query(sql).bind(id)).await?;
        if affected == 0 {
            return Err(not_found);
        }
        Ok(affected)
    }
}

#[async_trait]
impl StoreTransaction for PgStoreTransaction {
    async fn apply(&mut self, change: &Change) -> Result<u64, AppError> {
        match change {
            Change::Insert(record) => self.insert(record).await,
            Change::Update(record) => self.update(record).await,
            Change::Delete(record) => self.delete(record).await,
        }
    }

    async fn commit(self: Box<Self>) -> Result<(), AppError> {
        let PgStoreTransaction { tx } = *self;
        tx.commit().await?;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), AppError> {
        let PgStoreTransaction { tx } = *self;
        tx.rollback().await?;
        Ok(())
    }
}
