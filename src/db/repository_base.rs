// src/db/repository_base.rs

use std::marker::PhantomData;

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{
        context::DbContext,
        store::{Change, Record, Store, StoreFuture},
    },
    models::{Estoque, Produto},
};

/// Uma entidade persistida por `RepositoryBase`.
pub trait Entity: Clone + Send + Sync + 'static {
    /// Nome usado nos logs.
    const NAME: &'static str;

    fn id(&self) -> Uuid;

    fn into_record(self) -> Record;

    fn load_all(store: &dyn Store) -> StoreFuture<'_, Vec<Self>>;

    fn load_by_id(store: &dyn Store, id: Uuid) -> StoreFuture<'_, Option<Self>>;
}

// Produto sempre vem com o estoque associado.
impl Entity for Produto {
    const NAME: &'static str = "produto";

    fn id(&self) -> Uuid {
        self.id
    }

    fn into_record(self) -> Record {
        Record::Produto(self)
    }

    fn load_all(store: &dyn Store) -> StoreFuture<'_, Vec<Self>> {
        store.produtos()
    }

    fn load_by_id(store: &dyn Store, id: Uuid) -> StoreFuture<'_, Option<Self>> {
        store.produto(id)
    }
}

// Estoque é lido sozinho, sem o produto.
impl Entity for Estoque {
    const NAME: &'static str = "estoque";

    fn id(&self) -> Uuid {
        self.id
    }

    fn into_record(self) -> Record {
        Record::Estoque(self)
    }

    fn load_all(store: &dyn Store) -> StoreFuture<'_, Vec<Self>> {
        store.estoques()
    }

    fn load_by_id(store: &dyn Store, id: Uuid) -> StoreFuture<'_, Option<Self>> {
        store.estoque(id)
    }
}

/// CRUD genérico sobre um tipo de entidade, preso ao contexto da requisição.
///
/// As leituras devolvem cópias desanexadas. Toda escrita passa por
/// `save_changes`, que roda numa transação própria: `update` e `delete` são
/// "marcar + gravar" numa chamada só, `add` só enfileira.
pub struct RepositoryBase<'c, E> {
    context: &'c mut DbContext,
    _entity: PhantomData<fn() -> E>,
}

pub type ProdutoRepository<'c> = RepositoryBase<'c, Produto>;
pub type EstoqueRepository<'c> = RepositoryBase<'c, Estoque>;

impl<'c, E: Entity> RepositoryBase<'c, E> {
    pub(crate) fn new(context: &'c mut DbContext) -> Self {
        Self {
            context,
            _entity: PhantomData,
        }
    }

    /// Todas as linhas; vazio quando não há nenhuma.
    pub async fn get_all(&self) -> Result<Vec<E>, AppError> {
        E::load_all(self.context.store()).await
    }

    /// `None` quando o id não existe.
    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<E>, AppError> {
        E::load_by_id(self.context.store(), id).await
    }

    /// Enfileira a inserção. Nada é escrito até `save_changes`.
    pub fn add(&mut self, entity: E) {
        tracing::debug!(entidade = E::NAME, id = %entity.id(), "inserção enfileirada");
        self.context.stage(Change::Insert(entity.into_record()));
    }

    pub async fn save_changes(&mut self) -> Result<u64, AppError> {
        self.context.save_changes().await
    }

    pub async fn update(&mut self, entity: &E) -> Result<u64, AppError> {
        tracing::debug!(entidade = E::NAME, id = %entity.id(), "atualização");
        self.context.stage(Change::Update(entity.clone().into_record()));
        self.context.save_changes().await
    }

    pub async fn delete(&mut self, entity: &E) -> Result<u64, AppError> {
        tracing::debug!(entidade = E::NAME, id = %entity.id(), "remoção");
        self.context.stage(Change::Delete(entity.clone().into_record()));
        self.context.save_changes().await
    }
}
