// src/db/context.rs

use std::{convert::Infallible, sync::Arc};

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::{
    common::error::AppError,
    config::AppState,
    db::{
        repository_base::{EstoqueRepository, ProdutoRepository, RepositoryBase},
        store::{with_transaction, Change, Store},
    },
};

/// Contexto de persistência de uma requisição.
///
/// Guarda as alterações enfileiradas até o próximo `save_changes`. O que não
/// foi gravado quando o contexto sai de escopo é descartado. As conexões do
/// pool só ficam emprestadas durante cada leitura ou transação.
pub struct DbContext {
    store: Arc<dyn Store>,
    pending: Vec<Change>,
}

impl DbContext {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            store,
            pending: Vec::new(),
        }
    }

    pub fn produtos(&mut self) -> ProdutoRepository<'_> {
        RepositoryBase::new(self)
    }

    pub fn estoques(&mut self) -> EstoqueRepository<'_> {
        RepositoryBase::new(self)
    }

    pub fn pending_changes(&self) -> usize {
        self.pending.len()
    }

    pub(crate) fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }

    pub(crate) fn stage(&mut self, change: Change) {
        self.pending.push(change);
    }

    /// Grava tudo o que está enfileirado numa única transação.
    /// Em caso de falha a transação é desfeita e as alterações enfileiradas são descartadas.
    pub async fn save_changes(&mut self) -> Result<u64, AppError> {
        if self.pending.is_empty() {
            return Ok(0);
        }

        let changes = std::mem::take(&mut self.pending);
        let total = changes.len();

        let result = with_transaction(self.store.as_ref(), move |tx| {
            Box::pin(async move {
                let mut affected = 0;
                for change in &changes {
                    affected += tx.apply(change).await?;
                }
                Ok::<u64, AppError>(affected)
            })
        })
        .await;

        match &result {
            Ok(affected) => {
                tracing::debug!(alteracoes = total, linhas = affected, "alterações gravadas");
            }
            Err(e) => {
                tracing::warn!(alteracoes = total, "transação desfeita: {}", e);
            }
        }
        result
    }
}

impl Drop for DbContext {
    fn drop(&mut self) {
        if !self.pending.is_empty() {
            tracing::warn!(
                alteracoes = self.pending.len(),
                "contexto descartado com alterações não gravadas"
            );
        }
    }
}

// Um contexto novo por requisição, em cima do store compartilhado do AppState.
impl FromRequestParts<AppState> for DbContext {
    type Rejection = Infallible;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(DbContext::new(state.store.clone()))
    }
}
