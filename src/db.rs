pub mod context;
pub use context::DbContext;
pub mod mapping;
pub mod memory;
pub use memory::MemoryStore;
pub mod postgres;
pub use postgres::PgStore;
pub mod repository_base;
pub use repository_base::{Entity, EstoqueRepository, ProdutoRepository, RepositoryBase};
pub mod store;
pub use store::{with_transaction, Change, Record, Store, StoreTransaction};
