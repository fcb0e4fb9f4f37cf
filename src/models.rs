pub mod estoque;
pub mod produto;

pub use estoque::Estoque;
pub use produto::Produto;
