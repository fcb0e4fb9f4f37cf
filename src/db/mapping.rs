// src/db/mapping.rs

// Mapeamento entidade -> tabela/colunas e os limites de coluna definidos na migração.
// Os comandos SQL são montados uma única vez por processo, no primeiro uso.

use std::sync::LazyLock;

// Limites de coluna (ver migrations/)
pub const NOME_MAX_LEN: usize = 255;
pub const DESCRICAO_MAX_LEN: usize = 255;
pub const UNIDADE_MAX_LEN: usize = 2;

// NUMERIC(precisão, escala)
pub const PRECO_NUMERIC: (u32, u32) = (18, 2);
pub const QUANTIDADE_NUMERIC: (u32, u32) = (18, 5);

pub const ESTOQUE_PRODUTO_UNIQUE: &str = "UQ_Estoques_ProdutoId";

#[derive(Debug)]
pub struct Table {
    pub name: &'static str,
    // A chave primária é sempre a primeira coluna.
    pub columns: &'static [&'static str],
    pub order_by: &'static str,
}

impl Table {
    pub fn key(&self) -> &'static str {
        self.columns[0]
    }
}

pub static PRODUTOS: Table = Table {
    name: "Produtos",
    columns: &[
        "Id",
        "DataCadastro",
        "Nome",
        "Descricao",
        "Preco",
        "Unidade",
        "SKU",
        "Inativo",
    ],
    order_by: "DataCadastro",
};

pub static ESTOQUES: Table = Table {
    name: "Estoques",
    columns: &["Id", "DataCadastro", "ProdutoId", "Quantidade", "Inativo"],
    order_by: "DataCadastro",
};

/// Comandos SQL de uma tabela. Os parâmetros seguem a ordem de `Table::columns`
/// tanto no INSERT quanto no UPDATE (a chave é `$1` nos dois).
#[derive(Debug)]
pub struct Statements {
    pub select: String,
    pub select_all: String,
    pub select_by_id: String,
    pub insert: String,
    pub update: String,
    pub delete: String,
}

fn quote(ident: &str) -> String {
    format!("\"{ident}\"")
}

impl Statements {
    pub fn build(table: &Table) -> Self {
        let name = quote(table.name);
        let key = quote(table.key());
        let columns: Vec<String> = table.columns.iter().map(|c| quote(c)).collect();

        let select = format!("SELECT {} FROM {}", columns.join(", "), name);

        let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("${i}")).collect();
        let insert = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            name,
            columns.join(", "),
            placeholders.join(", ")
        );

        let assignments: Vec<String> = columns
            .iter()
            .enumerate()
            .skip(1)
            .map(|(i, column)| format!("{} = ${}", column, i + 1))
            .collect();
        let update = format!(
            "UPDATE {} SET {} WHERE {} = $1",
            name,
            assignments.join(", "),
            key
        );

        Self {
            select_all: format!("{} ORDER BY {}, {}", select, quote(table.order_by), key),
            select_by_id: format!("{} WHERE {} = $1", select, key),
            delete: format!("DELETE FROM {} WHERE {} = $1", name, key),
            select,
            insert,
            update,
        }
    }
}

pub static PRODUTOS_SQL: LazyLock<Statements> = LazyLock::new(|| {
    tracing::debug!(tabela = PRODUTOS.name, "montando mapeamento");
    Statements::build(&PRODUTOS)
});

pub static ESTOQUES_SQL: LazyLock<Statements> = LazyLock::new(|| {
    tracing::debug!(tabela = ESTOQUES.name, "montando mapeamento");
    Statements::build(&ESTOQUES)
});

// Carga antecipada dos estoques de vários produtos de uma vez.
pub static ESTOQUES_POR_PRODUTOS: LazyLock<String> =
    LazyLock::new(|| format!("{} WHERE \"ProdutoId\" = ANY($1)", ESTOQUES_SQL.select));
