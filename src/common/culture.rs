// src/common/culture.rs

use std::{fmt, str::FromStr};

use rust_decimal::Decimal;

use crate::common::error::AppError;

/// Convenção numérica usada para interpretar decimais que chegam como texto
/// (ex.: o segmento `{quantidade}` da rota de atualização de estoque).
///
/// Vive no `AppState`; nada no processo depende de um locale global.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Culture {
    #[default]
    EnUs,
    PtBr,
}

impl Culture {
    pub fn tag(self) -> &'static str {
        match self {
            Culture::EnUs => "en-US",
            Culture::PtBr => "pt-BR",
        }
    }

    // (separador de milhar, separador decimal)
    fn separators(self) -> (char, char) {
        match self {
            Culture::EnUs => (',', '.'),
            Culture::PtBr => ('.', ','),
        }
    }

    pub fn parse_decimal(self, raw: &str) -> Result<Decimal, AppError> {
        let (group, decimal) = self.separators();

        let normalized: String = raw
            .trim()
            .chars()
            .filter(|c| *c != group)
            .map(|c| if c == decimal { '.' } else { c })
            .collect();

        Decimal::from_str(&normalized).map_err(|_| {
            AppError::PayloadInvalido(format!(
                "O valor '{}' não é um número válido para a cultura {}.",
                raw,
                self.tag()
            ))
        })
    }
}

impl FromStr for Culture {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en-us" | "en" => Ok(Culture::EnUs),
            "pt-br" | "pt" => Ok(Culture::PtBr),
            other => Err(anyhow::anyhow!("cultura não suportada: {other}")),
        }
    }
}

impl fmt::Display for Culture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}
