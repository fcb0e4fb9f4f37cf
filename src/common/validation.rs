// src/common/validation.rs

// Validações customizadas usadas pelos payloads (validator `custom(function = ...)`).
// A mensagem vem do atributo no payload, exceto em preço e quantidade,
// que têm duas regras e definem a mensagem aqui.

use rust_decimal::Decimal;
use uuid::Uuid;
use validator::ValidationError;

use crate::db::mapping::{PRECO_NUMERIC, QUANTIDADE_NUMERIC};

pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("not_blank"));
    }
    Ok(())
}

pub fn validate_positive(value: &Decimal) -> Result<(), ValidationError> {
    if *value <= Decimal::ZERO {
        let mut err = ValidationError::new("range");
        err.add_param("exclusive_min".into(), &0.0);
        return Err(err);
    }
    Ok(())
}

// Casas decimais além da escala da coluna seriam arredondadas na gravação.
pub fn fits_scale(value: &Decimal, scale: u32) -> bool {
    value.normalize().scale() <= scale
}

fn validate_scale(value: &Decimal, scale: u32) -> Result<(), ValidationError> {
    if !fits_scale(value, scale) {
        let mut err = ValidationError::new("scale");
        err.add_param("max_scale".into(), &scale);
        return Err(err);
    }
    Ok(())
}

// Positivo e dentro da escala de NUMERIC(18, 2).
pub fn validate_preco(value: &Decimal) -> Result<(), ValidationError> {
    validate_positive(value).map_err(|e| {
        e.with_message("Não é possível gravar um produto com preço menor ou igual a zero.".into())
    })?;
    validate_scale(value, PRECO_NUMERIC.1)
        .map_err(|e| e.with_message("O preço deve ter no máximo 2 casas decimais.".into()))
}

// Positiva e dentro da escala de NUMERIC(18, 5).
pub fn validate_quantidade(value: &Decimal) -> Result<(), ValidationError> {
    validate_positive(value).map_err(|e| {
        e.with_message(
            "Não é possível gravar um estoque com quantidade menor ou igual a zero.".into(),
        )
    })?;
    validate_scale(value, QUANTIDADE_NUMERIC.1)
        .map_err(|e| e.with_message("A quantidade deve ter no máximo 5 casas decimais.".into()))
}

pub fn validate_not_nil(value: &Uuid) -> Result<(), ValidationError> {
    if value.is_nil() {
        return Err(ValidationError::new("required"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_only_is_blank() {
        assert!(validate_not_blank("   ").is_err());
        assert!(validate_not_blank("").is_err());
        assert!(validate_not_blank(" x ").is_ok());
    }

    #[test]
    fn zero_and_negative_are_not_positive() {
        assert!(validate_positive(&Decimal::ZERO).is_err());
        assert!(validate_positive(&Decimal::NEGATIVE_ONE).is_err());
        assert!(validate_positive(&Decimal::new(1, 5)).is_ok());
    }

    #[test]
    fn extra_fractional_digits_do_not_fit_the_column() {
        assert!(validate_preco(&Decimal::new(1, 3)).is_err());
        assert!(validate_preco(&Decimal::new(199, 2)).is_ok());
        // Zeros à direita não contam
        assert!(validate_preco(&Decimal::new(15000, 4)).is_ok());

        assert!(validate_quantidade(&Decimal::new(1, 6)).is_err());
        assert!(validate_quantidade(&Decimal::new(1, 5)).is_ok());
    }

    #[test]
    fn price_and_quantity_messages_name_the_broken_rule() {
        let zero = validate_preco(&Decimal::ZERO).unwrap_err();
        assert_eq!(zero.code, "range");

        let escala = validate_quantidade(&Decimal::new(1, 6)).unwrap_err();
        assert_eq!(escala.code, "scale");
        assert_eq!(
            escala.message.as_deref(),
            Some("A quantidade deve ter no máximo 5 casas decimais.")
        );
    }

    #[test]
    fn nil_uuid_is_missing() {
        assert!(validate_not_nil(&Uuid::nil()).is_err());
        assert!(validate_not_nil(&Uuid::new_v4()).is_ok());
    }
}
