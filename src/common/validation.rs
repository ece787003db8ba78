// src/common/validation.rs

use rust_decimal::Decimal;
use validator::{ValidationError, ValidationErrors};

use crate::common::error::AppError;

// ---
// Validações customizadas (usadas nos payloads e nos serviços)
// ---
pub fn validate_positive_decimal(val: &Decimal) -> Result<(), ValidationError> {
    if *val <= Decimal::ZERO {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0.0);
        err.message = Some("The value must be greater than zero.".into());
        return Err(err);
    }
    Ok(())
}

pub fn validate_not_blank(val: &str) -> Result<(), ValidationError> {
    if val.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("The value cannot be blank.".into());
        return Err(err);
    }
    Ok(())
}

/// Monta um `AppError::ValidationError` para um único campo.
pub fn field_error(field: &'static str, code: &'static str, message: &'static str) -> AppError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());

    let mut errors = ValidationErrors::new();
    errors.add(field, err);
    AppError::ValidationError(errors)
}

pub fn require_not_blank(field: &'static str, value: &str) -> Result<(), AppError> {
    validate_not_blank(value).map_err(|e| {
        let mut errors = ValidationErrors::new();
        errors.add(field, e);
        AppError::ValidationError(errors)
    })
}

pub fn require_positive_quantity(field: &'static str, quantity: i32) -> Result<(), AppError> {
    if quantity <= 0 {
        return Err(field_error(field, "range", "Quantity must be a positive integer."));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn zero_and_negative_prices_are_rejected() {
        assert!(validate_positive_decimal(&dec("0")).is_err());
        assert!(validate_positive_decimal(&dec("-1.50")).is_err());
        assert!(validate_positive_decimal(&dec("0.01")).is_ok());
    }

    #[test]
    fn whitespace_only_is_blank() {
        assert!(validate_not_blank("   ").is_err());
        assert!(validate_not_blank("").is_err());
        assert!(validate_not_blank(" Rice ").is_ok());
    }

    #[test]
    fn quantity_must_be_positive() {
        assert!(matches!(
            require_positive_quantity("quantity", 0),
            Err(AppError::ValidationError(_))
        ));
        assert!(require_positive_quantity("quantity", 1).is_ok());
    }
}
