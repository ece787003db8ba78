// src/common/error.rs

use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;
use uuid::Uuid;
use validator::{ValidationErrors, ValidationErrorsKind};

use crate::common::i18n::I18nStore;
use crate::middleware::i18n::Locale;

// Erro de domínio devolvido por todos os serviços.
// O handler converte para `ApiError` (já traduzido) com `to_api_error`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] ValidationErrors),

    #[error("Produtos inexistentes ou de outra associação: {0:?}")]
    UnknownProducts(Vec<Uuid>),

    #[error("Identidade do usuário ausente")]
    MissingIdentity,

    #[error("Associação não encontrada")]
    AssociationNotFound,

    #[error("Categoria não encontrada")]
    CategoryNotFound,

    #[error("Produto não encontrado")]
    ProductNotFound,

    #[error("Estoque insuficiente para {product_name}: disponível {available} {unit}, pedido {requested} {unit}")]
    InsufficientStock {
        product_id: Uuid,
        product_name: String,
        available: i32,
        requested: i32,
        unit: String,
    },

    #[error("Produto possui histórico de movimentações")]
    ProductHasHistory,

    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),
}

// Resposta de erro da API: `{ success: false, code, error, details }`
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub error: String,
    pub details: Option<Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "success": false,
            "code": self.code,
            "error": self.error,
            "details": self.details,
        }));
        (self.status, body).into_response()
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::UnknownProducts(_) => StatusCode::BAD_REQUEST,
            AppError::MissingIdentity => StatusCode::UNAUTHORIZED,
            AppError::AssociationNotFound
            | AppError::CategoryNotFound
            | AppError::ProductNotFound => StatusCode::NOT_FOUND,
            AppError::InsufficientStock { .. } | AppError::ProductHasHistory => StatusCode::CONFLICT,
            AppError::DatabaseError(_) | AppError::InternalServerError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Código estável para o front-end (não traduzido).
    pub fn code(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) | AppError::UnknownProducts(_) => "VALIDATION_ERROR",
            AppError::MissingIdentity => "UNAUTHENTICATED",
            AppError::AssociationNotFound
            | AppError::CategoryNotFound
            | AppError::ProductNotFound => "NOT_FOUND",
            AppError::InsufficientStock { .. } => "INSUFFICIENT_STOCK",
            AppError::ProductHasHistory => "PRODUCT_HAS_HISTORY",
            AppError::DatabaseError(_) => "PERSISTENCE_ERROR",
            AppError::InternalServerError(_) => "INTERNAL_ERROR",
        }
    }

    fn message_key(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "error.validation",
            AppError::UnknownProducts(_) => "error.unknown_products",
            AppError::MissingIdentity => "error.unauthenticated",
            AppError::AssociationNotFound => "error.association_not_found",
            AppError::CategoryNotFound => "error.category_not_found",
            AppError::ProductNotFound => "error.product_not_found",
            AppError::InsufficientStock { .. } => "error.insufficient_stock",
            AppError::ProductHasHistory => "error.product_has_history",
            AppError::DatabaseError(_) | AppError::InternalServerError(_) => "error.internal",
        }
    }

    /// Traduz o erro para o idioma do cliente.
    /// Erros de banco/internos são logados aqui e nunca expõem o texto original.
    pub fn to_api_error(&self, locale: &Locale, i18n: &I18nStore) -> ApiError {
        let lang = locale.0.as_str();

        let (error, details) = match self {
            AppError::ValidationError(errors) => {
                let mut fields = BTreeMap::new();
                collect_field_messages("", errors, &mut fields);
                (i18n.translate(lang, self.message_key()), Some(json!(fields)))
            }
            AppError::UnknownProducts(ids) => (
                i18n.translate(lang, self.message_key()),
                Some(json!({ "productIds": ids })),
            ),
            AppError::InsufficientStock { product_id, product_name, available, requested, unit } => (
                i18n.translate_with(
                    lang,
                    self.message_key(),
                    &[
                        ("product", product_name.clone()),
                        ("available", available.to_string()),
                        ("requested", requested.to_string()),
                        ("unit", unit.clone()),
                    ],
                ),
                Some(json!({
                    "productId": product_id,
                    "productName": product_name,
                    "available": available,
                    "requested": requested,
                    "unit": unit,
                })),
            ),
            AppError::DatabaseError(_) | AppError::InternalServerError(_) => {
                tracing::error!("Erro Interno do Servidor: {}", self);
                (i18n.translate(lang, self.message_key()), None)
            }
            _ => (i18n.translate(lang, self.message_key()), None),
        };

        ApiError {
            status: self.status(),
            code: self.code(),
            error,
            details,
        }
    }
}

// Achata os erros do validator (inclusive listas aninhadas, ex: items[0].quantity)
fn collect_field_messages(
    prefix: &str,
    errors: &ValidationErrors,
    out: &mut BTreeMap<String, Vec<String>>,
) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", prefix, field)
        };

        match kind {
            ValidationErrorsKind::Field(list) => {
                let messages = list.iter().map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string())
                });
                out.entry(path).or_default().extend(messages);
            }
            ValidationErrorsKind::Struct(inner) => collect_field_messages(&path, inner, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect_field_messages(&format!("{}[{}]", path, index), inner, out);
                }
            }
        }
    }
}
