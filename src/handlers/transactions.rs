// src/handlers/transactions.rs

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        db_utils::resolve_tenant,
        error::{ApiError, AppError},
        validation::field_error,
    },
    config::AppState,
    middleware::i18n::Locale,
    models::{
        ledger::{TransactionFilter, TransactionType, TransactionView},
        tenancy::Identity,
    },
};

pub const MAX_PAGE_SIZE: i64 = 500;

// ---
// Query: filtros do histórico
// ---
#[derive(Debug, Default, Deserialize, Validate, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct HistoryQuery {
    /// ADD, REMOVE ou GIVE
    #[serde(rename = "type")]
    #[param(value_type = Option<String>, example = "GIVE")]
    pub kind: Option<TransactionType>,

    pub category_id: Option<Uuid>,

    /// Primeiro dia (UTC), formato AAAA-MM-DD
    #[param(value_type = Option<String>, example = "2025-03-01")]
    pub from: Option<NaiveDate>,

    /// Último dia (UTC), incluído por inteiro
    #[param(value_type = Option<String>, example = "2025-03-31")]
    pub to: Option<NaiveDate>,

    #[validate(range(min = 1, max = 500, message = "The limit must be between 1 and 500."))]
    pub limit: Option<i64>,

    #[validate(range(min = 0, message = "The offset cannot be negative."))]
    pub offset: Option<i64>,
}

impl From<HistoryQuery> for TransactionFilter {
    fn from(query: HistoryQuery) -> Self {
        TransactionFilter {
            kind: query.kind,
            category_id: query.category_id,
            from: query.from,
            to: query.to,
            limit: query.limit,
            offset: query.offset.unwrap_or(0),
        }
    }
}

// Uma página do histórico + total para paginação
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPage {
    pub items: Vec<TransactionView>,
    pub total: i64,
    pub limit: Option<i64>,
    pub offset: i64,
}

// GET /api/transactions
#[utoipa::path(
    get,
    path = "/api/transactions",
    tag = "Reports",
    params(
        HistoryQuery,
        ("x-user-email" = String, Header, description = "E-mail do usuário autenticado")
    ),
    responses(
        (status = 200, description = "Histórico do livro-razão, mais recente primeiro", body = TransactionPage),
        (status = 400, description = "Filtro inválido")
    )
)]
pub async fn list_transactions(
    State(app_state): State<AppState>,
    locale: Locale,
    identity: Identity,
    query: Result<Query<HistoryQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(query) = query.map_err(|rejection| {
        tracing::debug!("Query inválida: {}", rejection.body_text());
        field_error("query", "invalid", "Invalid filter parameters.")
            .to_api_error(&locale, &app_state.i18n_store)
    })?;

    query
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let association = resolve_tenant(&app_state, &identity)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let filter: TransactionFilter = query.into();

    let items = app_state
        .report_service
        .history(&app_state.db_pool, association.id, &filter)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    let total = app_state
        .report_service
        .count(&app_state.db_pool, association.id, &filter)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((
        StatusCode::OK,
        Json(TransactionPage {
            items,
            total,
            limit: filter.limit,
            offset: filter.offset,
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_maps_to_filter_with_default_offset() {
        let query = HistoryQuery {
            kind: Some(TransactionType::Give),
            limit: Some(20),
            ..Default::default()
        };

        let filter: TransactionFilter = query.into();

        assert_eq!(filter.kind, Some(TransactionType::Give));
        assert_eq!(filter.limit, Some(20));
        assert_eq!(filter.offset, 0);
    }

    #[test]
    fn oversized_page_is_rejected() {
        let query = HistoryQuery { limit: Some(MAX_PAGE_SIZE + 1), ..Default::default() };
        assert!(query.validate().is_err());
    }
}
