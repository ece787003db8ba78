// src/handlers/reports.rs

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::{
    common::{
        db_utils::resolve_tenant,
        error::ApiError,
        validation::field_error,
    },
    config::AppState,
    middleware::i18n::Locale,
    models::{
        dashboard::{DonationStats, InventoryOverview, TransactionStats},
        ledger::{TransactionFilter, TransactionType},
        tenancy::Identity,
    },
};

// ---
// Query: recorte dos relatórios (mesmos filtros do histórico, sem paginação)
// ---
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ReportQuery {
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
}

impl From<ReportQuery> for TransactionFilter {
    fn from(query: ReportQuery) -> Self {
        TransactionFilter {
            kind: query.kind,
            category_id: query.category_id,
            from: query.from,
            to: query.to,
            ..Default::default()
        }
    }
}

fn report_filter(
    query: Result<Query<ReportQuery>, QueryRejection>,
    locale: &Locale,
    app_state: &AppState,
) -> Result<TransactionFilter, ApiError> {
    let Query(query) = query.map_err(|rejection| {
        tracing::debug!("Query inválida: {}", rejection.body_text());
        field_error("query", "invalid", "Invalid filter parameters.")
            .to_api_error(locale, &app_state.i18n_store)
    })?;
    Ok(query.into())
}

// GET /api/reports/transactions
#[utoipa::path(
    get,
    path = "/api/reports/transactions",
    tag = "Reports",
    responses(
        (status = 200, description = "Contagens e quantidades por tipo de movimentação", body = TransactionStats),
        (status = 400, description = "Filtro inválido")
    ),
    params(
        ReportQuery,
        ("x-user-email" = String, Header, description = "E-mail do usuário autenticado")
    )
)]
pub async fn get_transaction_stats(
    State(app_state): State<AppState>,
    locale: Locale,
    identity: Identity,
    query: Result<Query<ReportQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let filter = report_filter(query, &locale, &app_state)?;

    let association = resolve_tenant(&app_state, &identity)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let stats = app_state
        .report_service
        .transaction_stats(&app_state.db_pool, association.id, &filter)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(stats)))
}

// GET /api/reports/donations
#[utoipa::path(
    get,
    path = "/api/reports/donations",
    tag = "Reports",
    responses(
        (status = 200, description = "Totais de doações e destinatários distintos", body = DonationStats)
    ),
    params(("x-user-email" = String, Header, description = "E-mail do usuário autenticado"))
)]
pub async fn get_donation_stats(
    State(app_state): State<AppState>,
    locale: Locale,
    identity: Identity,
) -> Result<impl IntoResponse, ApiError> {
    let association = resolve_tenant(&app_state, &identity)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let stats = app_state
        .report_service
        .donation_stats(&app_state.db_pool, association.id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(stats)))
}

// GET /api/reports/overview
#[utoipa::path(
    get,
    path = "/api/reports/overview",
    tag = "Reports",
    responses(
        (status = 200, description = "Indicadores do dashboard de estoque", body = InventoryOverview),
        (status = 400, description = "Filtro inválido")
    ),
    params(
        ReportQuery,
        ("x-user-email" = String, Header, description = "E-mail do usuário autenticado")
    )
)]
pub async fn get_inventory_overview(
    State(app_state): State<AppState>,
    locale: Locale,
    identity: Identity,
    query: Result<Query<ReportQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let filter = report_filter(query, &locale, &app_state)?;

    let association = resolve_tenant(&app_state, &identity)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let overview = app_state
        .report_service
        .inventory_overview(&app_state.db_pool, association.id, &filter)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(overview)))
}
