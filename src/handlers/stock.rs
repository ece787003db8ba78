// src/handlers/stock.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
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
        inventory::Product,
        ledger::{DonationItem, DonationRequest, TransactionView},
        tenancy::Identity,
    },
};

// ---
// Payload: StockMovement (entrada e saída)
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockMovementPayload {
    #[validate(required(message = "The field 'productId' is required."))]
    pub product_id: Option<Uuid>,

    #[validate(
        required(message = "The field 'quantity' is required."),
        range(min = 1, message = "Quantity must be a positive integer.")
    )]
    #[schema(example = 10)]
    pub quantity: Option<i32>,
}

impl StockMovementPayload {
    // Chamado após `validate()`, que garante os dois campos
    fn into_parts(self) -> Result<(Uuid, i32), AppError> {
        let product_id = self
            .product_id
            .ok_or_else(|| field_error("productId", "required", "The field 'productId' is required."))?;
        let quantity = self
            .quantity
            .ok_or_else(|| field_error("quantity", "required", "The field 'quantity' is required."))?;
        Ok((product_id, quantity))
    }
}

// ---
// Payload: Donation
// ---
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DonationItemPayload {
    pub product_id: Uuid,

    #[validate(range(min = 1, message = "Quantity must be a positive integer."))]
    #[schema(example = 3)]
    pub quantity: i32,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DonationPayload {
    #[validate(length(min = 1, message = "At least one item is required."), nested)]
    pub items: Vec<DonationItemPayload>,

    #[validate(length(max = 200, message = "The recipient name must have at most 200 characters."))]
    #[schema(example = "Amina")]
    pub recipient_name: Option<String>,

    #[validate(length(max = 1000, message = "The recipient info must have at most 1000 characters."))]
    pub recipient_info: Option<String>,
}

impl From<DonationPayload> for DonationRequest {
    fn from(payload: DonationPayload) -> Self {
        DonationRequest {
            items: payload
                .items
                .into_iter()
                .map(|item| DonationItem {
                    product_id: item.product_id,
                    quantity: item.quantity,
                })
                .collect(),
            recipient_name: payload.recipient_name,
            recipient_info: payload.recipient_info,
        }
    }
}

// POST /api/stock/receive
#[utoipa::path(
    post,
    path = "/api/stock/receive",
    tag = "Stock",
    request_body = StockMovementPayload,
    responses(
        (status = 200, description = "Entrada registrada (ADD)", body = Product),
        (status = 400, description = "Quantidade inválida"),
        (status = 404, description = "Produto não encontrado nesta associação")
    ),
    params(("x-user-email" = String, Header, description = "E-mail do usuário autenticado"))
)]
pub async fn receive_stock(
    State(app_state): State<AppState>,
    locale: Locale,
    identity: Identity,
    Json(payload): Json<StockMovementPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;
    let (product_id, quantity) = payload
        .into_parts()
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let association = resolve_tenant(&app_state, &identity)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let product = app_state
        .ledger_service
        .receive(&app_state.db_pool, association.id, product_id, quantity)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(product)))
}

// POST /api/stock/issue
#[utoipa::path(
    post,
    path = "/api/stock/issue",
    tag = "Stock",
    request_body = StockMovementPayload,
    responses(
        (status = 200, description = "Saída registrada (REMOVE)", body = Product),
        (status = 400, description = "Quantidade inválida"),
        (status = 404, description = "Produto não encontrado nesta associação"),
        (status = 409, description = "Estoque insuficiente")
    ),
    params(("x-user-email" = String, Header, description = "E-mail do usuário autenticado"))
)]
pub async fn issue_stock(
    State(app_state): State<AppState>,
    locale: Locale,
    identity: Identity,
    Json(payload): Json<StockMovementPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;
    let (product_id, quantity) = payload
        .into_parts()
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let association = resolve_tenant(&app_state, &identity)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let product = app_state
        .ledger_service
        .issue(&app_state.db_pool, association.id, product_id, quantity)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(product)))
}

// POST /api/stock/donations
#[utoipa::path(
    post,
    path = "/api/stock/donations",
    tag = "Stock",
    request_body = DonationPayload,
    responses(
        (status = 201, description = "Doação registrada (uma transação GIVE por item)", body = Vec<TransactionView>),
        (status = 400, description = "Itens inválidos ou produtos desconhecidos"),
        (status = 409, description = "Estoque insuficiente (nada é gravado)")
    ),
    params(("x-user-email" = String, Header, description = "E-mail do usuário autenticado"))
)]
pub async fn donate(
    State(app_state): State<AppState>,
    locale: Locale,
    identity: Identity,
    Json(payload): Json<DonationPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let association = resolve_tenant(&app_state, &identity)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let transactions = app_state
        .ledger_service
        .donate(&app_state.db_pool, association.id, payload.into())
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(transactions)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn donation_item_errors_are_nested_per_index() {
        let payload: DonationPayload = serde_json::from_value(serde_json::json!({
            "items": [
                { "productId": Uuid::new_v4(), "quantity": 2 },
                { "productId": Uuid::new_v4(), "quantity": 0 }
            ]
        }))
        .unwrap();

        let errors = payload.validate().unwrap_err();

        let api = AppError::ValidationError(errors)
            .to_api_error(&Locale("en".into()), &crate::common::i18n::I18nStore::new());
        let details = api.details.unwrap();
        assert!(details.get("items[1].quantity").is_some(), "{details}");
        assert!(details.get("items[0].quantity").is_none());
    }

    #[test]
    fn empty_donation_is_rejected_on_items() {
        let payload: DonationPayload = serde_json::from_str(r#"{"items":[]}"#).unwrap();

        let errors = payload.validate().unwrap_err();

        let api = AppError::ValidationError(errors)
            .to_api_error(&Locale("en".into()), &crate::common::i18n::I18nStore::new());
        let details = api.details.unwrap();
        assert_eq!(details["items"][0], "At least one item is required.", "{details}");
    }

    #[test]
    fn missing_quantity_fails_validation() {
        let payload: StockMovementPayload =
            serde_json::from_value(serde_json::json!({ "productId": Uuid::new_v4() })).unwrap();
        assert!(payload.validate().is_err());
    }
}
