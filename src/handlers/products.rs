// src/handlers/products.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        db_utils::resolve_tenant,
        error::{ApiError, AppError},
        validation::{field_error, validate_not_blank, validate_positive_decimal},
    },
    config::AppState,
    middleware::i18n::Locale,
    models::{
        inventory::{NewProduct, Product, ProductChanges, ProductView},
        tenancy::Identity,
    },
};

// ---
// Payload: CreateProduct
// ---
// Não existe campo de quantidade: todo produto nasce com estoque 0.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductPayload {
    #[validate(required(message = "The field 'categoryId' is required."))]
    pub category_id: Option<Uuid>,

    #[validate(custom(function = "validate_not_blank"))]
    #[schema(example = "Rice")]
    pub name: String,

    pub description: Option<String>,

    #[validate(custom(function = "validate_positive_decimal"))]
    #[schema(value_type = f64, example = 2.5)]
    pub price: Decimal,

    #[validate(length(max = 30, message = "The unit must have at most 30 characters."))]
    #[schema(example = "kg")]
    pub unit: Option<String>,

    pub image_url: Option<String>,
}

// ---
// Payload: UpdateProduct
// ---
// Quantidade, categoria e associação não são editáveis.
// `imageUrl` ausente mantém a imagem; string vazia remove.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductPayload {
    #[validate(custom(function = "validate_not_blank"))]
    pub name: String,

    pub description: Option<String>,

    #[validate(custom(function = "validate_positive_decimal"))]
    #[schema(value_type = f64)]
    pub price: Decimal,

    pub image_url: Option<String>,
}

// GET /api/products
#[utoipa::path(
    get,
    path = "/api/products",
    tag = "Catalog",
    responses(
        (status = 200, description = "Produtos com o nome da categoria", body = Vec<ProductView>)
    ),
    params(("x-user-email" = String, Header, description = "E-mail do usuário autenticado"))
)]
pub async fn list_products(
    State(app_state): State<AppState>,
    locale: Locale,
    identity: Identity,
) -> Result<impl IntoResponse, ApiError> {
    let association = resolve_tenant(&app_state, &identity)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let products = app_state
        .catalog_service
        .list_products(&app_state.db_pool, association.id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(products)))
}

// POST /api/products
#[utoipa::path(
    post,
    path = "/api/products",
    tag = "Catalog",
    request_body = CreateProductPayload,
    responses(
        (status = 201, description = "Produto criado com estoque 0", body = Product),
        (status = 400, description = "Nome em branco ou preço inválido"),
        (status = 404, description = "Categoria não encontrada nesta associação")
    ),
    params(("x-user-email" = String, Header, description = "E-mail do usuário autenticado"))
)]
pub async fn create_product(
    State(app_state): State<AppState>,
    locale: Locale,
    identity: Identity,
    Json(payload): Json<CreateProductPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let association = resolve_tenant(&app_state, &identity)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    // `required` já garantiu o Some
    let category_id = payload.category_id.ok_or_else(|| {
        field_error("categoryId", "required", "The field 'categoryId' is required.")
            .to_api_error(&locale, &app_state.i18n_store)
    })?;

    let new_product = NewProduct {
        category_id,
        name: payload.name,
        description: payload.description.unwrap_or_default(),
        price: payload.price,
        unit: payload.unit.map(|u| u.trim().to_string()).unwrap_or_default(),
        image_url: payload.image_url.unwrap_or_default(),
    };

    let product = app_state
        .catalog_service
        .create_product(&app_state.db_pool, association.id, new_product)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(product)))
}

// GET /api/products/{id}
#[utoipa::path(
    get,
    path = "/api/products/{id}",
    tag = "Catalog",
    responses(
        (status = 200, description = "Produto", body = ProductView),
        (status = 404, description = "Não encontrado nesta associação")
    ),
    params(
        ("id" = Uuid, Path, description = "ID do produto"),
        ("x-user-email" = String, Header, description = "E-mail do usuário autenticado")
    )
)]
pub async fn get_product(
    State(app_state): State<AppState>,
    locale: Locale,
    identity: Identity,
    Path(product_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let association = resolve_tenant(&app_state, &identity)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let product = app_state
        .catalog_service
        .get_product(&app_state.db_pool, association.id, product_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(product)))
}

// PUT /api/products/{id}
#[utoipa::path(
    put,
    path = "/api/products/{id}",
    tag = "Catalog",
    request_body = UpdateProductPayload,
    responses(
        (status = 200, description = "Produto atualizado", body = Product),
        (status = 404, description = "Não encontrado nesta associação")
    ),
    params(
        ("id" = Uuid, Path, description = "ID do produto"),
        ("x-user-email" = String, Header, description = "E-mail do usuário autenticado")
    )
)]
pub async fn update_product(
    State(app_state): State<AppState>,
    locale: Locale,
    identity: Identity,
    Path(product_id): Path<Uuid>,
    Json(payload): Json<UpdateProductPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let association = resolve_tenant(&app_state, &identity)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let changes = ProductChanges {
        name: payload.name,
        description: payload.description,
        price: payload.price,
        image_url: payload.image_url,
    };

    let product = app_state
        .catalog_service
        .update_product(&app_state.db_pool, association.id, product_id, changes)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(product)))
}

// DELETE /api/products/{id}
#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    tag = "Catalog",
    responses(
        (status = 200, description = "Produto removido (o cliente limpa a imagem)", body = Product),
        (status = 404, description = "Não encontrado nesta associação"),
        (status = 409, description = "Produto com movimentações no livro-razão")
    ),
    params(
        ("id" = Uuid, Path, description = "ID do produto"),
        ("x-user-email" = String, Header, description = "E-mail do usuário autenticado")
    )
)]
pub async fn delete_product(
    State(app_state): State<AppState>,
    locale: Locale,
    identity: Identity,
    Path(product_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let association = resolve_tenant(&app_state, &identity)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let deleted = app_state
        .catalog_service
        .delete_product(&app_state.db_pool, association.id, product_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(deleted)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_payload_rejects_zero_price_and_missing_category() {
        let payload: CreateProductPayload =
            serde_json::from_str(r#"{"name":"Rice","price":0}"#).unwrap();

        let errors = payload.validate().unwrap_err();
        let fields = errors.field_errors();

        assert!(fields.contains_key("price"));
        assert!(fields.contains_key("categoryId") || fields.contains_key("category_id"));
    }

    #[test]
    fn update_payload_accepts_cleared_image() {
        let payload: UpdateProductPayload =
            serde_json::from_str(r#"{"name":"Rice","price":3.1,"imageUrl":""}"#).unwrap();

        assert!(payload.validate().is_ok());
        assert_eq!(payload.image_url.as_deref(), Some(""));
    }
}
