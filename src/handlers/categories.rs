// src/handlers/categories.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        db_utils::resolve_tenant,
        error::{ApiError, AppError},
        validation::validate_not_blank,
    },
    config::AppState,
    middleware::i18n::Locale,
    models::{inventory::Category, tenancy::Identity},
};

// ---
// Payload: CategoryPayload (criação e edição)
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPayload {
    #[validate(
        custom(function = "validate_not_blank"),
        length(max = 120, message = "The name must have at most 120 characters.")
    )]
    #[schema(example = "Food")]
    pub name: String,

    #[validate(length(max = 1000, message = "The description must have at most 1000 characters."))]
    #[schema(example = "Dry goods and canned food")]
    pub description: Option<String>,
}

// GET /api/categories
#[utoipa::path(
    get,
    path = "/api/categories",
    tag = "Catalog",
    responses(
        (status = 200, description = "Categorias da associação (por nome)", body = Vec<Category>)
    ),
    params(("x-user-email" = String, Header, description = "E-mail do usuário autenticado"))
)]
pub async fn list_categories(
    State(app_state): State<AppState>,
    locale: Locale,
    identity: Identity,
) -> Result<impl IntoResponse, ApiError> {
    let association = resolve_tenant(&app_state, &identity)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let categories = app_state
        .catalog_service
        .list_categories(&app_state.db_pool, association.id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(categories)))
}

// POST /api/categories
#[utoipa::path(
    post,
    path = "/api/categories",
    tag = "Catalog",
    request_body = CategoryPayload,
    responses(
        (status = 201, description = "Categoria criada", body = Category),
        (status = 400, description = "Nome em branco")
    ),
    params(("x-user-email" = String, Header, description = "E-mail do usuário autenticado"))
)]
pub async fn create_category(
    State(app_state): State<AppState>,
    locale: Locale,
    identity: Identity,
    Json(payload): Json<CategoryPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let association = resolve_tenant(&app_state, &identity)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let category = app_state
        .catalog_service
        .create_category(
            &app_state.db_pool,
            association.id,
            &payload.name,
            payload.description.as_deref(),
        )
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(category)))
}

// GET /api/categories/{id}
#[utoipa::path(
    get,
    path = "/api/categories/{id}",
    tag = "Catalog",
    responses(
        (status = 200, description = "Categoria", body = Category),
        (status = 404, description = "Não encontrada nesta associação")
    ),
    params(
        ("id" = Uuid, Path, description = "ID da categoria"),
        ("x-user-email" = String, Header, description = "E-mail do usuário autenticado")
    )
)]
pub async fn get_category(
    State(app_state): State<AppState>,
    locale: Locale,
    identity: Identity,
    Path(category_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let association = resolve_tenant(&app_state, &identity)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let category = app_state
        .catalog_service
        .get_category(&app_state.db_pool, association.id, category_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(category)))
}

// PUT /api/categories/{id}
#[utoipa::path(
    put,
    path = "/api/categories/{id}",
    tag = "Catalog",
    request_body = CategoryPayload,
    responses(
        (status = 200, description = "Categoria atualizada", body = Category),
        (status = 404, description = "Não encontrada nesta associação")
    ),
    params(
        ("id" = Uuid, Path, description = "ID da categoria"),
        ("x-user-email" = String, Header, description = "E-mail do usuário autenticado")
    )
)]
pub async fn update_category(
    State(app_state): State<AppState>,
    locale: Locale,
    identity: Identity,
    Path(category_id): Path<Uuid>,
    Json(payload): Json<CategoryPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let association = resolve_tenant(&app_state, &identity)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let category = app_state
        .catalog_service
        .update_category(
            &app_state.db_pool,
            association.id,
            category_id,
            &payload.name,
            payload.description.as_deref(),
        )
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(category)))
}

// DELETE /api/categories/{id}
#[utoipa::path(
    delete,
    path = "/api/categories/{id}",
    tag = "Catalog",
    responses(
        (status = 204, description = "Categoria removida (produtos ficam sem categoria)"),
        (status = 404, description = "Não encontrada nesta associação")
    ),
    params(
        ("id" = Uuid, Path, description = "ID da categoria"),
        ("x-user-email" = String, Header, description = "E-mail do usuário autenticado")
    )
)]
pub async fn delete_category(
    State(app_state): State<AppState>,
    locale: Locale,
    identity: Identity,
    Path(category_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let association = resolve_tenant(&app_state, &identity)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    app_state
        .catalog_service
        .delete_category(&app_state.db_pool, association.id, category_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_category_name_fails_validation() {
        let payload = CategoryPayload { name: "   ".into(), description: None };
        let errors = payload.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("name"));
    }
}
