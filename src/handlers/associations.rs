// src/handlers/associations.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{
    common::{db_utils::resolve_tenant, error::ApiError},
    config::AppState,
    middleware::i18n::Locale,
    models::tenancy::{Association, Identity},
};

// GET /api/associations/me
#[utoipa::path(
    get,
    path = "/api/associations/me",
    tag = "Associations",
    responses(
        (status = 200, description = "Associação do usuário (criada no primeiro acesso)", body = Association),
        (status = 401, description = "Cabeçalho x-user-email ausente")
    ),
    params(
        ("x-user-email" = String, Header, description = "E-mail do usuário autenticado"),
        ("x-user-name" = Option<String>, Header, description = "Nome exibido (opcional)")
    )
)]
pub async fn get_my_association(
    State(app_state): State<AppState>,
    locale: Locale,
    identity: Identity,
) -> Result<impl IntoResponse, ApiError> {
    let association = resolve_tenant(&app_state, &identity)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(association)))
}
