// src/middleware/identity.rs

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
    models::tenancy::Identity,
};

// Cabeçalhos preenchidos pelo proxy de autenticação
pub const USER_EMAIL_HEADER: &str = "x-user-email";
pub const USER_NAME_HEADER: &str = "x-user-name";

fn header_text(parts: &Parts, name: &str) -> Option<String> {
    parts
        .headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

// O provedor de identidade já autenticou o usuário; aqui só lemos o resultado.
impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Some(email) = header_text(parts, USER_EMAIL_HEADER) else {
            let app_state = AppState::from_ref(state);
            let locale = Locale::from_headers(&parts.headers);
            tracing::warn!("🔒 Requisição sem o cabeçalho {}", USER_EMAIL_HEADER);
            return Err(AppError::MissingIdentity.to_api_error(&locale, &app_state.i18n_store));
        };

        Ok(Identity {
            email,
            name: header_text(parts, USER_NAME_HEADER),
        })
    }
}
