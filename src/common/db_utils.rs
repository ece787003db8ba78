// src/common/db_utils.rs

use crate::common::error::AppError;
use crate::config::AppState;
use crate::models::tenancy::{Association, Identity};

// ---
// Helper de Tenant: resolve a associação do usuário autenticado
// ---
/// Resolve (ou cria) a associação ligada ao e-mail do usuário.
/// Chamado uma vez por requisição; o `id` retornado é passado
/// explicitamente para catálogo, livro-razão e relatórios.
pub(crate) async fn resolve_tenant(
    app_state: &AppState,
    identity: &Identity,
) -> Result<Association, AppError> {
    app_state
        .tenancy_service
        .resolve(&app_state.db_pool, &identity.email, identity.name.as_deref())
        .await
}
