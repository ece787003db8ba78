// src/models/tenancy.rs

use serde::{Serialize, Deserialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// ---
// Association (o "Tenant")
// ---
// Toda categoria, produto e transação pertence a uma associação.
// A chave natural é o e-mail vindo do provedor de identidade.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Association {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Identidade entregue pelo provedor externo (já autenticada).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub email: String,
    pub name: Option<String>,
}
