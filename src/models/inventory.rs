// src/models/inventory.rs

use serde::{Serialize, Deserialize};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// --- 1. Categorias ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Uuid,
    pub association_id: Uuid,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// --- 2. Produtos ---
// `quantity` nunca é escrito pelo catálogo, apenas pelo livro-razão.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub association_id: Uuid,
    pub category_id: Option<Uuid>,
    pub name: String,
    pub description: String,
    #[schema(value_type = f64)]
    pub price: Decimal,
    pub unit: String,
    pub image_url: String,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Produto + nome da categoria (JOIN só para exibição)
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub product: Product,
    pub category_name: Option<String>,
}

/// Dados de criação de um produto (a quantidade começa sempre em 0).
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub category_id: Uuid,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub unit: String,
    pub image_url: String,
}

/// Campos editáveis de um produto. `None` mantém o valor atual.
#[derive(Debug, Clone, Default)]
pub struct ProductChanges {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub image_url: Option<String>,
}
