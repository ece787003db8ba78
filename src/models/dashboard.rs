// src/models/dashboard.rs

use serde::Serialize;
use chrono::NaiveDate;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::ledger::TransactionType;

// Linha crua do GROUP BY type
#[derive(Debug, Clone, FromRow)]
pub struct TypeTotals {
    #[sqlx(rename = "type")]
    pub kind: TransactionType,
    pub transactions: i64,
    pub quantity: i64,
}

// 1. Estatísticas do livro-razão (por tipo)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionStats {
    pub total_transactions: i64,
    pub add_transactions: i64,
    pub remove_transactions: i64,
    pub give_transactions: i64,
    pub total_quantity_added: i64,
    pub total_quantity_removed: i64,
    pub total_quantity_given: i64,
}

impl TransactionStats {
    /// Agrega as linhas do GROUP BY. Sem linhas = tudo zero.
    pub fn from_totals(rows: &[TypeTotals]) -> Self {
        rows.iter().fold(Self::default(), |mut stats, row| {
            stats.total_transactions += row.transactions;
            match row.kind {
                TransactionType::Add => {
                    stats.add_transactions += row.transactions;
                    stats.total_quantity_added += row.quantity;
                }
                TransactionType::Remove => {
                    stats.remove_transactions += row.transactions;
                    stats.total_quantity_removed += row.quantity;
                }
                TransactionType::Give => {
                    stats.give_transactions += row.transactions;
                    stats.total_quantity_given += row.quantity;
                }
            }
            stats
        })
    }
}

// 2. Estatísticas de doações
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DonationStats {
    pub total_give_transactions: i64,
    pub total_quantity_given: i64,
    pub unique_recipients: i64,
}

// 3. Visão geral do estoque (cards do dashboard)
#[derive(Debug, Clone, Default, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InventoryTotals {
    pub total_products: i64,
    pub total_stock: i64,
    pub low_stock_count: i64,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LowStockEntry {
    pub product_id: Uuid,
    pub product_name: String,
    pub unit: String,
    pub quantity: i32,
}

// `category_name = None` => produtos sem categoria
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStockEntry {
    pub category_id: Option<Uuid>,
    pub category_name: Option<String>,
    pub quantity: i64,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TopDonatedEntry {
    pub product_id: Uuid,
    pub product_name: String,
    pub quantity: i64,
}

// Série diária (gráfico de linhas)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DailyMovementEntry {
    pub day: NaiveDate,
    pub added: i64,
    pub removed: i64,
    pub given: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InventoryOverview {
    #[serde(flatten)]
    pub totals: InventoryTotals,
    pub very_low_stock: Vec<LowStockEntry>,
    pub category_distribution: Vec<CategoryStockEntry>,
    pub top_donated: Vec<TopDonatedEntry>,
    pub daily_movements: Vec<DailyMovementEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(kind: TransactionType, transactions: i64, quantity: i64) -> TypeTotals {
        TypeTotals { kind, transactions, quantity }
    }

    #[test]
    fn stats_fold_each_type_into_its_own_counters() {
        let rows = vec![
            row(TransactionType::Add, 1, 10),
            row(TransactionType::Remove, 1, 4),
            row(TransactionType::Give, 1, 3),
        ];

        let stats = TransactionStats::from_totals(&rows);

        assert_eq!(
            stats,
            TransactionStats {
                total_transactions: 3,
                add_transactions: 1,
                remove_transactions: 1,
                give_transactions: 1,
                total_quantity_added: 10,
                total_quantity_removed: 4,
                total_quantity_given: 3,
            }
        );
    }

    #[test]
    fn stats_without_rows_are_zero() {
        assert_eq!(TransactionStats::from_totals(&[]), TransactionStats::default());
    }

    #[test]
    fn stats_serialize_camel_case() {
        let json = serde_json::to_value(TransactionStats::default()).unwrap();
        assert!(json.get("totalQuantityGiven").is_some());
        assert!(json.get("removeTransactions").is_some());
    }
}
