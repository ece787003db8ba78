// src/models/ledger.rs

use serde::{Serialize, Deserialize};
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// Tipo da movimentação. Mapeia o CREATE TYPE transaction_type do banco.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, Hash, ToSchema)]
#[sqlx(type_name = "transaction_type", rename_all = "UPPERCASE")] // Banco
#[serde(rename_all = "UPPERCASE")] // JSON
pub enum TransactionType {
    Add,    // Entrada (Receive)
    Remove, // Saída (Issue)
    Give,   // Doação (Donate)
}

// --- Registro do livro-razão (imutável) ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockTransaction {
    pub id: Uuid,
    pub association_id: Uuid,
    pub product_id: Uuid,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub quantity: i32,
    // Só preenchidos em doações (GIVE)
    pub recipient_name: Option<String>,
    pub recipient_info: Option<String>,
    pub created_at: DateTime<Utc>,
}

// Transação anotada para exibição/exportação
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionView {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub transaction: StockTransaction,
    pub product_name: String,
    pub product_unit: String,
    pub category_name: Option<String>,
}

/// Uma linha de doação: produto e quantidade pedida.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DonationItem {
    pub product_id: Uuid,
    pub quantity: i32,
}

#[derive(Debug, Clone, Default)]
pub struct DonationRequest {
    pub items: Vec<DonationItem>,
    pub recipient_name: Option<String>,
    pub recipient_info: Option<String>,
}

// ---
// Filtro do histórico
// ---
// Datas são dias de calendário em UTC; `to` inclui o dia inteiro.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub kind: Option<TransactionType>,
    pub category_id: Option<Uuid>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub limit: Option<i64>,
    pub offset: i64,
}

impl TransactionFilter {
    /// Converte as datas em limites `[inicio, fim)` de timestamp.
    pub fn time_bounds(&self) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
        let start = self
            .from
            .map(|day| day.and_time(NaiveTime::MIN).and_utc());
        let end = self
            .to
            .map(|day| (day + Duration::days(1)).and_time(NaiveTime::MIN).and_utc());
        (start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_bounds_cover_whole_end_day() {
        let filter = TransactionFilter {
            from: NaiveDate::from_ymd_opt(2025, 3, 1),
            to: NaiveDate::from_ymd_opt(2025, 3, 31),
            ..Default::default()
        };

        let (start, end) = filter.time_bounds();

        assert_eq!(start.unwrap().to_rfc3339(), "2025-03-01T00:00:00+00:00");
        assert_eq!(end.unwrap().to_rfc3339(), "2025-04-01T00:00:00+00:00");
    }

    #[test]
    fn time_bounds_are_open_when_dates_missing() {
        let (start, end) = TransactionFilter::default().time_bounds();
        assert!(start.is_none());
        assert!(end.is_none());
    }

    #[test]
    fn transaction_type_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&TransactionType::Give).unwrap(), "\"GIVE\"");
        let parsed: TransactionType = serde_json::from_str("\"REMOVE\"").unwrap();
        assert_eq!(parsed, TransactionType::Remove);
    }
}
