// src/db/report_repo.rs

use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;
use crate::{
    common::error::AppError,
    db::ledger_repo::TRANSACTION_VIEW_SELECT,
    models::{
        dashboard::{
            CategoryStockEntry, DailyMovementEntry, DonationStats, InventoryOverview,
            InventoryTotals, LowStockEntry, TopDonatedEntry, TypeTotals,
        },
        ledger::{TransactionFilter, TransactionView},
    },
};

// Filtros opcionais do histórico: parâmetro NULL = filtro desligado.
const HISTORY_FILTERS: &str = r#"
    WHERE t.association_id = $1
      AND ($2::transaction_type IS NULL OR t.type = $2)
      AND ($3::uuid IS NULL OR p.category_id = $3)
      AND ($4::timestamptz IS NULL OR t.created_at >= $4)
      AND ($5::timestamptz IS NULL OR t.created_at < $5)
"#;

/// Limites usados pela visão geral do estoque.
#[derive(Debug, Clone, Copy)]
pub struct OverviewLimits {
    pub low_stock_below: i32,
    pub very_low_stock_max: i32,
    pub very_low_stock_rows: i64,
    pub top_donated_rows: i64,
    pub daily_movement_days: i64,
}

#[derive(Clone, Default)]
pub struct ReportRepository;

impl ReportRepository {
    pub fn new() -> Self {
        Self
    }

    // 1. Totais por tipo (GROUP BY type), com os mesmos filtros do histórico
    pub async fn get_type_totals<'e, E>(
        &self,
        executor: E,
        association_id: Uuid,
        filter: &TransactionFilter,
    ) -> Result<Vec<TypeTotals>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let (start, end) = filter.time_bounds();
        let sql = format!(
            "SELECT t.type, \
                    COUNT(*)::BIGINT AS transactions, \
                    COALESCE(SUM(t.quantity), 0)::BIGINT AS quantity \
             FROM stock_transactions t \
             JOIN products p ON p.id = t.product_id {HISTORY_FILTERS} \
             GROUP BY t.type"
        );

        let rows = sqlx::query_as::<_, TypeTotals>(&sql)
            .bind(association_id)
            .bind(filter.kind)
            .bind(filter.category_id)
            .bind(start)
            .bind(end)
            .fetch_all(executor)
            .await?;
        Ok(rows)
    }

    // 2. Doações (destinatários em branco não contam)
    pub async fn get_donation_stats<'e, E>(
        &self,
        executor: E,
        association_id: Uuid,
    ) -> Result<DonationStats, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let stats = sqlx::query_as::<_, DonationStats>(
            r#"
            SELECT COUNT(*)::BIGINT AS total_give_transactions,
                   COALESCE(SUM(quantity), 0)::BIGINT AS total_quantity_given,
                   COUNT(DISTINCT NULLIF(BTRIM(recipient_name), ''))::BIGINT AS unique_recipients
            FROM stock_transactions
            WHERE association_id = $1 AND type = 'GIVE'
            "#,
        )
            .bind(association_id)
            .fetch_one(executor)
            .await?;
        Ok(stats)
    }

    // 3. Histórico (mais recente primeiro)
    pub async fn get_history<'e, E>(
        &self,
        executor: E,
        association_id: Uuid,
        filter: &TransactionFilter,
    ) -> Result<Vec<TransactionView>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let (start, end) = filter.time_bounds();
        let sql = format!(
            "{TRANSACTION_VIEW_SELECT} {HISTORY_FILTERS} \
             ORDER BY t.created_at DESC, t.id DESC LIMIT $6 OFFSET $7"
        );

        let rows = sqlx::query_as::<_, TransactionView>(&sql)
            .bind(association_id)
            .bind(filter.kind)
            .bind(filter.category_id)
            .bind(start)
            .bind(end)
            .bind(filter.limit)
            .bind(filter.offset)
            .fetch_all(executor)
            .await?;
        Ok(rows)
    }

    pub async fn count_history<'e, E>(
        &self,
        executor: E,
        association_id: Uuid,
        filter: &TransactionFilter,
    ) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let (start, end) = filter.time_bounds();
        let sql = format!(
            "SELECT COUNT(*) FROM stock_transactions t \
             JOIN products p ON p.id = t.product_id {HISTORY_FILTERS}"
        );

        let total = sqlx::query_scalar::<_, i64>(&sql)
            .bind(association_id)
            .bind(filter.kind)
            .bind(filter.category_id)
            .bind(start)
            .bind(end)
            .fetch_one(executor)
            .await?;
        Ok(total)
    }

    // 4. Visão geral do estoque (cards + gráficos do dashboard)
    // Cards de estoque refletem o saldo atual; o filtro vale só para os movimentos (D e E).
    pub async fn get_inventory_overview<'e, E>(
        &self,
        executor: E,
        association_id: Uuid,
        filter: &TransactionFilter,
        limits: OverviewLimits,
    ) -> Result<InventoryOverview, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        // Todas as consultas enxergam o mesmo snapshot
        let mut tx = executor.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ READ ONLY")
            .execute(&mut *tx)
            .await?;

        // A. Totais
        let totals = sqlx::query_as::<_, InventoryTotals>(
            r#"
            SELECT COUNT(*)::BIGINT AS total_products,
                   COALESCE(SUM(quantity), 0)::BIGINT AS total_stock,
                   COUNT(*) FILTER (WHERE quantity > 0 AND quantity < $2)::BIGINT AS low_stock_count
            FROM products
            WHERE association_id = $1
            "#,
        )
            .bind(association_id)
            .bind(limits.low_stock_below)
            .fetch_one(&mut *tx)
            .await?;

        // B. Estoque muito baixo (menor primeiro)
        let very_low_stock = sqlx::query_as::<_, LowStockEntry>(
            r#"
            SELECT id AS product_id, name AS product_name, unit, quantity
            FROM products
            WHERE association_id = $1 AND quantity > 0 AND quantity <= $2
            ORDER BY quantity ASC, name ASC
            LIMIT $3
            "#,
        )
            .bind(association_id)
            .bind(limits.very_low_stock_max)
            .bind(limits.very_low_stock_rows)
            .fetch_all(&mut *tx)
            .await?;

        // C. Estoque por categoria (NULL = sem categoria)
        let category_distribution = sqlx::query_as::<_, CategoryStockEntry>(
            r#"
            SELECT c.id AS category_id,
                   c.name AS category_name,
                   COALESCE(SUM(p.quantity), 0)::BIGINT AS quantity
            FROM products p
            LEFT JOIN categories c ON c.id = p.category_id
            WHERE p.association_id = $1
            GROUP BY c.id, c.name
            ORDER BY SUM(p.quantity) DESC, c.name ASC NULLS LAST
            "#,
        )
            .bind(association_id)
            .fetch_all(&mut *tx)
            .await?;

        let (start, end) = filter.time_bounds();

        // D. Mais doados
        let top_donated_sql = format!(
            "SELECT p.id AS product_id, \
                    p.name AS product_name, \
                    SUM(t.quantity)::BIGINT AS quantity \
             FROM stock_transactions t \
             JOIN products p ON p.id = t.product_id {HISTORY_FILTERS} \
               AND t.type = 'GIVE' \
             GROUP BY p.id, p.name \
             ORDER BY SUM(t.quantity) DESC, p.name ASC \
             LIMIT $6"
        );
        let top_donated = sqlx::query_as::<_, TopDonatedEntry>(&top_donated_sql)
            .bind(association_id)
            .bind(filter.kind)
            .bind(filter.category_id)
            .bind(start)
            .bind(end)
            .bind(limits.top_donated_rows)
            .fetch_all(&mut *tx)
            .await?;

        // E. Movimentos diários (últimos N dias com atividade, em ordem crescente)
        let daily_sql = format!(
            "SELECT day, added, removed, given \
             FROM ( \
                 SELECT (t.created_at AT TIME ZONE 'UTC')::date AS day, \
                        COALESCE(SUM(t.quantity) FILTER (WHERE t.type = 'ADD'), 0)::BIGINT AS added, \
                        COALESCE(SUM(t.quantity) FILTER (WHERE t.type = 'REMOVE'), 0)::BIGINT AS removed, \
                        COALESCE(SUM(t.quantity) FILTER (WHERE t.type = 'GIVE'), 0)::BIGINT AS given \
                 FROM stock_transactions t \
                 JOIN products p ON p.id = t.product_id {HISTORY_FILTERS} \
                 GROUP BY 1 \
                 ORDER BY 1 DESC \
                 LIMIT $6 \
             ) recent \
             ORDER BY day ASC"
        );
        let daily_movements = sqlx::query_as::<_, DailyMovementEntry>(&daily_sql)
            .bind(association_id)
            .bind(filter.kind)
            .bind(filter.category_id)
            .bind(start)
            .bind(end)
            .bind(limits.daily_movement_days)
            .fetch_all(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(InventoryOverview {
            totals,
            very_low_stock,
            category_distribution,
            top_donated,
            daily_movements,
        })
    }
}
