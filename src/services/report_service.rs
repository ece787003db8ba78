// src/services/report_service.rs

use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;
use crate::{
    common::{error::AppError, validation::field_error},
    db::{report_repo::OverviewLimits, ReportRepository},
    models::{
        dashboard::{DonationStats, InventoryOverview, TransactionStats},
        ledger::{TransactionFilter, TransactionView},
    },
};

// Limiares do dashboard
pub const LOW_STOCK_BELOW: i32 = 5;
pub const VERY_LOW_STOCK_MAX: i32 = 2;
pub const VERY_LOW_STOCK_ROWS: i64 = 6;
pub const TOP_DONATED_ROWS: i64 = 5;
pub const DAILY_MOVEMENT_DAYS: i64 = 14;

#[derive(Clone)]
pub struct ReportService {
    repo: ReportRepository,
}

fn check_filter(filter: &TransactionFilter) -> Result<(), AppError> {
    if filter.limit.is_some_and(|limit| limit < 0) {
        return Err(field_error("limit", "range", "The limit cannot be negative."));
    }
    if filter.offset < 0 {
        return Err(field_error("offset", "range", "The offset cannot be negative."));
    }
    if let (Some(from), Some(to)) = (filter.from, filter.to) {
        if from > to {
            return Err(field_error("from", "range", "The start date must not be after the end date."));
        }
    }
    Ok(())
}

impl ReportService {
    pub fn new(repo: ReportRepository) -> Self {
        Self { repo }
    }

    /// Totais por tipo sobre as movimentações do filtro (limit/offset não se aplicam).
    pub async fn transaction_stats<'e, E>(
        &self,
        executor: E,
        association_id: Uuid,
        filter: &TransactionFilter,
    ) -> Result<TransactionStats, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        check_filter(filter)?;
        let rows = self.repo.get_type_totals(executor, association_id, filter).await?;
        Ok(TransactionStats::from_totals(&rows))
    }

    pub async fn donation_stats<'e, E>(
        &self,
        executor: E,
        association_id: Uuid,
    ) -> Result<DonationStats, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo.get_donation_stats(executor, association_id).await
    }

    /// Histórico filtrado, do mais recente para o mais antigo.
    pub async fn history<'e, E>(
        &self,
        executor: E,
        association_id: Uuid,
        filter: &TransactionFilter,
    ) -> Result<Vec<TransactionView>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        check_filter(filter)?;
        self.repo.get_history(executor, association_id, filter).await
    }

    // Total de linhas do filtro (ignora limit/offset)
    pub async fn count<'e, E>(
        &self,
        executor: E,
        association_id: Uuid,
        filter: &TransactionFilter,
    ) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        check_filter(filter)?;
        self.repo.count_history(executor, association_id, filter).await
    }

    pub async fn inventory_overview<'e, E>(
        &self,
        executor: E,
        association_id: Uuid,
        filter: &TransactionFilter,
    ) -> Result<InventoryOverview, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        check_filter(filter)?;

        let limits = OverviewLimits {
            low_stock_below: LOW_STOCK_BELOW,
            very_low_stock_max: VERY_LOW_STOCK_MAX,
            very_low_stock_rows: VERY_LOW_STOCK_ROWS,
            top_donated_rows: TOP_DONATED_ROWS,
            daily_movement_days: DAILY_MOVEMENT_DAYS,
        };

        self.repo
            .get_inventory_overview(executor, association_id, filter, limits)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn empty_filter_is_valid() {
        assert!(check_filter(&TransactionFilter::default()).is_ok());
    }

    #[test]
    fn inverted_date_range_is_rejected() {
        let filter = TransactionFilter {
            from: NaiveDate::from_ymd_opt(2025, 4, 2),
            to: NaiveDate::from_ymd_opt(2025, 4, 1),
            ..Default::default()
        };
        assert!(matches!(check_filter(&filter), Err(AppError::ValidationError(_))));
    }

    #[test]
    fn same_day_range_is_valid() {
        let day = NaiveDate::from_ymd_opt(2025, 4, 1);
        let filter = TransactionFilter { from: day, to: day, ..Default::default() };
        assert!(check_filter(&filter).is_ok());
    }

    #[test]
    fn negative_paging_is_rejected() {
        let filter = TransactionFilter { offset: -1, ..Default::default() };
        assert!(check_filter(&filter).is_err());
        let filter = TransactionFilter { limit: Some(-5), ..Default::default() };
        assert!(check_filter(&filter).is_err());
    }
}
