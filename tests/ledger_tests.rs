// tests/ledger_tests.rs
//
// Cenários contra um Postgres real. Cada teste recebe um banco novo com as migrações.
// Rodar com: DATABASE_URL=postgres://... cargo test -- --ignored

use association_stock::{
    common::error::AppError,
    config::AppState,
    models::{
        inventory::{NewProduct, Product, ProductChanges},
        ledger::{DonationItem, DonationRequest, TransactionFilter, TransactionType},
        tenancy::Association,
    },
};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

struct Fixture {
    state: AppState,
    pool: PgPool,
    association: Association,
}

async fn fixture(pool: PgPool, email: &str) -> Fixture {
    let state = AppState::from_pool(pool.clone());
    let association = state
        .tenancy_service
        .resolve(&pool, email, None)
        .await
        .unwrap();
    Fixture { state, pool, association }
}

impl Fixture {
    fn id(&self) -> Uuid {
        self.association.id
    }

    async fn product(&self, category: &str, name: &str) -> Product {
        let category = self
            .state
            .catalog_service
            .create_category(&self.pool, self.id(), category, None)
            .await
            .unwrap();

        self.state
            .catalog_service
            .create_product(
                &self.pool,
                self.id(),
                NewProduct {
                    category_id: category.id,
                    name: name.into(),
                    description: String::new(),
                    price: Decimal::from(2),
                    unit: "kg".into(),
                    image_url: String::new(),
                },
            )
            .await
            .unwrap()
    }

    async fn quantity(&self, product_id: Uuid) -> i32 {
        self.state
            .catalog_service
            .get_product(&self.pool, self.id(), product_id)
            .await
            .unwrap()
            .product
            .quantity
    }

    async fn transactions(&self) -> i64 {
        self.state
            .report_service
            .count(&self.pool, self.id(), &TransactionFilter::default())
            .await
            .unwrap()
    }

    // Σ ADD − Σ REMOVE − Σ GIVE do produto
    async fn ledger_balance(&self, product_id: Uuid) -> i64 {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COALESCE(SUM(CASE WHEN type = 'ADD' THEN quantity ELSE -quantity END), 0)::BIGINT
            FROM stock_transactions WHERE product_id = $1
            "#,
        )
        .bind(product_id)
        .fetch_one(&self.pool)
        .await
        .unwrap()
    }
}

fn donation(items: &[(Uuid, i32)], recipient: Option<&str>) -> DonationRequest {
    DonationRequest {
        items: items
            .iter()
            .map(|(product_id, quantity)| DonationItem { product_id: *product_id, quantity: *quantity })
            .collect(),
        recipient_name: recipient.map(str::to_string),
        recipient_info: None,
    }
}

// --- Cenários A a E ---

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL pointing at a Postgres server"]
async fn receive_then_issue_updates_quantity_and_ledger(pool: PgPool) {
    let fx = fixture(pool, "a@x.org").await;
    let rice = fx.product("Food", "Rice").await;
    assert_eq!(rice.quantity, 0);

    let after_receive = fx.state.ledger_service.receive(&fx.pool, fx.id(), rice.id, 10).await.unwrap();
    assert_eq!(after_receive.quantity, 10);

    let after_issue = fx.state.ledger_service.issue(&fx.pool, fx.id(), rice.id, 4).await.unwrap();
    assert_eq!(after_issue.quantity, 6);

    let history = fx
        .state
        .report_service
        .history(&fx.pool, fx.id(), &TransactionFilter::default())
        .await
        .unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].transaction.kind, TransactionType::Remove);
    assert_eq!(history[0].transaction.quantity, 4);
    assert_eq!(history[1].transaction.kind, TransactionType::Add);
    assert_eq!(history[1].transaction.quantity, 10);
    assert_eq!(history[1].product_name, "Rice");
    assert_eq!(history[1].category_name.as_deref(), Some("Food"));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL pointing at a Postgres server"]
async fn issue_beyond_stock_changes_nothing(pool: PgPool) {
    let fx = fixture(pool, "a@x.org").await;
    let rice = fx.product("Food", "Rice").await;
    fx.state.ledger_service.receive(&fx.pool, fx.id(), rice.id, 6).await.unwrap();

    let err = fx.state.ledger_service.issue(&fx.pool, fx.id(), rice.id, 10).await.unwrap_err();

    match err {
        AppError::InsufficientStock { available, requested, ref product_name, .. } => {
            assert_eq!(available, 6);
            assert_eq!(requested, 10);
            assert_eq!(product_name, "Rice");
        }
        other => panic!("erro inesperado: {other:?}"),
    }
    assert_eq!(fx.quantity(rice.id).await, 6);
    assert_eq!(fx.transactions().await, 1);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL pointing at a Postgres server"]
async fn receive_past_integer_limit_is_a_validation_error(pool: PgPool) {
    let fx = fixture(pool, "a@x.org").await;
    let rice = fx.product("Food", "Rice").await;
    sqlx::query("UPDATE products SET quantity = $2 WHERE id = $1")
        .bind(rice.id)
        .bind(i32::MAX)
        .execute(&fx.pool)
        .await
        .unwrap();

    let result = fx.state.ledger_service.receive(&fx.pool, fx.id(), rice.id, 1).await;

    assert!(matches!(result, Err(AppError::ValidationError(_))), "{result:?}");
    assert_eq!(fx.quantity(rice.id).await, i32::MAX);
    assert_eq!(fx.transactions().await, 0);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL pointing at a Postgres server"]
async fn donation_records_give_with_recipient(pool: PgPool) {
    let fx = fixture(pool, "a@x.org").await;
    let rice = fx.product("Food", "Rice").await;
    fx.state.ledger_service.receive(&fx.pool, fx.id(), rice.id, 6).await.unwrap();

    let created = fx
        .state
        .ledger_service
        .donate(&fx.pool, fx.id(), donation(&[(rice.id, 3)], Some(" Amina ")))
        .await
        .unwrap();

    assert_eq!(created.len(), 1);
    assert_eq!(created[0].transaction.kind, TransactionType::Give);
    assert_eq!(created[0].transaction.quantity, 3);
    assert_eq!(created[0].transaction.recipient_name.as_deref(), Some("Amina"));
    assert_eq!(created[0].transaction.recipient_info.as_deref(), Some(""));
    assert_eq!(fx.quantity(rice.id).await, 3);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL pointing at a Postgres server"]
async fn donation_with_unknown_product_mutates_nothing(pool: PgPool) {
    let fx = fixture(pool, "a@x.org").await;
    let rice = fx.product("Food", "Rice").await;
    fx.state.ledger_service.receive(&fx.pool, fx.id(), rice.id, 6).await.unwrap();
    let ghost = Uuid::new_v4();

    let err = fx
        .state
        .ledger_service
        .donate(&fx.pool, fx.id(), donation(&[(rice.id, 3), (ghost, 1)], None))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::UnknownProducts(ref ids) if ids == &vec![ghost]));
    assert_eq!(fx.quantity(rice.id).await, 6);
    assert_eq!(fx.transactions().await, 1);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL pointing at a Postgres server"]
async fn stats_after_receive_issue_and_donation(pool: PgPool) {
    let fx = fixture(pool, "a@x.org").await;
    let rice = fx.product("Food", "Rice").await;
    let ledger = &fx.state.ledger_service;
    ledger.receive(&fx.pool, fx.id(), rice.id, 10).await.unwrap();
    ledger.issue(&fx.pool, fx.id(), rice.id, 4).await.unwrap();
    ledger
        .donate(&fx.pool, fx.id(), donation(&[(rice.id, 3)], Some("Amina")))
        .await
        .unwrap();

    let stats = fx
        .state
        .report_service
        .transaction_stats(&fx.pool, fx.id(), &TransactionFilter::default())
        .await
        .unwrap();
    assert_eq!(stats.total_transactions, 3);
    assert_eq!(stats.add_transactions, 1);
    assert_eq!(stats.total_quantity_added, 10);
    assert_eq!(stats.remove_transactions, 1);
    assert_eq!(stats.total_quantity_removed, 4);
    assert_eq!(stats.give_transactions, 1);
    assert_eq!(stats.total_quantity_given, 3);

    let donations = fx.state.report_service.donation_stats(&fx.pool, fx.id()).await.unwrap();
    assert_eq!(donations.total_give_transactions, 1);
    assert_eq!(donations.total_quantity_given, 3);
    assert_eq!(donations.unique_recipients, 1);

    assert_eq!(fx.ledger_balance(rice.id).await, i64::from(fx.quantity(rice.id).await));
}

// --- Atomicidade da doação ---

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL pointing at a Postgres server"]
async fn donation_is_all_or_nothing(pool: PgPool) {
    let fx = fixture(pool, "a@x.org").await;
    let rice = fx.product("Food", "Rice").await;
    let oil = fx.product("Oil & Fats", "Oil").await;
    let ledger = &fx.state.ledger_service;
    ledger.receive(&fx.pool, fx.id(), rice.id, 6).await.unwrap();
    ledger.receive(&fx.pool, fx.id(), oil.id, 1).await.unwrap();

    let err = ledger
        .donate(&fx.pool, fx.id(), donation(&[(rice.id, 2), (oil.id, 5)], Some("Amina")))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::InsufficientStock { available: 1, requested: 5, .. }));
    assert_eq!(fx.quantity(rice.id).await, 6);
    assert_eq!(fx.quantity(oil.id).await, 1);
    assert_eq!(fx.transactions().await, 2);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL pointing at a Postgres server"]
async fn duplicate_donation_lines_share_the_stock(pool: PgPool) {
    let fx = fixture(pool, "a@x.org").await;
    let rice = fx.product("Food", "Rice").await;
    let ledger = &fx.state.ledger_service;
    ledger.receive(&fx.pool, fx.id(), rice.id, 6).await.unwrap();

    let err = ledger
        .donate(&fx.pool, fx.id(), donation(&[(rice.id, 4), (rice.id, 4)], None))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InsufficientStock { requested: 8, .. }));

    let created = ledger
        .donate(&fx.pool, fx.id(), donation(&[(rice.id, 2), (rice.id, 4)], None))
        .await
        .unwrap();
    assert_eq!(created.len(), 2);
    assert_eq!(created[0].transaction.quantity, 2);
    assert_eq!(created[1].transaction.quantity, 4);
    assert_eq!(fx.quantity(rice.id).await, 0);
}

// --- Concorrência ---

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL pointing at a Postgres server"]
async fn concurrent_issues_never_overdraw(pool: PgPool) {
    let fx = fixture(pool, "a@x.org").await;
    let rice = fx.product("Food", "Rice").await;
    fx.state.ledger_service.receive(&fx.pool, fx.id(), rice.id, 5).await.unwrap();

    let product_id = rice.id;
    let mut handles = Vec::new();
    for _ in 0..10 {
        let state = fx.state.clone();
        let pool = fx.pool.clone();
        let association_id = fx.id();
        handles.push(tokio::spawn(async move {
            state.ledger_service.issue(&pool, association_id, product_id, 1).await
        }));
    }

    let mut succeeded = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => succeeded += 1,
            Err(AppError::InsufficientStock { .. }) => {}
            Err(other) => panic!("erro inesperado: {other:?}"),
        }
    }

    assert_eq!(succeeded, 5);
    assert_eq!(fx.quantity(rice.id).await, 0);
    assert_eq!(fx.ledger_balance(rice.id).await, 0);
}

// --- Tenants ---

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL pointing at a Postgres server"]
async fn tenant_resolution_is_idempotent(pool: PgPool) {
    let tenancy = AppState::from_pool(pool.clone()).tenancy_service;

    let first = tenancy.resolve(&pool, "Food.Bank@X.org", Some("Food Bank")).await.unwrap();
    let second = tenancy.resolve(&pool, " food.bank@x.org ", Some("Other name")).await.unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(second.name, "Food Bank");
    assert_eq!(second.email, "food.bank@x.org");

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM associations")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);

    let fresh = tenancy.resolve(&pool, "new@x.org", None).await.unwrap();
    assert_eq!(fresh.name, "new");
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL pointing at a Postgres server"]
async fn find_by_email_only_reads(pool: PgPool) {
    let tenancy = AppState::from_pool(pool.clone()).tenancy_service;
    let created = tenancy.resolve(&pool, "a@x.org", Some("Food Bank")).await.unwrap();

    let found = tenancy.find_by_email(&pool, "  A@X.org").await.unwrap();
    assert_eq!(found.map(|a| a.id), Some(created.id));

    assert!(tenancy.find_by_email(&pool, "nobody@x.org").await.unwrap().is_none());

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM associations")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL pointing at a Postgres server"]
async fn concurrent_first_access_creates_one_association(pool: PgPool) {
    let tenancy = AppState::from_pool(pool.clone()).tenancy_service;

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let tenancy = tenancy.clone();
            let pool = pool.clone();
            tokio::spawn(async move { tenancy.resolve(&pool, "race@x.org", None).await })
        })
        .collect();

    let mut ids = Vec::new();
    for handle in handles {
        ids.push(handle.await.unwrap().unwrap().id);
    }

    assert!(ids.iter().all(|id| *id == ids[0]), "{ids:?}");
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM associations")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL pointing at a Postgres server"]
async fn tenants_cannot_see_each_other(pool: PgPool) {
    let a = fixture(pool.clone(), "a@x.org").await;
    let b = fixture(pool, "b@x.org").await;
    let rice = a.product("Food", "Rice").await;
    a.state.ledger_service.receive(&a.pool, a.id(), rice.id, 5).await.unwrap();

    let catalog = &b.state.catalog_service;
    assert!(catalog.list_products(&b.pool, b.id()).await.unwrap().is_empty());
    assert!(catalog.list_categories(&b.pool, b.id()).await.unwrap().is_empty());
    assert!(matches!(
        catalog.get_product(&b.pool, b.id(), rice.id).await,
        Err(AppError::ProductNotFound)
    ));
    assert!(matches!(
        b.state.ledger_service.issue(&b.pool, b.id(), rice.id, 1).await,
        Err(AppError::ProductNotFound)
    ));
    assert!(matches!(
        b.state.ledger_service.donate(&b.pool, b.id(), donation(&[(rice.id, 1)], None)).await,
        Err(AppError::UnknownProducts(_))
    ));
    assert_eq!(b.transactions().await, 0);
    assert_eq!(a.quantity(rice.id).await, 5);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL pointing at a Postgres server"]
async fn tenants_cannot_change_each_other(pool: PgPool) {
    let a = fixture(pool.clone(), "a@x.org").await;
    let b = fixture(pool, "b@x.org").await;
    let rice = a.product("Food", "Rice").await;
    let food = rice.category_id.unwrap();
    let soap = b.product("Hygiene", "Soap").await;

    assert!(matches!(
        a.state.ledger_service.receive(&a.pool, a.id(), soap.id, 3).await,
        Err(AppError::ProductNotFound)
    ));
    assert_eq!(b.quantity(soap.id).await, 0);

    let catalog = &b.state.catalog_service;
    let changes = ProductChanges {
        name: "Stolen rice".into(),
        description: None,
        price: Decimal::ONE,
        image_url: None,
    };
    assert!(matches!(
        catalog.update_product(&b.pool, b.id(), rice.id, changes).await,
        Err(AppError::ProductNotFound)
    ));
    assert!(matches!(
        catalog.delete_product(&b.pool, b.id(), rice.id).await,
        Err(AppError::ProductNotFound)
    ));
    assert!(matches!(
        catalog.update_category(&b.pool, b.id(), food, "Mine", None).await,
        Err(AppError::CategoryNotFound)
    ));
    assert!(matches!(
        catalog.delete_category(&b.pool, b.id(), food).await,
        Err(AppError::CategoryNotFound)
    ));

    let foreign_category = NewProduct {
        category_id: food,
        name: "Beans".into(),
        description: String::new(),
        price: Decimal::ONE,
        unit: "kg".into(),
        image_url: String::new(),
    };
    assert!(matches!(
        catalog.create_product(&b.pool, b.id(), foreign_category).await,
        Err(AppError::CategoryNotFound)
    ));
    assert_eq!(catalog.list_products(&b.pool, b.id()).await.unwrap().len(), 1);

    let untouched = a.state.catalog_service.get_product(&a.pool, a.id(), rice.id).await.unwrap();
    assert_eq!(untouched.product.name, "Rice");
    assert_eq!(untouched.category_name.as_deref(), Some("Food"));
    assert_eq!(a.transactions().await, 0);
    assert_eq!(b.transactions().await, 0);
}

// --- Catálogo ---

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL pointing at a Postgres server"]
async fn product_with_history_cannot_be_deleted(pool: PgPool) {
    let fx = fixture(pool, "a@x.org").await;
    let rice = fx.product("Food", "Rice").await;
    let beans = fx.product("Legumes", "Beans").await;
    fx.state.ledger_service.receive(&fx.pool, fx.id(), rice.id, 1).await.unwrap();

    let catalog = &fx.state.catalog_service;
    assert!(matches!(
        catalog.delete_product(&fx.pool, fx.id(), rice.id).await,
        Err(AppError::ProductHasHistory)
    ));

    let deleted = catalog.delete_product(&fx.pool, fx.id(), beans.id).await.unwrap();
    assert_eq!(deleted.id, beans.id);
    assert!(matches!(
        catalog.delete_product(&fx.pool, fx.id(), beans.id).await,
        Err(AppError::ProductNotFound)
    ));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL pointing at a Postgres server"]
async fn deleting_category_leaves_products_uncategorised(pool: PgPool) {
    let fx = fixture(pool, "a@x.org").await;
    let rice = fx.product("Food", "Rice").await;
    let catalog = &fx.state.catalog_service;
    let category_id = rice.category_id.unwrap();

    catalog.delete_category(&fx.pool, fx.id(), category_id).await.unwrap();

    let view = catalog.get_product(&fx.pool, fx.id(), rice.id).await.unwrap();
    assert!(view.product.category_id.is_none());
    assert!(view.category_name.is_none());
    assert!(matches!(
        catalog.get_category(&fx.pool, fx.id(), category_id).await,
        Err(AppError::CategoryNotFound)
    ));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL pointing at a Postgres server"]
async fn update_product_keeps_quantity(pool: PgPool) {
    let fx = fixture(pool, "a@x.org").await;
    let rice = fx.product("Food", "Rice").await;
    fx.state.ledger_service.receive(&fx.pool, fx.id(), rice.id, 7).await.unwrap();

    let updated = fx
        .state
        .catalog_service
        .update_product(
            &fx.pool,
            fx.id(),
            rice.id,
            ProductChanges {
                name: "Brown rice".into(),
                description: None,
                price: Decimal::new(350, 2),
                image_url: Some("images/rice.png".into()),
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.name, "Brown rice");
    assert_eq!(updated.quantity, 7);
    assert_eq!(updated.image_url, "images/rice.png");
    assert_eq!(updated.category_id, rice.category_id);
}

// --- Relatórios ---

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL pointing at a Postgres server"]
async fn history_filters_by_type_and_pages(pool: PgPool) {
    let fx = fixture(pool, "a@x.org").await;
    let rice = fx.product("Food", "Rice").await;
    let ledger = &fx.state.ledger_service;
    ledger.receive(&fx.pool, fx.id(), rice.id, 10).await.unwrap();
    for _ in 0..3 {
        ledger.donate(&fx.pool, fx.id(), donation(&[(rice.id, 1)], Some("Amina"))).await.unwrap();
    }

    let reports = &fx.state.report_service;
    let gives = TransactionFilter { kind: Some(TransactionType::Give), limit: Some(2), ..Default::default() };

    let page = reports.history(&fx.pool, fx.id(), &gives).await.unwrap();
    assert_eq!(page.len(), 2);
    assert!(page.iter().all(|t| t.transaction.kind == TransactionType::Give));
    assert_eq!(reports.count(&fx.pool, fx.id(), &gives).await.unwrap(), 3);

    let today = chrono::Utc::now().date_naive();
    let today_only = TransactionFilter { from: Some(today), to: Some(today), ..Default::default() };
    assert_eq!(reports.count(&fx.pool, fx.id(), &today_only).await.unwrap(), 4);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL pointing at a Postgres server"]
async fn overview_reports_low_stock_and_top_donated(pool: PgPool) {
    let fx = fixture(pool, "a@x.org").await;
    let rice = fx.product("Food", "Rice").await;
    let soap = fx.product("Hygiene", "Soap").await;
    let ledger = &fx.state.ledger_service;
    ledger.receive(&fx.pool, fx.id(), rice.id, 20).await.unwrap();
    ledger.receive(&fx.pool, fx.id(), soap.id, 3).await.unwrap();
    ledger.donate(&fx.pool, fx.id(), donation(&[(soap.id, 1), (rice.id, 5)], Some("Amina"))).await.unwrap();

    let overview = fx
        .state
        .report_service
        .inventory_overview(&fx.pool, fx.id(), &TransactionFilter::default())
        .await
        .unwrap();

    assert_eq!(overview.totals.total_products, 2);
    assert_eq!(overview.totals.total_stock, 17);
    assert_eq!(overview.totals.low_stock_count, 1);
    assert_eq!(overview.very_low_stock.len(), 1);
    assert_eq!(overview.very_low_stock[0].product_name, "Soap");
    assert_eq!(overview.top_donated[0].product_name, "Rice");
    assert_eq!(overview.top_donated[0].quantity, 5);
    assert_eq!(overview.category_distribution.len(), 2);
    assert_eq!(overview.daily_movements.len(), 1);
    assert_eq!(overview.daily_movements[0].added, 23);
    assert_eq!(overview.daily_movements[0].given, 6);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL pointing at a Postgres server"]
async fn empty_association_reports_zeros(pool: PgPool) {
    let fx = fixture(pool, "a@x.org").await;
    let reports = &fx.state.report_service;
    let everything = TransactionFilter::default();

    let stats = reports.transaction_stats(&fx.pool, fx.id(), &everything).await.unwrap();
    assert_eq!(stats.total_transactions, 0);
    assert_eq!(stats.total_quantity_given, 0);

    let donations = reports.donation_stats(&fx.pool, fx.id()).await.unwrap();
    assert_eq!(donations.total_give_transactions, 0);
    assert_eq!(donations.total_quantity_given, 0);
    assert_eq!(donations.unique_recipients, 0);

    let overview = reports.inventory_overview(&fx.pool, fx.id(), &everything).await.unwrap();
    assert_eq!(overview.totals.total_products, 0);
    assert_eq!(overview.totals.total_stock, 0);
    assert_eq!(overview.totals.low_stock_count, 0);
    assert!(overview.very_low_stock.is_empty());
    assert!(overview.category_distribution.is_empty());
    assert!(overview.top_donated.is_empty());
    assert!(overview.daily_movements.is_empty());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL pointing at a Postgres server"]
async fn stats_and_overview_follow_the_filter(pool: PgPool) {
    let fx = fixture(pool, "a@x.org").await;
    let rice = fx.product("Food", "Rice").await;
    let soap = fx.product("Hygiene", "Soap").await;
    let ledger = &fx.state.ledger_service;
    ledger.receive(&fx.pool, fx.id(), rice.id, 20).await.unwrap();
    ledger.receive(&fx.pool, fx.id(), soap.id, 10).await.unwrap();
    ledger.donate(&fx.pool, fx.id(), donation(&[(soap.id, 4), (rice.id, 2)], None)).await.unwrap();

    let reports = &fx.state.report_service;
    let hygiene = TransactionFilter { category_id: soap.category_id, ..Default::default() };

    let stats = reports.transaction_stats(&fx.pool, fx.id(), &hygiene).await.unwrap();
    assert_eq!(stats.total_transactions, 2);
    assert_eq!(stats.total_quantity_added, 10);
    assert_eq!(stats.total_quantity_given, 4);

    let overview = reports.inventory_overview(&fx.pool, fx.id(), &hygiene).await.unwrap();
    assert_eq!(overview.totals.total_products, 2);
    assert_eq!(overview.top_donated.len(), 1);
    assert_eq!(overview.top_donated[0].product_name, "Soap");
    assert_eq!(overview.daily_movements[0].added, 10);
    assert_eq!(overview.daily_movements[0].given, 4);

    let tomorrow = chrono::Utc::now().date_naive() + chrono::Duration::days(1);
    let future = TransactionFilter { from: Some(tomorrow), ..Default::default() };
    let stats = reports.transaction_stats(&fx.pool, fx.id(), &future).await.unwrap();
    assert_eq!(stats.total_transactions, 0);

    let inverted = TransactionFilter {
        from: Some(tomorrow),
        to: Some(tomorrow - chrono::Duration::days(2)),
        ..Default::default()
    };
    assert!(matches!(
        reports.inventory_overview(&fx.pool, fx.id(), &inverted).await,
        Err(AppError::ValidationError(_))
    ));
}
