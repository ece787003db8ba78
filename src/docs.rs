// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Associations ---
        handlers::associations::get_my_association,

        // --- Catalog ---
        handlers::categories::list_categories,
        handlers::categories::create_category,
        handlers::categories::get_category,
        handlers::categories::update_category,
        handlers::categories::delete_category,
        handlers::products::list_products,
        handlers::products::create_product,
        handlers::products::get_product,
        handlers::products::update_product,
        handlers::products::delete_product,

        // --- Stock ---
        handlers::stock::receive_stock,
        handlers::stock::issue_stock,
        handlers::stock::donate,

        // --- Reports ---
        handlers::transactions::list_transactions,
        handlers::reports::get_transaction_stats,
        handlers::reports::get_donation_stats,
        handlers::reports::get_inventory_overview,
    ),
    components(
        schemas(
            // --- Associations ---
            models::tenancy::Association,

            // --- Catalog ---
            models::inventory::Category,
            models::inventory::Product,
            models::inventory::ProductView,
            handlers::categories::CategoryPayload,
            handlers::products::CreateProductPayload,
            handlers::products::UpdateProductPayload,

            // --- Ledger ---
            models::ledger::TransactionType,
            models::ledger::StockTransaction,
            models::ledger::TransactionView,
            handlers::stock::StockMovementPayload,
            handlers::stock::DonationItemPayload,
            handlers::stock::DonationPayload,
            handlers::transactions::TransactionPage,

            // --- Reports ---
            models::dashboard::TransactionStats,
            models::dashboard::DonationStats,
            models::dashboard::InventoryTotals,
            models::dashboard::LowStockEntry,
            models::dashboard::CategoryStockEntry,
            models::dashboard::TopDonatedEntry,
            models::dashboard::DailyMovementEntry,
            models::dashboard::InventoryOverview,
        )
    ),
    tags(
        (name = "Associations", description = "Associação do usuário autenticado"),
        (name = "Catalog", description = "Categorias e Produtos"),
        (name = "Stock", description = "Entradas, Saídas e Doações"),
        (name = "Reports", description = "Histórico e Indicadores")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

// A identidade chega do proxy no cabeçalho x-user-email
impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "user_email",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("x-user-email"))),
        );
    }
}
