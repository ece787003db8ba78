// src/routes.rs

use axum::{
    routing::{get, post},
    Router,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{config::AppState, docs::ApiDoc, handlers};

pub fn create_router(app_state: AppState) -> Router {
    let catalog_routes = Router::new()
        .route("/categories"
               ,get(handlers::categories::list_categories)
               .post(handlers::categories::create_category)
        )
        .route("/categories/{id}"
               ,get(handlers::categories::get_category)
               .put(handlers::categories::update_category)
               .delete(handlers::categories::delete_category)
        )
        .route("/products"
               ,get(handlers::products::list_products)
               .post(handlers::products::create_product)
        )
        .route("/products/{id}"
               ,get(handlers::products::get_product)
               .put(handlers::products::update_product)
               .delete(handlers::products::delete_product)
        );

    let stock_routes = Router::new()
        .route("/receive", post(handlers::stock::receive_stock))
        .route("/issue", post(handlers::stock::issue_stock))
        .route("/donations", post(handlers::stock::donate));

    let report_routes = Router::new()
        .route("/transactions", get(handlers::reports::get_transaction_stats))
        .route("/donations", get(handlers::reports::get_donation_stats))
        .route("/overview", get(handlers::reports::get_inventory_overview));

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/associations/me", get(handlers::associations::get_my_association))
        .route("/api/transactions", get(handlers::transactions::list_transactions))
        .nest("/api", catalog_routes)
        .nest("/api/stock", stock_routes)
        .nest("/api/reports", report_routes)
        .with_state(app_state)
}
