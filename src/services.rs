pub mod tenancy_service;
pub use tenancy_service::TenantService;
pub mod catalog_service;
pub use catalog_service::CatalogService;
pub mod ledger_service;
pub use ledger_service::LedgerService;
pub mod report_service;
pub use report_service::ReportService;
