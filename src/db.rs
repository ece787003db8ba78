pub mod tenancy_repo;
pub use tenancy_repo::TenantRepository;
pub mod catalog_repo;
pub use catalog_repo::CatalogRepository;
pub mod ledger_repo;
pub use ledger_repo::LedgerRepository;
pub mod report_repo;
pub use report_repo::ReportRepository;
