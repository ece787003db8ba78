pub mod dashboard;
pub mod inventory;
pub mod ledger;
pub mod tenancy;
