pub mod associations;
pub mod categories;
pub mod products;
pub mod reports;
pub mod stock;
pub mod transactions;
