//! SeaORM adapters; each issues the actual queries for one table.

pub mod clients_sea;
pub mod portfolio_clients_sea;
pub mod portfolios_sea;
pub mod users_sea;
