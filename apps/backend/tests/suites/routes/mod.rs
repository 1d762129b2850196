pub mod clients;
pub mod docs;
pub mod portfolios;
pub mod users;
