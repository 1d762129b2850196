//! Infrastructure layer - database bootstrap, state building and storage error mapping.

pub mod db;
pub mod db_errors;
pub mod state;
