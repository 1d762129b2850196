//! Shared helpers for backend unit and integration tests: one logging
//! initializer and problem-details assertions.

pub mod logging;
pub mod problem_details;
