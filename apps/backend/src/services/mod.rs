pub mod portfolios;

pub use portfolios::{AttachOutcome, PortfolioService};
