//! DTOs for portfolios_sea adapter.

#[derive(Debug, Clone)]
pub struct PortfolioCreate {
    pub portfolio_name: String,
}

impl PortfolioCreate {
    pub fn new(portfolio_name: impl Into<String>) -> Self {
        Self {
            portfolio_name: portfolio_name.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PortfolioUpdate {
    pub id: i64,
    pub portfolio_name: String,
}
