pub mod clients;
pub mod portfolio_clients;
pub mod portfolios;
pub mod users;

pub use clients::Entity as Clients;
pub use clients::Model as Client;
pub use portfolio_clients::Entity as PortfolioClients;
pub use portfolio_clients::Model as PortfolioClient;
pub use portfolios::Entity as Portfolios;
pub use portfolios::Model as Portfolio;
pub use users::Entity as Users;
pub use users::Model as User;
