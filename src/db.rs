pub mod user_repo;
pub use user_repo::UserRepository;
pub mod token_repo;
pub use token_repo::TokenRepository;
pub mod inventory_repo;
pub use inventory_repo::InventoryRepository;
pub mod sales_repo;
pub use sales_repo::SalesRepository;
pub mod stock_ledger;
pub use stock_ledger::StockLedger;
