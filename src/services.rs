pub mod auth;
pub mod token_codec;
pub mod inventory_service;
pub use inventory_service::InventoryService;
pub mod sales_service;
pub use sales_service::SalesService;
