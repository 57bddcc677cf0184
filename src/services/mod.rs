pub mod auth_service;
pub mod client_service;
pub mod listing;
pub mod product_service;
pub mod user_service;
