pub mod utils;
pub mod types;
pub mod price_infra;
pub mod alias;
pub mod history;
pub mod error;
pub mod config;
pub mod observability;
pub mod api;
pub mod app;
