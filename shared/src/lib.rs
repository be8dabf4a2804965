
pub mod config;
pub mod database;
pub mod entity;
pub mod models;
pub mod storage;

pub use config::Config;
pub use database::{get_db_connection, run_migrations};
pub use models::*;
pub use storage::{DatabaseStorage, Storage, DEFAULT_ALERTS_LIMIT, SIGNALS_PAGE_LIMIT};
