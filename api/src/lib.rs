pub mod config;
pub mod counter;
pub mod db;
pub mod gateway;
pub mod models;
pub mod state;

pub use config::{AppConfig, ConfigError};
pub use state::{create_router, AppState};
