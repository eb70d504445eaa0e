mod config;
mod load_config;

pub use config::{Config, DatabaseConfig, DocumentFormat, DATABASE_URL_ENV};
pub use load_config::load;
