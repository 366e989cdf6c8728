pub mod app_config;

pub use app_config::{load_config, load_config_from, AppConfig};
