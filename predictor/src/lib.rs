pub mod config;
pub mod currency;
pub mod routes;
pub mod view;

pub use config::ServerConfig;
pub use currency::format_usd;
pub use routes::{AppState, router};
