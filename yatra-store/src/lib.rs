pub mod app_config;
pub mod http_backend;

pub use app_config::{BackendConfig, CatalogConfig, Config};
pub use http_backend::HttpBookingBackend;
