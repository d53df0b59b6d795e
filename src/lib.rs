//! Todo CRUD service with a structured logging library.

pub mod config;
pub mod http;
pub mod labels;
pub mod lifecycle;
pub mod logging;
pub mod observability;
pub mod resilience;
pub mod todo;
pub mod utils;

pub use config::AppConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use logging::{create_logger, Logger, LoggerOptions};
