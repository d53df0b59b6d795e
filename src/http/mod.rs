//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request ID, JSON body decoding)
//!     → audit.rs (buffer + log request/response)
//!     → todo handlers
//!     → response.rs / error.rs (JSON envelope)
//!     → Send to client
//! ```

pub mod audit;
pub mod error;
pub mod request;
pub mod response;
pub mod server;

pub use error::ApiError;
pub use request::X_REQUEST_ID;
pub use server::{AppState, HttpServer};
