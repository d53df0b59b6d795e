//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! HTTP audit middleware, todo handlers, label client
//!     → metrics.rs (counters, histograms)
//!     → Prometheus scrape endpoint (when enabled)
//! ```
//!
//! Log output lives in [`crate::logging`].

pub mod metrics;
