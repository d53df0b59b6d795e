//! Resilience helpers for calls to external services.
//!
//! # Design Decisions
//! - Delays carry up to 10% jitter so simultaneous retries spread out

pub mod retry;
