//! Fixed retry delays with jitter.

use rand::Rng;
use std::time::Duration;

/// Delay before the next attempt: `base_ms` plus up to 10% jitter.
pub fn retry_delay(base_ms: u64) -> Duration {
    let jitter = match base_ms / 10 {
        0 => 0,
        spread => rand::thread_rng().gen_range(0..spread),
    };
    Duration::from_millis(base_ms + jitter)
}
