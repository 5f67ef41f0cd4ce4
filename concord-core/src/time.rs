//! Epoch-millisecond timestamps.
//!
//! All persisted stamps are epoch milliseconds (i64). One stamp is taken
//! per reconciliation run and shared by every row that run writes.

use std::time::{SystemTime, UNIX_EPOCH};

/// Current time as epoch milliseconds.
pub fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}
