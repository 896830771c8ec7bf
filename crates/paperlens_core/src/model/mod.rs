//! Domain model for the paper library.
//!
//! # Responsibility
//! - Define the canonical records owned by the entity store: papers,
//!   folders and highlights, plus the structured analysis payload.
//! - Keep identity and timestamp conventions in one place.
//!
//! # Invariants
//! - Every record is identified by a stable `Uuid` that is never reused.
//! - Timestamps are Unix epoch milliseconds (`i64`).

pub mod analysis;
pub mod folder;
pub mod highlight;
pub mod paper;

use std::time::{SystemTime, UNIX_EPOCH};

/// Returns the current wall-clock time in epoch milliseconds.
///
/// Clamps to 0 for clocks set before the Unix epoch instead of panicking.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or(0)
}
