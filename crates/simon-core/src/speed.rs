//! Level-to-replay-speed curve.

use std::time::Duration;

/// Flash interval before the curve starts ramping.
pub const BASE_INTERVAL_MS: u64 = 1000;
/// Fastest replay the curve allows.
pub const FLOOR_INTERVAL_MS: u64 = 350;
/// Quadratic coefficient: each level shaves `level² × STEP_MS` off the base interval.
pub const STEP_MS: u64 = 10;

/// Replay interval for `level`: `clamp(1000 − level² × 10, 350, 1000)` milliseconds.
pub fn flash_interval(level: u32) -> Duration {
    Duration::from_millis(flash_interval_ms(level))
}

pub fn flash_interval_ms(level: u32) -> u64 {
    let level = u64::from(level);
    let ramp = level.saturating_mul(level).saturating_mul(STEP_MS);
    BASE_INTERVAL_MS
        .saturating_sub(ramp)
        .clamp(FLOOR_INTERVAL_MS, BASE_INTERVAL_MS)
}
