pub mod advisor;
pub mod classifier;
pub mod error;
pub mod features;
pub mod interval;
pub mod optimizer;
pub mod period;
pub mod recommendation;
pub mod segmenter;
pub mod series;
pub mod window;

use chrono::TimeDelta;

/// Width of a single forecast block.
pub const BLOCK_MINUTES: u32 = 30;

#[must_use]
pub const fn block_duration() -> TimeDelta {
    TimeDelta::minutes(BLOCK_MINUTES as i64)
}

/// Number of blocks needed to cover the duration, rounded up.
#[must_use]
pub const fn block_count(duration_minutes: u32) -> usize {
    duration_minutes.div_ceil(BLOCK_MINUTES) as usize
}
