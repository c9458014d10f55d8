//! Fixed study parameters shared by every dataset driver.

/// Length of the averaging interval (in days) used by both the control and
/// the experimental Monte-Carlo generators.
pub const INTERVAL_LENGTH_DAYS: i64 = 28;

/// Number of independent trials drawn for the null (control) distribution.
pub const CONTROL_SAMPLE_SIZE: usize = 10_000;

/// How often (in outer iterations) the Monte-Carlo loop checkpoints its
/// accumulated scalars to the sample store.
pub const CHECKPOINT_INTERVAL: usize = 1_000;

/// Default event-alignment axis: six weeks before an onset to four weeks after.
pub const DAY_SHIFT_MIN: i64 = -6 * 7;
pub const DAY_SHIFT_MAX: i64 = 4 * 7;

/// Materialize the default day-shift axis as an ordered offset sequence.
pub fn default_day_shift_range() -> Vec<i64> {
    (DAY_SHIFT_MIN..=DAY_SHIFT_MAX).collect()
}
