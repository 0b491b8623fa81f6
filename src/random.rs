use chrono::Utc;
use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Duration;

/// Draws a duration uniformly from `[low, high]`.
///
/// Every call builds a fresh generator seeded from the nanosecond wall
/// clock. Two calls landing on the same clock reading return the same
/// value. Not suitable for anything security related.
pub fn random_duration(low: Duration, high: Duration) -> Duration {
    if high <= low {
        return low;
    }

    let seed = Utc::now().timestamp_nanos_opt().unwrap_or_default() as u64;
    let mut rng = StdRng::seed_from_u64(seed);
    let secs = Uniform::new_inclusive(low.as_secs_f64(), high.as_secs_f64()).sample(&mut rng);
    Duration::from_secs_f64(secs).clamp(low, high)
}
