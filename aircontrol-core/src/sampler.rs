//! Fixed-cadence air sampling.

use log::debug;

use crate::error::Result;
use crate::gpio::{GpioPort, PinMode};

const MICROSECONDS_PER_MILLISECOND: i64 = 1000;

/// Number of samples collected by a scan of `duration_ms` at
/// `sampling_rate_us`.
///
/// Truncating division: a fractional trailing sample is dropped, matching
/// the counts baked into existing dump files.
pub fn sample_count(duration_ms: i32, sampling_rate_us: i32) -> usize {
    let count = i64::from(duration_ms) * MICROSECONDS_PER_MILLISECOND / i64::from(sampling_rate_us);
    count.max(0) as usize
}

/// Record `total_samples` levels from the given pin, sleeping the sampling
/// rate between reads.
///
/// Timing is best-effort: loop overhead is not corrected for, so the actual
/// wall-clock duration drifts slightly beyond the nominal one.
pub fn record<P: GpioPort>(
    port: &mut P,
    pin: u8,
    sampling_rate_us: i32,
    total_samples: usize,
) -> Result<Vec<bool>> {
    debug!(
        "sampling pin {} every {}us, {} samples",
        pin, sampling_rate_us, total_samples
    );

    port.set_mode(pin, PinMode::Input)?;

    let mut samples = Vec::with_capacity(total_samples);
    while samples.len() < total_samples {
        samples.push(port.read(pin)?.is_high());
        port.sleep_us(sampling_rate_us as u64);
    }

    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_count_truncates() {
        assert_eq!(sample_count(1, 300), 3);
        assert_eq!(sample_count(1, 1000), 1);
        assert_eq!(sample_count(250, 100), 2500);
        assert_eq!(sample_count(1, 1001), 0);
    }

    #[test]
    fn sample_count_handles_long_scans() {
        assert_eq!(sample_count(3_600_000, 100), 36_000_000);
    }
}
