//! Burst sampling with an outlier-trimmed mean.
//!
//! A burst takes up to N raw reads of one quantity, drops the reads the
//! driver flagged invalid, sorts the rest and averages the central window
//! after discarding `trim` values from each end.  Transient spikes
//! (electrical noise, stray reflections, a momentary disconnect) land in
//! the trimmed tails instead of skewing the result.

use embedded_hal::delay::DelayNs;
use heapless::Vec;
use log::debug;

use crate::config::SamplingPlan;
use crate::record::Reading;

/// Upper bound on reads per burst (stack buffer size).
pub const MAX_BURST: usize = 32;

/// Average of `values` after discarding the `trim` smallest and `trim`
/// largest.  `None` when fewer than `2 * trim + 1` values are present,
/// which includes any `trim` so large that the bound overflows.
///
/// Sorts `values` in place.
pub fn trimmed_mean(values: &mut [f32], trim: usize) -> Option<f32> {
    let needed = trim.checked_mul(2)?.checked_add(1)?;
    if values.len() < needed {
        return None;
    }
    values.sort_unstable_by(f32::total_cmp);
    let window = &values[trim..values.len() - trim];
    let sum: f32 = window.iter().sum();
    Some(sum / window.len() as f32)
}

/// Take one burst of reads according to `plan` and reduce it to a single
/// trimmed mean.
///
/// `read` returns `None` for a read the driver could not complete (or
/// that the caller rejects as implausible).  Rejected reads still use up
/// one of the `plan.samples` attempts.  Non-finite values are rejected
/// here as well.
pub fn sample_burst<D, F>(plan: &SamplingPlan, delay: &mut D, mut read: F) -> Reading<f32>
where
    D: DelayNs,
    F: FnMut() -> Option<f32>,
{
    let attempts = plan.samples.min(MAX_BURST);
    let mut valid: Vec<f32, MAX_BURST> = Vec::new();

    for _ in 0..attempts {
        if let Some(v) = read().filter(|v| v.is_finite()) {
            // Capacity equals the attempt cap, so this never overflows.
            let _ = valid.push(v);
        }
        if plan.delay_ms > 0 {
            delay.delay_ms(plan.delay_ms);
        }
    }

    let kept = valid.len();
    let result = trimmed_mean(&mut valid, plan.trim);
    if result.is_none() {
        debug!(
            "burst rejected: {kept}/{attempts} valid, need {}",
            plan.min_valid()
        );
    }
    result.into()
}

/// Round to one decimal place.
pub fn round_tenth(v: f32) -> f32 {
    (v * 10.0).round() / 10.0
}
