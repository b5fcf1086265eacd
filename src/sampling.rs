//! Discrete-time plumbing for the sensor pipeline.
//!
//! - [`validate_evaluation_times`]: non-empty, finite, strictly increasing
//! - [`sample_grid`]: the sensor-native timestamps covering an evaluation span
//! - [`quantize`]: rounding a reading to the sensor resolution
//! - [`hold_indices`]: zero-order-hold lookup from evaluation times into the grid

use crate::error::{require_positive, Result, SimError};
use crate::units::{hours_to_seconds, seconds_to_hours};

/// Check that `times` is usable as an evaluation grid.
pub fn validate_evaluation_times(times: &[f64]) -> Result<()> {
    if times.is_empty() {
        return Err(SimError::EmptyEvaluationTimes);
    }
    for (index, &t) in times.iter().enumerate() {
        if !t.is_finite() {
            return Err(SimError::NonFiniteTime { index });
        }
        if index > 0 && t <= times[index - 1] {
            return Err(SimError::NonIncreasingTimes {
                index,
                previous: times[index - 1],
                current: t,
            });
        }
    }
    Ok(())
}

/// Largest number of timestamps a sampling grid or shot timeline may hold.
pub const MAX_GRID_POINTS: usize = 10_000_000;

/// Convert a fractional point count to a length of at least 1, rejecting
/// counts above [`MAX_GRID_POINTS`].
pub(crate) fn checked_len(name: &'static str, count: f64) -> Result<usize> {
    let count = count.ceil();
    if !(count <= MAX_GRID_POINTS as f64) {
        return Err(SimError::invalid(
            name,
            format!("needs {} points, limit is {}", count, MAX_GRID_POINTS),
        ));
    }
    Ok((count as usize).max(1))
}

/// Sensor sampling timestamps (hours) from `t_first` at `interval_seconds`.
///
/// The grid is the half-open range `[t_first, t_last + Δ)` in seconds, so the
/// last timestamp is at or after `t_last` and every evaluation time in
/// `[t_first, t_last]` has a reading at or before it. The first timestamp is
/// `t_first` itself, bit for bit. When `t_first == t_last` the grid is that
/// single instant.
pub fn sample_grid(t_first_hours: f64, t_last_hours: f64, interval_seconds: f64) -> Result<Vec<f64>> {
    let dt = require_positive("sample_interval_seconds", interval_seconds)?;
    let start_s = hours_to_seconds(t_first_hours);
    let end_s = hours_to_seconds(t_last_hours);

    let span = end_s + dt - start_s;
    let count = checked_len("sample_interval_seconds", if span > 0.0 { span / dt } else { 1.0 })?;

    let mut grid: Vec<f64> = (0..count)
        .map(|i| seconds_to_hours(start_s + i as f64 * dt))
        .collect();
    // the hour/second round trip can land one ulp past t_first
    grid[0] = t_first_hours;
    Ok(grid)
}

/// Round `value` to the nearest multiple of `step` (> 0), ties to even.
pub fn quantize(value: f64, step: f64) -> f64 {
    (value / step).round_ties_even() * step
}

/// Index of the latest grid timestamp at or before `t`, clamped to 0.
///
/// A reading stamped exactly at `t` is visible; one stamped after is not.
pub fn hold_index(grid: &[f64], t: f64) -> usize {
    grid.partition_point(|&g| g <= t).saturating_sub(1)
}

/// [`hold_index`] for every evaluation time.
pub fn hold_indices(grid: &[f64], times: &[f64]) -> Vec<usize> {
    times.iter().map(|&t| hold_index(grid, t)).collect()
}

/// `n` points evenly spaced over `[start, stop]`, both ends included.
///
/// `n == 1` yields `[start]`; the last point is pinned to `stop` exactly.
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            let mut points: Vec<f64> = (0..n).map(|i| start + i as f64 * step).collect();
            points[n - 1] = stop;
            points
        }
    }
}
