//! Physical and time-keeping constants.
//!
//! Temperatures are carried in Kelvin internally, times in hours at the
//! public API and in seconds only while building sensor sampling grids.

/// Offset between the Celsius and Kelvin scales (K)
pub const CELSIUS_TO_KELVIN: f64 = 273.15;

/// Seconds per hour
pub const SECONDS_PER_HOUR: f64 = 3600.0;

/// Period of the diurnal cycle (hours)
pub const HOURS_PER_DAY: f64 = 24.0;

/// Pi
pub const PI: f64 = std::f64::consts::PI;

/// Convert °C to K
pub fn celsius_to_kelvin(t_celsius: f64) -> f64 {
    t_celsius + CELSIUS_TO_KELVIN
}

/// Convert K to °C
pub fn kelvin_to_celsius(t_kelvin: f64) -> f64 {
    t_kelvin - CELSIUS_TO_KELVIN
}

pub fn hours_to_seconds(t_hours: f64) -> f64 {
    t_hours * SECONDS_PER_HOUR
}

pub fn seconds_to_hours(t_seconds: f64) -> f64 {
    t_seconds / SECONDS_PER_HOUR
}

/// Sinusoidal diurnal oscillation: `amplitude · sin(2π(t − phase)/24)`.
///
/// `t_hours` and `phase_hours` share the same clock; a phase of 15 h puts
/// the upward zero crossing at 15:00 and the peak at 21:00.
pub fn diurnal(amplitude: f64, phase_hours: f64, t_hours: f64) -> f64 {
    amplitude * (2.0 * PI * (t_hours - phase_hours) / HOURS_PER_DAY).sin()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn celsius_kelvin_roundtrip() {
        for &t in &[-40.0, 0.0, 14.0, 20.2, 100.0] {
            let back = kelvin_to_celsius(celsius_to_kelvin(t));
            assert!((back - t).abs() < 1e-12, "{} -> {}", t, back);
        }
        assert_eq!(celsius_to_kelvin(0.0), 273.15);
    }

    #[test]
    fn diurnal_period_is_one_day() {
        let a = diurnal(2.5, 15.0, 3.7);
        let b = diurnal(2.5, 15.0, 3.7 + HOURS_PER_DAY);
        assert!((a - b).abs() < 1e-12);
    }

    #[test]
    fn diurnal_zero_at_phase_and_peak_quarter_day_later() {
        assert!(diurnal(1.0, 15.0, 15.0).abs() < 1e-12);
        assert!((diurnal(1.0, 15.0, 21.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn hour_second_conversion() {
        assert_eq!(hours_to_seconds(0.1), 360.0);
        assert!((seconds_to_hours(60.0) - 1.0 / 60.0).abs() < 1e-15);
    }
}
