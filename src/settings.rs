//! Run settings and the sensor configuration derived from them.
//!
//! Every setting starts unset so each run states its inputs explicitly;
//! [`SimulationSettings::validate`] fails fast naming every missing field.
//! Noise, resolution and accuracy are switched off with `0.0`, not by
//! leaving them unset.

use crate::error::{require_non_negative, require_positive, Result, SimError};
use crate::sampling::checked_len;
use crate::units::SECONDS_PER_HOUR;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration consumed by [`crate::sensor::SensorArray`].
///
/// `None` and `Some(0.0)` both mean "off" for the optional fields.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SensorConfig {
    /// Number of sensors, evenly spaced from surface to bottom
    pub sensor_count: usize,
    /// Internal sampling cadence (s)
    pub sample_interval_seconds: f64,
    /// Quantization step (K)
    pub resolution: Option<f64>,
    /// Standard deviation of per-reading additive noise (K)
    pub noise_std: Option<f64>,
    /// Calibration offsets are drawn from `[−bound, +bound]` (K)
    pub accuracy_bound: Option<f64>,
}

impl SensorConfig {
    /// Ideal sensors: no noise, no quantization, no calibration offset.
    pub fn ideal(sensor_count: usize, sample_interval_seconds: f64) -> Self {
        Self {
            sensor_count,
            sample_interval_seconds,
            resolution: None,
            noise_std: None,
            accuracy_bound: None,
        }
    }

    pub fn with_resolution(mut self, resolution: f64) -> Self {
        self.resolution = Some(resolution);
        self
    }

    pub fn with_noise(mut self, noise_std: f64) -> Self {
        self.noise_std = Some(noise_std);
        self
    }

    pub fn with_accuracy(mut self, accuracy_bound: f64) -> Self {
        self.accuracy_bound = Some(accuracy_bound);
        self
    }

    /// Range checks; disabled features pass.
    pub fn validate(&self) -> Result<()> {
        if self.sensor_count == 0 {
            return Err(SimError::NoSensors);
        }
        require_positive("sample_interval_seconds", self.sample_interval_seconds)?;
        if let Some(r) = self.resolution {
            require_non_negative("resolution", r)?;
        }
        if let Some(s) = self.noise_std {
            require_non_negative("noise_std", s)?;
        }
        if let Some(a) = self.accuracy_bound {
            require_non_negative("accuracy_bound", a)?;
        }
        Ok(())
    }

    pub fn noise_enabled(&self) -> bool {
        enabled(self.noise_std)
    }

    pub fn quantization_enabled(&self) -> bool {
        enabled(self.resolution)
    }

    pub fn calibration_enabled(&self) -> bool {
        enabled(self.accuracy_bound)
    }
}

fn enabled(value: Option<f64>) -> bool {
    matches!(value, Some(v) if v > 0.0)
}

/// Settings for one simulation run.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SimulationSettings {
    /// Total simulated duration (hours)
    pub hours: Option<f64>,
    /// Shot repetition frequency (Hz)
    pub frep: Option<f64>,
    /// Starting hour of the day (0.0 to 24.0)
    pub start_hr: Option<f64>,
    /// Sensor update interval (s)
    pub sensor_dt: Option<f64>,
    /// Number of sensors in the shaft
    pub n_sensors: Option<usize>,
    /// Random read noise (std dev, K)
    pub random_noise: Option<f64>,
    /// Quantization level (K)
    pub sensor_resolution: Option<f64>,
    /// Constant calibration offset bound (K)
    pub sensor_accuracy: Option<f64>,
}

impl SimulationSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hours(mut self, hours: f64) -> Self {
        self.hours = Some(hours);
        self
    }

    pub fn with_frep(mut self, frep: f64) -> Self {
        self.frep = Some(frep);
        self
    }

    pub fn with_start_hr(mut self, start_hr: f64) -> Self {
        self.start_hr = Some(start_hr);
        self
    }

    pub fn with_sensor_dt(mut self, sensor_dt: f64) -> Self {
        self.sensor_dt = Some(sensor_dt);
        self
    }

    pub fn with_n_sensors(mut self, n_sensors: usize) -> Self {
        self.n_sensors = Some(n_sensors);
        self
    }

    pub fn with_random_noise(mut self, random_noise: f64) -> Self {
        self.random_noise = Some(random_noise);
        self
    }

    pub fn with_sensor_resolution(mut self, sensor_resolution: f64) -> Self {
        self.sensor_resolution = Some(sensor_resolution);
        self
    }

    pub fn with_sensor_accuracy(mut self, sensor_accuracy: f64) -> Self {
        self.sensor_accuracy = Some(sensor_accuracy);
        self
    }

    /// Names of every unset field, in declaration order.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let slots: [(&'static str, bool); 8] = [
            ("hours", self.hours.is_some()),
            ("frep", self.frep.is_some()),
            ("start_hr", self.start_hr.is_some()),
            ("sensor_dt", self.sensor_dt.is_some()),
            ("n_sensors", self.n_sensors.is_some()),
            ("random_noise", self.random_noise.is_some()),
            ("sensor_resolution", self.sensor_resolution.is_some()),
            ("sensor_accuracy", self.sensor_accuracy.is_some()),
        ];
        slots
            .iter()
            .filter(|(_, set)| !set)
            .map(|(name, _)| *name)
            .collect()
    }

    /// Fail if any field is unset, then range-check the values.
    pub fn validate(&self) -> Result<()> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(SimError::MissingSettings { fields: missing });
        }
        let (hours, frep, start_hr) = self.timeline()?;
        require_positive("hours", hours)?;
        require_positive("frep", frep)?;
        require_non_negative("start_hr", start_hr)?;
        self.sensor_config()?;
        Ok(())
    }

    /// Sensor configuration projected from these settings.
    pub fn sensor_config(&self) -> Result<SensorConfig> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(SimError::MissingSettings { fields: missing });
        }
        let config = SensorConfig {
            sensor_count: self.n_sensors.unwrap_or_default(),
            sample_interval_seconds: self.sensor_dt.unwrap_or_default(),
            resolution: self.sensor_resolution,
            noise_std: self.random_noise,
            accuracy_bound: self.sensor_accuracy,
        };
        config.validate()?;
        Ok(config)
    }

    /// Shot timeline in hours: `start_hr + n/(frep·3600)` while `n/frep < hours·3600`.
    ///
    /// A run shorter than one shot period is the single instant `start_hr`.
    /// Timelines longer than [`MAX_GRID_POINTS`](crate::sampling::MAX_GRID_POINTS)
    /// shots are rejected.
    pub fn evaluation_times(&self) -> Result<Vec<f64>> {
        self.validate()?;
        let (hours, frep, start_hr) = self.timeline()?;

        let duration_s = hours * SECONDS_PER_HOUR;
        let shots = checked_len("frep", duration_s * frep)?;

        Ok((0..shots)
            .map(|n| start_hr + n as f64 / frep / SECONDS_PER_HOUR)
            .collect())
    }

    fn timeline(&self) -> Result<(f64, f64, f64)> {
        match (self.hours, self.frep, self.start_hr) {
            (Some(h), Some(f), Some(s)) => Ok((h, f, s)),
            _ => Err(SimError::MissingSettings {
                fields: self.missing_fields(),
            }),
        }
    }
}
