//! Experiment runner: settings → field → sensor array → measurement.
//!
//! 1. Validate the run settings (fails fast on any unset field)
//! 2. Build the temperature field and the sensor array
//! 3. Build the shot timeline from `hours`, `frep` and `start_hr`
//! 4. Measure the field at every shot

use log::info;

use crate::error::Result;
use crate::field::{FieldParams, TemperatureField};
use crate::sensor::{Measurement, SensorArray};
use crate::settings::SimulationSettings;

/// Everything a downstream consumer needs from one run.
#[derive(Debug, Clone)]
pub struct ExperimentResult {
    /// Shot times (hours)
    pub evaluation_times: Vec<f64>,
    /// Sensor depths (m)
    pub sensor_positions: Vec<f64>,
    /// Per-sensor calibration offsets (K)
    pub calibration_offsets: Vec<f64>,
    pub measurement: Measurement,
}

/// Run one true-vs-measured experiment.
pub fn run_experiment(
    field_params: &FieldParams,
    settings: &SimulationSettings,
    seed: u64,
) -> Result<ExperimentResult> {
    settings.validate()?;

    let field = TemperatureField::new(field_params.clone())?;
    let mut sensors = SensorArray::new(field.shaft_length(), settings.sensor_config()?, seed)?;
    let evaluation_times = settings.evaluation_times()?;

    info!(
        "experiment: {} shots from {:.3} h, {} sensors, seed {}",
        evaluation_times.len(),
        evaluation_times[0],
        sensors.sensor_count(),
        seed
    );

    let measurement = sensors.measure(&field, &evaluation_times)?;

    info!(
        "experiment done: max |measured - true| = {:.4} K",
        measurement.max_abs_error()
    );

    Ok(ExperimentResult {
        evaluation_times,
        sensor_positions: sensors.sensor_positions().to_vec(),
        calibration_offsets: sensors.calibration_offsets().to_vec(),
        measurement,
    })
}
