//! # shaft-thermal-sim
//!
//! Time- and depth-varying temperature field inside a vertical shaft, and an
//! emulated array of discrete temperature sensors observing it.
//!
//! ```text
//! TemperatureField  (analytic: diurnal boundaries + vertical blend)
//!   ↓ sampled at sensor cadence, per sensor depth
//! SensorArray       (calibration offset → read noise → quantization)
//!   ↓ zero-order hold onto the shot timeline
//! Measurement       (true vs measured, [sensor × time])
//! ```
//!
//! The output feeds higher-level clock/interferometer models that are not
//! part of this crate. Everything is deterministic given the seed.
//!
//! ## Usage
//!
//! ```no_run
//! use shaft_thermal_sim::prelude::*;
//!
//! let field = TemperatureField::new(FieldParams::default()).unwrap();
//! let config = SensorConfig::ideal(8, 60.0).with_noise(0.05).with_resolution(0.01);
//! let mut sensors = SensorArray::new(field.shaft_length(), config, 42).unwrap();
//! let times: Vec<f64> = (0..120).map(|m| 6.0 + m as f64 / 60.0).collect();
//! let m = sensors.measure(&field, &times).unwrap();
//! println!("RMS error per sensor: {:?}", m.rms_error());
//! ```

pub mod units;
pub mod error;
pub mod field;
pub mod settings;
pub mod sampling;
pub mod sensor;
pub mod simulation;


pub mod prelude {
    pub use crate::error::{Result, SimError};
    pub use crate::field::{FieldParams, TemperatureField, ThermalField};
    pub use crate::settings::{SensorConfig, SimulationSettings};
    pub use crate::sensor::{Measurement, SensorArray};
    pub use crate::simulation::{run_experiment, ExperimentResult};
}
