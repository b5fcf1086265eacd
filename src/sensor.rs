//! Discrete sensor array observing a [`ThermalField`].
//!
//! Each sensor sits at a fixed depth, owns its own random stream, and
//! carries a calibration offset drawn once at construction. `measure`
//! pushes the field through the sensor pipeline:
//!
//! 1. sample the field on a sensor-native grid at the configured cadence
//! 2. add the sensor's calibration offset
//! 3. add per-reading Gaussian noise (if enabled)
//! 4. quantize to the sensor resolution (if enabled)
//! 5. zero-order hold the readings back onto the caller's evaluation times
//!
//! Random draws happen sensor by sensor in index order, and within a sensor
//! in grid order, so a given seed reproduces every output bit for bit.
//!
//! Sensor `k`'s stream is ChaCha8 seeded from the base seed and switched to
//! stream `k`, i.e. keyed by the pair `(seed, k)`.

use log::{debug, trace};
use nalgebra::DMatrix;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::{require_positive, Result};
use crate::field::ThermalField;
use crate::sampling::{hold_indices, linspace, quantize, sample_grid, validate_evaluation_times};
use crate::settings::SensorConfig;

/// True and measured temperatures for one `measure` call.
///
/// Matrices are indexed `[(sensor, column)]`.
#[derive(Debug, Clone)]
pub struct Measurement {
    /// Exact field values at the evaluation times
    pub true_temperatures: DMatrix<f64>,
    /// What the sensors reported as of each evaluation time
    pub measured_temperatures: DMatrix<f64>,
    /// Sensor-native sampling timestamps (hours)
    pub sample_times: Vec<f64>,
    /// Readings at `sample_times`, after offset, noise and quantization
    pub readings: DMatrix<f64>,
}

impl Measurement {
    pub fn sensor_count(&self) -> usize {
        self.true_temperatures.nrows()
    }

    pub fn time_count(&self) -> usize {
        self.true_temperatures.ncols()
    }

    /// measured − true
    pub fn residuals(&self) -> DMatrix<f64> {
        &self.measured_temperatures - &self.true_temperatures
    }

    /// Root-mean-square residual per sensor.
    pub fn rms_error(&self) -> Vec<f64> {
        let residuals = self.residuals();
        let cols = residuals.ncols() as f64;
        residuals
            .row_iter()
            .map(|row| (row.iter().map(|r| r * r).sum::<f64>() / cols).sqrt())
            .collect()
    }

    /// Largest absolute residual over all sensors and times.
    pub fn max_abs_error(&self) -> f64 {
        self.residuals().amax()
    }

    /// Largest absolute residual per sensor.
    pub fn max_abs_error_per_sensor(&self) -> Vec<f64> {
        self.residuals().row_iter().map(|row| row.amax()).collect()
    }

    pub fn sensor_true(&self, k: usize) -> Vec<f64> {
        self.true_temperatures.row(k).iter().copied().collect()
    }

    pub fn sensor_measured(&self, k: usize) -> Vec<f64> {
        self.measured_temperatures.row(k).iter().copied().collect()
    }
}

/// A fixed array of temperature sensors evenly spaced down the shaft.
#[derive(Debug, Clone)]
pub struct SensorArray {
    shaft_length: f64,
    config: SensorConfig,
    positions: Vec<f64>,
    offsets: Vec<f64>,
    rngs: Vec<ChaCha8Rng>,
}

/// Random stream owned by sensor `index`.
fn sensor_stream(seed: u64, index: usize) -> ChaCha8Rng {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(index as u64);
    rng
}

impl SensorArray {
    /// Place `config.sensor_count` sensors over `[0, shaft_length]` and draw
    /// their calibration offsets.
    pub fn new(shaft_length: f64, config: SensorConfig, seed: u64) -> Result<Self> {
        let shaft_length = require_positive("shaft_length", shaft_length)?;
        config.validate()?;

        let n = config.sensor_count;
        let positions = linspace(0.0, shaft_length, n);
        let mut rngs: Vec<ChaCha8Rng> = (0..n).map(|k| sensor_stream(seed, k)).collect();

        let offsets = match config.accuracy_bound {
            Some(sigma) if config.calibration_enabled() => rngs
                .iter_mut()
                .map(|rng| rng.gen_range(-sigma..=sigma))
                .collect(),
            _ => vec![0.0; n],
        };

        debug!(
            "sensor array: {} sensors over {} m, dt={} s, noise={:?}, resolution={:?}, accuracy={:?}",
            n,
            shaft_length,
            config.sample_interval_seconds,
            config.noise_std,
            config.resolution,
            config.accuracy_bound,
        );

        Ok(Self {
            shaft_length,
            config,
            positions,
            offsets,
            rngs,
        })
    }

    pub fn sensor_count(&self) -> usize {
        self.positions.len()
    }

    pub fn shaft_length(&self) -> f64 {
        self.shaft_length
    }

    /// Sensor depths (m), surface first.
    pub fn sensor_positions(&self) -> &[f64] {
        &self.positions
    }

    pub fn calibration_offsets(&self) -> &[f64] {
        &self.offsets
    }

    /// Observe `field` at `evaluation_times` (hours, strictly increasing).
    ///
    /// Advances every sensor's random stream when noise is enabled; nothing
    /// else about the array changes.
    pub fn measure<F>(&mut self, field: &F, evaluation_times: &[f64]) -> Result<Measurement>
    where
        F: ThermalField + Sync + ?Sized,
    {
        validate_evaluation_times(evaluation_times)?;
        let n = self.sensor_count();
        let nt = evaluation_times.len();

        let true_rows = evaluate_rows(field, &self.positions, evaluation_times);
        let true_temperatures = DMatrix::from_fn(n, nt, |k, i| true_rows[k][i]);

        let first = evaluation_times[0];
        let last = evaluation_times[nt - 1];
        let sample_times = sample_grid(first, last, self.config.sample_interval_seconds)?;
        let ns = sample_times.len();

        debug!(
            "measure: {} sensors, {} evaluation times over [{}, {}] h, {} sensor samples",
            n, nt, first, last, ns
        );

        let noise = match self.config.noise_std {
            Some(std) if self.config.noise_enabled() => Some(Normal::new(0.0, std)?),
            _ => None,
        };
        let resolution = self.config.resolution.filter(|_| self.config.quantization_enabled());

        // Field sampling is pure; the random draws below stay sequential.
        let mut sample_rows = evaluate_rows(field, &self.positions, &sample_times);

        for (k, (row, rng)) in sample_rows.iter_mut().zip(self.rngs.iter_mut()).enumerate() {
            let offset = self.offsets[k];
            for value in row.iter_mut() {
                *value += offset;
            }
            if let Some(noise) = &noise {
                for value in row.iter_mut() {
                    *value += noise.sample(rng);
                }
            }
            if let Some(step) = resolution {
                for value in row.iter_mut() {
                    *value = quantize(*value, step);
                }
            }
            trace!("sensor {} at z={} m: offset={}", k, self.positions[k], offset);
        }

        let readings = DMatrix::from_fn(n, ns, |k, j| sample_rows[k][j]);

        let holds = hold_indices(&sample_times, evaluation_times);
        let measured_temperatures = DMatrix::from_fn(n, nt, |k, i| readings[(k, holds[i])]);

        Ok(Measurement {
            true_temperatures,
            measured_temperatures,
            sample_times,
            readings,
        })
    }
}

/// One row per depth: the field at every time in `times`.
fn evaluate_rows<F>(field: &F, depths: &[f64], times: &[f64]) -> Vec<Vec<f64>>
where
    F: ThermalField + Sync + ?Sized,
{
    #[cfg(feature = "parallel")]
    {
        depths.par_iter().map(|&z| field.temperatures(times, z)).collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        depths.iter().map(|&z| field.temperatures(times, z)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{FieldParams, TemperatureField};
    use crate::sampling::hold_index;

    fn default_field() -> TemperatureField {
        TemperatureField::new(FieldParams {
            gamma: 1.7,
            mid_amplitude_c: 0.8,
            ..FieldParams::default()
        })
        .unwrap()
    }

    fn minute_shots(minutes: usize) -> Vec<f64> {
        (0..minutes).map(|m| 6.0 + m as f64 / 60.0 + 1.0 / 240.0).collect()
    }

    #[test]
    fn positions_are_evenly_spaced_inclusive() {
        let array = SensorArray::new(100.0, SensorConfig::ideal(5, 60.0), 1).unwrap();
        assert_eq!(array.sensor_positions(), &[0.0, 25.0, 50.0, 75.0, 100.0]);

        let single = SensorArray::new(100.0, SensorConfig::ideal(1, 60.0), 1).unwrap();
        assert_eq!(single.sensor_positions(), &[0.0]);
    }

    #[test]
    fn offsets_are_zero_without_accuracy_bound() {
        let none = SensorArray::new(100.0, SensorConfig::ideal(6, 60.0), 7).unwrap();
        assert!(none.calibration_offsets().iter().all(|&o| o == 0.0));

        let zero = SensorArray::new(100.0, SensorConfig::ideal(6, 60.0).with_accuracy(0.0), 7).unwrap();
        assert!(zero.calibration_offsets().iter().all(|&o| o == 0.0));
    }

    #[test]
    fn offsets_are_bounded_distinct_and_seeded() {
        let config = SensorConfig::ideal(8, 60.0).with_accuracy(0.2);
        let a = SensorArray::new(100.0, config.clone(), 42).unwrap();
        let b = SensorArray::new(100.0, config.clone(), 42).unwrap();
        let c = SensorArray::new(100.0, config, 43).unwrap();

        assert_eq!(a.calibration_offsets(), b.calibration_offsets());
        assert_ne!(a.calibration_offsets(), c.calibration_offsets());
        for &o in a.calibration_offsets() {
            assert!((-0.2..=0.2).contains(&o), "offset {} out of bounds", o);
        }
        let first = a.calibration_offsets()[0];
        assert!(a.calibration_offsets().iter().any(|&o| o != first));
    }

    #[test]
    fn sensor_stream_depends_only_on_seed_and_index() {
        let small = SensorArray::new(100.0, SensorConfig::ideal(2, 60.0).with_accuracy(1.0), 9).unwrap();
        let large = SensorArray::new(100.0, SensorConfig::ideal(5, 60.0).with_accuracy(1.0), 9).unwrap();
        assert_eq!(small.calibration_offsets()[0], large.calibration_offsets()[0]);
        assert_eq!(small.calibration_offsets()[1], large.calibration_offsets()[1]);
    }

    #[test]
    fn offsets_survive_repeated_measurements() {
        let field = default_field();
        let mut array = SensorArray::new(
            100.0,
            SensorConfig::ideal(3, 60.0).with_accuracy(0.5).with_noise(0.1),
            5,
        )
        .unwrap();
        let before = array.calibration_offsets().to_vec();
        let times = minute_shots(10);
        array.measure(&field, &times).unwrap();
        array.measure(&field, &times).unwrap();
        assert_eq!(array.calibration_offsets(), before.as_slice());
    }

    #[test]
    fn output_shapes() {
        let field = default_field();
        let mut array = SensorArray::new(100.0, SensorConfig::ideal(4, 30.0), 0).unwrap();
        let times = minute_shots(17);
        let m = array.measure(&field, &times).unwrap();
        assert_eq!(m.sensor_count(), 4);
        assert_eq!(m.time_count(), 17);
        assert_eq!(m.measured_temperatures.shape(), (4, 17));
        assert_eq!(m.readings.shape(), (4, m.sample_times.len()));
    }

    #[test]
    fn true_temperatures_are_exact_field_values() {
        let field = default_field();
        let mut array = SensorArray::new(
            100.0,
            SensorConfig::ideal(3, 120.0).with_noise(0.3).with_resolution(0.1).with_accuracy(0.4),
            11,
        )
        .unwrap();
        let times = minute_shots(9);
        let m = array.measure(&field, &times).unwrap();
        for (k, &z) in array.sensor_positions().iter().enumerate() {
            for (i, &t) in times.iter().enumerate() {
                assert_eq!(m.true_temperatures[(k, i)], field.temperature(t, z));
            }
        }
    }

    #[test]
    fn noise_off_readings_are_field_plus_offset() {
        let field = default_field();
        let mut array = SensorArray::new(100.0, SensorConfig::ideal(4, 60.0).with_accuracy(0.3), 3).unwrap();
        let times = minute_shots(30);
        let first = array.measure(&field, &times).unwrap();
        let second = array.measure(&field, &times).unwrap();

        for (k, &z) in array.sensor_positions().iter().enumerate() {
            let offset = array.calibration_offsets()[k];
            for (j, &t) in first.sample_times.iter().enumerate() {
                assert_eq!(first.readings[(k, j)], field.temperature(t, z) + offset);
            }
        }
        assert_eq!(first.measured_temperatures, second.measured_temperatures);
    }

    #[test]
    fn noise_varies_between_calls_but_replays_with_seed() {
        let field = default_field();
        let config = SensorConfig::ideal(3, 60.0).with_noise(0.05);
        let times = minute_shots(20);

        let mut a = SensorArray::new(100.0, config.clone(), 21).unwrap();
        let mut b = SensorArray::new(100.0, config, 21).unwrap();

        let a1 = a.measure(&field, &times).unwrap();
        let a2 = a.measure(&field, &times).unwrap();
        let b1 = b.measure(&field, &times).unwrap();
        let b2 = b.measure(&field, &times).unwrap();

        assert_ne!(a1.measured_temperatures, a2.measured_temperatures);
        assert_eq!(a1.measured_temperatures, b1.measured_temperatures);
        assert_eq!(a2.measured_temperatures, b2.measured_temperatures);
    }

    #[test]
    fn noise_statistics_match_configured_std() {
        let field = default_field();
        let std = 0.2;
        let mut array = SensorArray::new(100.0, SensorConfig::ideal(2, 1.0).with_noise(std), 99).unwrap();
        // 2 h at 1 s cadence: 7201 samples per sensor
        let m = array.measure(&field, &[0.0, 2.0]).unwrap();
        for (k, &z) in array.sensor_positions().iter().enumerate() {
            let noise: Vec<f64> = m
                .sample_times
                .iter()
                .enumerate()
                .map(|(j, &t)| m.readings[(k, j)] - field.temperature(t, z))
                .collect();
            let mean = noise.iter().sum::<f64>() / noise.len() as f64;
            let var = noise.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / noise.len() as f64;
            assert!(mean.abs() < 0.02, "sensor {} noise mean {}", k, mean);
            assert!((var.sqrt() - std).abs() < 0.02, "sensor {} noise std {}", k, var.sqrt());
        }
    }

    #[test]
    fn quantized_readings_sit_on_resolution_grid() {
        let field = default_field();
        let res = 0.25;
        let mut array = SensorArray::new(
            100.0,
            SensorConfig::ideal(3, 60.0).with_resolution(res).with_noise(0.1).with_accuracy(0.3),
            4,
        )
        .unwrap();
        let m = array.measure(&field, &minute_shots(15)).unwrap();
        for value in m.readings.iter() {
            let steps = value / res;
            assert!((steps - steps.round()).abs() < 1e-9, "{} not a multiple of {}", value, res);
            assert_eq!(quantize(*value, res), *value);
        }
    }

    #[test]
    fn measured_values_never_come_from_the_future() {
        let field = default_field();
        let mut array = SensorArray::new(100.0, SensorConfig::ideal(3, 300.0).with_noise(0.1), 8).unwrap();
        let times = minute_shots(45);
        let m = array.measure(&field, &times).unwrap();

        for (i, &t) in times.iter().enumerate() {
            let j = hold_index(&m.sample_times, t);
            assert!(m.sample_times[j] <= t, "sample {} after evaluation time {}", m.sample_times[j], t);
            if j + 1 < m.sample_times.len() {
                assert!(m.sample_times[j + 1] > t);
            }
            for k in 0..m.sensor_count() {
                assert_eq!(m.measured_temperatures[(k, i)], m.readings[(k, j)]);
            }
        }
    }

    #[test]
    fn hold_is_causal_for_arbitrary_start_times() {
        let field = default_field();
        let mut array = SensorArray::new(100.0, SensorConfig::ideal(2, 60.0).with_noise(0.1), 13).unwrap();
        // irrational step so start times land on inexact hour/second conversions
        let mut t0 = 3.2247418586976293;
        for _ in 0..1000 {
            let times = [t0, t0 + 0.01, t0 + 0.25];
            let m = array.measure(&field, &times).unwrap();
            assert_eq!(m.sample_times[0], t0);
            for (i, &t) in times.iter().enumerate() {
                let j = hold_index(&m.sample_times, t);
                assert!(m.sample_times[j] <= t, "sample {} after evaluation time {} (t0={})", m.sample_times[j], t, t0);
                assert_eq!(m.measured_temperatures[(0, i)], m.readings[(0, j)]);
            }
            t0 += std::f64::consts::SQRT_2 / 100.0;
        }
    }

    #[test]
    fn coarse_cadence_holds_value_between_samples() {
        let field = default_field();
        let mut array = SensorArray::new(100.0, SensorConfig::ideal(2, 600.0), 0).unwrap();
        // one shot per minute for 20 minutes, sensor updates every 10 minutes
        let times: Vec<f64> = (0..20).map(|m| m as f64 / 60.0).collect();
        let m = array.measure(&field, &times).unwrap();
        for i in 0..10 {
            assert_eq!(m.measured_temperatures[(1, i)], m.measured_temperatures[(1, 0)]);
        }
        assert_ne!(m.measured_temperatures[(1, 10)], m.measured_temperatures[(1, 9)]);
    }

    #[test]
    fn single_evaluation_time_uses_single_sample() {
        let field = default_field();
        let mut array = SensorArray::new(100.0, SensorConfig::ideal(2, 60.0), 0).unwrap();
        let m = array.measure(&field, &[12.0]).unwrap();
        assert_eq!(m.sample_times, vec![12.0]);
        assert_eq!(m.measured_temperatures, m.true_temperatures);
    }

    #[test]
    fn statistics_on_exact_measurement_are_zero() {
        let field = default_field();
        let mut array = SensorArray::new(100.0, SensorConfig::ideal(3, 60.0), 0).unwrap();
        let times: Vec<f64> = (0..10).map(|m| m as f64 / 60.0).collect();
        let m = array.measure(&field, &times).unwrap();
        assert!(m.max_abs_error() < 1e-9);
        assert!(m.rms_error().iter().all(|&e| e < 1e-9));
        assert!(m.max_abs_error_per_sensor().iter().all(|&e| e < 1e-9));
        assert_eq!(m.sensor_true(0), m.sensor_measured(0));
    }

    #[test]
    fn per_sensor_max_error_tracks_each_offset() {
        let field = default_field();
        let mut array = SensorArray::new(100.0, SensorConfig::ideal(4, 60.0).with_accuracy(0.5), 17).unwrap();
        let times: Vec<f64> = (0..10).map(|m| m as f64 / 60.0).collect();
        let m = array.measure(&field, &times).unwrap();

        let per_sensor = m.max_abs_error_per_sensor();
        assert_eq!(per_sensor.len(), 4);
        for (k, &err) in per_sensor.iter().enumerate() {
            let offset = array.calibration_offsets()[k].abs();
            assert!((err - offset).abs() < 1e-9, "sensor {}: max {} vs offset {}", k, err, offset);
        }
        let overall = per_sensor.iter().copied().fold(0.0, f64::max);
        assert_eq!(overall, m.max_abs_error());
    }

    #[test]
    fn rejects_bad_construction_and_inputs() {
        assert!(SensorArray::new(100.0, SensorConfig::ideal(0, 60.0), 0).is_err());
        assert!(SensorArray::new(0.0, SensorConfig::ideal(2, 60.0), 0).is_err());
        assert!(SensorArray::new(100.0, SensorConfig::ideal(2, 0.0), 0).is_err());
        assert!(SensorArray::new(100.0, SensorConfig::ideal(2, 60.0).with_noise(-1.0), 0).is_err());

        let field = default_field();
        let mut array = SensorArray::new(100.0, SensorConfig::ideal(2, 60.0), 0).unwrap();
        assert!(array.measure(&field, &[]).is_err());
        assert!(array.measure(&field, &[1.0, 0.5]).is_err());
        assert!(array.measure(&field, &[1.0, 1.0]).is_err());
    }
}
