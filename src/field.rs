//! Analytic temperature field inside a vertical shaft.
//!
//! Two diurnal boundary conditions (surface and bottom) are blended
//! vertically with a power-law weight, and a mid-depth perturbation with its
//! own phase is superimposed:
//!
//! ```text
//! T_surface(t) = T̄_s + A_s · sin(2π(t − φ_s)/24)
//! T_bottom(t)  = T̄_b + A_b · sin(2π(t − φ_b)/24)
//!
//! h     = 1 − z/L              (normalised height above the bottom)
//! α     = h^γ
//! T(t,z) = (1 − α)·T_bottom + α·T_surface + A_mid · h(1 − h) · sin(2π(t − φ_mid)/24)
//! ```
//!
//! `z` is depth below the surface in metres, so `z = 0` is the surface and
//! `z = L` the bottom. `h(1 − h)` vanishes at both ends, so the boundary
//! values match the boundary formulas exactly for every γ and mid amplitude.
//! Depths outside `[0, L]` are not clamped: the same formula extrapolates,
//! and for `z > L` with non-integer γ the power is undefined (NaN).
//!
//! All outputs are in Kelvin; means are given in °C and converted once.

use crate::error::{require_finite, require_positive, Result};
use crate::units::{celsius_to_kelvin, diurnal};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Anything that can report a temperature (K) at time `t_hours` and depth `z`.
///
/// The sensor array only depends on this interface, so any field model can
/// be observed.
pub trait ThermalField {
    /// Temperature at a single instant and depth.
    fn temperature(&self, t_hours: f64, z: f64) -> f64;

    /// Temperature at one depth for every time in `times`.
    fn temperatures(&self, times: &[f64], z: f64) -> Vec<f64> {
        times.iter().map(|&t| self.temperature(t, z)).collect()
    }
}

/// Construction parameters for [`TemperatureField`], in caller units.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FieldParams {
    /// Shaft length L (m)
    pub shaft_length: f64,
    /// Surface mean temperature (°C)
    pub surface_mean_c: f64,
    /// Surface diurnal amplitude (°C)
    pub surface_amplitude_c: f64,
    /// Surface phase shift (hours)
    pub surface_phase_hours: f64,
    /// Bottom mean temperature (°C)
    pub bottom_mean_c: f64,
    /// Bottom diurnal amplitude (°C)
    pub bottom_amplitude_c: f64,
    /// Bottom phase shift (hours)
    pub bottom_phase_hours: f64,
    /// Vertical blend exponent γ: >1 biases toward the bottom, <1 toward the surface
    pub gamma: f64,
    /// Mid-depth perturbation amplitude (°C)
    pub mid_amplitude_c: f64,
    /// Mid-depth perturbation phase shift (hours)
    pub mid_phase_hours: f64,
}

impl Default for FieldParams {
    fn default() -> Self {
        Self {
            shaft_length: 100.0,
            surface_mean_c: 14.0,
            surface_amplitude_c: 2.5,
            surface_phase_hours: 15.0,
            bottom_mean_c: 20.2,
            bottom_amplitude_c: 1.0,
            bottom_phase_hours: 15.0,
            gamma: 1.0,
            mid_amplitude_c: 0.0,
            mid_phase_hours: 15.0,
        }
    }
}

impl FieldParams {
    /// Pure linear gradient between the two boundaries (γ = 1, no mid-depth term).
    pub fn linear(shaft_length: f64) -> Self {
        Self {
            shaft_length,
            ..Self::default()
        }
    }
}

/// Immutable depth- and time-dependent shaft temperature field.
#[derive(Debug, Clone)]
pub struct TemperatureField {
    shaft_length: f64,
    surface_mean_k: f64,
    surface_amplitude: f64,
    surface_phase: f64,
    bottom_mean_k: f64,
    bottom_amplitude: f64,
    bottom_phase: f64,
    gamma: f64,
    mid_amplitude: f64,
    mid_phase: f64,
}

impl TemperatureField {
    /// Build a field, converting mean temperatures to Kelvin.
    pub fn new(params: FieldParams) -> Result<Self> {
        let shaft_length = require_positive("shaft_length", params.shaft_length)?;
        // γ = 0 would make 0^γ = 1 and break the bottom boundary.
        let gamma = require_positive("gamma", params.gamma)?;

        Ok(Self {
            shaft_length,
            surface_mean_k: celsius_to_kelvin(require_finite("surface_mean_c", params.surface_mean_c)?),
            surface_amplitude: require_finite("surface_amplitude_c", params.surface_amplitude_c)?,
            surface_phase: require_finite("surface_phase_hours", params.surface_phase_hours)?,
            bottom_mean_k: celsius_to_kelvin(require_finite("bottom_mean_c", params.bottom_mean_c)?),
            bottom_amplitude: require_finite("bottom_amplitude_c", params.bottom_amplitude_c)?,
            bottom_phase: require_finite("bottom_phase_hours", params.bottom_phase_hours)?,
            gamma,
            mid_amplitude: require_finite("mid_amplitude_c", params.mid_amplitude_c)?,
            mid_phase: require_finite("mid_phase_hours", params.mid_phase_hours)?,
        })
    }

    pub fn shaft_length(&self) -> f64 {
        self.shaft_length
    }

    /// Temperature at the surface (z = 0).
    pub fn surface_temperature(&self, t_hours: f64) -> f64 {
        self.surface_mean_k + diurnal(self.surface_amplitude, self.surface_phase, t_hours)
    }

    /// Temperature at the bottom (z = L).
    pub fn bottom_temperature(&self, t_hours: f64) -> f64 {
        self.bottom_mean_k + diurnal(self.bottom_amplitude, self.bottom_phase, t_hours)
    }

    pub fn surface_temperatures(&self, times: &[f64]) -> Vec<f64> {
        times.iter().map(|&t| self.surface_temperature(t)).collect()
    }

    pub fn bottom_temperatures(&self, times: &[f64]) -> Vec<f64> {
        times.iter().map(|&t| self.bottom_temperature(t)).collect()
    }

    /// Temperature at depth `z` (m below the surface) and time `t_hours`.
    pub fn temperature(&self, t_hours: f64, z: f64) -> f64 {
        let t_top = self.surface_temperature(t_hours);
        let t_bot = self.bottom_temperature(t_hours);

        let h = 1.0 - z / self.shaft_length;

        let alpha = h.powf(self.gamma);
        let base = (1.0 - alpha) * t_bot + alpha * t_top;

        let shape = h * (1.0 - h);
        let delta = self.mid_amplitude * shape * diurnal(1.0, self.mid_phase, t_hours);

        base + delta
    }

    /// Temperature at one depth for every time in `times`.
    pub fn temperatures(&self, times: &[f64], z: f64) -> Vec<f64> {
        times.iter().map(|&t| self.temperature(t, z)).collect()
    }

    /// Vertical profile at a single instant.
    pub fn profile(&self, t_hours: f64, depths: &[f64]) -> Vec<f64> {
        depths.iter().map(|&z| self.temperature(t_hours, z)).collect()
    }
}

impl ThermalField for TemperatureField {
    fn temperature(&self, t_hours: f64, z: f64) -> f64 {
        TemperatureField::temperature(self, t_hours, z)
    }

    fn temperatures(&self, times: &[f64], z: f64) -> Vec<f64> {
        TemperatureField::temperatures(self, times, z)
    }
}
