//! Shaft thermal simulator — true vs measured temperature profiles.

use shaft_thermal_sim::prelude::*;
use shaft_thermal_sim::units::kelvin_to_celsius;

fn main() {
    env_logger::init();

    println!("╔══════════════════════════════════════════════════════════════════════╗");
    println!("║        SHAFT THERMAL SIMULATOR — Sensor Array vs True Field         ║");
    println!("║                                                                    ║");
    println!("║  100 m shaft · diurnal boundaries · 8 sensors · 60 s cadence       ║");
    println!("╚══════════════════════════════════════════════════════════════════════╝");
    println!();

    let field_params = FieldParams {
        gamma: 1.5,
        mid_amplitude_c: 0.6,
        mid_phase_hours: 12.0,
        ..FieldParams::default()
    };
    let settings = SimulationSettings::new()
        .with_hours(2.0)
        .with_frep(0.1)
        .with_start_hr(6.0)
        .with_sensor_dt(60.0)
        .with_n_sensors(8)
        .with_random_noise(0.05)
        .with_sensor_resolution(0.01)
        .with_sensor_accuracy(0.1);

    let result = match run_experiment(&field_params, &settings, 42) {
        Ok(result) => result,
        Err(err) => {
            eprintln!("simulation failed: {}", err);
            std::process::exit(1);
        }
    };

    let m = &result.measurement;

    // ═══════════════════════════════════════
    // Run parameters
    // ═══════════════════════════════════════
    println!("━━━ Run Parameters ━━━");
    println!();
    println!("  Shaft length:       {:.1} m", field_params.shaft_length);
    println!("  Blend exponent:     γ = {}", field_params.gamma);
    println!("  Shots:              {} ({:.2} h → {:.2} h)",
        result.evaluation_times.len(),
        result.evaluation_times[0],
        result.evaluation_times[result.evaluation_times.len() - 1]);
    println!("  Sensor samples:     {} per sensor", m.sample_times.len());
    println!();

    // ═══════════════════════════════════════
    // Per-sensor error budget
    // ═══════════════════════════════════════
    println!("━━━ Per-Sensor Error ━━━");
    println!();
    println!("  {:>3}  {:>8}  {:>11}  {:>10}  {:>10}", "k", "z (m)", "offset (K)", "RMS (K)", "max (K)");
    println!("  {:─>3}  {:─>8}  {:─>11}  {:─>10}  {:─>10}", "", "", "", "", "");

    let rms = m.rms_error();
    let max = m.max_abs_error_per_sensor();
    for (k, &z) in result.sensor_positions.iter().enumerate() {
        println!("  {:>3}  {:>8.2}  {:>+11.4}  {:>10.4}  {:>10.4}",
            k, z, result.calibration_offsets[k], rms[k], max[k]);
    }
    println!();
    println!("  Max |measured − true|: {:.4} K", m.max_abs_error());
    println!();

    // ═══════════════════════════════════════
    // Final-shot profile
    // ═══════════════════════════════════════
    let last = m.time_count() - 1;
    println!("━━━ Profile at t = {:.3} h ━━━", result.evaluation_times[last]);
    println!();
    println!("  {:>8}  {:>10}  {:>12}", "z (m)", "true (°C)", "measured (°C)");
    println!("  {:─>8}  {:─>10}  {:─>12}", "", "", "");
    for (k, &z) in result.sensor_positions.iter().enumerate() {
        println!("  {:>8.2}  {:>10.3}  {:>12.3}",
            z,
            kelvin_to_celsius(m.true_temperatures[(k, last)]),
            kelvin_to_celsius(m.measured_temperatures[(k, last)]));
    }
}
