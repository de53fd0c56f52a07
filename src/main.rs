use anyhow::Result;
use log::{debug, error, info, trace};
use std::fs::File;
use std::io::Write;
use std::time::Instant;

use gas_common::config::SimulationConfig;
use gas_common::snapshot::Snapshot;
use gas_engine::simulation::{GasSimulation, Simulatable};

fn main() -> Result<()> {
    // Initialize the logger
    env_logger::init();

    info!("Starting ideal gas engine...");

    // --- Load Configuration ---
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());
    let config = SimulationConfig::load(&config_path)?;

    // --- Initialize Simulation ---
    let mut sim = GasSimulation::new();
    sim.init(&config)?;
    info!("World initialized with {} molecules.", config.molecules.count);
    debug!("Configuration: {:#?}", config);

    let total_steps = config.timing.total_steps;
    let record_interval_steps = config.timing.record_interval_steps.max(1);
    info!(
        "Recording snapshot every {} steps ({:.2} time units).",
        record_interval_steps,
        f64::from(record_interval_steps) * config.physics.delta_t
    );

    // The driver owns the snapshot history; the engine only hands out copies.
    let mut recorded: Vec<Snapshot> = Vec::new();

    // --- Initial Snapshot (t = 0) ---
    recorded.push(sim.snapshot()?);

    info!("Starting simulation loop for {} steps...", total_steps);
    let start_time = Instant::now();
    let mut previous_print_time = start_time;

    for step in 0..total_steps {
        let step_start_time = Instant::now();
        if let Err(e) = sim.step() {
            error!("Error during simulation step {}: {}", step + 1, e);
            anyhow::bail!("Simulation step failed.");
        }
        let step_duration = step_start_time.elapsed();

        let current_time = Instant::now();
        let print_interval_secs = 5.0;
        let should_print_status =
            current_time.duration_since(previous_print_time).as_secs_f64() >= print_interval_secs;
        let is_record_step = (step + 1) % record_interval_steps == 0;
        let is_last_step = step + 1 == total_steps;

        if should_print_status || is_record_step || is_last_step {
            let snapshot = sim.snapshot()?;
            let current_sim_time = f64::from(step + 1) * config.physics.delta_t;
            let elapsed_total = start_time.elapsed();

            info!(
                "Step [{}/{}] ({:.2} time units) | Pressure: {:.2} | Avg speed: {:.2} | Step time: {:6.2} ms | Elapsed: {:.2} s",
                step + 1,
                total_steps,
                current_sim_time,
                snapshot.average_pressure,
                snapshot.average_speed,
                step_duration.as_secs_f64() * 1000.0,
                elapsed_total.as_secs_f64()
            );
            previous_print_time = current_time;

            // --- Record Snapshot ---
            if is_record_step || is_last_step {
                recorded.push(snapshot);
            }
        } else {
            trace!(
                "Step [{}/{}] completed in {:.2} ms",
                step + 1,
                total_steps,
                step_duration.as_secs_f64() * 1000.0
            );
        }
    }

    let total_duration = start_time.elapsed();
    info!(
        "Simulation finished in {:.3} seconds ({} snapshots recorded).",
        total_duration.as_secs_f64(),
        recorded.len()
    );

    // --- Save Recorded Data ---
    if config.output.save_snapshots {
        let output_format = config.output.format.as_deref().unwrap_or("json");
        save_snapshots(output_format, &config.output.base_filename, &recorded);
    } else {
        info!("Skipping saving snapshots as per config (save_snapshots is false).");
    }

    // Save final positions if requested (separate from full snapshots)
    if config.output.save_final_positions {
        let snapshot = sim.snapshot()?;
        let filename = format!("{}_final_positions.csv", config.output.base_filename);

        match csv::Writer::from_path(&filename) {
            Ok(mut writer) => {
                writer.write_record(["x", "y"])?;
                for molecule in &snapshot.molecules {
                    writer.write_record([format!("{:.4}", molecule.x), format!("{:.4}", molecule.y)])?;
                }
                writer.flush()?;
                info!("Final positions saved to {}", filename);
            }
            Err(e) => error!("Error saving CSV file '{}': {}", filename, e),
        }
    } else {
        info!("Skipping saving final positions as per config.");
    }

    info!("Simulation Complete.");
    Ok(())
}

/// Writes the recorded snapshots in the configured serialization format.
/// Save failures are logged, not fatal; the simulation already ran.
fn save_snapshots(format: &str, base_filename: &str, snapshots: &[Snapshot]) {
    match format {
        "json" => save_snapshots_json(base_filename, snapshots),
        "bincode" => {
            // Binary format (much more compact)
            let filename = format!("{}_snapshots.bin", base_filename);
            match File::create(&filename) {
                Ok(file) => match bincode::serialize_into(file, snapshots) {
                    Ok(()) => info!("All snapshots saved to {} (binary format)", filename),
                    Err(e) => error!("Error serializing snapshots to bincode: {}", e),
                },
                Err(e) => error!("Error creating snapshot file '{}': {}", filename, e),
            }
        }
        "messagepack" => {
            // MessagePack format (compact and cross-platform)
            let filename = format!("{}_snapshots.msgpack", base_filename);
            match File::create(&filename) {
                Ok(mut file) => match rmp_serde::encode::write(&mut file, &snapshots) {
                    Ok(()) => info!("All snapshots saved to {} (MessagePack format)", filename),
                    Err(e) => error!("Error serializing snapshots to MessagePack: {}", e),
                },
                Err(e) => error!("Error creating snapshot file '{}': {}", filename, e),
            }
        }
        other => {
            error!("Unknown output format: {}. Using JSON instead.", other);
            save_snapshots_json(base_filename, snapshots);
        }
    }
}

fn save_snapshots_json(base_filename: &str, snapshots: &[Snapshot]) {
    let filename = format!("{}_snapshots.json", base_filename);
    match File::create(&filename) {
        Ok(mut file) => match serde_json::to_string(snapshots) {
            Ok(json_string) => {
                if let Err(e) = file.write_all(json_string.as_bytes()) {
                    error!("Error writing snapshot JSON to file '{}': {}", filename, e);
                } else {
                    info!("All snapshots saved to {}", filename);
                }
            }
            Err(e) => error!("Error serializing snapshots to JSON: {}", e),
        },
        Err(e) => error!("Error creating snapshot file '{}': {}", filename, e),
    }
}
