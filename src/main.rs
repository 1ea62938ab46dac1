//! tickdrive - headless accumulator demo
//!
//! Runs the configured progress tracker and appliers through a fixed-step
//! loop and logs what they would have applied.

use tickdrive::config::AppConfig;
use tickdrive::logging;
use tickdrive::systems::SimulationSystem;
use tickdrive_core::PhaseChange;

fn main() {
    // Load configuration before logging so the configured level applies
    let (config, load_error) = match AppConfig::load() {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    logging::init(&config.debug.log_level);
    log::info!("Starting tickdrive");
    if let Some(e) = load_error {
        log::warn!("Failed to load config: {}. Using defaults.", e);
    }

    let mut sim = match SimulationSystem::from_config(&config) {
        Ok(sim) => sim,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };

    sim.tracker_mut().subscribe(|change: PhaseChange| {
        log::debug!("Observer saw {} -> {}", change.previous, change.current);
    });
    sim.begin();

    let dt = config.simulation.fixed_timestep;
    let frames = (config.simulation.duration_seconds / dt).ceil().max(0.0) as u64;
    log::info!("Simulating {} frames of {:.4}s", frames, dt);

    for _ in 0..frames {
        sim.update(dt);
    }

    sim.summarize();
}
