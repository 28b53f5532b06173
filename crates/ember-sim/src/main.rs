//! # Ember Sim
//!
//! Headless driver for Ember AI controllers.
//!
//! Loads a TOML scenario, spawns its actors and steps every controller at a
//! fixed `dt`, logging state changes as they happen.
//!
//! ```text
//! ember-sim [scenario.toml] [frames]
//! ember-sim --init <scenario.toml>
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

mod config;
mod world;

use anyhow::{Context, Result};
use config::{SimConfig, DEFAULT_SCENARIO};
use ember_ai::Actor;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use world::World;

/// Main entry point.
fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("ember=info".parse()?))
        .init();

    info!("Ember sim starting...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let mut args = std::env::args().skip(1);
    let path = args.next().unwrap_or_else(|| DEFAULT_SCENARIO.to_string());
    if path == "--init" {
        let target = args.next().context("--init needs a scenario path")?;
        SimConfig::default()
            .save_to(&target)
            .with_context(|| format!("failed to write {target}"))?;
        return Ok(());
    }

    let mut config = SimConfig::load_from(&path);
    if let Some(frames) = args.next() {
        config.frames = frames
            .parse()
            .with_context(|| format!("invalid frame count `{frames}`"))?;
    }
    config.validate();

    info!(
        actors = config.actors.len(),
        frames = config.frames,
        dt = config.dt,
        "Running {:.1}s of simulated time",
        config.duration()
    );

    let mut world = World::new(&config);
    let report = world.run(config.frames);

    for actor in world.actors() {
        info!(
            state = ?world.state_of(actor.name()),
            talking = actor.is_talking(),
            "{} ends at ({:.1}, {:.1})",
            actor.name(),
            actor.position().x,
            actor.position().z,
        );
    }
    info!(
        frames = report.frames,
        transitions = report.transitions,
        attacks = report.attacks,
        healed = report.healed,
        defeated = ?report.defeated,
        "Ember sim finished"
    );
    Ok(())
}
