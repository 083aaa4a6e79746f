//! Turret demo: a host driver for the resumable behavior tree engine.
//!
//! A turret guards the origin while a player wanders around it. The tree is
//! ticked once every `tick_frame_interval` frames; between ticks the engine
//! holds the suspended branch (typically a rotation in progress).

pub mod arena;
pub mod behaviors;
pub mod config;

use std::sync::Arc;

use anyhow::{Context, Result};
use rand::SeedableRng;
use rand::rngs::StdRng;
use resumable_bt::{NodeRegistry, TreeController};
use tracing::{debug, info};

pub use arena::Arena;
pub use config::DemoConfig;

/// Tree used when no asset path is configured.
pub const TURRET_TREE: &str = include_str!("../assets/turret.xml");

/// Outcome of a simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub frames: u32,
    pub ticks: u64,
    pub shots: i64,
}

/// Builds a controller with the turret leaves and the configured tree.
pub fn build_controller(config: &DemoConfig) -> Result<TreeController<Arena>> {
    let mut registry = NodeRegistry::with_builtins();
    behaviors::register(&mut registry)?;

    let mut controller = TreeController::from_config(Arc::new(registry), &config.tree_config());
    match &config.tree_asset {
        Some(path) => controller
            .load(path)
            .with_context(|| format!("Failed to load tree asset {}", path.display()))?,
        None => controller.deserialize(TURRET_TREE)?,
    }
    controller.set_host(Arena::new(config.detection_radius));
    Ok(controller)
}

/// Runs the frame loop, ticking the tree every `tick_interval` frames.
pub fn simulate(config: &DemoConfig) -> Result<Summary> {
    let mut controller = build_controller(config)?;
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let interval = config.tick_interval();
    info!(frames = config.frames, interval, "simulation started");

    for frame in 0..config.frames {
        if let Some(arena) = controller.host_mut() {
            arena.step(&mut rng);
        }
        if frame % interval != 0 {
            continue;
        }
        let status = controller.tick()?;
        debug!(frame, ?status, "tree ticked");
    }

    let summary = Summary {
        frames: config.frames,
        ticks: controller.tick_count(),
        shots: controller.blackboard().get_int(behaviors::SHOTS).unwrap_or(0),
    };
    info!(ticks = summary.ticks, shots = summary.shots, "simulation finished");
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_tree_loads() {
        let controller = build_controller(&DemoConfig::default()).unwrap();
        let hierarchy = controller.nodes_hierarchy();

        assert_eq!(hierarchy.len(), 7);
        let leaves = controller
            .registry()
            .menu_entries()
            .filter(|(_, path)| path.starts_with("Leaf/"))
            .count();
        assert_eq!(leaves, 4);
    }

    #[test]
    fn ticks_follow_frame_interval() {
        let config = DemoConfig {
            tick_frame_interval: 3,
            frames: 10,
            seed: Some(2),
            ..DemoConfig::default()
        };

        let summary = simulate(&config).unwrap();
        assert_eq!(summary.ticks, 4);
    }

    #[test]
    fn turret_fires_at_a_player_in_range() {
        let config = DemoConfig {
            frames: 200,
            seed: Some(9),
            // Covers the whole arena
            detection_radius: 100.0,
            ..DemoConfig::default()
        };

        let summary = simulate(&config).unwrap();
        assert_eq!(summary.ticks, 200);
        assert!(summary.shots > 0);
    }

    #[test]
    fn configured_asset_is_loaded_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan_only.xml");
        std::fs::write(
            &path,
            r#"<Tree><Repeater name="Loop" x="0" y="0" loops="-1"><Scan name="Scan" x="0" y="0" /></Repeater></Tree>"#,
        )
        .unwrap();
        let config = DemoConfig {
            tree_asset: Some(path),
            frames: 5,
            seed: Some(1),
            ..DemoConfig::default()
        };

        let summary = simulate(&config).unwrap();
        assert_eq!(summary.shots, 0);
        assert_eq!(summary.ticks, 5);
    }
}
