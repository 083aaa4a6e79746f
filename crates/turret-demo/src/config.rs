//! Demo configuration loaded from TOML.

use std::path::{Path, PathBuf};

use anyhow::Context;
use resumable_bt::TreeConfig;
use serde::Deserialize;

/// Driver settings.
///
/// ```toml
/// tick_frame_interval = 3
/// frames = 600
/// tree_asset = "assets/turret.xml"
/// seed = 7
/// trace = true
/// detection_radius = 12.0
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Tick the tree once every this many frames.
    pub tick_frame_interval: u32,
    /// Number of simulated frames.
    pub frames: u32,
    /// Tree asset to load instead of the built-in one.
    pub tree_asset: Option<PathBuf>,
    pub seed: Option<u64>,
    pub trace: bool,
    pub detection_radius: f32,
}

impl DemoConfig {
    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        toml::from_str(content).map_err(|e| anyhow::anyhow!("Failed to parse demo config TOML: {}", e))
    }

    /// Load config data from a TOML file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_toml_str(&content)
    }

    /// Frames between ticks, never less than one.
    pub fn tick_interval(&self) -> u32 {
        self.tick_frame_interval.max(1)
    }

    pub fn tree_config(&self) -> TreeConfig {
        TreeConfig {
            trace: self.trace,
            seed: self.seed,
            ..TreeConfig::default()
        }
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            tick_frame_interval: 1,
            frames: 300,
            tree_asset: None,
            seed: None,
            trace: false,
            detection_radius: 12.0,
        }
    }
}
