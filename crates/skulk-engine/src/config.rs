//! Driver configuration.
//!
//! Provides run parameters (seed, frame rates, frame cap), the scripted
//! pilot's tuning and the full simulation tuning. Configuration can be loaded
//! from and saved to a TOML file.

use serde::{Deserialize, Serialize};
use skulk_common::{SkulkError, SkulkResult};
use skulk_gameplay::{Obstacle, SimulationConfig};
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::autopilot::AutopilotConfig;

/// Configuration file name.
const CONFIG_FILE: &str = "skulk.toml";

/// Nominal railgun reach used by the driver.
const DEFAULT_BEAM_LENGTH: f32 = 1000.0;

/// Driver configuration parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // === Run Settings ===
    /// Simulation seed (None = derived from the clock)
    pub seed: Option<u64>,
    /// Driver frames per second
    pub frame_rate: u32,
    /// Fixed simulation updates per second
    pub fixed_hz: u32,
    /// Frame cap before the run is called a draw
    pub max_frames: u64,
    /// Print a JSON run report to stdout when done
    pub print_report: bool,

    // === Pilot Settings ===
    /// Scripted player behavior
    pub autopilot: AutopilotConfig,

    // === Simulation Settings ===
    /// Arena, enemies, weapon and aggression tuning
    pub simulation: SimulationConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let mut simulation = SimulationConfig::default();
        simulation.railgun.beam_length = DEFAULT_BEAM_LENGTH;

        Self {
            seed: None,
            frame_rate: 60,
            fixed_hz: 60,
            max_frames: 60 * 120, // 2 minutes
            print_report: true,
            autopilot: AutopilotConfig::default(),
            simulation,
        }
    }
}

impl EngineConfig {
    /// Load configuration from a specific path.
    /// Returns default config if file doesn't exist or is invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file not found, using defaults");
            return Self::default();
        }

        match fs::File::open(path) {
            Ok(mut file) => {
                let mut contents = String::new();
                if let Err(e) = file.read_to_string(&mut contents) {
                    warn!("Failed to read config file: {e}");
                    return Self::default();
                }

                match toml::from_str(&contents) {
                    Ok(config) => {
                        info!("Loaded config from {}", path.display());
                        config
                    },
                    Err(e) => {
                        warn!("Failed to parse config file: {e}");
                        Self::default()
                    },
                }
            },
            Err(e) => {
                warn!("Failed to open config file: {e}");
                Self::default()
            },
        }
    }

    /// Save configuration to a specific path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> SkulkResult<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents =
            toml::to_string_pretty(self).map_err(|e| SkulkError::Serialization(e.to_string()))?;

        let mut file = fs::File::create(path)?;
        file.write_all(contents.as_bytes())?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn config_path() -> PathBuf {
        if let Some(config_dir) = dirs_config_path() {
            config_dir.join("skulk").join(CONFIG_FILE)
        } else {
            PathBuf::from(CONFIG_FILE)
        }
    }

    /// Clamp run parameters into sensible ranges.
    ///
    /// Simulation tuning is checked separately by
    /// [`SimulationConfig::validate`], which rejects rather than clamps.
    pub fn validate(&mut self) {
        self.frame_rate = self.frame_rate.clamp(10, 240);
        self.fixed_hz = self.fixed_hz.clamp(10, 240);
        self.max_frames = self.max_frames.clamp(1, 60 * 60 * 60);

        self.autopilot.orbit_radius = self.autopilot.orbit_radius.clamp(0.0, 1000.0);
        self.autopilot.orbit_speed = self.autopilot.orbit_speed.clamp(-5.0, 5.0);

        let sim = &mut self.simulation;
        sim.enemy_count = sim.enemy_count.min(256);
        sim.obstacles.retain(|o: &Obstacle| o.radius.is_finite() && o.radius > 0.0);
    }

    /// Seed to run with, falling back to the wall clock.
    #[must_use]
    pub fn resolved_seed(&self) -> u64 {
        self.seed.unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map_or(0, |d| d.as_nanos() as u64)
        })
    }
}

/// Get platform-specific config directory.
fn dirs_config_path() -> Option<PathBuf> {
    #[cfg(target_os = "macos")]
    {
        std::env::var("HOME")
            .ok()
            .map(|home| PathBuf::from(home).join("Library/Application Support"))
    }

    #[cfg(target_os = "windows")]
    {
        std::env::var("APPDATA").ok().map(PathBuf::from)
    }

    #[cfg(target_os = "linux")]
    {
        std::env::var("XDG_CONFIG_HOME")
            .ok()
            .map(PathBuf::from)
            .or_else(|| {
                std::env::var("HOME")
                    .ok()
                    .map(|h| PathBuf::from(h).join(".config"))
            })
    }

    #[cfg(not(any(target_os = "macos", target_os = "windows", target_os = "linux")))]
    {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.fixed_hz, 60);
        assert_eq!(config.seed, None);
        assert!((config.simulation.railgun.beam_length - 1000.0).abs() < f32::EPSILON);
        assert_eq!(config.simulation.enemy_count, 5);
        assert!(config.simulation.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = EngineConfig::default();

        config.frame_rate = 0;
        config.max_frames = 0;
        config.simulation.enemy_count = 10_000;
        config.simulation.obstacles.push(Obstacle::new(10.0, 10.0, -5.0));

        config.validate();

        assert_eq!(config.frame_rate, 10);
        assert_eq!(config.max_frames, 1);
        assert_eq!(config.simulation.enemy_count, 256);
        assert_eq!(config.simulation.obstacles.len(), 3);
    }

    #[test]
    fn test_config_save_load() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("nested").join("skulk.toml");

        let mut config = EngineConfig::default();
        config.seed = Some(12345);
        config.simulation.enemy_count = 9;
        config.simulation.aggression.max_attackers = 6;
        config.autopilot.fire = false;

        config.save_to(&config_path).expect("Failed to save config");

        let loaded = EngineConfig::load_from(&config_path);
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_config_load_missing_file() {
        let config = EngineConfig::load_from("/nonexistent/path/skulk.toml");
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_config_load_partial_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("skulk.toml");
        fs::write(
            &config_path,
            "seed = 7\n\n[simulation]\nenemy_count = 12\n\n[simulation.arena]\nwidth = 1600.0\n",
        )
        .expect("Failed to write config");

        let config = EngineConfig::load_from(&config_path);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.simulation.enemy_count, 12);
        assert!((config.simulation.arena.width - 1600.0).abs() < f32::EPSILON);
        assert!((config.simulation.arena.height - 800.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_config_load_garbage_falls_back() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("skulk.toml");
        fs::write(&config_path, "seed = [not toml").expect("Failed to write config");

        assert_eq!(EngineConfig::load_from(&config_path), EngineConfig::default());
    }

    #[test]
    fn test_resolved_seed() {
        let mut config = EngineConfig::default();
        config.seed = Some(99);
        assert_eq!(config.resolved_seed(), 99);
    }
}
