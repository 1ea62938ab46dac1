//! Application configuration
//!
//! Configuration is loaded from multiple sources with the following priority (lowest to highest):
//! 1. `config/default.toml` (version controlled)
//! 2. `config/user.toml` (gitignored, user overrides)
//! 3. Environment variables (`TD_SECTION__KEY`)

use figment::{Figment, providers::{Format, Toml, Env}};
use serde::{Serialize, Deserialize};
use std::path::Path;
use thiserror::Error;
use tickdrive_core::{ForceConfig, ForceMode, ProgressConfig};
use tickdrive_math::Vec3;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Frame loop configuration
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Progress tracker configuration
    #[serde(default)]
    pub progress: ProgressConfig,
    /// Force and torque appliers, one per target body
    #[serde(default = "default_appliers")]
    pub appliers: Vec<ApplierConfig>,
    /// Debug configuration
    #[serde(default)]
    pub debug: DebugConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            progress: ProgressConfig::default(),
            appliers: default_appliers(),
            debug: DebugConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from default locations
    ///
    /// Priority (lowest to highest):
    /// 1. `config/default.toml`
    /// 2. `config/user.toml`
    /// 3. Environment variables (`TD_*`)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific config directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let default_path = config_dir.join("default.toml");
        let user_path = config_dir.join("user.toml");

        let mut figment = Figment::new();

        if default_path.exists() {
            figment = figment.merge(Toml::file(&default_path));
        }

        if user_path.exists() {
            figment = figment.merge(Toml::file(&user_path));
        }

        // Environment variables override everything
        // TD_PROGRESS__ACCELERATION=0.5 -> progress.acceleration = 0.5
        figment = figment.merge(Env::prefixed("TD_").split("__"));

        figment.extract().map_err(ConfigError::from)
    }
}

/// Frame loop configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Seconds per simulated frame
    pub fixed_timestep: f32,
    /// Total simulated time in seconds
    pub duration_seconds: f32,
    /// Longest step handed to the accumulators
    pub max_frame_time: f32,
}

impl SimulationConfig {
    /// Reject step lengths that would stall or reverse the loop
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("fixed_timestep", self.fixed_timestep),
            ("max_frame_time", self.max_frame_time),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Simulation { field, value });
            }
        }
        Ok(())
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            fixed_timestep: 1.0 / 60.0,
            duration_seconds: 20.0,
            max_frame_time: 0.25,
        }
    }
}

/// One force/torque applier and the stand-in body it drives
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplierConfig {
    /// Name used in log output
    pub name: String,
    /// Application mode
    #[serde(default)]
    pub mode: ForceMode,
    /// Force direction or torque axis [x, y, z]
    ///
    /// Defaults to forward for force modes and up for torque modes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<[f32; 3]>,
    /// Force, impulse or torque magnitude
    #[serde(default = "default_magnitude")]
    pub magnitude: f32,
    /// Damping factor for damped torque (0-10)
    #[serde(default = "default_damping")]
    pub damping_factor: f32,
    /// Apply as acceleration / velocity change
    #[serde(default)]
    pub ignore_mass: bool,
    /// Angular velocity reported by the stand-in body [x, y, z]
    #[serde(default)]
    pub angular_velocity: [f32; 3],
    /// Re-arm one-shot modes every N seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rearm_every: Option<f32>,
}

impl ApplierConfig {
    /// Create an applier config with defaults for everything but mode and direction
    pub fn new(name: impl Into<String>, mode: ForceMode, direction: [f32; 3]) -> Self {
        Self {
            name: name.into(),
            mode,
            direction: Some(direction),
            magnitude: default_magnitude(),
            damping_factor: default_damping(),
            ignore_mass: false,
            angular_velocity: [0.0; 3],
            rearm_every: None,
        }
    }

    /// Convert to the accumulator configuration
    pub fn to_force_config(&self) -> ForceConfig {
        let direction = self.direction.map_or_else(|| default_direction(self.mode), Vec3::from);
        ForceConfig::force(self.mode, direction, self.magnitude)
            .with_damping(self.damping_factor)
            .with_ignore_mass(self.ignore_mass)
    }
}

fn default_direction(mode: ForceMode) -> Vec3 {
    if mode.is_torque() {
        Vec3::UP
    } else {
        Vec3::FORWARD
    }
}

fn default_magnitude() -> f32 {
    1000.0
}

fn default_damping() -> f32 {
    1.0
}

fn default_appliers() -> Vec<ApplierConfig> {
    let forward = Vec3::FORWARD.to_array();
    let mut kicker = ApplierConfig::new("kicker", ForceMode::Impulse, forward);
    kicker.rearm_every = Some(5.0);

    let mut spinner = ApplierConfig::new("spinner", ForceMode::DampedTorque, Vec3::UP.to_array());
    spinner.angular_velocity = [0.0, 0.0, 400.0];

    vec![
        ApplierConfig::new("pusher", ForceMode::Continuous, forward),
        kicker,
        spinner,
    ]
}

/// Debug configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebugConfig {
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
    /// Seconds between state reports (0 disables them)
    pub report_interval: f32,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            report_interval: 1.0,
        }
    }
}

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration error: {0}")]
    Load(#[from] figment::Error),

    #[error("simulation.{field} must be positive, got {value}")]
    Simulation { field: &'static str, value: f32 },

    #[error("Invalid progress settings: {0}")]
    Progress(#[source] tickdrive_core::ConfigError),

    #[error("Invalid applier '{name}': {source}")]
    Applier {
        name: String,
        #[source]
        source: tickdrive_core::ConfigError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.progress.num_phases, 6);
        assert_eq!(config.debug.log_level, "info");
        assert!((config.simulation.fixed_timestep - 1.0 / 60.0).abs() < 1e-6);
        assert_eq!(config.appliers.len(), 3);
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml = toml::to_string(&config).unwrap();
        assert!(toml.contains("acceleration"));
        assert!(toml.contains("damped_torque"));
        assert!(toml.contains("rearm_every"));
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config: AppConfig = Figment::new()
            .merge(Toml::string("[progress]\nacceleration = 0.5\n"))
            .extract()
            .unwrap();
        assert_eq!(config.progress.acceleration, 0.5);
        assert_eq!(config.progress.base_speed, 0.1);
        assert_eq!(config.appliers.len(), 3);
    }

    #[test]
    fn test_applier_table_parsing() {
        let source = r#"
            [[appliers]]
            name = "brake"
            mode = "damped_torque"
            direction = [0.0, 0.0, 2.0]
            damping_factor = 3.0
            angular_velocity = [0.0, 0.0, 1.0]
        "#;
        let config: AppConfig = Figment::new().merge(Toml::string(source)).extract().unwrap();
        assert_eq!(config.appliers.len(), 1);

        let applier = &config.appliers[0];
        assert_eq!(applier.name, "brake");
        assert_eq!(applier.mode, ForceMode::DampedTorque);
        assert_eq!(applier.magnitude, 1000.0);
        assert!(applier.rearm_every.is_none());

        let force = applier.to_force_config();
        assert_eq!(force.direction, Vec3::new(0.0, 0.0, 2.0));
        assert_eq!(force.damping_factor, 3.0);
    }

    #[test]
    fn test_applier_direction_defaults_by_mode() {
        let source = r#"
            [[appliers]]
            name = "pusher"
            mode = "continuous"

            [[appliers]]
            name = "spinner"
            mode = "constant_torque"
        "#;
        let config: AppConfig = Figment::new().merge(Toml::string(source)).extract().unwrap();
        assert!(config.appliers[0].direction.is_none());
        assert_eq!(config.appliers[0].to_force_config().direction, Vec3::FORWARD);
        assert_eq!(config.appliers[1].to_force_config().direction, Vec3::UP);
    }

    #[test]
    fn test_error_display() {
        let err = ConfigError::Applier {
            name: "kicker".to_string(),
            source: tickdrive_core::ConfigError::ZeroPhaseCount,
        };
        assert!(err.to_string().contains("kicker"));
    }
}
