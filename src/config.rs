//! Layered dashboard configuration.
//!
//! Defaults, then an optional TOML file, then `NETSECURE_*` environment
//! variables (`NETSECURE_REFRESH__INTERVAL_MS=2000`). Command-line flags are
//! applied on top by the binary.

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::source::DEFAULT_BASE_URL;

/// Errors while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_ms: u64,
    /// Serve fixtures from this directory instead of calling the API.
    pub fixtures_dir: Option<PathBuf>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: 3000,
            fixtures_dir: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefreshConfig {
    pub interval_ms: u64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self { interval_ms: 5000 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub fps: u32,
    /// Particle count for the backdrop.
    pub particles: usize,
    /// Particles closer than this (in surface pixels) are linked.
    pub link_distance: f64,
    pub splash_ms: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            fps: 30,
            particles: 50,
            link_distance: 100.0,
            splash_ms: 4000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    pub steps: u32,
    pub step_ms: u64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            steps: 20,
            step_ms: 50,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub file: PathBuf,
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from("netsecure.log"),
            level: "info".to_string(),
        }
    }
}

/// Complete dashboard configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub api: ApiConfig,
    pub refresh: RefreshConfig,
    pub render: RenderConfig,
    pub animation: AnimationConfig,
    pub log: LogConfig,
}

impl DashboardConfig {
    /// Load defaults, the optional file and the environment, then validate.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }
        let config: DashboardConfig = builder
            .add_source(
                Environment::with_prefix("NETSECURE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("refresh.interval_ms", self.refresh.interval_ms),
            ("render.fps", u64::from(self.render.fps)),
            ("animation.steps", u64::from(self.animation.steps)),
            ("animation.step_ms", self.animation.step_ms),
            ("api.timeout_ms", self.api.timeout_ms),
        ];
        for (key, value) in positive {
            if value == 0 {
                return Err(ConfigError::Invalid(format!("{key} must be greater than 0")));
            }
        }
        if !self.render.link_distance.is_finite() || self.render.link_distance <= 0.0 {
            return Err(ConfigError::Invalid(
                "render.link_distance must be a positive number".to_string(),
            ));
        }
        Ok(())
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh.interval_ms)
    }

    /// Time between display frames.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs(1) / self.render.fps.max(1)
    }

    pub fn step_interval(&self) -> Duration {
        Duration::from_millis(self.animation.step_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.api.timeout_ms)
    }

    pub fn splash_duration(&self) -> Duration {
        Duration::from_millis(self.render.splash_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn toml_file(content: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        write!(file, "{content}").unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let config = DashboardConfig::default();
        assert_eq!(config.api.base_url, "http://127.0.0.1:5000");
        assert_eq!(config.refresh_interval(), Duration::from_secs(5));
        assert_eq!(config.animation.steps, 20);
        assert_eq!(config.step_interval(), Duration::from_millis(50));
        assert_eq!(config.render.particles, 50);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_frame_interval() {
        let mut config = DashboardConfig::default();
        config.render.fps = 20;
        assert_eq!(config.frame_interval(), Duration::from_millis(50));
    }

    #[test]
    fn test_load_partial_file() {
        let file = toml_file(
            r#"
            [api]
            base_url = "http://soc.internal:8080"

            [refresh]
            interval_ms = 2000
            "#,
        );
        let config = DashboardConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.api.base_url, "http://soc.internal:8080");
        assert_eq!(config.refresh.interval_ms, 2000);
        // Untouched sections keep their defaults.
        assert_eq!(config.animation.step_ms, 50);
        assert_eq!(config.api.timeout_ms, 3000);
    }

    #[test]
    fn test_load_rejects_zero_interval() {
        let file = toml_file("[refresh]\ninterval_ms = 0\n");
        let err = DashboardConfig::load(Some(file.path())).unwrap_err();
        assert!(err.to_string().contains("refresh.interval_ms"));
    }

    #[test]
    fn test_load_missing_file() {
        let result = DashboardConfig::load(Some(Path::new("/nonexistent/netsecure.toml")));
        assert!(matches!(result, Err(ConfigError::Load(_))));
    }

    #[test]
    fn test_environment_override() {
        std::env::set_var("NETSECURE_LOG__LEVEL", "debug");
        let config = DashboardConfig::load(None).unwrap();
        std::env::remove_var("NETSECURE_LOG__LEVEL");
        assert_eq!(config.log.level, "debug");
    }

    #[test]
    fn test_validate_link_distance() {
        let mut config = DashboardConfig::default();
        config.render.link_distance = f64::NAN;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }
}
