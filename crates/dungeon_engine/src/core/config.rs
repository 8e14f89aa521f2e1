//! # Unified Configuration System
//!
//! Consolidates the settings for every subsystem of the render pipeline into
//! one serializable structure.
//!
//! ## Configuration Categories
//!
//! - **Render Queue**: Backpressure policy, producer and dispatcher timeouts
//! - **Turns**: How long simulation threads wait for their turn to be rendered
//! - **Logging**: Default log filter
//!
//! Every section has defaults, so a config file only needs the keys it changes:
//!
//! ```toml
//! [render_queue.policy]
//! mode = "block"
//! capacity = 4096
//!
//! [turns]
//! wait_timeout_ms = 500
//! ```

use serde::{Serialize, Deserialize};
use std::time::Duration;

pub use crate::config::{Config, ConfigError};
use crate::render::QueuePolicy;

/// # Render Queue Configuration
///
/// Controls how the queue between simulation threads and the render thread
/// behaves under load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderQueueConfig {
    /// How long a producer may block on a full queue (`Block` policy only)
    pub enqueue_timeout_ms: Option<u64>,
    /// How often an idle dispatcher wakes up to report it is alive
    pub idle_poll_ms: u64,
    /// Backpressure policy when producers outpace the render thread
    pub policy: QueuePolicy,
}

impl RenderQueueConfig {
    /// Producer timeout as a [`Duration`]
    pub fn enqueue_timeout(&self) -> Option<Duration> {
        self.enqueue_timeout_ms.map(Duration::from_millis)
    }

    /// Dispatcher idle poll interval as a [`Duration`]
    pub fn idle_poll(&self) -> Duration {
        Duration::from_millis(self.idle_poll_ms)
    }
}

impl Default for RenderQueueConfig {
    fn default() -> Self {
        Self {
            enqueue_timeout_ms: None,
            idle_poll_ms: 1000,
            policy: QueuePolicy::Unbounded,
        }
    }
}

/// # Turn Configuration
///
/// Settings for the turn barrier that gates simulation on rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TurnConfig {
    /// Upper bound on how long a simulation thread waits for its turn to clear
    pub wait_timeout_ms: u64,
    /// Turn number the clock starts at
    pub starting_turn: i64,
}

impl TurnConfig {
    /// Wait timeout as a [`Duration`]
    pub fn wait_timeout(&self) -> Duration {
        Duration::from_millis(self.wait_timeout_ms)
    }
}

impl Default for TurnConfig {
    fn default() -> Self {
        Self {
            wait_timeout_ms: 5000,
            starting_turn: 0,
        }
    }
}

/// # Logging Configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default `env_logger` filter, e.g. `"info"` or `"dungeon_engine=debug"`
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string() }
    }
}

/// # Engine Configuration
///
/// Root configuration object loaded by applications.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Render queue settings
    pub render_queue: RenderQueueConfig,
    /// Turn barrier settings
    pub turns: TurnConfig,
    /// Logging settings
    pub logging: LoggingConfig,
}

impl Config for EngineConfig {}

impl EngineConfig {
    /// Parse a configuration from TOML text and validate it
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.render_queue.policy {
            QueuePolicy::Block { capacity } | QueuePolicy::DropOldest { capacity } if capacity == 0 => {
                return Err(ConfigError::Invalid("Render queue capacity must be at least 1".to_string()));
            }
            _ => {}
        }

        if self.render_queue.idle_poll_ms == 0 {
            return Err(ConfigError::Invalid("Dispatcher idle poll must be at least 1ms".to_string()));
        }

        if self.turns.wait_timeout_ms == 0 {
            return Err(ConfigError::Invalid("Turn wait timeout must be at least 1ms".to_string()));
        }

        if self.logging.level.trim().is_empty() {
            return Err(ConfigError::Invalid("Log level cannot be empty".to_string()));
        }

        Ok(())
    }
}
