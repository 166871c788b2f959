//! Process configuration.
//!
//! `GameConfig` carries the simulation tuning values and is fixed for the
//! lifetime of the process. `ServerConfig` carries the listener settings and is
//! read from the environment.

use serde::{Deserialize, Serialize};
use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Fastest supported simulation; the tick interval is whole milliseconds.
pub const MAX_TICK_RATE: u32 = 1000;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
  #[error("{field} must be positive and finite, got {value}")]
  NotPositive { field: &'static str, value: f64 },

  #[error("boost_speed ({boost}) must not be lower than base_speed ({base})")]
  BoostSlowerThanBase { base: f64, boost: f64 },

  #[error("tick_rate ({tick_rate}) must not exceed 1000 ticks per second")]
  TickRateTooHigh { tick_rate: u32 },

  #[error("initial_segments must be at least 1")]
  NoSegments,
}

/// Simulation tuning shared read-only by every game component.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GameConfig {
  pub world_width: f64,
  pub world_height: f64,
  /// Simulation ticks per second.
  pub tick_rate: u32,
  pub initial_segments: usize,
  /// Maximum distance between two consecutive segments.
  pub segment_spacing: f64,
  pub base_speed: f64,
  pub boost_speed: f64,
  /// Maximum heading change per tick, in radians.
  pub max_turn_rate: f64,
  /// Target orb population held by replenishment.
  pub orb_count: usize,
  pub bot_count: usize,
  pub leaderboard_size: usize,
  pub leaderboard_interval_ms: u64,
  /// Delay between a death and the removal of the registry entry.
  pub removal_grace_ms: u64,
  pub bot_respawn_ms: u64,
}

impl Default for GameConfig {
  fn default() -> Self {
    Self {
      world_width: 3000.0,
      world_height: 3000.0,
      tick_rate: 20,
      initial_segments: 10,
      segment_spacing: 5.0,
      base_speed: 3.0,
      boost_speed: 6.0,
      max_turn_rate: 0.15,
      orb_count: 500,
      bot_count: 5,
      leaderboard_size: 10,
      leaderboard_interval_ms: 2000,
      removal_grace_ms: 1000,
      bot_respawn_ms: 3000,
    }
  }
}

impl GameConfig {
  /// Reads a JSON file of overrides; missing fields keep their defaults.
  pub fn from_file(path: &Path) -> anyhow::Result<Self> {
    let contents = std::fs::read_to_string(path)?;
    let config: Self = serde_json::from_str(&contents)?;
    config.validate()?;
    Ok(config)
  }

  pub fn validate(&self) -> Result<(), ConfigError> {
    let positive = [
      ("world_width", self.world_width),
      ("world_height", self.world_height),
      ("tick_rate", self.tick_rate as f64),
      ("segment_spacing", self.segment_spacing),
      ("base_speed", self.base_speed),
      ("boost_speed", self.boost_speed),
      ("max_turn_rate", self.max_turn_rate),
    ];
    for (field, value) in positive {
      if !value.is_finite() || value <= 0.0 {
        return Err(ConfigError::NotPositive { field, value });
      }
    }
    if self.boost_speed < self.base_speed {
      return Err(ConfigError::BoostSlowerThanBase {
        base: self.base_speed,
        boost: self.boost_speed,
      });
    }
    if self.initial_segments == 0 {
      return Err(ConfigError::NoSegments);
    }
    if self.tick_rate > MAX_TICK_RATE {
      return Err(ConfigError::TickRateTooHigh {
        tick_rate: self.tick_rate,
      });
    }
    Ok(())
  }

  pub fn tick_interval(&self) -> Duration {
    let rate = self.tick_rate.clamp(1, MAX_TICK_RATE) as u64;
    Duration::from_millis(1000 / rate)
  }

  pub fn leaderboard_interval(&self) -> Duration {
    Duration::from_millis(self.leaderboard_interval_ms.max(1))
  }

  /// Converts a wall-clock delay into a whole number of ticks, rounding up.
  pub fn ticks_for_ms(&self, ms: u64) -> u64 {
    let rate = self.tick_rate.max(1) as u64;
    (ms * rate).div_ceil(1000)
  }
}

/// Listener settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
  pub bind_address: IpAddr,
  pub port: u16,
  pub game_config_path: Option<PathBuf>,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      bind_address: IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)),
      port: 8787,
      game_config_path: None,
    }
  }
}

impl ServerConfig {
  pub fn load_or_default() -> Self {
    let mut config = Self::default();

    if let Ok(addr) = env::var("BIND_ADDRESS") {
      match addr.parse() {
        Ok(parsed) => config.bind_address = parsed,
        Err(_) => tracing::warn!("invalid BIND_ADDRESS '{addr}', using default"),
      }
    }

    if let Ok(port) = env::var("PORT") {
      match port.parse::<u16>() {
        Ok(parsed) if parsed > 0 => config.port = parsed,
        _ => tracing::warn!("invalid PORT '{port}', using default"),
      }
    }

    config.game_config_path = env::var("GAME_CONFIG")
      .ok()
      .map(|value| value.trim().to_string())
      .filter(|value| !value.is_empty())
      .map(PathBuf::from);

    config
  }

  pub fn socket_addr(&self) -> SocketAddr {
    SocketAddr::new(self.bind_address, self.port)
  }

  pub fn game_config(&self) -> anyhow::Result<GameConfig> {
    match &self.game_config_path {
      Some(path) => GameConfig::from_file(path),
      None => Ok(GameConfig::default()),
    }
  }
}
