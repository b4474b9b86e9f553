use std::env;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

/// Difficulty and presentation parameters. Defaults match the tuning the
/// game shipped with; every field can be overridden through a `ZOMBIES_*`
/// environment variable, no code change needed.
#[derive(Clone, Debug)]
pub struct Config {
    pub grid_size: usize,
    pub obstacle_density: f64,
    pub zombie_count: usize,
    /// Player movement throttle.
    pub player_step_ms: u64,
    /// Zombie movement throttle at the start of a round.
    pub zombie_step_ms: u64,
    /// Fastest the zombies are ever allowed to get.
    pub zombie_step_min_ms: u64,
    /// Interval decrement applied at each escalation.
    pub zombie_speedup_ms: u64,
    /// Escalate once per this many accepted player moves.
    pub zombie_speedup_every: u32,
    pub render_fps: u64,
    /// Seeded runs reproduce the same grids and placements.
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            grid_size: 14,
            obstacle_density: 0.3,
            zombie_count: 1,
            player_step_ms: 90,
            zombie_step_ms: 200,
            zombie_step_min_ms: 80,
            zombie_speedup_ms: 20,
            zombie_speedup_every: 10,
            render_fps: 60,
            seed: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("grid size must be at least 2, got {0}")]
    GridSize(usize),
    #[error("obstacle density must be within [0, 1], got {0}")]
    ObstacleDensity(f64),
    #[error("zombie count must be at least 1")]
    ZombieCount,
    #[error("{0} must be greater than zero")]
    ZeroInterval(&'static str),
    #[error("minimum zombie interval {min} ms exceeds the base interval {base} ms")]
    IntervalFloor { base: u64, min: u64 },
}

impl Config {
    pub fn from_env() -> Config {
        let mut config = Config::default();
        if let Some(v) = env_parse("ZOMBIES_GRID_SIZE") {
            config.grid_size = v;
        }
        if let Some(v) = env_parse("ZOMBIES_DENSITY") {
            config.obstacle_density = v;
        }
        if let Some(v) = env_parse("ZOMBIES_COUNT") {
            config.zombie_count = v;
        }
        if let Some(v) = env_parse("ZOMBIES_PLAYER_STEP_MS") {
            config.player_step_ms = v;
        }
        if let Some(v) = env_parse("ZOMBIES_STEP_MS") {
            config.zombie_step_ms = v;
        }
        if let Some(v) = env_parse("ZOMBIES_STEP_MIN_MS") {
            config.zombie_step_min_ms = v;
        }
        if let Some(v) = env_parse("ZOMBIES_SPEEDUP_MS") {
            config.zombie_speedup_ms = v;
        }
        if let Some(v) = env_parse("ZOMBIES_SPEEDUP_EVERY") {
            config.zombie_speedup_every = v;
        }
        if let Some(v) = env_parse("ZOMBIES_FPS") {
            config.render_fps = v;
        }
        if let Some(v) = env_parse("ZOMBIES_SEED") {
            config.seed = Some(v);
        }
        config
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_size < 2 {
            return Err(ConfigError::GridSize(self.grid_size));
        }
        if !(0.0..=1.0).contains(&self.obstacle_density) {
            return Err(ConfigError::ObstacleDensity(self.obstacle_density));
        }
        if self.zombie_count == 0 {
            return Err(ConfigError::ZombieCount);
        }
        if self.player_step_ms == 0 {
            return Err(ConfigError::ZeroInterval("player step interval"));
        }
        if self.zombie_step_ms == 0 {
            return Err(ConfigError::ZeroInterval("zombie step interval"));
        }
        if self.zombie_step_min_ms == 0 {
            return Err(ConfigError::ZeroInterval("minimum zombie step interval"));
        }
        if self.zombie_speedup_every == 0 {
            return Err(ConfigError::ZeroInterval("speed-up move cadence"));
        }
        if self.render_fps == 0 {
            return Err(ConfigError::ZeroInterval("render FPS"));
        }
        if self.zombie_step_min_ms > self.zombie_step_ms {
            return Err(ConfigError::IntervalFloor {
                base: self.zombie_step_ms,
                min: self.zombie_step_min_ms,
            });
        }
        Ok(())
    }

    pub fn player_step(&self) -> Duration {
        Duration::from_millis(self.player_step_ms)
    }
}

fn env_parse<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}
