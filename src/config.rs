//! Tunable simulation parameters.
//!
//! Every field has a default from `constants`, so a TOML file only needs to
//! name the values it overrides.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::constants::{
    AGGRESSIVE_PICKUP_THRESHOLD, AGGRESSIVE_SPEED_RATIO, AMBUSHER_LEAD_TILES, BLINK_INTERVAL_MS,
    BLINK_WARNING_MS, COLLISION_RADIUS_RATIO, DEFAULT_MODE_SCHEDULE, EATEN_HOLD_MS,
    FLANKER_LEAD_TILES, GHOST_SCORE, GHOST_SPEED, LEVEL_SPEED_SCALE, LIFE_LOST_DELAY_MS,
    OPPORTUNIST_RETREAT_TILES, PICKUP_SCORE, PLAYER_CORNER_MARGIN, PLAYER_SPEED,
    POWER_PICKUP_SCORE, RESPAWN_DURATION_MS, STARTING_LIVES, TICK_RATE, TILE_SIZE,
    VULNERABLE_DURATION_MS, VULNERABLE_SPEED_RATIO,
};
use crate::error::ConfigError;
use crate::types::GhostMode;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct ModePhase {
    pub until_ms: u64,
    pub mode: GhostMode,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub tick_rate: u32,
    pub tile_size: f32,
    pub player_speed: f32,
    pub player_corner_margin: f32,
    pub ghost_speed: f32,
    pub vulnerable_speed_ratio: f32,
    pub aggressive_speed_ratio: f32,
    pub level_speed_scale: f32,
    pub vulnerable_duration_ms: u64,
    pub blink_warning_ms: u64,
    pub blink_interval_ms: u64,
    pub eaten_hold_ms: u64,
    pub respawn_duration_ms: u64,
    pub life_lost_delay_ms: u64,
    pub aggressive_pickup_threshold: usize,
    pub ambusher_lead_tiles: i32,
    pub flanker_lead_tiles: i32,
    pub opportunist_retreat_tiles: f32,
    pub collision_radius_ratio: f32,
    pub mode_schedule: Vec<ModePhase>,
    pub scoring: ScoringConfig,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub pickup: u32,
    pub power_pickup: u32,
    pub ghost: u32,
    pub starting_lives: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            pickup: PICKUP_SCORE,
            power_pickup: POWER_PICKUP_SCORE,
            ghost: GHOST_SCORE,
            starting_lives: STARTING_LIVES,
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tick_rate: TICK_RATE,
            tile_size: TILE_SIZE,
            player_speed: PLAYER_SPEED,
            player_corner_margin: PLAYER_CORNER_MARGIN,
            ghost_speed: GHOST_SPEED,
            vulnerable_speed_ratio: VULNERABLE_SPEED_RATIO,
            aggressive_speed_ratio: AGGRESSIVE_SPEED_RATIO,
            level_speed_scale: LEVEL_SPEED_SCALE,
            vulnerable_duration_ms: VULNERABLE_DURATION_MS,
            blink_warning_ms: BLINK_WARNING_MS,
            blink_interval_ms: BLINK_INTERVAL_MS,
            eaten_hold_ms: EATEN_HOLD_MS,
            respawn_duration_ms: RESPAWN_DURATION_MS,
            life_lost_delay_ms: LIFE_LOST_DELAY_MS,
            aggressive_pickup_threshold: AGGRESSIVE_PICKUP_THRESHOLD,
            ambusher_lead_tiles: AMBUSHER_LEAD_TILES,
            flanker_lead_tiles: FLANKER_LEAD_TILES,
            opportunist_retreat_tiles: OPPORTUNIST_RETREAT_TILES,
            collision_radius_ratio: COLLISION_RADIUS_RATIO,
            mode_schedule: DEFAULT_MODE_SCHEDULE
                .iter()
                .map(|&(until_ms, mode)| ModePhase { until_ms, mode })
                .collect(),
            scoring: ScoringConfig::default(),
        }
    }
}

impl GameConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_rate == 0 {
            return Err(ConfigError::Invalid("tick_rate must be positive".to_string()));
        }
        for (name, value) in [
            ("tile_size", self.tile_size),
            ("player_speed", self.player_speed),
            ("ghost_speed", self.ghost_speed),
            ("level_speed_scale", self.level_speed_scale),
            ("aggressive_speed_ratio", self.aggressive_speed_ratio),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        // A step of half a tile or more could skip a tile center entirely.
        let fastest = self.ghost_speed
            * self.aggressive_speed_ratio.max(1.0)
            * self.level_speed_scale.max(1.0).powi(8);
        if self.player_speed >= self.tile_size / 2.0 || fastest >= self.tile_size / 2.0 {
            return Err(ConfigError::Invalid(
                "actor speeds must stay below half a tile per tick".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.vulnerable_speed_ratio) || self.vulnerable_speed_ratio == 0.0
        {
            return Err(ConfigError::Invalid(
                "vulnerable_speed_ratio must be in (0, 1]".to_string(),
            ));
        }
        if !(0.0..1.0).contains(&self.collision_radius_ratio) || self.collision_radius_ratio == 0.0
        {
            return Err(ConfigError::Invalid(
                "collision_radius_ratio must be in (0, 1)".to_string(),
            ));
        }
        if self.player_corner_margin < 0.0 || self.player_corner_margin >= self.tile_size / 2.0 {
            return Err(ConfigError::Invalid(
                "player_corner_margin must be within half a tile".to_string(),
            ));
        }
        if self.blink_warning_ms > self.vulnerable_duration_ms || self.blink_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "blink warning must fit inside the vulnerable window".to_string(),
            ));
        }
        if self.mode_schedule.is_empty() {
            return Err(ConfigError::Invalid("mode_schedule is empty".to_string()));
        }
        if self
            .mode_schedule
            .windows(2)
            .any(|pair| pair[0].until_ms >= pair[1].until_ms)
        {
            return Err(ConfigError::Invalid(
                "mode_schedule cutoffs must increase".to_string(),
            ));
        }
        Ok(())
    }

    /// Rounds up so a positive duration never collapses to zero ticks.
    pub fn ms_to_ticks(&self, ms: u64) -> u64 {
        (ms * self.tick_rate as u64).div_ceil(1000)
    }

    pub fn level_speed_multiplier(&self, level: u32) -> f32 {
        self.level_speed_scale
            .powi(level.saturating_sub(1).min(8) as i32)
    }
}
