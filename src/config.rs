//! Tunable game constants, loadable from a TOML file.
//!
//! Every field has a default matching the classic tavern layout (800×600
//! field, 100 HP tavern), so a partial TOML file only overrides what it names.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Duration of one reference frame.  Speeds are expressed in field units per
/// reference frame and scaled by `dt / FRAME_MS` during `tick`.
pub const FRAME_MS: f64 = 1000.0 / 60.0;

/// Storage key the run is persisted under.
pub const SAVE_KEY: &str = "lastHearthSave";

/// What the player sees after clearing a wave.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaveClearMode {
    /// Pick one of three random upgrades, then the next wave starts.
    Upgrades,
    /// Sunrise screen: one light shard (+1 score), continue to the next wave.
    Sunrise,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub field_width: f32,
    pub field_height: f32,

    // ── Player ──────────────────────────────────────────────────────────────
    /// Distance from the bottom edge to the player's centre.
    pub player_bottom_offset: f32,
    pub player_size: f32,
    pub player_speed: f32,
    pub shoot_delay_ms: f32,
    pub min_shoot_delay_ms: f32,

    // ── Bullets ─────────────────────────────────────────────────────────────
    pub bullet_speed: f32,
    pub bullet_damage: f32,
    pub bullet_width: f32,
    pub bullet_height: f32,

    // ── Monsters & waves ────────────────────────────────────────────────────
    pub monster_speed_factor: f32,
    pub spawn_margin_x: f32,
    pub spawn_band_top: f32,
    pub spawn_band_height: f32,
    pub first_wave_size: u32,
    pub wave_clear_mode: WaveClearMode,

    // ── Tavern ──────────────────────────────────────────────────────────────
    pub tavern_hp: i32,
    pub tavern_hit_damage: i32,
    pub kill_score: u32,
    pub respawn_on_hit: bool,
    pub respawn_delay_ms: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            field_width: 800.0,
            field_height: 600.0,
            player_bottom_offset: 50.0,
            player_size: 40.0,
            player_speed: 5.0,
            shoot_delay_ms: 250.0,
            min_shoot_delay_ms: 50.0,
            bullet_speed: 8.0,
            bullet_damage: 1.0,
            bullet_width: 5.0,
            bullet_height: 10.0,
            monster_speed_factor: 0.8,
            spawn_margin_x: 25.0,
            spawn_band_top: 20.0,
            spawn_band_height: 100.0,
            first_wave_size: 5,
            wave_clear_mode: WaveClearMode::Upgrades,
            tavern_hp: 100,
            tavern_hit_damage: 10,
            kill_score: 10,
            respawn_on_hit: true,
            respawn_delay_ms: 1000.0,
        }
    }
}

impl GameConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    /// Load `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Y coordinate of the player's centre (fixed bottom row).
    pub fn player_y(&self) -> f32 {
        self.field_height - self.player_bottom_offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_overrides_only_named_fields() {
        let config = GameConfig::from_toml_str(
            "tavern_hp = 150\nwave_clear_mode = \"sunrise\"\nrespawn_on_hit = false\n",
        )
        .unwrap();
        assert_eq!(config.tavern_hp, 150);
        assert_eq!(config.wave_clear_mode, WaveClearMode::Sunrise);
        assert!(!config.respawn_on_hit);
        assert_eq!(config.first_wave_size, 5);
        assert_eq!(config.player_y(), 550.0);
    }

    #[test]
    fn bad_toml_is_a_parse_error() {
        let err = GameConfig::from_toml_str("tavern_hp = \"lots\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = GameConfig::load_or_default("/nonexistent/last_hearth.toml").unwrap();
        assert_eq!(config, GameConfig::default());
    }
}
