//! `WaveEngine`: the caller-owned run driver.
//!
//! The engine owns the run state, the config, the RNG, the overlap provider
//! and the save store.  A frame loop calls `update` once per frame and reads
//! `view` for the HUD; menu actions map to `select_upgrade`,
//! `continue_after_sunrise` and `restart`.  Whenever a persisted field
//! changes, the run is written back to the store.

use rand::Rng;
use tracing::{info, warn};

use crate::compute::{
    aim_player, choose_upgrade, init_state, move_player_left, move_player_right, new_run,
    player_shoot, spawn_monsters, start_next_wave, tick, wave_size,
};
use crate::config::GameConfig;
use crate::entities::{RunState, Screen};
use crate::geometry::{Aabb, Collider};
use crate::storage::{load_save, write_save, KeyValueStore, SaveData};

/// Longest frame `update` will simulate; a stall beyond this (suspend,
/// resize) is treated as a quarter second.
pub const MAX_FRAME_MS: f64 = 250.0;

/// Input sampled by the front-end for one frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameInput {
    pub move_left: bool,
    pub move_right: bool,
    pub fire: bool,
    /// Pointer x in field units; takes precedence over the move keys.
    pub pointer_x: Option<f32>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct HeroSummary {
    pub name: String,
    pub level: u32,
    pub damage: f32,
    pub health: f32,
}

/// Everything the UI surface displays, bound by field.
#[derive(Clone, Debug, PartialEq)]
pub struct HudView {
    pub tavern_hp: i32,
    pub wave: u32,
    pub score: u32,
    pub monster_count: usize,
    pub total_kills: u32,
    pub heroes: Vec<HeroSummary>,
    /// Labels of the offered upgrades; empty unless the upgrade screen shows.
    pub upgrade_labels: Vec<&'static str>,
    pub screen: Screen,
}

pub struct WaveEngine<S, R, C = Aabb> {
    config: GameConfig,
    state: RunState,
    store: S,
    rng: R,
    collider: C,
}

impl<S: KeyValueStore, R: Rng> WaveEngine<S, R, Aabb> {
    /// Resume the run saved in `store`, or start a new one.
    pub fn new(config: GameConfig, store: S, rng: R) -> Self {
        Self::with_collider(config, store, rng, Aabb)
    }
}

impl<S: KeyValueStore, R: Rng, C: Collider> WaveEngine<S, R, C> {
    pub fn with_collider(config: GameConfig, store: S, mut rng: R, collider: C) -> Self {
        let fresh = init_state(&config);
        let resumed = match load_save(&store) {
            Ok(Some(save)) => {
                info!(
                    wave = save.wave_number,
                    score = save.score,
                    hp = save.tavern_hp,
                    "resuming saved run"
                );
                save.apply_to(&fresh)
            }
            Ok(None) => fresh,
            Err(e) => {
                warn!(error = %e, "ignoring unreadable save");
                fresh
            }
        };
        let state = spawn_monsters(&resumed, wave_size(&config, resumed.wave), &config, &mut rng);
        Self {
            config,
            state,
            store,
            rng,
            collider,
        }
    }

    /// Drive an existing run instead of loading one from `store`.
    pub fn from_state(config: GameConfig, state: RunState, store: S, rng: R, collider: C) -> Self {
        Self {
            config,
            state,
            store,
            rng,
            collider,
        }
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Apply this frame's input, then advance the simulation by `dt_ms`.
    pub fn update(&mut self, dt_ms: f64, input: &FrameInput) {
        let dt_ms = if dt_ms.is_finite() {
            dt_ms.clamp(0.0, MAX_FRAME_MS)
        } else {
            0.0
        };
        let mut state = match input.pointer_x {
            Some(x) => aim_player(&self.state, x),
            None if input.move_left && !input.move_right => move_player_left(&self.state),
            None if input.move_right && !input.move_left => move_player_right(&self.state),
            None => self.state.clone(),
        };
        if input.fire {
            state = player_shoot(&state, &self.config);
        }
        let state = tick(&state, dt_ms, &self.config, &self.collider, &mut self.rng);
        self.commit(state);
    }

    /// Pick upgrade `index` (0..3) on the upgrade screen.
    pub fn select_upgrade(&mut self, index: usize) {
        let state = choose_upgrade(&self.state, index, &self.config, &mut self.rng);
        self.commit(state);
    }

    /// Leave the sunrise screen and start the next wave.
    pub fn continue_after_sunrise(&mut self) {
        if self.state.screen != Screen::Sunrise {
            return;
        }
        let state = start_next_wave(&self.state, &self.config, &mut self.rng);
        self.commit(state);
    }

    /// Throw the current run away and start over from wave 1.
    pub fn restart(&mut self) {
        info!("run restarted");
        self.state = new_run(&self.config, &mut self.rng);
        self.persist();
    }

    pub fn view(&self) -> HudView {
        let s = &self.state;
        let upgrade_labels = match &s.screen {
            Screen::Upgrade { options } => options.iter().map(|u| u.label()).collect(),
            _ => Vec::new(),
        };
        HudView {
            tavern_hp: s.tavern_hp,
            wave: s.wave,
            score: s.score,
            monster_count: s.monsters.len(),
            total_kills: s.total_kills,
            heroes: s
                .heroes
                .iter()
                .map(|h| HeroSummary {
                    name: h.name.clone(),
                    level: h.level,
                    damage: h.damage,
                    health: h.health,
                })
                .collect(),
            upgrade_labels,
            screen: s.screen.clone(),
        }
    }

    fn commit(&mut self, next: RunState) {
        let changed = SaveData::from_state(&self.state) != SaveData::from_state(&next);
        self.state = next;
        if changed {
            self.persist();
        }
    }

    fn persist(&mut self) {
        if let Err(e) = write_save(&mut self.store, &SaveData::from_state(&self.state)) {
            warn!(error = %e, "failed to save run");
        }
    }
}
