//! Pure game-logic functions.
//!
//! Every public function takes an immutable reference to the current
//! `RunState` (plus the config and, where needed, an RNG handle and the
//! overlap provider) and returns a brand-new `RunState`.  Side effects are
//! limited to the injected RNG.

use rand::Rng;
use tracing::{debug, info};

use crate::config::{GameConfig, WaveClearMode, FRAME_MS};
use crate::entities::{
    default_roster, Bullet, Monster, MonsterKind, PendingRespawn, Player, RunState, Screen,
};
use crate::geometry::{Collider, Vec2};
use crate::upgrades::roll_upgrade_options;

// ── Difficulty tables ────────────────────────────────────────────────────────

/// Weighted monster kind for `wave`: 100% normal on wave 1, 70/30
/// normal/fast on wave 2, 50/30/20 normal/fast/tank from wave 3 on.
pub fn roll_monster_kind(wave: u32, rng: &mut impl Rng) -> MonsterKind {
    let roll: f64 = rng.gen();
    match wave {
        0 | 1 => MonsterKind::Normal,
        2 => {
            if roll < 0.7 {
                MonsterKind::Normal
            } else {
                MonsterKind::Fast
            }
        }
        _ => {
            if roll < 0.5 {
                MonsterKind::Normal
            } else if roll < 0.8 {
                MonsterKind::Fast
            } else {
                MonsterKind::Tank
            }
        }
    }
}

/// Number of monsters spawned when `wave` begins.
pub fn wave_size(config: &GameConfig, wave: u32) -> u32 {
    if wave <= 1 {
        config.first_wave_size
    } else {
        wave.saturating_mul(2)
    }
}

// ── Constructors ─────────────────────────────────────────────────────────────

/// A fresh run with no monsters on the field yet.
pub fn init_state(config: &GameConfig) -> RunState {
    RunState {
        player: Player {
            pos: Vec2::new(config.field_width / 2.0, config.player_y()),
            width: config.player_size,
            height: config.player_size,
            speed: config.player_speed,
            last_shot_ms: None,
            shoot_delay_ms: config.shoot_delay_ms,
        },
        monsters: Vec::new(),
        bullets: Vec::new(),
        heroes: default_roster(),
        pending_respawns: Vec::new(),
        tavern_hp: config.tavern_hp,
        wave: 1,
        score: 0,
        total_kills: 0,
        screen: Screen::Playing,
        clock_ms: 0.0,
        width: config.field_width,
        height: config.field_height,
    }
}

/// A fresh run with the first wave already on the field.
pub fn new_run(config: &GameConfig, rng: &mut impl Rng) -> RunState {
    let state = init_state(config);
    spawn_monsters(&state, wave_size(config, state.wave), config, rng)
}

/// Build one monster of `kind` at a random point of the top spawn band.
pub fn spawn_monster(kind: MonsterKind, config: &GameConfig, rng: &mut impl Rng) -> Monster {
    let x_span = (config.field_width - 2.0 * config.spawn_margin_x).max(f32::EPSILON);
    let x = config.spawn_margin_x + rng.gen::<f32>() * x_span;
    let y = config.spawn_band_top + rng.gen::<f32>() * config.spawn_band_height;
    Monster {
        pos: Vec2::new(x, y),
        size: kind.size(),
        speed: kind.base_speed() * config.monster_speed_factor,
        health: kind.base_health(),
        max_health: kind.base_health(),
        kind,
    }
}

/// Add `count` monsters for the current wave.
pub fn spawn_monsters(
    state: &RunState,
    count: u32,
    config: &GameConfig,
    rng: &mut impl Rng,
) -> RunState {
    let mut monsters = state.monsters.clone();
    for _ in 0..count {
        let kind = roll_monster_kind(state.wave, rng);
        monsters.push(spawn_monster(kind, config, rng));
    }
    debug!(wave = state.wave, count, "spawned monsters");
    RunState {
        monsters,
        ..state.clone()
    }
}

// ── Input-driven state transitions (pure) ───────────────────────────────────

fn clamp_player_x(state: &RunState, x: f32) -> f32 {
    let half = state.player.width / 2.0;
    x.max(half).min(state.width - half)
}

fn with_player_x(state: &RunState, x: f32) -> RunState {
    if !state.is_playing() {
        return state.clone();
    }
    RunState {
        player: Player {
            pos: Vec2::new(clamp_player_x(state, x), state.player.pos.y),
            ..state.player.clone()
        },
        ..state.clone()
    }
}

pub fn move_player_left(state: &RunState) -> RunState {
    with_player_x(state, state.player.pos.x - state.player.speed)
}

pub fn move_player_right(state: &RunState) -> RunState {
    with_player_x(state, state.player.pos.x + state.player.speed)
}

/// Pointer aiming: put the defender straight under `x`.
pub fn aim_player(state: &RunState, x: f32) -> RunState {
    with_player_x(state, x)
}

/// Fire one bullet upward if the cooldown has elapsed since the last shot.
pub fn player_shoot(state: &RunState, config: &GameConfig) -> RunState {
    if !state.is_playing() {
        return state.clone();
    }
    let ready = match state.player.last_shot_ms {
        None => true,
        Some(last) => state.clock_ms - last > f64::from(state.player.shoot_delay_ms),
    };
    if !ready {
        return state.clone();
    }
    let mut bullets = state.bullets.clone();
    bullets.push(Bullet {
        pos: state.player.pos,
        width: config.bullet_width,
        height: config.bullet_height,
        speed: config.bullet_speed,
        damage: config.bullet_damage,
    });
    RunState {
        player: Player {
            last_shot_ms: Some(state.clock_ms),
            ..state.player.clone()
        },
        bullets,
        ..state.clone()
    }
}

// ── Per-frame tick (nearly pure — RNG is injected) ──────────────────────────

/// Advance the simulation by `dt_ms` milliseconds.  Does nothing unless the
/// screen is `Playing`.  All randomness comes through `rng` so callers
/// control determinism (useful for tests with a seeded RNG).
///
/// Long frames are split into sub-steps no longer than `FRAME_MS`, so a
/// bullet never moves further than its own height between overlap checks.
pub fn tick(
    state: &RunState,
    dt_ms: f64,
    config: &GameConfig,
    collider: &impl Collider,
    rng: &mut impl Rng,
) -> RunState {
    if !state.is_playing() {
        return state.clone();
    }
    let steps = (dt_ms / FRAME_MS).ceil().max(1.0) as u32;
    let step_ms = dt_ms / f64::from(steps);
    let mut next = advance(state, step_ms, config, collider, rng);
    for _ in 1..steps {
        if !next.is_playing() {
            break;
        }
        next = advance(&next, step_ms, config, collider, rng);
    }
    next
}

fn advance(
    state: &RunState,
    dt_ms: f64,
    config: &GameConfig,
    collider: &impl Collider,
    rng: &mut impl Rng,
) -> RunState {
    let mut next = state.clone();
    let scale = (dt_ms / FRAME_MS) as f32;
    next.clock_ms += dt_ms;

    // ── 1. Deferred respawns that have come due ──────────────────────────────
    let clock = next.clock_ms;
    let (due, waiting): (Vec<PendingRespawn>, Vec<PendingRespawn>) = next
        .pending_respawns
        .into_iter()
        .partition(|r| r.due_ms <= clock);
    next.pending_respawns = waiting;
    for _ in &due {
        let kind = roll_monster_kind(next.wave, rng);
        next.monsters.push(spawn_monster(kind, config, rng));
    }

    // ── 2. Bullets: move, leave the field, hit monsters ──────────────────────
    let mut monsters = std::mem::take(&mut next.monsters);
    let mut bullets = Vec::with_capacity(next.bullets.len());
    for mut bullet in std::mem::take(&mut next.bullets) {
        bullet.pos.y -= bullet.speed * scale;
        if bullet.pos.y < 0.0 {
            continue;
        }
        let bounds = bullet.bounds();
        match monsters
            .iter()
            .position(|m| collider.overlaps(&bounds, &m.bounds()))
        {
            Some(idx) => {
                monsters[idx].health -= bullet.damage;
                if monsters[idx].health <= 0.0 {
                    let dead = monsters.remove(idx);
                    next.score = next.score.saturating_add(config.kill_score);
                    next.total_kills = next.total_kills.saturating_add(1);
                    debug!(kind = ?dead.kind, score = next.score, "monster killed");
                }
            }
            None => bullets.push(bullet),
        }
    }
    next.bullets = bullets;

    // ── 3. Monsters: walk toward the defender, hit the tavern ────────────────
    let target = next.player.pos;
    let zone = next.player.bounds();
    let mut survivors = Vec::with_capacity(monsters.len());
    for mut monster in monsters {
        if next.screen == Screen::GameOver {
            survivors.push(monster);
            continue;
        }
        let offset = target - monster.pos;
        if let Some(dir) = offset.normalized() {
            let step = (monster.speed * scale).min(offset.length());
            monster.pos = monster.pos + dir * step;
        }
        if !collider.overlaps(&monster.bounds(), &zone) {
            survivors.push(monster);
            continue;
        }
        next.tavern_hp = next.tavern_hp.saturating_sub(config.tavern_hit_damage);
        debug!(hp = next.tavern_hp, kind = ?monster.kind, "monster reached the tavern");
        if next.tavern_hp <= 0 {
            next.tavern_hp = 0;
            next.screen = Screen::GameOver;
            info!(wave = next.wave, score = next.score, "tavern has fallen");
        } else if config.respawn_on_hit {
            next.pending_respawns.push(PendingRespawn {
                due_ms: next.clock_ms + config.respawn_delay_ms,
            });
        }
    }
    next.monsters = survivors;

    // ── 4. Wave cleared? ─────────────────────────────────────────────────────
    if next.is_playing() && next.monsters.is_empty() && next.pending_respawns.is_empty() {
        return complete_wave(&next, config, rng);
    }
    next
}

// ── Wave progression ─────────────────────────────────────────────────────────

fn complete_wave(state: &RunState, config: &GameConfig, rng: &mut impl Rng) -> RunState {
    info!(wave = state.wave, score = state.score, "wave cleared");
    match config.wave_clear_mode {
        WaveClearMode::Upgrades => RunState {
            screen: Screen::Upgrade {
                options: roll_upgrade_options(rng),
            },
            ..state.clone()
        },
        WaveClearMode::Sunrise => RunState {
            screen: Screen::Sunrise,
            score: state.score.saturating_add(1),
            ..state.clone()
        },
    }
}

/// Apply the upgrade at `index` of the offered options and start the next
/// wave.  Ignored unless the upgrade screen is showing and `index` is valid.
pub fn choose_upgrade(
    state: &RunState,
    index: usize,
    config: &GameConfig,
    rng: &mut impl Rng,
) -> RunState {
    let upgrade = match &state.screen {
        Screen::Upgrade { options } => match options.get(index) {
            Some(upgrade) => *upgrade,
            None => return state.clone(),
        },
        _ => return state.clone(),
    };
    info!(upgrade = upgrade.label(), "upgrade chosen");
    let upgraded = upgrade.apply(state, config.min_shoot_delay_ms, rng);
    start_next_wave(&upgraded, config, rng)
}

/// Leave the upgrade or sunrise screen, bump the wave counter and spawn
/// `wave * 2` monsters.  Ignored while playing or after game over.
pub fn start_next_wave(state: &RunState, config: &GameConfig, rng: &mut impl Rng) -> RunState {
    match state.screen {
        Screen::Upgrade { .. } | Screen::Sunrise => {}
        Screen::Playing | Screen::GameOver => return state.clone(),
    }
    let wave = state.wave.saturating_add(1);
    let next = RunState {
        wave,
        screen: Screen::Playing,
        ..state.clone()
    };
    info!(wave, "wave started");
    spawn_monsters(&next, wave_size(config, wave), config, rng)
}
