//! All game entity types — pure data, no game logic.

use serde::{Deserialize, Serialize};

use crate::geometry::{Rect, Vec2};
use crate::upgrades::Upgrade;

// ── Monsters ──────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MonsterKind {
    Normal,
    Fast,
    Tank,
}

impl MonsterKind {
    pub const ALL: [MonsterKind; 3] = [MonsterKind::Normal, MonsterKind::Fast, MonsterKind::Tank];

    pub fn base_health(self) -> f32 {
        match self {
            MonsterKind::Normal => 1.0,
            MonsterKind::Fast => 0.5,
            MonsterKind::Tank => 3.0,
        }
    }

    /// Field units per reference frame, before the config speed factor.
    pub fn base_speed(self) -> f32 {
        match self {
            MonsterKind::Normal => 1.0,
            MonsterKind::Fast => 1.8,
            MonsterKind::Tank => 0.6,
        }
    }

    pub fn size(self) -> f32 {
        match self {
            MonsterKind::Normal => 20.0,
            MonsterKind::Fast => 15.0,
            MonsterKind::Tank => 30.0,
        }
    }

    /// Display colour as a hex string.
    pub fn color(self) -> &'static str {
        match self {
            MonsterKind::Normal => "#FFFFFF",
            MonsterKind::Fast => "#00FF00",
            MonsterKind::Tank => "#FF0000",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Monster {
    /// Centre of the monster.
    pub pos: Vec2,
    pub size: f32,
    pub speed: f32,
    pub health: f32,
    pub max_health: f32,
    pub kind: MonsterKind,
}

impl Monster {
    pub fn bounds(&self) -> Rect {
        Rect::centered(self.pos, self.size, self.size)
    }
}

// ── Projectiles ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Bullet {
    /// Centre of the bullet.
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    /// Upward speed in field units per reference frame.
    pub speed: f32,
    pub damage: f32,
}

impl Bullet {
    pub fn bounds(&self) -> Rect {
        Rect::centered(self.pos, self.width, self.height)
    }
}

// ── Player ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    /// Centre of the defender; `y` stays on the bottom row.
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    pub speed: f32,
    /// Clock time of the last shot, `None` before the first one.
    pub last_shot_ms: Option<f64>,
    pub shoot_delay_ms: f32,
}

impl Player {
    /// The defended zone monsters must reach to damage the tavern.
    pub fn bounds(&self) -> Rect {
        Rect::centered(self.pos, self.width, self.height)
    }
}

// ── Heroes ────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeroId {
    Warrior,
    Mage,
    Archer,
}

impl HeroId {
    pub const ALL: [HeroId; 3] = [HeroId::Warrior, HeroId::Mage, HeroId::Archer];
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Hero {
    pub id: HeroId,
    pub name: String,
    pub damage: f32,
    pub health: f32,
    pub description: String,
    /// Carried in saves; nothing grants perks yet.
    #[serde(default)]
    pub perks: Vec<String>,
    pub level: u32,
}

impl Hero {
    /// A fresh level-1 hero with the base stats for `id`.
    pub fn recruit(id: HeroId) -> Self {
        let (name, damage, health, description) = match id {
            HeroId::Warrior => ("Warrior", 1.0, 10.0, "Close-range fighter with high health"),
            HeroId::Mage => ("Mage", 2.0, 5.0, "Long-range caster with powerful magic"),
            HeroId::Archer => ("Archer", 1.5, 7.0, "Marksman with medium range"),
        };
        Hero {
            id,
            name: name.to_string(),
            damage,
            health,
            description: description.to_string(),
            perks: Vec::new(),
            level: 1,
        }
    }
}

/// The roster every new run starts with.
pub fn default_roster() -> Vec<Hero> {
    HeroId::ALL.iter().map(|&id| Hero::recruit(id)).collect()
}

// ── Screens ───────────────────────────────────────────────────────────────────

/// Exactly one screen is active; anything but `Playing` freezes the simulation.
#[derive(Clone, Debug, PartialEq)]
pub enum Screen {
    Playing,
    Upgrade { options: [Upgrade; 3] },
    Sunrise,
    GameOver,
}

/// A monster respawn deferred until `due_ms` on the simulation clock.
#[derive(Clone, Debug, PartialEq)]
pub struct PendingRespawn {
    pub due_ms: f64,
}

// ── Master run state ──────────────────────────────────────────────────────────

/// The entire run.  Cloneable so pure update functions can return a new copy
/// without mutating the original.
#[derive(Clone, Debug, PartialEq)]
pub struct RunState {
    pub player: Player,
    pub monsters: Vec<Monster>,
    pub bullets: Vec<Bullet>,
    pub heroes: Vec<Hero>,
    pub pending_respawns: Vec<PendingRespawn>,
    pub tavern_hp: i32,
    pub wave: u32,
    pub score: u32,
    pub total_kills: u32,
    pub screen: Screen,
    /// Simulation time in milliseconds; only advances while `Playing`.
    pub clock_ms: f64,
    pub width: f32,
    pub height: f32,
}

impl RunState {
    pub fn is_playing(&self) -> bool {
        self.screen == Screen::Playing
    }
}
