//! Between-wave upgrades.
//!
//! Each `Upgrade` variant carries its effect as a pure function over the run
//! state: `apply` never mutates its input and returns the upgraded copy.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::entities::{Hero, HeroId, RunState};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Upgrade {
    /// +1 damage and +1 level for a random hero.
    HeroDamage,
    /// +5 health and +1 level for a random hero.
    HeroHealth,
    /// Shot cooldown ×0.9, floored at the configured minimum.
    FireRate,
    /// Offered but without effect: multi-bullet firing does not exist.
    ExtraProjectile,
    /// +10 tavern HP.
    TavernArmor,
    /// Offered but without effect: kill score is fixed.
    BonusScore,
    /// Recruit the hero if the roster lacks it.
    NewHero(HeroId),
}

/// The fixed pool options are drawn from.
pub const UPGRADE_POOL: [Upgrade; 9] = [
    Upgrade::HeroDamage,
    Upgrade::HeroHealth,
    Upgrade::FireRate,
    Upgrade::ExtraProjectile,
    Upgrade::TavernArmor,
    Upgrade::BonusScore,
    Upgrade::NewHero(HeroId::Warrior),
    Upgrade::NewHero(HeroId::Mage),
    Upgrade::NewHero(HeroId::Archer),
];

const FIRE_RATE_FACTOR: f32 = 0.9;
const HERO_DAMAGE_BONUS: f32 = 1.0;
const HERO_HEALTH_BONUS: f32 = 5.0;
const TAVERN_ARMOR_BONUS: i32 = 10;

impl Upgrade {
    pub fn label(&self) -> &'static str {
        match self {
            Upgrade::HeroDamage => "Hero damage +1",
            Upgrade::HeroHealth => "Hero health +5",
            Upgrade::FireRate => "Fire rate +10%",
            Upgrade::ExtraProjectile => "Extra projectile (no effect yet)",
            Upgrade::TavernArmor => "Tavern armor +10",
            Upgrade::BonusScore => "Bonus score (no effect yet)",
            Upgrade::NewHero(HeroId::Warrior) => "New hero: Warrior",
            Upgrade::NewHero(HeroId::Mage) => "New hero: Mage",
            Upgrade::NewHero(HeroId::Archer) => "New hero: Archer",
        }
    }

    /// Return `state` with this upgrade applied.  `min_shoot_delay_ms` floors
    /// the fire-rate bonus.
    pub fn apply(&self, state: &RunState, min_shoot_delay_ms: f32, rng: &mut impl Rng) -> RunState {
        let mut next = state.clone();
        match self {
            Upgrade::HeroDamage => {
                if let Some(hero) = random_hero(&mut next.heroes, rng) {
                    hero.damage += HERO_DAMAGE_BONUS;
                    hero.level = hero.level.saturating_add(1);
                }
            }
            Upgrade::HeroHealth => {
                if let Some(hero) = random_hero(&mut next.heroes, rng) {
                    hero.health += HERO_HEALTH_BONUS;
                    hero.level = hero.level.saturating_add(1);
                }
            }
            Upgrade::FireRate => {
                let delay = next.player.shoot_delay_ms * FIRE_RATE_FACTOR;
                next.player.shoot_delay_ms = delay.max(min_shoot_delay_ms);
            }
            Upgrade::TavernArmor => {
                next.tavern_hp = next.tavern_hp.saturating_add(TAVERN_ARMOR_BONUS);
            }
            Upgrade::NewHero(id) => {
                if !next.heroes.iter().any(|h| h.id == *id) {
                    next.heroes.push(Hero::recruit(*id));
                }
            }
            // TODO: give ExtraProjectile and BonusScore effects once
            // multi-bullet firing and per-kill score modifiers exist.
            Upgrade::ExtraProjectile | Upgrade::BonusScore => {}
        }
        next
    }
}

fn random_hero<'a>(heroes: &'a mut [Hero], rng: &mut impl Rng) -> Option<&'a mut Hero> {
    if heroes.is_empty() {
        return None;
    }
    let idx = rng.gen_range(0..heroes.len());
    heroes.get_mut(idx)
}

/// Three distinct options drawn without replacement from `UPGRADE_POOL`.
pub fn roll_upgrade_options(rng: &mut impl Rng) -> [Upgrade; 3] {
    let mut options = [Upgrade::HeroDamage; 3];
    for (slot, pick) in options.iter_mut().zip(UPGRADE_POOL.choose_multiple(rng, 3)) {
        *slot = *pick;
    }
    options
}
