use last_hearth::compute::init_state;
use last_hearth::config::GameConfig;
use last_hearth::entities::*;
use last_hearth::upgrades::*;

use rand::rngs::StdRng;
use rand::SeedableRng;

fn make_state() -> RunState {
    init_state(&GameConfig::default())
}

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(7)
}

fn apply(upgrade: Upgrade, state: &RunState) -> RunState {
    upgrade.apply(state, 50.0, &mut seeded_rng())
}

fn total_damage(state: &RunState) -> f32 {
    state.heroes.iter().map(|h| h.damage).sum()
}

fn total_health(state: &RunState) -> f32 {
    state.heroes.iter().map(|h| h.health).sum()
}

fn total_levels(state: &RunState) -> u32 {
    state.heroes.iter().map(|h| h.level).sum()
}

#[test]
fn hero_damage_raises_one_hero() {
    let s = make_state();
    let s2 = apply(Upgrade::HeroDamage, &s);
    assert_eq!(total_damage(&s2), total_damage(&s) + 1.0);
    assert_eq!(total_levels(&s2), total_levels(&s) + 1);
    assert_eq!(s2.heroes.iter().filter(|h| h.level == 2).count(), 1);
}

#[test]
fn hero_health_raises_one_hero() {
    let s = make_state();
    let s2 = apply(Upgrade::HeroHealth, &s);
    assert_eq!(total_health(&s2), total_health(&s) + 5.0);
    assert_eq!(total_levels(&s2), total_levels(&s) + 1);
}

#[test]
fn hero_upgrades_on_empty_roster_are_noops() {
    let mut s = make_state();
    s.heroes.clear();
    assert_eq!(apply(Upgrade::HeroDamage, &s), s);
    assert_eq!(apply(Upgrade::HeroHealth, &s), s);
}

#[test]
fn fire_rate_shortens_cooldown_by_ten_percent() {
    let s2 = apply(Upgrade::FireRate, &make_state());
    assert!((s2.player.shoot_delay_ms - 225.0).abs() < 1e-3);
}

#[test]
fn fire_rate_floors_at_minimum() {
    let mut s = make_state();
    for _ in 0..40 {
        s = apply(Upgrade::FireRate, &s);
    }
    assert_eq!(s.player.shoot_delay_ms, 50.0);
}

#[test]
fn tavern_armor_adds_ten_hp() {
    let s2 = apply(Upgrade::TavernArmor, &make_state());
    assert_eq!(s2.tavern_hp, 110);
}

#[test]
fn extra_projectile_and_bonus_score_have_no_effect() {
    let s = make_state();
    assert_eq!(apply(Upgrade::ExtraProjectile, &s), s);
    assert_eq!(apply(Upgrade::BonusScore, &s), s);
}

#[test]
fn inert_upgrades_say_so_in_their_labels() {
    for upgrade in [Upgrade::ExtraProjectile, Upgrade::BonusScore] {
        assert!(upgrade.label().ends_with("(no effect yet)"));
    }
    for upgrade in UPGRADE_POOL {
        assert!(upgrade.label().chars().count() <= 32);
    }
}

#[test]
fn tavern_armor_saturates_at_max_hp() {
    let mut s = make_state();
    s.tavern_hp = i32::MAX;
    assert_eq!(apply(Upgrade::TavernArmor, &s).tavern_hp, i32::MAX);
}

#[test]
fn new_hero_is_noop_when_already_recruited() {
    let s = make_state();
    for id in HeroId::ALL {
        assert_eq!(apply(Upgrade::NewHero(id), &s), s);
    }
}

#[test]
fn new_hero_recruits_missing_hero() {
    let mut s = make_state();
    s.heroes.retain(|h| h.id != HeroId::Mage);
    let s2 = apply(Upgrade::NewHero(HeroId::Mage), &s);
    assert_eq!(s2.heroes.len(), 3);
    let mage = s2.heroes.iter().find(|h| h.id == HeroId::Mage).unwrap();
    assert_eq!(*mage, Hero::recruit(HeroId::Mage));
}

#[test]
fn apply_does_not_mutate_original() {
    let s = make_state();
    let _ = apply(Upgrade::TavernArmor, &s);
    let _ = apply(Upgrade::HeroDamage, &s);
    assert_eq!(s, make_state());
}

#[test]
fn rolled_options_are_three_distinct_pool_entries() {
    for seed in 0..200 {
        let options = roll_upgrade_options(&mut StdRng::seed_from_u64(seed));
        assert!(options.iter().all(|o| UPGRADE_POOL.contains(o)));
        assert_ne!(options[0], options[1]);
        assert_ne!(options[0], options[2]);
        assert_ne!(options[1], options[2]);
    }
}

#[test]
fn every_pool_entry_gets_offered() {
    let mut rng = seeded_rng();
    let mut seen = Vec::new();
    for _ in 0..300 {
        for o in roll_upgrade_options(&mut rng) {
            if !seen.contains(&o) {
                seen.push(o);
            }
        }
    }
    assert_eq!(seen.len(), UPGRADE_POOL.len());
}
