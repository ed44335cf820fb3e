use last_hearth::compute::init_state;
use last_hearth::config::GameConfig;
use last_hearth::entities::*;
use last_hearth::geometry::Vec2;

#[test]
fn monster_kind_base_stats() {
    assert_eq!(MonsterKind::Normal.base_health(), 1.0);
    assert_eq!(MonsterKind::Fast.base_health(), 0.5);
    assert_eq!(MonsterKind::Tank.base_health(), 3.0);

    // Fast outruns normal, tanks crawl.
    assert!(MonsterKind::Fast.base_speed() > MonsterKind::Normal.base_speed());
    assert!(MonsterKind::Tank.base_speed() < MonsterKind::Normal.base_speed());
    assert!(MonsterKind::Tank.size() > MonsterKind::Fast.size());

    assert_eq!(MonsterKind::Tank.color(), "#FF0000");
}

#[test]
fn recruit_uses_base_stats() {
    let mage = Hero::recruit(HeroId::Mage);
    assert_eq!(mage.damage, 2.0);
    assert_eq!(mage.health, 5.0);
    assert_eq!(mage.level, 1);
    assert!(mage.perks.is_empty());

    let archer = Hero::recruit(HeroId::Archer);
    assert_eq!(archer.damage, 1.5);
    assert_eq!(archer.health, 7.0);
}

#[test]
fn default_roster_holds_each_hero_once() {
    let roster = default_roster();
    let ids: Vec<HeroId> = roster.iter().map(|h| h.id).collect();
    assert_eq!(ids, vec![HeroId::Warrior, HeroId::Mage, HeroId::Archer]);
}

#[test]
fn hero_ids_serialise_lowercase() {
    let json = serde_json::to_string(&HeroId::Warrior).unwrap();
    assert_eq!(json, "\"warrior\"");
    let id: HeroId = serde_json::from_str("\"archer\"").unwrap();
    assert_eq!(id, HeroId::Archer);
}

#[test]
fn bounds_are_centred_on_position() {
    let m = Monster {
        pos: Vec2::new(100.0, 50.0),
        size: 20.0,
        speed: 0.8,
        health: 1.0,
        max_health: 1.0,
        kind: MonsterKind::Normal,
    };
    let r = m.bounds();
    assert_eq!((r.x, r.y, r.w, r.h), (90.0, 40.0, 20.0, 20.0));
}

#[test]
fn run_state_clone_is_independent() {
    let original = init_state(&GameConfig::default());
    let mut cloned = original.clone();

    // Mutating the clone must not affect the original
    cloned.player.pos.x = 99.0;
    cloned.score = 999;
    cloned.heroes[0].level = 7;
    cloned.screen = Screen::GameOver;

    assert_eq!(original.player.pos.x, 400.0);
    assert_eq!(original.score, 0);
    assert_eq!(original.heroes[0].level, 1);
    assert!(original.is_playing());
}
