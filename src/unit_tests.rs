/*!
 * Crate-level resolution scenarios. Each test arms an attacker from the default catalog, fires one weapon at a target
 * on a `LocalBattlefield` with scripted dice and checks the resolution, the reports and what changed on the field.
 *
 * Dice are consumed in a fixed order: the 2d6 to-hit roll when the handler is built, then (as applicable) the
 * prototype heat die, the failure check, the cluster roll, per-hit damage dice, and the scatter direction.
 */
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use strum::IntoEnumIterator;
use test_log::test;

use crate::action::{AttackRequest, ToHitData};
use crate::battlefield::{ArmorKind, Battlefield, LocalBattlefield, TargetKind, TargetProfile};
use crate::catalog::{
  config_test_catalog, WeaponCatalog, WeaponFamily, WeaponFlags, WeaponStatRecord, CATALOG,
};
use crate::combat::{AttackHandler, Resolution};
use crate::damage_type::{DamageClass, DamageType};
use crate::dice::LoadedDice;
use crate::dispatch::{build_handler, select_handler, DispatchError};
use crate::families::HandlerKind;
use crate::phase::GamePhase;
use crate::report::{
  ReportBuffer, ReportParam, AMS_ENGAGES, ARTILLERY_INBOUND, ATTACK_IMPOSSIBLE, ATTACK_MISSES, DAMAGE_DEALT,
  FIRE_STARTED, LASER_BURNS_OUT, NO_DESIGNATION, PROTOTYPE_JAMS, STREAK_NO_LOCK, SWARM_CONTINUES, SWARM_I_CONTINUES,
  VOLLEY_DESTROYED, WEAPON_JAMS,
};
use crate::unit::{AmmoBin, MountedWeapon, Unit, WeaponMode};

const ATTACKER: &str = "Atlas";
const TARGET: &str = "Locust";

fn catalog() -> &'static WeaponCatalog {
  config_test_catalog();
  CATALOG.get().unwrap()
}

/// A battlefield with `ATTACKER` carrying one weapon (slot 0) and its ammo (slot 0), and a mech `TARGET`.
fn armed_with(weapon: &str, ammo: Option<&str>) -> LocalBattlefield {
  let catalog = catalog();
  let mut unit = Unit::new(ATTACKER);
  let mut mounted = MountedWeapon::new(catalog.weapon(weapon).unwrap());
  if let Some(ammo) = ammo {
    let slot = unit.load(AmmoBin::new(catalog.ammo(ammo).unwrap()));
    mounted = mounted.linked_to(slot);
  }
  unit.mount(mounted);

  let mut field = LocalBattlefield::new();
  field.add_unit(unit);
  field.add_target(TargetProfile::new(TARGET, TargetKind::Mech));
  field
}

/// Give `name` a unit on the field carrying a ballistic AMS.
fn add_ams_defender(field: &mut LocalBattlefield, name: &str) {
  let catalog = catalog();
  let mut defender = Unit::new(name).on_side(1);
  let bin = defender.load(AmmoBin::new(catalog.ammo("AMS Ammo").unwrap()));
  defender.mount(MountedWeapon::new(catalog.weapon("AMS").unwrap()).linked_to(bin));
  field.add_unit(defender);
}

fn request(to_hit: i32) -> AttackRequest {
  AttackRequest::new(ATTACKER, TARGET, 0, ToHitData::new(to_hit, "test"))
}

fn resolve(
  field: &mut LocalBattlefield, request: &AttackRequest, phase: GamePhase, dice: &[u8],
) -> (Resolution, ReportBuffer) {
  let mut dice = LoadedDice::new(dice);
  let mut handler = build_handler(request, &*field, &mut dice).unwrap();
  let mut reports = ReportBuffer::new();
  let resolution = handler.handle(phase, field, &mut reports, &mut dice);
  (resolution, reports)
}

fn attacker(field: &LocalBattlefield) -> &Unit {
  field.unit(ATTACKER).unwrap()
}

fn test_laser(flags: WeaponFlags) -> WeaponStatRecord {
  WeaponStatRecord::builder("Test Laser", "TestLaser", WeaponFamily::Laser)
    .heat(5)
    .damage(5)
    .flags(WeaponFlags::DIRECT_FIRE | WeaponFlags::ENERGY | flags)
    .build()
}

fn direct_handler(kind: HandlerKind, weapon: WeaponStatRecord) -> AttackHandler {
  AttackHandler::new(
    kind,
    request(8),
    Arc::new(weapon),
    None,
    None,
    WeaponMode::Standard,
    ToHitData::new(8, "test"),
    8,
  )
}

#[test]
fn test_families_without_special_rules_use_catalog_damage() {
  let catalog = catalog();
  let mut rng = StdRng::seed_from_u64(42);
  let special = [
    HandlerKind::TracerAutocannon,
    HandlerKind::NailRivet,
    HandlerKind::BombastLaser,
    HandlerKind::CapitalMissile,
    HandlerKind::Piranha,
  ];

  for weapon in catalog.weapons() {
    let ammo = catalog.ammo_for(weapon).next().cloned();
    if weapon.needs_ammo() && ammo.is_none() {
      continue;
    }
    let kind = select_handler(weapon, ammo.as_deref(), weapon.fire_modes()[0]).unwrap();
    if special.contains(&kind) {
      continue;
    }
    let handler = AttackHandler::new(
      kind,
      request(8),
      weapon.clone(),
      ammo,
      Some(0),
      WeaponMode::Standard,
      ToHitData::new(8, "test"),
      8,
    );
    assert_eq!(handler.calc_damage_per_hit(&mut rng), weapon.damage, "{}", weapon.name);
  }
}

#[test]
fn test_tracer_is_one_less_than_base() {
  let mut rng = StdRng::seed_from_u64(42);
  for base in 1..=20 {
    let record = WeaponStatRecord::builder("Test AC", "TestAC", WeaponFamily::Autocannon)
      .damage(base)
      .flags(WeaponFlags::DIRECT_FIRE | WeaponFlags::BALLISTIC)
      .build();
    let handler = direct_handler(HandlerKind::TracerAutocannon, record);
    assert_eq!(handler.calc_damage_per_hit(&mut rng), base - 1);
  }

  let zero = WeaponStatRecord::builder("Test AC", "TestAC", WeaponFamily::Autocannon).build();
  assert_eq!(direct_handler(HandlerKind::TracerAutocannon, zero).calc_damage_per_hit(&mut rng), 0);
}

#[test]
fn test_nail_rivet_damage_is_uniform() {
  let handler = direct_handler(HandlerKind::NailRivet, catalog().weapon("Nail Gun").unwrap().as_ref().clone());
  let mut rng = StdRng::seed_from_u64(42);
  let mut counts = [0u32; 6];
  for _ in 0..6000 {
    let damage = handler.calc_damage_per_hit(&mut rng);
    assert!((1..=6).contains(&damage));
    counts[damage as usize - 1] += 1;
  }
  for count in counts {
    assert!((800..=1200).contains(&count), "{counts:?}");
  }
}

#[test]
fn test_prototype_ac_natural_two_jams_and_hits() {
  let mut field = armed_with("Ultra AC/5 Prototype", Some("Ultra AC/5 Ammo"));
  let (resolution, reports) = resolve(&mut field, &request(8), GamePhase::Firing, &[1, 1]);

  assert_eq!(resolution, Resolution::Aborted);
  let mount = &attacker(&field).weapons[0];
  assert!(mount.jammed);
  assert!(mount.hit);
  assert_eq!(reports.with_id(PROTOTYPE_JAMS).count(), 1);
  assert_eq!(reports.with_id(DAMAGE_DEALT).count(), 0);
  assert!(field.damage_log.is_empty());
  // A jammed ballistic weapon costs neither heat nor ammunition.
  assert_eq!(attacker(&field).heat, 0);
  assert_eq!(attacker(&field).ammo[0].shots_left, 20);
}

#[test]
fn test_prototype_ac_jams_in_double_shot_mode() {
  let mut field = armed_with("Ultra AC/5 Prototype", Some("Ultra AC/5 Ammo"));
  let request = request(8).with_mode(WeaponMode::Shots(2));
  let (resolution, _) = resolve(&mut field, &request, GamePhase::Firing, &[1, 1]);
  assert_eq!(resolution, Resolution::Aborted);
  assert!(attacker(&field).weapons[0].hit);
}

#[test]
fn test_prototype_clan_ultra_jam_window() {
  let cases = [(3, 2, true), (2, 2, true), (4, 2, false), (2, 1, false)];
  for (roll, shots, jams) in cases {
    let mut field = armed_with("Clan Ultra AC/10 Prototype", Some("Clan Ultra AC/10 Ammo"));
    let request = request(8).with_mode(WeaponMode::Shots(shots));
    let mut rng = StdRng::seed_from_u64(42);
    let mut handler = build_handler(&request, &field, &mut rng).unwrap().with_roll(roll);
    let mut reports = ReportBuffer::new();

    assert_eq!(handler.do_checks(&mut field, &mut reports, &mut rng), jams, "roll {roll} shots {shots}");
    let mount = &attacker(&field).weapons[0];
    assert_eq!(mount.jammed, jams);
    assert_eq!(mount.hit, jams);
  }
}

#[test]
fn test_ultra_double_shot_jams_without_damage() {
  let mut field = armed_with("Ultra AC/5", Some("Ultra AC/5 Ammo"));
  let request = request(8).with_mode(WeaponMode::Shots(2));
  let (resolution, reports) = resolve(&mut field, &request, GamePhase::Firing, &[1, 1]);

  assert_eq!(resolution, Resolution::Aborted);
  assert_eq!(reports.with_id(WEAPON_JAMS).count(), 1);
  let unit = attacker(&field);
  assert!(unit.weapons[0].jammed);
  assert!(!unit.weapons[0].hit);
  assert_eq!(unit.heat, 0);
  assert_eq!(unit.ammo[0].shots_left, 20);
}

#[test]
fn test_ultra_double_shot_cluster() {
  let mut field = armed_with("Ultra AC/5", Some("Ultra AC/5 Ammo"));
  let request = request(7).with_mode(WeaponMode::Shots(2));
  let (resolution, reports) = resolve(&mut field, &request, GamePhase::Firing, &[4, 4, 6, 6]);

  assert_eq!(resolution, Resolution::Hit { hits: 2, damage: 10 });
  assert_eq!(reports.with_id(DAMAGE_DEALT).count(), 2);
  assert_eq!(attacker(&field).heat, 2);
  assert_eq!(attacker(&field).ammo[0].shots_left, 18);
}

#[test]
fn test_rotary_high_rate_jams_on_three() {
  let mut field = armed_with("Rotary AC/5", Some("Rotary AC/5 Ammo"));
  let request = request(8).with_mode(WeaponMode::Shots(6));
  let (resolution, _) = resolve(&mut field, &request, GamePhase::Firing, &[1, 2]);
  assert_eq!(resolution, Resolution::Aborted);
  assert!(attacker(&field).weapons[0].jammed);
}

#[test]
fn test_direct_artillery_cares_only_in_firing() {
  let field = armed_with("Arrow IV", Some("Arrow IV Ammo"));
  let mut rng = StdRng::seed_from_u64(42);
  let handler = build_handler(&request(8), &field, &mut rng).unwrap();
  assert_eq!(handler.kind, HandlerKind::ArtilleryDirect);
  for phase in GamePhase::iter() {
    assert_eq!(handler.cares(phase), phase == GamePhase::Firing, "{phase}");
    // Asking twice changes nothing.
    assert_eq!(handler.cares(phase), handler.cares(phase));
  }
}

#[test]
fn test_uncared_phase_is_a_no_op() {
  let mut field = armed_with("Arrow IV", Some("Arrow IV Ammo"));
  let (resolution, reports) = resolve(&mut field, &request(8), GamePhase::Targeting, &[6, 6]);
  assert_eq!(resolution, Resolution::Skipped);
  assert!(reports.is_empty());
  assert_eq!(attacker(&field).heat, 0);
  assert_eq!(attacker(&field).ammo[0].shots_left, 5);
}

#[test]
fn test_base_heat() {
  let mut field = LocalBattlefield::new();
  field.add_unit(Unit::new(ATTACKER));
  let mut handler = direct_handler(HandlerKind::Standard, test_laser(WeaponFlags::empty()));
  let mut reports = ReportBuffer::new();
  let mut rng = StdRng::seed_from_u64(42);

  assert_eq!(handler.add_heat(&mut field, &mut reports, &mut rng), 5);
  assert_eq!(attacker(&field).heat, 5);
  assert!(reports.is_empty());
}

#[test]
fn test_prototype_laser_heat() {
  for seed in 0..100 {
    let mut field = LocalBattlefield::new();
    field.add_unit(Unit::new(ATTACKER));
    let mut handler = direct_handler(HandlerKind::PrototypeLaser, test_laser(WeaponFlags::PROTOTYPE));
    let mut reports = ReportBuffer::new();
    let mut rng = StdRng::seed_from_u64(seed);

    let heat = handler.add_heat(&mut field, &mut reports, &mut rng);
    assert!((6..=11).contains(&heat), "seed {seed} gave {heat}");
    assert_eq!(attacker(&field).heat, heat);
  }
}

#[test]
fn test_small_pulse_prototype_heat() {
  for seed in 0..100 {
    let mut field = LocalBattlefield::new();
    field.add_unit(Unit::new(ATTACKER));
    let mut handler = direct_handler(
      HandlerKind::PrototypeLaser,
      test_laser(WeaponFlags::PROTOTYPE | WeaponFlags::SMALL | WeaponFlags::PULSE),
    );
    let mut reports = ReportBuffer::new();
    let mut rng = StdRng::seed_from_u64(seed);
    let heat = handler.add_heat(&mut field, &mut reports, &mut rng);
    assert!((5..=8).contains(&heat), "seed {seed} gave {heat}");
  }
}

#[test]
fn test_strafing_heat_only_on_first_hex() {
  let mut field = armed_with("ER Large Laser Prototype", None);
  let (resolution, _) = resolve(&mut field, &request(7).strafing(false), GamePhase::Firing, &[4, 4]);
  assert_eq!(resolution, Resolution::Hit { hits: 1, damage: 8 });
  assert_eq!(attacker(&field).heat, 0);

  let _ = resolve(&mut field, &request(7).strafing(true), GamePhase::Firing, &[4, 4, 2]);
  assert_eq!(attacker(&field).heat, 14);
}

#[test]
fn test_standard_autocannon_hit() {
  let mut field = armed_with("Autocannon/10", Some("AC/10 Ammo"));
  let (resolution, reports) = resolve(&mut field, &request(7), GamePhase::Firing, &[4, 4]);

  assert_eq!(resolution, Resolution::Hit { hits: 1, damage: 10 });
  let damage: Vec<_> = reports.with_id(DAMAGE_DEALT).collect();
  assert_eq!(damage.len(), 1);
  assert_eq!(damage[0].params, vec![ReportParam::Text(TARGET.to_string()), ReportParam::Number(10)]);

  let unit = attacker(&field);
  assert!(!unit.weapons[0].jammed);
  assert_eq!(unit.heat, 3);
  assert_eq!(unit.ammo[0].shots_left, 9);
  assert_eq!(field.damage_to(TARGET), 10);
  assert_eq!(field.damage_log[0].class, DamageClass::Ballistic);
}

#[test]
fn test_autocannon_miss() {
  let mut field = armed_with("Autocannon/10", Some("AC/10 Ammo"));
  let (resolution, reports) = resolve(&mut field, &request(9), GamePhase::Firing, &[4, 4]);
  assert_eq!(resolution, Resolution::Missed);
  assert_eq!(reports.with_id(ATTACK_MISSES).count(), 1);
  // A miss is still a shot fired.
  assert_eq!(attacker(&field).heat, 3);
  assert_eq!(attacker(&field).ammo[0].shots_left, 9);
}

#[test]
fn test_incendiary_hands_tag_to_fire_check() {
  let mut field = armed_with("Autocannon/10", Some("AC/10 Incendiary"));
  let mut profile = TargetProfile::new(TARGET, TargetKind::Vehicle);
  profile.combustible_hex = true;
  field.add_target(profile);

  let (resolution, reports) = resolve(&mut field, &request(7), GamePhase::Firing, &[5, 5]);

  assert_eq!(resolution, Resolution::Hit { hits: 1, damage: 10 });
  assert_eq!(field.ignition_checks, vec![(TARGET.to_string(), DamageType::Incendiary)]);
  assert_eq!(field.damage_log[0].damage_type, DamageType::Incendiary);
  assert_eq!(reports.with_id(FIRE_STARTED).count(), 1);
}

#[test]
fn test_tracer_round_resolution() {
  let mut field = armed_with("Autocannon/10", Some("AC/10 Tracer"));
  let (resolution, _) = resolve(&mut field, &request(7), GamePhase::Firing, &[5, 5]);
  assert_eq!(resolution, Resolution::Hit { hits: 1, damage: 9 });
  assert!(field.ignition_checks.is_empty());
}

#[test]
fn test_flechette_against_infantry() {
  let mut field = armed_with("Autocannon/10", Some("AC/10 Flechette"));
  field.add_target(TargetProfile::new(TARGET, TargetKind::Infantry));
  let (resolution, _) = resolve(&mut field, &request(7), GamePhase::Firing, &[5, 5]);
  assert_eq!(resolution, Resolution::Hit { hits: 1, damage: 20 });
}

#[test]
fn test_prototype_laser_burns_out_but_still_heats() {
  let mut field = armed_with("ER Large Laser Prototype", None);
  let (resolution, reports) = resolve(&mut field, &request(8), GamePhase::Firing, &[1, 1, 3, 4, 4]);

  assert_eq!(resolution, Resolution::Aborted);
  assert_eq!(reports.with_id(LASER_BURNS_OUT).count(), 1);
  assert!(attacker(&field).weapons[0].hit);
  assert_eq!(attacker(&field).heat, 15);
}

#[test]
fn test_prototype_laser_survives_failure_check() {
  let mut field = armed_with("ER Large Laser Prototype", None);
  let (resolution, _) = resolve(&mut field, &request(8), GamePhase::Firing, &[1, 1, 3, 1, 2]);

  assert_eq!(resolution, Resolution::Missed);
  assert!(!attacker(&field).weapons[0].hit);
  assert_eq!(attacker(&field).heat, 15);
}

#[test]
fn test_insulated_laser_failure_adds_no_heat_die() {
  let mut field = armed_with("Insulated Medium Laser", None);
  let (resolution, _) = resolve(&mut field, &request(8), GamePhase::Firing, &[1, 1, 6, 6]);
  assert_eq!(resolution, Resolution::Aborted);
  assert_eq!(attacker(&field).heat, 4);
}

#[test]
fn test_reflective_armor_and_reengineered_laser() {
  let mut field = armed_with("Medium Laser", None);
  let mut profile = TargetProfile::new(TARGET, TargetKind::Mech);
  profile.armor = ArmorKind::Reflective;
  field.add_target(profile.clone());
  let (resolution, _) = resolve(&mut field, &request(7), GamePhase::Firing, &[4, 4]);
  assert_eq!(resolution, Resolution::Hit { hits: 1, damage: 2 });

  let mut field = armed_with("Re-engineered Medium Laser", None);
  field.add_target(profile);
  let (resolution, _) = resolve(&mut field, &request(7), GamePhase::Firing, &[4, 4]);
  assert_eq!(resolution, Resolution::Hit { hits: 1, damage: 6 });
  assert_eq!(field.damage_log[0].class, DamageClass::Unclassified);
}

#[test]
fn test_bombast_power_sets_damage_and_heat() {
  let mut field = armed_with("Bombast Laser", None);
  let request = request(7).with_mode(WeaponMode::Power(10));
  let (resolution, _) = resolve(&mut field, &request, GamePhase::Firing, &[4, 4]);
  assert_eq!(resolution, Resolution::Hit { hits: 1, damage: 10 });
  assert_eq!(attacker(&field).heat, 10);
}

#[test]
fn test_nail_gun_never_sets_off_ammo() {
  let mut field = armed_with("Nail Gun", Some("Nail/Rivet Ammo"));
  let (resolution, _) = resolve(&mut field, &request(7), GamePhase::Firing, &[4, 4, 3]);
  assert_eq!(resolution, Resolution::Hit { hits: 1, damage: 3 });
  assert_eq!(field.damage_log[0].damage_type, DamageType::NailRivet);
  assert!(!field.damage_log[0].ammo_explosion_possible);
}

#[test]
fn test_impossible_attack_costs_no_heat() {
  let mut field = armed_with("Medium Laser", None);
  let request = AttackRequest::new(ATTACKER, TARGET, 0, ToHitData::impossible("no line of sight"));
  let (resolution, reports) = resolve(&mut field, &request, GamePhase::Firing, &[6, 6]);
  assert_eq!(resolution, Resolution::Impossible);
  assert_eq!(reports.with_id(ATTACK_IMPOSSIBLE).count(), 1);
  assert_eq!(attacker(&field).heat, 0);
}

#[test]
fn test_ams_fired_directly_does_nothing() {
  let mut field = armed_with("AMS", Some("AMS Ammo"));
  let (resolution, reports) = resolve(&mut field, &request(7), GamePhase::Firing, &[6, 6]);
  assert_eq!(resolution, Resolution::Skipped);
  assert!(reports.is_empty());
  assert_eq!(attacker(&field).ammo[0].shots_left, 12);
}

#[test]
fn test_lrm_cluster_and_damage_groups() {
  let mut field = armed_with("LRM 10", Some("LRM 10 Ammo"));
  let (resolution, reports) = resolve(&mut field, &request(7), GamePhase::Firing, &[4, 4, 6, 6]);
  assert_eq!(resolution, Resolution::Hit { hits: 10, damage: 10 });
  assert_eq!(reports.with_id(DAMAGE_DEALT).count(), 2);
  assert_eq!(attacker(&field).heat, 4);
}

#[test]
fn test_ams_worsens_cluster_roll() {
  let mut field = armed_with("LRM 10", Some("LRM 10 Ammo"));
  add_ams_defender(&mut field, TARGET);
  let (resolution, reports) = resolve(&mut field, &request(7), GamePhase::Firing, &[4, 4, 6, 6]);

  assert_eq!(resolution, Resolution::Hit { hits: 6, damage: 6 });
  assert_eq!(reports.with_id(AMS_ENGAGES).count(), 1);
  assert_eq!(reports.with_id(DAMAGE_DEALT).count(), 2);
  let defender = field.unit(TARGET).unwrap();
  assert_eq!(defender.ammo[0].shots_left, 11);
  assert_eq!(defender.heat, 1);
}

#[test]
fn test_streak_lock_is_all_or_nothing() {
  let mut field = armed_with("Streak SRM 4", Some("Streak SRM 4 Ammo"));
  let (resolution, reports) = resolve(&mut field, &request(8), GamePhase::Firing, &[2, 3]);
  assert_eq!(resolution, Resolution::NoLock);
  assert_eq!(reports.with_id(STREAK_NO_LOCK).count(), 1);
  assert_eq!(attacker(&field).heat, 0);
  assert_eq!(attacker(&field).ammo[0].shots_left, 25);

  let (resolution, reports) = resolve(&mut field, &request(8), GamePhase::Firing, &[5, 5]);
  assert_eq!(resolution, Resolution::Hit { hits: 4, damage: 8 });
  assert_eq!(reports.with_id(DAMAGE_DEALT).count(), 4);
  assert_eq!(attacker(&field).heat, 3);
  assert_eq!(attacker(&field).ammo[0].shots_left, 24);
}

#[test]
fn test_prototype_streak_rolls_cluster() {
  let mut field = armed_with("Streak SRM 2 Prototype", Some("Streak SRM 2 Ammo"));
  let (resolution, _) = resolve(&mut field, &request(8), GamePhase::Firing, &[5, 5, 1, 1]);
  assert_eq!(resolution, Resolution::Hit { hits: 1, damage: 2 });
}

#[test]
fn test_inferno_heats_target_instead_of_damaging() {
  let mut field = armed_with("SRM 6", Some("SRM 6 Inferno"));
  let (resolution, reports) = resolve(&mut field, &request(7), GamePhase::Firing, &[4, 4, 6, 6]);

  assert_eq!(resolution, Resolution::Hit { hits: 6, damage: 0 });
  assert_eq!(reports.with_id(DAMAGE_DEALT).count(), 0);
  assert!(field.damage_log.is_empty());
  assert_eq!(field.target_heat, vec![(TARGET.to_string(), 12)]);
  assert_eq!(field.ignition_checks, vec![(TARGET.to_string(), DamageType::Inferno)]);
  assert_eq!(reports.with_id(FIRE_STARTED).count(), 0);
}

#[test]
fn test_swarm_continues_to_next_target() {
  let mut field = armed_with("LRM 10", Some("LRM 10 Swarm"));
  let mut jenner = TargetProfile::new("Jenner", TargetKind::Mech);
  jenner.swarm_to_hit = Some(7);
  field.add_target(jenner);

  let (resolution, reports) = resolve(&mut field, &request(7), GamePhase::Firing, &[4, 4, 1, 1, 4, 4, 6, 6]);

  assert_eq!(resolution, Resolution::Hit { hits: 10, damage: 10 });
  assert_eq!(field.damage_to(TARGET), 3);
  assert_eq!(field.damage_to("Jenner"), 7);
  assert_eq!(reports.with_id(SWARM_CONTINUES).count(), 1);
}

#[test]
fn test_swarm_complete_miss_sends_whole_rack_on() {
  let mut field = armed_with("LRM 10", Some("LRM 10 Swarm"));
  let mut jenner = TargetProfile::new("Jenner", TargetKind::Mech);
  jenner.swarm_to_hit = Some(7);
  field.add_target(jenner);

  let (resolution, reports) = resolve(&mut field, &request(7), GamePhase::Firing, &[1, 2, 4, 4, 6, 6]);

  assert_eq!(resolution, Resolution::Hit { hits: 10, damage: 10 });
  assert_eq!(reports.with_id(ATTACK_MISSES).count(), 1);
  assert_eq!(field.damage_to(TARGET), 0);
  assert_eq!(field.damage_to("Jenner"), 10);
}

#[test]
fn test_swarm_i_spares_friendly_units() {
  let mut field = armed_with("LRM 10", Some("LRM 10 Swarm-I"));
  field.unit_mut(ATTACKER).unwrap().side = 1;
  let mut jenner = TargetProfile::new("Jenner", TargetKind::Mech);
  jenner.side = 1;
  jenner.swarm_to_hit = Some(7);
  field.add_target(jenner);
  let mut wasp = TargetProfile::new("Wasp", TargetKind::Mech);
  wasp.swarm_to_hit = Some(8);
  field.add_target(wasp);

  let (resolution, reports) = resolve(&mut field, &request(7), GamePhase::Firing, &[4, 4, 1, 1, 4, 4, 6, 6]);

  assert_eq!(resolution, Resolution::Hit { hits: 10, damage: 10 });
  assert_eq!(field.damage_to("Jenner"), 0);
  assert_eq!(field.damage_to("Wasp"), 7);
  assert_eq!(reports.with_id(SWARM_I_CONTINUES).count(), 1);
  assert_eq!(reports.with_id(SWARM_CONTINUES).count(), 0);
}

#[test]
fn test_capital_missile_destroyed_by_point_defense() {
  let mut field = armed_with("AR10 Launcher", Some("Barracuda"));
  add_ams_defender(&mut field, TARGET);
  let (resolution, reports) = resolve(&mut field, &request(8), GamePhase::Firing, &[5, 5, 3, 3]);

  assert_eq!(resolution, Resolution::Intercepted);
  assert_eq!(reports.with_id(VOLLEY_DESTROYED).count(), 1);
  assert!(field.damage_log.is_empty());
  assert_eq!(attacker(&field).heat, 20);
}

#[test]
fn test_piranha_gets_no_defense_modifier() {
  let mut field = armed_with("AR10 Launcher", Some("Piranha"));
  add_ams_defender(&mut field, TARGET);
  let (resolution, _) = resolve(&mut field, &request(8), GamePhase::Firing, &[5, 5, 3, 3]);

  assert_eq!(resolution, Resolution::Hit { hits: 1, damage: 3 });
  assert!(field.damage_log[0].capital);
  assert_eq!(field.damage_log[0].class, DamageClass::Missile);
}

#[test]
fn test_capital_missile_unopposed() {
  let mut field = armed_with("AR10 Launcher", Some("Killer Whale"));
  let (resolution, _) = resolve(&mut field, &request(8), GamePhase::Firing, &[5, 5]);
  assert_eq!(resolution, Resolution::Hit { hits: 1, damage: 4 });
}

#[test]
fn test_indirect_artillery_flight_and_scatter() {
  let mut field = armed_with("Arrow IV", Some("Arrow IV Ammo"));
  let launch = request(7).indirect(1);
  let (resolution, reports) = resolve(&mut field, &launch, GamePhase::Targeting, &[4, 4]);

  assert_eq!(resolution, Resolution::Pending { turns_remaining: 1 });
  assert_eq!(reports.with_id(ARTILLERY_INBOUND).count(), 1);
  assert_eq!(attacker(&field).heat, 10);
  assert_eq!(attacker(&field).ammo[0].shots_left, 4);

  let mut landing = launch.clone();
  landing.landing = true;
  landing.flight_turns = 0;
  let (resolution, _) = resolve(&mut field, &landing, GamePhase::Targeting, &[1, 2, 4]);

  assert_eq!(resolution, Resolution::Scattered { direction: 4, distance: 4 });
  assert_eq!(attacker(&field).heat, 10);
  assert_eq!(attacker(&field).ammo[0].shots_left, 4);
}

#[test]
fn test_offboard_artillery_hits_in_damage_groups() {
  let mut field = armed_with("Arrow IV", Some("Arrow IV Ammo"));
  let (resolution, reports) = resolve(&mut field, &request(7).indirect(0), GamePhase::Offboard, &[5, 5]);
  assert_eq!(resolution, Resolution::Hit { hits: 1, damage: 20 });
  assert_eq!(reports.with_id(DAMAGE_DEALT).count(), 4);
  assert!(field.damage_log.iter().all(|hit| hit.class == DamageClass::Artillery));
}

#[test]
fn test_homing_artillery_needs_designation() {
  let mut field = armed_with("Arrow IV", Some("Arrow IV Homing"));
  let (resolution, reports) = resolve(&mut field, &request(7), GamePhase::Firing, &[4, 4]);
  assert_eq!(resolution, Resolution::Missed);
  assert_eq!(reports.with_id(NO_DESIGNATION).count(), 1);

  field.designate(TARGET);
  let (resolution, _) = resolve(&mut field, &request(7), GamePhase::Firing, &[4, 4]);
  assert_eq!(resolution, Resolution::Hit { hits: 1, damage: 20 });
}

#[test]
fn test_request_validation() {
  let mut field = armed_with("Ultra AC/5", Some("Ultra AC/5 Ammo"));
  let mut rng = StdRng::seed_from_u64(42);

  let mut no_to_hit = request(7);
  no_to_hit.to_hit = None;
  assert!(matches!(
    build_handler(&no_to_hit, &field, &mut rng),
    Err(DispatchError::MissingToHit { .. })
  ));

  let mut bad_slot = request(7);
  bad_slot.weapon = 5;
  assert!(matches!(
    build_handler(&bad_slot, &field, &mut rng),
    Err(DispatchError::UnknownWeapon { slot: 5, .. })
  ));

  let mut bad_target = request(7);
  bad_target.target = "Nowhere".to_string();
  assert!(matches!(
    build_handler(&bad_target, &field, &mut rng),
    Err(DispatchError::UnknownTarget(_))
  ));

  let triple = request(7).with_mode(WeaponMode::Shots(3));
  assert!(matches!(
    build_handler(&triple, &field, &mut rng),
    Err(DispatchError::InvalidMode { .. })
  ));

  let bad_ammo = request(7).with_ammo(3);
  assert!(matches!(
    build_handler(&bad_ammo, &field, &mut rng),
    Err(DispatchError::MismatchedAmmo { slot: 3, .. })
  ));

  field.unit_mut(ATTACKER).unwrap().ammo[0].shots_left = 1;
  let double = request(7).with_mode(WeaponMode::Shots(2));
  assert!(matches!(
    build_handler(&double, &field, &mut rng),
    Err(DispatchError::OutOfAmmo { needed: 2, shots_left: 1, .. })
  ));

  field.unit_mut(ATTACKER).unwrap().weapons[0].jammed = true;
  assert!(matches!(
    build_handler(&request(7), &field, &mut rng),
    Err(DispatchError::WeaponUnusable { .. })
  ));
}
