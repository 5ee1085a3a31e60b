use std::sync::Arc;

use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::action::{AttackRequest, ToHitData};
use crate::battlefield::{Battlefield, DamageHit, TargetKind};
use crate::catalog::{AmmoStatRecord, WeaponFlags, WeaponStatRecord};
use crate::combat_tables::cluster_hits;
use crate::damage_type::DamageType;
use crate::dice::{roll, roll_dice, roll_half_die};
use crate::families::{uses_damage_groups, Fumble, HandlerKind, HeatBonus};
use crate::phase::GamePhase;
use crate::report::{
  Report, ReportBuffer, ARTILLERY_INBOUND, ARTILLERY_SCATTERS, ATTACK_IMPOSSIBLE, ATTACK_MISSES, CLUSTER_HITS,
  DAMAGE_DEALT, FIRE_STARTED, INFERNO_HEAT, LASER_BURNS_OUT, LASER_FAILURE_CHECK, NO_DESIGNATION, PROTOTYPE_HEAT,
  PROTOTYPE_JAMS, STREAK_NO_LOCK, TO_HIT_ROLL, WEAPON_FIRES, WEAPON_JAMS,
};
use crate::rules_tables::{DAMAGE_GROUP_SIZE, INFERNO_HEAT_PER_MISSILE, LASER_FAILURE_TARGET, TRACER_DAMAGE_PENALTY};
use crate::unit::WeaponMode;
use crate::{debug, warn};

/// How one attack came out.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
  /// The handler does nothing in this phase.
  Skipped,
  /// Artillery in flight; it lands after `turns_remaining` more turns.
  Pending { turns_remaining: u8 },
  Impossible,
  /// A jam or fumble ended the attack before damage.
  Aborted,
  /// A streak launcher failed to lock on and did not fire.
  NoLock,
  Missed,
  /// Indirect artillery missed and landed `distance` hexes away in hex direction `direction` (1 to 6).
  Scattered { direction: u8, distance: u32 },
  /// Point defense destroyed the volley.
  Intercepted,
  Hit { hits: u32, damage: u32 },
}

/// The resolution context of one fired weapon.
///
/// Created by [`crate::dispatch::build_handler`] with the to-hit roll already made, used once through
/// [`AttackHandler::handle`], then dropped.
#[derive(Debug, Clone)]
pub struct AttackHandler {
  pub kind: HandlerKind,
  pub request: AttackRequest,
  pub weapon: Arc<WeaponStatRecord>,
  pub ammo: Option<Arc<AmmoStatRecord>>,
  pub ammo_slot: Option<usize>,
  pub mode: WeaponMode,
  pub to_hit: ToHitData,
  pub roll: u8,
  pub damage_type: DamageType,
  /// Heat this attack has charged to the attacker so far.
  pub heat: u32,
  pub shots: u8,
}

impl AttackHandler {
  #[allow(clippy::too_many_arguments)]
  #[must_use]
  pub fn new(
    kind: HandlerKind, request: AttackRequest, weapon: Arc<WeaponStatRecord>, ammo: Option<Arc<AmmoStatRecord>>,
    ammo_slot: Option<usize>, mode: WeaponMode, to_hit: ToHitData, roll: u8,
  ) -> Self {
    let damage_type = kind.damage_type(ammo.as_deref());
    AttackHandler {
      kind,
      request,
      weapon,
      ammo,
      ammo_slot,
      mode,
      to_hit,
      roll,
      damage_type,
      heat: 0,
      shots: mode.shots(),
    }
  }

  /// Replace the to-hit roll, e.g. with one forced by a replay.
  #[must_use]
  pub fn with_roll(mut self, roll: u8) -> Self {
    self.roll = roll;
    self
  }

  #[must_use]
  pub fn cares(&self, phase: GamePhase) -> bool {
    self.kind.cares(phase)
  }

  #[must_use]
  pub fn hits(&self) -> bool {
    self.to_hit.hits(self.roll)
  }

  /// Damage delivered by one hit (one shot, one missile) before damage type and armor adjustments.
  pub fn calc_damage_per_hit(&self, rng: &mut dyn RngCore) -> u32 {
    match self.kind {
      HandlerKind::TracerAutocannon => self.weapon.damage.saturating_sub(TRACER_DAMAGE_PENALTY),
      HandlerKind::NailRivet => u32::from(roll(rng)),
      HandlerKind::BombastLaser => match self.mode {
        WeaponMode::Power(power) => u32::from(power),
        _ => self.weapon.damage,
      },
      HandlerKind::CapitalMissile | HandlerKind::Piranha => self
        .ammo
        .as_ref()
        .and_then(|ammo| ammo.attack_value)
        .or_else(|| self.weapon.attack_values.map(|values| values.at(self.request.range)))
        .unwrap_or(self.weapon.damage),
      _ => self.weapon.damage,
    }
  }

  /// Charge this attack's heat to the attacker and return it. Follow-on strafing shots and impossible attacks
  /// generate none.
  pub fn add_heat(&mut self, field: &mut dyn Battlefield, reports: &mut ReportBuffer, rng: &mut dyn RngCore) -> u32 {
    if !self.request.pays_heat() || self.to_hit.is_impossible() {
      return 0;
    }

    let base = match (self.kind, self.mode) {
      (HandlerKind::BombastLaser, WeaponMode::Power(power)) => u32::from(power),
      _ => self.weapon.heat * u32::from(self.shots),
    };
    let bonus = match self.kind.heat_bonus(&self.weapon) {
      HeatBonus::None => 0,
      HeatBonus::FullDie => u32::from(roll(rng)),
      HeatBonus::HalfDie => u32::from(roll_half_die(rng)),
    };
    if bonus > 0 {
      reports.push(Report::new(PROTOTYPE_HEAT, &self.request.attacker).add(bonus).indent(2));
    }

    let heat = base + bonus;
    if let Some(unit) = field.unit_mut(&self.request.attacker) {
      unit.add_heat(heat);
    }
    self.heat += heat;
    heat
  }

  fn consume_ammo(&self, field: &mut dyn Battlefield) {
    let Some(slot) = self.ammo_slot else {
      return;
    };
    let consumed = field
      .unit_mut(&self.request.attacker)
      .is_some_and(|unit| unit.consume_ammo(slot, u32::from(self.shots)));
    if !consumed {
      warn!(
        "(AttackHandler.consume_ammo) {} could not take {} rounds from ammo slot {} for {}.",
        self.request.attacker, self.shots, slot, self.weapon.name
      );
    }
  }

  fn mark_weapon(&self, field: &mut dyn Battlefield, jammed: bool, hit: bool) {
    if let Some(mount) = field
      .unit_mut(&self.request.attacker)
      .and_then(|unit| unit.weapon_mut(self.request.weapon))
    {
      mount.jammed |= jammed;
      mount.hit |= hit;
    }
  }

  /// Family jam and fumble checks on the to-hit roll. Returns true if the attack ends here.
  pub fn do_checks(&mut self, field: &mut dyn Battlefield, reports: &mut ReportBuffer, rng: &mut dyn RngCore) -> bool {
    let Some(fumble) = self.kind.check_fumble(self.roll, self.shots) else {
      return false;
    };
    let attacker = self.request.attacker.clone();

    match fumble {
      Fumble::Jam => {
        debug!("(AttackHandler.do_checks) {}'s {} jams on a roll of {}.", attacker, self.weapon.name, self.roll);
        self.mark_weapon(field, true, false);
        reports.push(Report::new(WEAPON_JAMS, &attacker).add(self.weapon.name.as_str()).indent(2));
        true
      }
      Fumble::JamAndHit => {
        debug!(
          "(AttackHandler.do_checks) {}'s prototype {} jams and is damaged on a roll of {}.",
          attacker, self.weapon.name, self.roll
        );
        self.mark_weapon(field, true, true);
        reports.push(Report::new(PROTOTYPE_JAMS, &attacker).add(self.weapon.name.as_str()).indent(2));
        true
      }
      Fumble::LaserFailureCheck => {
        let check = roll_dice(2, rng);
        reports.push(
          Report::new(LASER_FAILURE_CHECK, &attacker)
            .add(self.weapon.name.as_str())
            .add(check)
            .indent(2),
        );
        if check >= LASER_FAILURE_TARGET {
          debug!("(AttackHandler.do_checks) {}'s {} burns out.", attacker, self.weapon.name);
          self.mark_weapon(field, false, true);
          reports.push(Report::new(LASER_BURNS_OUT, &attacker).add(self.weapon.name.as_str()).indent(2));
          true
        } else {
          false
        }
      }
    }
  }

  /// Run the resolution protocol for this attack in `phase`.
  pub fn handle(
    &mut self, phase: GamePhase, field: &mut dyn Battlefield, reports: &mut ReportBuffer, rng: &mut dyn RngCore,
  ) -> Resolution {
    if !self.cares(phase) {
      debug!(
        "(AttackHandler.handle) {} handler for {} does not act in the {} phase.",
        self.kind, self.weapon.name, phase
      );
      return Resolution::Skipped;
    }

    if self.request.landing {
      reports.push(
        Report::new(ARTILLERY_INBOUND, &self.request.attacker)
          .add(self.weapon.name.as_str())
          .add(self.request.target.as_str())
          .add(0u8),
      );
      let hit = self.hits();
      return self.resolve_impact(hit, field, reports, rng);
    }

    reports.push(
      Report::new(WEAPON_FIRES, &self.request.attacker)
        .add(self.weapon.name.as_str())
        .add(self.request.target.as_str()),
    );

    if self.to_hit.is_impossible() {
      reports.push(
        Report::new(ATTACK_IMPOSSIBLE, &self.request.attacker)
          .add(self.to_hit.description())
          .indent(1),
      );
      return Resolution::Impossible;
    }

    reports.push(
      Report::new(TO_HIT_ROLL, &self.request.attacker)
        .add(self.to_hit.value)
        .add(self.roll)
        .indent(1),
    );

    let heat_first = self.kind.charges_heat_first(&self.weapon);
    if heat_first {
      self.add_heat(field, reports, rng);
    }

    if self.do_checks(field, reports, rng) {
      return Resolution::Aborted;
    }

    let hit = self.hits();
    if self.kind.is_streak() && !hit {
      reports.push(Report::new(STREAK_NO_LOCK, &self.request.attacker).indent(2));
      return Resolution::NoLock;
    }

    if !heat_first {
      self.add_heat(field, reports, rng);
    }
    self.consume_ammo(field);

    if self.kind == HandlerKind::ArtilleryIndirect && self.request.flight_turns > 0 {
      reports.push(
        Report::new(ARTILLERY_INBOUND, &self.request.attacker)
          .add(self.weapon.name.as_str())
          .add(self.request.target.as_str())
          .add(self.request.flight_turns),
      );
      return Resolution::Pending {
        turns_remaining: self.request.flight_turns,
      };
    }

    self.resolve_impact(hit, field, reports, rng)
  }

  fn resolve_impact(
    &mut self, hit: bool, field: &mut dyn Battlefield, reports: &mut ReportBuffer, rng: &mut dyn RngCore,
  ) -> Resolution {
    let target = self.request.target.clone();

    if self.kind == HandlerKind::ArtilleryHoming {
      if !field.is_designated(&target) {
        reports.push(Report::new(NO_DESIGNATION, &self.request.attacker).add(target.as_str()).indent(2));
        return Resolution::Missed;
      }
      // Homing rounds ride the TAG beam onto a designated target.
      let damage = self.apply_hits(&target, 1, field, reports, rng);
      return Resolution::Hit { hits: 1, damage };
    }

    if self.kind.is_swarm() {
      return self.resolve_swarm(hit, field, reports, rng);
    }

    if !hit {
      if self.kind == HandlerKind::ArtilleryIndirect {
        let direction = roll(rng);
        let distance = u32::try_from(self.to_hit.margin_of_failure(self.roll)).unwrap_or(0);
        debug!(
          "(AttackHandler.resolve_impact) {}'s {} scatters {} hexes in direction {}.",
          self.request.attacker, self.weapon.name, distance, direction
        );
        reports.push(
          Report::new(ARTILLERY_SCATTERS, &self.request.attacker)
            .add(direction)
            .add(distance)
            .indent(2),
        );
        return Resolution::Scattered { direction, distance };
      }
      reports.push(Report::new(ATTACK_MISSES, &self.request.attacker).add(target.as_str()).indent(2));
      return Resolution::Missed;
    }

    let hits = if self.kind.is_capital_missile() {
      match self.capital_volley(field, reports, rng) {
        Some(hits) => hits,
        None => return Resolution::Intercepted,
      }
    } else if self.kind.is_missile_volley() {
      self.missile_hits(&target, self.weapon.rack_size, field, reports, rng)
    } else if self.kind.is_rapid_fire() && self.shots > 1 {
      let hits = cluster_hits(u32::from(self.shots), i32::from(roll_dice(2, rng)));
      reports.push(
        Report::new(CLUSTER_HITS, &self.request.attacker)
          .add(hits)
          .add(self.shots)
          .indent(2),
      );
      hits
    } else {
      1
    };

    let damage = self.apply_hits(&target, hits, field, reports, rng);
    Resolution::Hit { hits, damage }
  }

  /// Deliver `hits` to `target`: damage per hit, grouped for families that group, adjusted for damage type and
  /// armor, then any secondary effects of the damage type. Returns the damage delivered.
  pub(crate) fn apply_hits(
    &self, target: &str, hits: u32, field: &mut dyn Battlefield, reports: &mut ReportBuffer, rng: &mut dyn RngCore,
  ) -> u32 {
    let Some(profile) = field.target(target).cloned() else {
      warn!("(AttackHandler.apply_hits) Target {target} has left the battlefield.");
      return 0;
    };

    let per_hit: Vec<u32> = (0..hits).map(|_| self.calc_damage_per_hit(rng)).collect();
    let blocks = if uses_damage_groups(&self.weapon) {
      damage_groups(per_hit.iter().sum())
    } else {
      per_hit
    };

    let class = self.kind.damage_class(&self.weapon);
    let capital = self.kind.is_capital_missile() || self.weapon.has_flag(WeaponFlags::CAPITAL);
    let mut total = 0;
    for block in blocks {
      let amount = class.adjust_for_armor(self.damage_type.adjust_damage(block, profile.kind), profile.armor);
      if amount == 0 {
        continue;
      }
      field.apply_damage(DamageHit {
        target: target.to_string(),
        amount,
        damage_type: self.damage_type,
        class,
        capital,
        ammo_explosion_possible: self.damage_type.can_trigger_ammo_explosion(),
      });
      reports.push(
        Report::new(DAMAGE_DEALT, &self.request.attacker)
          .add(target)
          .add(amount)
          .indent(2),
      );
      total += amount;
    }

    if self.damage_type == DamageType::Inferno && profile.kind != TargetKind::Infantry {
      let heat = hits * INFERNO_HEAT_PER_MISSILE;
      field.apply_target_heat(target, heat);
      reports.push(Report::new(INFERNO_HEAT, target).add(heat).indent(2));
    }

    if self.damage_type.starts_fires() && field.check_for_ignition(target, self.damage_type) {
      reports.push(Report::new(FIRE_STARTED, target).add(self.damage_type.to_string()).indent(2));
    }

    debug!(
      "(AttackHandler.apply_hits) {}'s {} hits {} {} times for {} damage.",
      self.request.attacker, self.weapon.name, target, hits, total
    );
    total
  }
}

/// Split `total` damage into 5-point groups plus a remainder.
fn damage_groups(total: u32) -> Vec<u32> {
  let mut groups = vec![DAMAGE_GROUP_SIZE; (total / DAMAGE_GROUP_SIZE) as usize];
  if total % DAMAGE_GROUP_SIZE > 0 {
    groups.push(total % DAMAGE_GROUP_SIZE);
  }
  groups
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::dice::LoadedDice;
  use rand::rngs::StdRng;
  use rand::SeedableRng;

  #[test]
  fn test_damage_groups() {
    assert_eq!(damage_groups(12), vec![5, 5, 2]);
    assert_eq!(damage_groups(10), vec![5, 5]);
    assert_eq!(damage_groups(3), vec![3]);
    assert!(damage_groups(0).is_empty());
  }

  #[test]
  fn test_resolution_json() {
    let hit = serde_json::to_string(&Resolution::Hit { hits: 2, damage: 10 }).unwrap();
    assert_eq!(hit, r#"{"Hit":{"hits":2,"damage":10}}"#);
    assert_eq!(serde_json::to_string(&Resolution::Missed).unwrap(), r#""Missed""#);
  }

  #[test]
  fn test_loaded_dice_drive_d6() {
    let mut dice = LoadedDice::new(&[6, 1]);
    assert_eq!(roll(&mut dice), 6);
    assert_eq!(roll(&mut dice), 1);
    let mut rng = StdRng::seed_from_u64(42);
    assert!((1..=6).contains(&roll(&mut rng)));
  }
}
