//! Weapon-family handler variants.
//!
//! Every handler runs the same resolution protocol (see [`crate::combat`]). A [`HandlerKind`] only decides the few
//! steps where a family departs from it: which phases it acts in, its jam or fumble check, damage per hit, damage
//! type and class, and any extra heat.
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

use crate::catalog::{AmmoKind, AmmoStatRecord, WeaponFamily, WeaponFlags, WeaponStatRecord};
use crate::damage_type::{DamageClass, DamageType};
use crate::phase::GamePhase;
use crate::rules_tables::{
  NATURAL_TWO, PROTOTYPE_AC_JAM_ROLL, PROTOTYPE_CLAN_ULTRA_JAM_ROLL, PROTOTYPE_CLAN_ULTRA_JAM_SHOTS,
  ROTARY_HIGH_RATE_JAM_ROLL, ROTARY_HIGH_RATE_SHOTS, ULTRA_DOUBLE_SHOTS,
};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum HandlerKind {
  /// Energy weapons, gauss rifles, machine guns, PPCs: the base protocol unchanged.
  Standard,
  Autocannon,
  TracerAutocannon,
  IncendiaryAutocannon,
  Ultra,
  Rotary,
  /// Inner Sphere prototype autocannon and Ultra AC.
  PrototypeAutocannon,
  PrototypeClanUltra,
  NailRivet,
  PrototypeLaser,
  InsulatedLaser,
  ReengineeredLaser,
  BombastLaser,
  ArtilleryIndirect,
  ArtilleryDirect,
  ArtilleryHoming,
  PointDefense,
  ClusterMissile,
  Streak,
  PrototypeStreak,
  Swarm,
  SwarmI,
  CapitalMissile,
  Piranha,
}

/// What a failed pre-damage check does to the weapon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fumble {
  Jam,
  JamAndHit,
  /// Natural two on a prototype or insulated laser: roll again to see if it burns out.
  LaserFailureCheck,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeatBonus {
  None,
  FullDie,
  HalfDie,
}

impl HandlerKind {
  /// Whether this handler acts in `phase` at all.
  #[must_use]
  pub fn cares(self, phase: GamePhase) -> bool {
    match self {
      HandlerKind::ArtilleryIndirect => phase.is_targeting() || phase.is_offboard(),
      HandlerKind::ArtilleryDirect => phase == GamePhase::Firing,
      HandlerKind::PointDefense => false,
      _ => phase.is_firing(),
    }
  }

  /// The family's jam or fumble condition on the to-hit roll, given the number of shots fired.
  #[must_use]
  pub fn check_fumble(self, roll: u8, shots: u8) -> Option<Fumble> {
    match self {
      HandlerKind::Ultra if shots >= ULTRA_DOUBLE_SHOTS && roll == NATURAL_TWO => Some(Fumble::Jam),
      HandlerKind::Rotary if shots >= ROTARY_HIGH_RATE_SHOTS && roll <= ROTARY_HIGH_RATE_JAM_ROLL => Some(Fumble::Jam),
      HandlerKind::Rotary if shots > 1 && roll == NATURAL_TWO => Some(Fumble::Jam),
      HandlerKind::PrototypeAutocannon if roll == PROTOTYPE_AC_JAM_ROLL => Some(Fumble::JamAndHit),
      HandlerKind::PrototypeClanUltra
        if shots == PROTOTYPE_CLAN_ULTRA_JAM_SHOTS && roll <= PROTOTYPE_CLAN_ULTRA_JAM_ROLL =>
      {
        Some(Fumble::JamAndHit)
      }
      HandlerKind::PrototypeLaser | HandlerKind::InsulatedLaser if roll == NATURAL_TWO => {
        Some(Fumble::LaserFailureCheck)
      }
      _ => None,
    }
  }

  /// The damage type a shot carries: a family override, else whatever the munition carries.
  #[must_use]
  pub fn damage_type(self, ammo: Option<&AmmoStatRecord>) -> DamageType {
    match self {
      HandlerKind::IncendiaryAutocannon => DamageType::Incendiary,
      HandlerKind::NailRivet => DamageType::NailRivet,
      _ => ammo.map_or(DamageType::None, |ammo| ammo.munition.damage_type()),
    }
  }

  #[must_use]
  pub fn damage_class(self, weapon: &WeaponStatRecord) -> DamageClass {
    match self {
      HandlerKind::ReengineeredLaser => DamageClass::Unclassified,
      HandlerKind::BombastLaser => DamageClass::Energy,
      HandlerKind::ArtilleryIndirect | HandlerKind::ArtilleryDirect | HandlerKind::ArtilleryHoming => {
        DamageClass::Artillery
      }
      _ if self.is_missile_volley() => DamageClass::Missile,
      _ if weapon.has_flag(WeaponFlags::ENERGY) => DamageClass::Energy,
      _ if weapon.has_flag(WeaponFlags::MISSILE) => DamageClass::Missile,
      _ => DamageClass::Ballistic,
    }
  }

  #[must_use]
  pub fn heat_bonus(self, weapon: &WeaponStatRecord) -> HeatBonus {
    match self {
      HandlerKind::PrototypeLaser if weapon.has_flag(WeaponFlags::SMALL | WeaponFlags::PULSE) => HeatBonus::HalfDie,
      HandlerKind::PrototypeLaser => HeatBonus::FullDie,
      _ => HeatBonus::None,
    }
  }

  /// Energy weapons generate their heat before any check, so a failed shot still heats the unit. Everything else
  /// checks first and pays only if the shot goes off.
  #[must_use]
  pub fn charges_heat_first(self, weapon: &WeaponStatRecord) -> bool {
    weapon.has_flag(WeaponFlags::ENERGY)
  }

  /// Missile fire that point defense can engage.
  #[must_use]
  pub fn is_missile_volley(self) -> bool {
    matches!(
      self,
      HandlerKind::ClusterMissile
        | HandlerKind::Streak
        | HandlerKind::PrototypeStreak
        | HandlerKind::Swarm
        | HandlerKind::SwarmI
        | HandlerKind::CapitalMissile
        | HandlerKind::Piranha
    )
  }

  #[must_use]
  pub fn is_capital_missile(self) -> bool {
    matches!(self, HandlerKind::CapitalMissile | HandlerKind::Piranha)
  }

  #[must_use]
  pub fn is_streak(self) -> bool {
    matches!(self, HandlerKind::Streak | HandlerKind::PrototypeStreak)
  }

  #[must_use]
  pub fn is_swarm(self) -> bool {
    matches!(self, HandlerKind::Swarm | HandlerKind::SwarmI)
  }

  /// Multi-shot autocannon whose hits are rolled on the cluster table.
  #[must_use]
  pub fn is_rapid_fire(self) -> bool {
    matches!(
      self,
      HandlerKind::Ultra | HandlerKind::Rotary | HandlerKind::PrototypeAutocannon | HandlerKind::PrototypeClanUltra
    )
  }
}

/// Long-range missiles, MRMs and artillery deliver their damage in 5-point groups rather than per hit.
#[must_use]
pub fn uses_damage_groups(weapon: &WeaponStatRecord) -> bool {
  matches!(
    weapon.family,
    WeaponFamily::Lrm | WeaponFamily::Mrm | WeaponFamily::Artillery | WeaponFamily::ArtilleryCannon
  ) || weapon.ammo == AmmoKind::StreakLrm
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::catalog::{Munition, RangeBands};
  use strum::IntoEnumIterator;

  fn laser(flags: WeaponFlags) -> WeaponStatRecord {
    WeaponStatRecord::builder("Test Laser", "TestLaser", WeaponFamily::Laser)
      .heat(5)
      .damage(5)
      .ranges(RangeBands::new(0, 3, 6, 9, 12))
      .flags(WeaponFlags::DIRECT_FIRE | WeaponFlags::ENERGY | flags)
      .build()
  }

  #[test]
  fn test_direct_artillery_cares_only_in_firing() {
    for phase in GamePhase::iter() {
      assert_eq!(HandlerKind::ArtilleryDirect.cares(phase), phase == GamePhase::Firing, "{phase}");
      assert_eq!(HandlerKind::ArtilleryHoming.cares(phase), phase.is_firing(), "{phase}");
    }
  }

  #[test]
  fn test_indirect_artillery_phases() {
    let caring: Vec<GamePhase> = GamePhase::iter().filter(|p| HandlerKind::ArtilleryIndirect.cares(*p)).collect();
    assert_eq!(caring, vec![GamePhase::Targeting, GamePhase::Offboard]);
  }

  #[test]
  fn test_cares_is_pure() {
    for kind in HandlerKind::iter() {
      for phase in GamePhase::iter() {
        let first = kind.cares(phase);
        assert!((0..5).all(|_| kind.cares(phase) == first));
      }
    }
  }

  #[test]
  fn test_point_defense_never_fires_directly() {
    assert!(GamePhase::iter().all(|phase| !HandlerKind::PointDefense.cares(phase)));
  }

  #[test]
  fn test_ultra_and_rotary_jams() {
    assert_eq!(HandlerKind::Ultra.check_fumble(2, 2), Some(Fumble::Jam));
    assert_eq!(HandlerKind::Ultra.check_fumble(2, 1), None);
    assert_eq!(HandlerKind::Ultra.check_fumble(3, 2), None);

    assert_eq!(HandlerKind::Rotary.check_fumble(3, 6), Some(Fumble::Jam));
    assert_eq!(HandlerKind::Rotary.check_fumble(3, 5), Some(Fumble::Jam));
    assert_eq!(HandlerKind::Rotary.check_fumble(4, 6), None);
    assert_eq!(HandlerKind::Rotary.check_fumble(3, 4), None);
    assert_eq!(HandlerKind::Rotary.check_fumble(2, 2), Some(Fumble::Jam));
    assert_eq!(HandlerKind::Rotary.check_fumble(2, 1), None);
  }

  #[test]
  fn test_prototype_autocannon_jams() {
    assert_eq!(HandlerKind::PrototypeAutocannon.check_fumble(2, 1), Some(Fumble::JamAndHit));
    assert_eq!(HandlerKind::PrototypeAutocannon.check_fumble(3, 2), None);

    assert_eq!(HandlerKind::PrototypeClanUltra.check_fumble(3, 2), Some(Fumble::JamAndHit));
    assert_eq!(HandlerKind::PrototypeClanUltra.check_fumble(2, 2), Some(Fumble::JamAndHit));
    assert_eq!(HandlerKind::PrototypeClanUltra.check_fumble(4, 2), None);
    assert_eq!(HandlerKind::PrototypeClanUltra.check_fumble(2, 1), None);
  }

  #[test]
  fn test_laser_failure_check() {
    assert_eq!(HandlerKind::PrototypeLaser.check_fumble(2, 1), Some(Fumble::LaserFailureCheck));
    assert_eq!(HandlerKind::InsulatedLaser.check_fumble(2, 1), Some(Fumble::LaserFailureCheck));
    assert_eq!(HandlerKind::InsulatedLaser.check_fumble(3, 1), None);
    assert_eq!(HandlerKind::Standard.check_fumble(2, 1), None);
  }

  #[test]
  fn test_damage_type_overrides() {
    let tracer = AmmoStatRecord::new("AC/10 Tracer", AmmoKind::Autocannon, 10, Munition::Tracer, 10);
    let inferno = AmmoStatRecord::new("SRM 6 Inferno", AmmoKind::Srm, 6, Munition::Inferno, 15);
    assert_eq!(HandlerKind::TracerAutocannon.damage_type(Some(&tracer)), DamageType::None);
    assert_eq!(HandlerKind::IncendiaryAutocannon.damage_type(None), DamageType::Incendiary);
    assert_eq!(HandlerKind::NailRivet.damage_type(None), DamageType::NailRivet);
    assert_eq!(HandlerKind::ClusterMissile.damage_type(Some(&inferno)), DamageType::Inferno);
  }

  #[test]
  fn test_damage_classes() {
    let plain = laser(WeaponFlags::empty());
    assert_eq!(HandlerKind::Standard.damage_class(&plain), DamageClass::Energy);
    assert_eq!(HandlerKind::ReengineeredLaser.damage_class(&plain), DamageClass::Unclassified);
    assert_eq!(HandlerKind::ArtilleryDirect.damage_class(&plain), DamageClass::Artillery);
    assert_eq!(HandlerKind::Swarm.damage_class(&plain), DamageClass::Missile);
  }

  #[test]
  fn test_prototype_laser_heat_bonus() {
    assert_eq!(HandlerKind::PrototypeLaser.heat_bonus(&laser(WeaponFlags::PROTOTYPE)), HeatBonus::FullDie);
    let small_pulse = laser(WeaponFlags::PROTOTYPE | WeaponFlags::SMALL | WeaponFlags::PULSE);
    assert_eq!(HandlerKind::PrototypeLaser.heat_bonus(&small_pulse), HeatBonus::HalfDie);
    // Small but not pulse takes the full die.
    assert_eq!(
      HandlerKind::PrototypeLaser.heat_bonus(&laser(WeaponFlags::PROTOTYPE | WeaponFlags::SMALL)),
      HeatBonus::FullDie
    );
    assert_eq!(HandlerKind::InsulatedLaser.heat_bonus(&laser(WeaponFlags::empty())), HeatBonus::None);
  }
}
