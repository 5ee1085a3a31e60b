//! The seam between weapon resolution and the rest of the game engine.
//!
//! Handlers never reach into game state directly. Everything they need to read or change outside their own
//! resolution context goes through [`Battlefield`]: the target's profile, damage, fires, heat on the target, the
//! attacking and defending units, TAG designation and swarm re-targeting.
use serde::{Deserialize, Serialize};
use strum_macros::Display;

use crate::action::ToHitData;
use crate::damage_type::{DamageClass, DamageType};
use crate::unit::Unit;
use crate::{debug, info};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display)]
pub enum TargetKind {
  #[default]
  Mech,
  Vehicle,
  Infantry,
  BattleArmor,
  Aerospace,
  Building,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display)]
pub enum ArmorKind {
  #[default]
  Standard,
  Reflective,
  Reactive,
}

/// What an attack needs to know about its target.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TargetProfile {
  pub name: String,
  #[serde(default)]
  pub kind: TargetKind,
  #[serde(default)]
  pub armor: ArmorKind,
  #[serde(default)]
  pub side: u32,
  /// The target stands in a hex that can catch fire.
  #[serde(default)]
  pub combustible_hex: bool,
  /// Designated by TAG this turn.
  #[serde(default)]
  pub designated: bool,
  /// To-hit number for a swarm attack that moves on to this target.
  #[serde(default)]
  pub swarm_to_hit: Option<i32>,
}

impl TargetProfile {
  #[must_use]
  pub fn new(name: &str, kind: TargetKind) -> Self {
    TargetProfile {
      name: name.to_string(),
      kind,
      armor: ArmorKind::Standard,
      side: 0,
      combustible_hex: false,
      designated: false,
      swarm_to_hit: None,
    }
  }
}

/// One block of damage delivered to a target, already adjusted for damage type and armor.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DamageHit {
  pub target: String,
  pub amount: u32,
  pub damage_type: DamageType,
  pub class: DamageClass,
  pub capital: bool,
  pub ammo_explosion_possible: bool,
}

pub trait Battlefield {
  fn target(&self, name: &str) -> Option<&TargetProfile>;

  fn unit(&self, name: &str) -> Option<&Unit>;

  fn unit_mut(&mut self, name: &str) -> Option<&mut Unit>;

  fn apply_damage(&mut self, hit: DamageHit);

  /// Hand a fire-starting damage type to the fire check. Returns true if a fire started.
  fn check_for_ignition(&mut self, target: &str, damage_type: DamageType) -> bool;

  fn apply_target_heat(&mut self, target: &str, heat: u32);

  fn is_designated(&self, target: &str) -> bool;

  /// Pick the next target for swarm missiles that missed. Never returns a target in `visited`.
  fn swarm_retarget(&mut self, attacker: &str, visited: &[String], allow_friendly: bool) -> Option<(String, ToHitData)>;
}

/// An in-memory battlefield that records everything done to it.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct LocalBattlefield {
  #[serde(default)]
  units: Vec<Unit>,
  #[serde(default)]
  targets: Vec<TargetProfile>,
  #[serde(skip)]
  pub damage_log: Vec<DamageHit>,
  #[serde(skip)]
  pub ignition_checks: Vec<(String, DamageType)>,
  #[serde(skip)]
  pub target_heat: Vec<(String, u32)>,
}

impl LocalBattlefield {
  #[must_use]
  pub fn new() -> Self {
    LocalBattlefield::default()
  }

  /// Add a unit and, if no profile exists for it yet, a default mech profile so it can be targeted.
  pub fn add_unit(&mut self, unit: Unit) {
    if self.target(&unit.name).is_none() {
      let mut profile = TargetProfile::new(&unit.name, TargetKind::Mech);
      profile.side = unit.side;
      self.targets.push(profile);
    }
    self.units.push(unit);
  }

  pub fn add_target(&mut self, profile: TargetProfile) {
    self.targets.retain(|target| target.name != profile.name);
    self.targets.push(profile);
  }

  pub fn designate(&mut self, target: &str) {
    if let Some(profile) = self.targets.iter_mut().find(|profile| profile.name == target) {
      profile.designated = true;
    }
  }

  pub fn units(&self) -> impl Iterator<Item = &Unit> {
    self.units.iter()
  }

  pub fn targets(&self) -> impl Iterator<Item = &TargetProfile> {
    self.targets.iter()
  }

  /// Clear per-turn state: point defense engagements and TAG designations.
  pub fn new_turn(&mut self) {
    for unit in &mut self.units {
      unit.new_turn();
    }
    for target in &mut self.targets {
      target.designated = false;
    }
  }

  /// Total damage delivered to `target` so far.
  #[must_use]
  pub fn damage_to(&self, target: &str) -> u32 {
    self.damage_log.iter().filter(|hit| hit.target == target).map(|hit| hit.amount).sum()
  }

  fn side_of(&self, name: &str) -> Option<u32> {
    self
      .units
      .iter()
      .find(|unit| unit.name == name)
      .map(|unit| unit.side)
      .or_else(|| self.target(name).map(|target| target.side))
  }
}

impl Battlefield for LocalBattlefield {
  fn target(&self, name: &str) -> Option<&TargetProfile> {
    self.targets.iter().find(|target| target.name == name)
  }

  fn unit(&self, name: &str) -> Option<&Unit> {
    self.units.iter().find(|unit| unit.name == name)
  }

  fn unit_mut(&mut self, name: &str) -> Option<&mut Unit> {
    self.units.iter_mut().find(|unit| unit.name == name)
  }

  fn apply_damage(&mut self, hit: DamageHit) {
    debug!("(LocalBattlefield.apply_damage) {} takes {} damage.", hit.target, hit.amount);
    self.damage_log.push(hit);
  }

  fn check_for_ignition(&mut self, target: &str, damage_type: DamageType) -> bool {
    self.ignition_checks.push((target.to_string(), damage_type));
    let ignited = self.target(target).is_some_and(|profile| profile.combustible_hex);
    if ignited {
      info!("(LocalBattlefield.check_for_ignition) {damage_type} fire starts in the hex of {target}.");
    }
    ignited
  }

  fn apply_target_heat(&mut self, target: &str, heat: u32) {
    if let Some(unit) = self.unit_mut(target) {
      unit.add_heat(heat);
    }
    self.target_heat.push((target.to_string(), heat));
  }

  fn is_designated(&self, target: &str) -> bool {
    self.target(target).is_some_and(|profile| profile.designated)
  }

  fn swarm_retarget(&mut self, attacker: &str, visited: &[String], allow_friendly: bool) -> Option<(String, ToHitData)> {
    let attacker_side = self.side_of(attacker);
    self
      .targets
      .iter()
      .filter(|target| target.name != attacker && !visited.contains(&target.name))
      .filter(|target| allow_friendly || Some(target.side) != attacker_side)
      .find_map(|target| {
        target
          .swarm_to_hit
          .map(|value| (target.name.clone(), ToHitData::new(value, "swarm follow-on attack")))
      })
  }
}
