use std::sync::Arc;

use derivative::Derivative;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, skip_serializing_none};

use crate::catalog::{AmmoByName, AmmoStatRecord, WeaponByName, WeaponFamily, WeaponStatRecord};
use crate::debug;

/// How a mounted weapon is set to fire.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WeaponMode {
  #[default]
  Standard,
  /// Multi-shot autocannon rate of fire.
  Shots(u8),
  /// Variable power setting (bombast lasers).
  Power(u8),
  /// Point defense on or off.
  PointDefense(bool),
}

impl WeaponMode {
  #[must_use]
  pub fn shots(self) -> u8 {
    match self {
      WeaponMode::Shots(shots) => shots,
      _ => 1,
    }
  }
}

#[serde_as]
#[skip_serializing_none]
#[derive(Derivative, Serialize, Deserialize, Debug, Clone)]
#[derivative(PartialEq)]
pub struct MountedWeapon {
  #[serde_as(as = "WeaponByName")]
  pub record: Arc<WeaponStatRecord>,
  #[serde(default)]
  pub mode: WeaponMode,
  #[serde(default)]
  pub jammed: bool,
  /// Destroyed or disabled by a critical hit or a failure check.
  #[serde(default)]
  pub hit: bool,
  #[serde(default)]
  pub linked_ammo: Option<usize>,
  #[serde(skip)]
  #[derivative(PartialEq = "ignore")]
  pub point_defense_used: bool,
}

impl MountedWeapon {
  #[must_use]
  pub fn new(record: Arc<WeaponStatRecord>) -> Self {
    MountedWeapon {
      record,
      mode: WeaponMode::Standard,
      jammed: false,
      hit: false,
      linked_ammo: None,
      point_defense_used: false,
    }
  }

  #[must_use]
  pub fn linked_to(mut self, ammo_slot: usize) -> Self {
    self.linked_ammo = Some(ammo_slot);
    self
  }

  #[must_use]
  pub fn in_mode(mut self, mode: WeaponMode) -> Self {
    self.mode = mode;
    self
  }

  #[must_use]
  pub fn is_usable(&self) -> bool {
    !self.jammed && !self.hit
  }

  /// Ballistic AMS is always on; laser AMS has to be switched on.
  #[must_use]
  pub fn is_point_defense_active(&self) -> bool {
    match self.record.family {
      WeaponFamily::Ams => self.mode != WeaponMode::PointDefense(false),
      WeaponFamily::LaserAms => self.mode == WeaponMode::PointDefense(true),
      _ => false,
    }
  }
}

#[serde_as]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AmmoBin {
  #[serde_as(as = "AmmoByName")]
  pub record: Arc<AmmoStatRecord>,
  pub shots_left: u32,
}

impl AmmoBin {
  /// A full one-ton bin.
  #[must_use]
  pub fn new(record: Arc<AmmoStatRecord>) -> Self {
    let shots_left = record.shots_per_ton;
    AmmoBin { record, shots_left }
  }

  /// Take `shots` rounds from the bin. Returns false and takes nothing if there are not enough.
  pub fn consume(&mut self, shots: u32) -> bool {
    if self.shots_left < shots {
      return false;
    }
    self.shots_left -= shots;
    true
  }
}

/// The parts of a combat unit that weapon fire reads or changes.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Unit {
  pub name: String,
  #[serde(default)]
  pub side: u32,
  #[serde(default)]
  pub heat: u32,
  #[serde(default)]
  pub weapons: Vec<MountedWeapon>,
  #[serde(default)]
  pub ammo: Vec<AmmoBin>,
}

impl Unit {
  #[must_use]
  pub fn new(name: &str) -> Self {
    Unit {
      name: name.to_string(),
      side: 0,
      heat: 0,
      weapons: vec![],
      ammo: vec![],
    }
  }

  #[must_use]
  pub fn on_side(mut self, side: u32) -> Self {
    self.side = side;
    self
  }

  /// Mount a weapon, returning its slot.
  pub fn mount(&mut self, weapon: MountedWeapon) -> usize {
    self.weapons.push(weapon);
    self.weapons.len() - 1
  }

  /// Add an ammo bin, returning its slot.
  pub fn load(&mut self, bin: AmmoBin) -> usize {
    self.ammo.push(bin);
    self.ammo.len() - 1
  }

  pub fn add_heat(&mut self, heat: u32) {
    debug!("(Unit.add_heat) {} gains {} heat (now {}).", self.name, heat, self.heat + heat);
    self.heat += heat;
  }

  #[must_use]
  pub fn weapon(&self, slot: usize) -> Option<&MountedWeapon> {
    self.weapons.get(slot)
  }

  pub fn weapon_mut(&mut self, slot: usize) -> Option<&mut MountedWeapon> {
    self.weapons.get_mut(slot)
  }

  #[must_use]
  pub fn ammo_bin(&self, slot: usize) -> Option<&AmmoBin> {
    self.ammo.get(slot)
  }

  pub fn consume_ammo(&mut self, slot: usize, shots: u32) -> bool {
    self.ammo.get_mut(slot).is_some_and(|bin| bin.consume(shots))
  }

  /// The first point-defense mount able to engage a volley right now: active, working, not yet used this turn and,
  /// for ammo-fed AMS, with a round left.
  #[must_use]
  pub fn ready_point_defense(&self) -> Option<usize> {
    self.weapons.iter().position(|weapon| {
      weapon.is_point_defense_active()
        && weapon.is_usable()
        && !weapon.point_defense_used
        && (!weapon.record.needs_ammo()
          || weapon
            .linked_ammo
            .and_then(|slot| self.ammo.get(slot))
            .is_some_and(|bin| bin.shots_left > 0))
    })
  }

  /// Start of a new turn: point defense can engage again.
  pub fn new_turn(&mut self) {
    for weapon in &mut self.weapons {
      weapon.point_defense_used = false;
    }
  }
}
