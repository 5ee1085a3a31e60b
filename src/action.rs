use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use strum_macros::Display;

use crate::unit::WeaponMode;

/// Target number for an attack that cannot succeed.
pub const IMPOSSIBLE: i32 = i32::MAX;
/// Target number for an attack that cannot fail.
pub const AUTOMATIC_SUCCESS: i32 = i32::MIN;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display)]
pub enum FireMode {
  #[default]
  Direct,
  Indirect,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display)]
pub enum RangeBand {
  #[default]
  Short,
  Medium,
  Long,
  Extreme,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ToHitModifier {
  pub value: i32,
  pub description: String,
}

/// The to-hit target number and how it was arrived at. Computed by the game engine before resolution.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ToHitData {
  pub value: i32,
  #[serde(default)]
  pub modifiers: Vec<ToHitModifier>,
}

impl ToHitData {
  #[must_use]
  pub fn new(base: i32, description: &str) -> Self {
    ToHitData {
      value: base,
      modifiers: vec![ToHitModifier {
        value: base,
        description: description.to_string(),
      }],
    }
  }

  #[must_use]
  pub fn impossible(reason: &str) -> Self {
    ToHitData {
      value: IMPOSSIBLE,
      modifiers: vec![ToHitModifier {
        value: 0,
        description: reason.to_string(),
      }],
    }
  }

  #[must_use]
  pub fn automatic(reason: &str) -> Self {
    ToHitData {
      value: AUTOMATIC_SUCCESS,
      modifiers: vec![ToHitModifier {
        value: 0,
        description: reason.to_string(),
      }],
    }
  }

  /// Add a modifier. Impossible and automatic target numbers keep their value; the modifier is only recorded.
  pub fn add_modifier(&mut self, value: i32, description: &str) {
    if !self.is_impossible() && !self.is_automatic() {
      self.value = self.value.saturating_add(value);
    }
    self.modifiers.push(ToHitModifier {
      value,
      description: description.to_string(),
    });
  }

  #[must_use]
  pub fn is_impossible(&self) -> bool {
    self.value == IMPOSSIBLE
  }

  #[must_use]
  pub fn is_automatic(&self) -> bool {
    self.value == AUTOMATIC_SUCCESS
  }

  #[must_use]
  pub fn hits(&self, roll: u8) -> bool {
    self.is_automatic() || (!self.is_impossible() && i32::from(roll) >= self.value)
  }

  /// How far short of the target number a roll fell. Zero or less means the roll made it.
  #[must_use]
  pub fn margin_of_failure(&self, roll: u8) -> i32 {
    if self.is_automatic() {
      0
    } else {
      self.value.saturating_sub(i32::from(roll))
    }
  }

  #[must_use]
  pub fn description(&self) -> String {
    self
      .modifiers
      .iter()
      .map(|modifier| format!("{} ({:+})", modifier.description, modifier.value))
      .collect::<Vec<String>>()
      .join(", ")
  }
}

/// Aerospace strafing run context: each hex strafed is its own attack, but heat is only paid on the first.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrafeShot {
  pub first: bool,
}

/// One weapon fired at one target in one phase.
#[skip_serializing_none]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AttackRequest {
  pub attacker: String,
  pub target: String,
  pub weapon: usize,
  /// Ammo bin to draw from. Defaults to the bin linked to the weapon.
  #[serde(default)]
  pub ammo: Option<usize>,
  /// Mode to fire in. Defaults to the weapon's current mode.
  #[serde(default)]
  pub mode: Option<WeaponMode>,
  #[serde(default)]
  pub to_hit: Option<ToHitData>,
  #[serde(default)]
  pub range: RangeBand,
  #[serde(default)]
  pub fire_mode: FireMode,
  /// Turns an indirect artillery shot spends in flight before it lands.
  #[serde(default)]
  pub flight_turns: u8,
  #[serde(default)]
  pub strafe: Option<StrafeShot>,
  /// Set when an in-flight artillery shell arrives; it was paid for at launch.
  #[serde(default, skip_serializing_if = "std::ops::Not::not")]
  pub landing: bool,
}

impl AttackRequest {
  #[must_use]
  pub fn new(attacker: &str, target: &str, weapon: usize, to_hit: ToHitData) -> Self {
    AttackRequest {
      attacker: attacker.to_string(),
      target: target.to_string(),
      weapon,
      ammo: None,
      mode: None,
      to_hit: Some(to_hit),
      range: RangeBand::Short,
      fire_mode: FireMode::Direct,
      flight_turns: 0,
      strafe: None,
      landing: false,
    }
  }

  #[must_use]
  pub fn with_mode(mut self, mode: WeaponMode) -> Self {
    self.mode = Some(mode);
    self
  }

  #[must_use]
  pub fn with_ammo(mut self, slot: usize) -> Self {
    self.ammo = Some(slot);
    self
  }

  #[must_use]
  pub fn indirect(mut self, flight_turns: u8) -> Self {
    self.fire_mode = FireMode::Indirect;
    self.flight_turns = flight_turns;
    self
  }

  #[must_use]
  pub fn at_range(mut self, range: RangeBand) -> Self {
    self.range = range;
    self
  }

  #[must_use]
  pub fn strafing(mut self, first: bool) -> Self {
    self.strafe = Some(StrafeShot { first });
    self
  }

  /// Heat is charged unless this is a follow-on hex of a strafing run.
  #[must_use]
  pub fn pays_heat(&self) -> bool {
    self.strafe.map_or(true, |strafe| strafe.first)
  }
}

pub type AttackList = Vec<AttackRequest>;

/// Merge newly declared attacks into those already declared for a phase. A new declaration for a weapon replaces any
/// earlier one for the same attacker and weapon slot.
pub fn merge(current: &mut AttackList, other: AttackList) {
  for next in other {
    current.retain(|attack| !(attack.attacker == next.attacker && attack.weapon == next.weapon));
    current.push(next);
  }
}
