//! Special damage semantics carried by a shot.
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

use crate::battlefield::{ArmorKind, TargetKind};

/// The special damage semantics of one shot. Exactly one is active for a handler at any time.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumIter)]
pub enum DamageType {
  #[default]
  None,
  Fragmentation,
  Flechette,
  Acid,
  Incendiary,
  Inferno,
  IgnorePassenger,
  AntiTsm,
  AntiInfantry,
  NailRivet,
  Nonpenetrating,
}

impl DamageType {
  /// Scale standard damage for the kind of unit being hit.
  ///
  /// Fragmentation only hurts unarmored troops. Flechette and anti-infantry rounds double against conventional infantry,
  /// and flechette loses half its punch against armor. Inferno and anti-TSM rounds do no structural damage to armored
  /// units; their effect comes from heat, fire or the TSM interaction applied by the battlefield.
  #[must_use]
  pub fn adjust_damage(self, damage: u32, target: TargetKind) -> u32 {
    match (self, target) {
      (DamageType::Fragmentation | DamageType::Flechette | DamageType::AntiInfantry, TargetKind::Infantry) => damage * 2,
      (DamageType::Fragmentation, _) => 0,
      (DamageType::Flechette, _) => damage / 2,
      (DamageType::Inferno, TargetKind::Infantry) => damage,
      (DamageType::Inferno | DamageType::AntiTsm, _) => 0,
      _ => damage,
    }
  }

  /// Whether a hit with this damage type must be handed to the fire-start check.
  #[must_use]
  pub fn starts_fires(self) -> bool {
    matches!(self, DamageType::Incendiary | DamageType::Inferno)
  }

  /// Nail and rivet guns never set off the target's ammunition.
  #[must_use]
  pub fn can_trigger_ammo_explosion(self) -> bool {
    self != DamageType::NailRivet
  }
}

/// Generalized damage classification consumed by armor rules.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum DamageClass {
  Energy,
  Ballistic,
  Missile,
  Artillery,
  /// Bypasses every armor-specific halving.
  Unclassified,
}

impl DamageClass {
  /// Reflective armor halves energy damage; reactive armor halves missile and artillery damage. Both round down.
  #[must_use]
  pub fn adjust_for_armor(self, damage: u32, armor: ArmorKind) -> u32 {
    match (self, armor) {
      (DamageClass::Energy, ArmorKind::Reflective) | (DamageClass::Missile | DamageClass::Artillery, ArmorKind::Reactive) => {
        damage / 2
      }
      _ => damage,
    }
  }
}
