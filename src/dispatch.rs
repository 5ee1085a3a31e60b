//! Handler selection.
//!
//! [`select_handler`] is a standalone table from (family, munition, prototype, tech base, fire mode) to a
//! [`HandlerKind`]. Catalog validation runs it over every combination the catalog allows, so at fire time the only
//! failures left are malformed requests, caught by [`build_handler`].
use rand::RngCore;
use thiserror::Error;

use crate::action::{AttackRequest, FireMode};
use crate::battlefield::Battlefield;
use crate::catalog::{AmmoStatRecord, Munition, TechBase, WeaponFamily, WeaponStatRecord};
use crate::combat::AttackHandler;
use crate::dice::roll_dice;
use crate::families::HandlerKind;
use crate::rules_tables::{BOMBAST_MIN_POWER, ROTARY_MAX_SHOTS, ULTRA_DOUBLE_SHOTS};
use crate::unit::WeaponMode;
use crate::{debug, warn};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
  #[error("no attack handler for {family} firing {munition} ({fire_mode} fire)")]
  Unmapped {
    family: WeaponFamily,
    munition: String,
    fire_mode: FireMode,
  },
  #[error("attacker '{0}' is not on the battlefield")]
  UnknownAttacker(String),
  #[error("target '{0}' is not on the battlefield")]
  UnknownTarget(String),
  #[error("'{attacker}' has no weapon in slot {slot}")]
  UnknownWeapon { attacker: String, slot: usize },
  #[error("'{weapon}' is jammed or destroyed")]
  WeaponUnusable { weapon: String },
  #[error("'{weapon}' needs ammunition but none is linked")]
  MissingAmmo { weapon: String },
  #[error("ammunition slot {slot} does not hold ammunition '{weapon}' can fire")]
  MismatchedAmmo { weapon: String, slot: usize },
  #[error("'{weapon}' needs {needed} rounds but its ammunition has {shots_left}")]
  OutOfAmmo { weapon: String, needed: u32, shots_left: u32 },
  #[error("attack with '{weapon}' has no to-hit data")]
  MissingToHit { weapon: String },
  #[error("mode {mode:?} is not valid for '{weapon}'")]
  InvalidMode { weapon: String, mode: WeaponMode },
}

/// Pick the one handler for a weapon firing the given ammunition.
///
/// # Errors
/// Returns [`DispatchError::Unmapped`] when no handler fits: ammunition on a weapon that takes none, an ammo-fed
/// weapon with nothing loaded, a special munition the family cannot fire, or indirect fire from a direct-fire weapon.
pub fn select_handler(
  weapon: &WeaponStatRecord, ammo: Option<&AmmoStatRecord>, fire_mode: FireMode,
) -> Result<HandlerKind, DispatchError> {
  let unmapped = || DispatchError::Unmapped {
    family: weapon.family,
    munition: ammo.map_or_else(|| "no ammunition".to_string(), |ammo| ammo.munition.to_string()),
    fire_mode,
  };

  let munition = match (weapon.needs_ammo(), ammo) {
    (true, Some(ammo)) if weapon.accepts(ammo) => Some(ammo.munition),
    (false, None) => None,
    _ => return Err(unmapped()),
  };

  let prototype = weapon.is_prototype();
  let kind = match (weapon.family, munition, fire_mode) {
    (WeaponFamily::Laser | WeaponFamily::PulseLaser, None, FireMode::Direct) if prototype => HandlerKind::PrototypeLaser,
    (
      WeaponFamily::Laser | WeaponFamily::PulseLaser | WeaponFamily::Ppc | WeaponFamily::Gauss | WeaponFamily::MachineGun,
      _,
      FireMode::Direct,
    ) if matches!(munition, None | Some(Munition::Standard)) => HandlerKind::Standard,
    (WeaponFamily::InsulatedLaser, None, FireMode::Direct) => HandlerKind::InsulatedLaser,
    (WeaponFamily::ReengineeredLaser, None, FireMode::Direct) => HandlerKind::ReengineeredLaser,
    (WeaponFamily::BombastLaser, None, FireMode::Direct) => HandlerKind::BombastLaser,
    (WeaponFamily::LaserAms | WeaponFamily::Ams, None | Some(Munition::Standard), FireMode::Direct) => {
      HandlerKind::PointDefense
    }

    (WeaponFamily::Autocannon | WeaponFamily::LightAutocannon, Some(munition), FireMode::Direct) => {
      match munition {
        Munition::Standard if prototype => HandlerKind::PrototypeAutocannon,
        _ if prototype => return Err(unmapped()),
        Munition::Standard | Munition::ArmorPiercing | Munition::Precision | Munition::Flechette => {
          HandlerKind::Autocannon
        }
        Munition::Tracer => HandlerKind::TracerAutocannon,
        Munition::Incendiary => HandlerKind::IncendiaryAutocannon,
        _ => return Err(unmapped()),
      }
    }
    (WeaponFamily::UltraAutocannon, Some(Munition::Standard), FireMode::Direct) => {
      match (prototype, weapon.tech_base) {
        (true, TechBase::Clan) => HandlerKind::PrototypeClanUltra,
        (true, TechBase::InnerSphere) => HandlerKind::PrototypeAutocannon,
        (false, _) => HandlerKind::Ultra,
      }
    }
    (WeaponFamily::RotaryAutocannon, Some(Munition::Standard), FireMode::Direct) => HandlerKind::Rotary,
    (WeaponFamily::NailRivetGun, Some(Munition::Standard), FireMode::Direct) => HandlerKind::NailRivet,

    (WeaponFamily::Lrm, Some(Munition::Swarm), FireMode::Direct) => HandlerKind::Swarm,
    (WeaponFamily::Lrm, Some(Munition::SwarmI), FireMode::Direct) => HandlerKind::SwarmI,
    (WeaponFamily::Lrm, Some(Munition::Standard | Munition::Fragmentation), FireMode::Direct)
    | (
      WeaponFamily::Srm,
      Some(Munition::Standard | Munition::Inferno | Munition::Fragmentation | Munition::Acid | Munition::AntiTsm),
      FireMode::Direct,
    )
    | (WeaponFamily::Mrm, Some(Munition::Standard), FireMode::Direct) => HandlerKind::ClusterMissile,
    (WeaponFamily::Streak, Some(Munition::Standard), FireMode::Direct) if prototype => HandlerKind::PrototypeStreak,
    (WeaponFamily::Streak, Some(Munition::Standard), FireMode::Direct) => HandlerKind::Streak,

    (WeaponFamily::Artillery, Some(Munition::Standard | Munition::Homing), FireMode::Indirect)
    | (WeaponFamily::ArtilleryCannon, Some(Munition::Standard), FireMode::Indirect) => HandlerKind::ArtilleryIndirect,
    (WeaponFamily::Artillery, Some(Munition::Homing), FireMode::Direct) => HandlerKind::ArtilleryHoming,
    (WeaponFamily::Artillery | WeaponFamily::ArtilleryCannon, Some(Munition::Standard), FireMode::Direct) => {
      HandlerKind::ArtilleryDirect
    }

    (WeaponFamily::CapitalMissile, Some(Munition::Piranha), FireMode::Direct) => HandlerKind::Piranha,
    (
      WeaponFamily::CapitalMissile,
      Some(Munition::Barracuda | Munition::WhiteShark | Munition::KillerWhale),
      FireMode::Direct,
    ) => HandlerKind::CapitalMissile,

    _ => return Err(unmapped()),
  };

  Ok(kind)
}

/// Whether `mode` is a setting the weapon supports.
fn mode_allowed(weapon: &WeaponStatRecord, kind: HandlerKind, mode: WeaponMode) -> bool {
  match mode {
    WeaponMode::Standard => true,
    WeaponMode::Shots(shots) => match weapon.family {
      WeaponFamily::UltraAutocannon => (1..=ULTRA_DOUBLE_SHOTS).contains(&shots),
      WeaponFamily::RotaryAutocannon => (1..=ROTARY_MAX_SHOTS).contains(&shots),
      _ => shots == 1,
    },
    WeaponMode::Power(power) => {
      kind == HandlerKind::BombastLaser && power >= BOMBAST_MIN_POWER && u32::from(power) <= weapon.damage
    }
    WeaponMode::PointDefense(_) => kind == HandlerKind::PointDefense,
  }
}

/// Check an attack request against the attacker and the battlefield, select its handler and roll to hit.
///
/// # Errors
/// Returns a [`DispatchError`] if the attacker, target, weapon or ammunition named by the request does not exist or
/// does not fit, if the weapon is jammed or destroyed, if the mode is invalid or if the to-hit data is missing.
pub fn build_handler(
  request: &AttackRequest, field: &dyn Battlefield, rng: &mut dyn RngCore,
) -> Result<AttackHandler, DispatchError> {
  let attacker = field
    .unit(&request.attacker)
    .ok_or_else(|| DispatchError::UnknownAttacker(request.attacker.clone()))?;
  if field.target(&request.target).is_none() {
    return Err(DispatchError::UnknownTarget(request.target.clone()));
  }

  let mounted = attacker.weapon(request.weapon).ok_or_else(|| DispatchError::UnknownWeapon {
    attacker: request.attacker.clone(),
    slot: request.weapon,
  })?;
  let weapon = mounted.record.clone();
  // A shell arriving from an earlier turn has already left the tube, so neither the weapon's state nor its
  // remaining ammunition matters.
  if !request.landing && !mounted.is_usable() {
    return Err(DispatchError::WeaponUnusable {
      weapon: weapon.name.clone(),
    });
  }

  let mode = request.mode.unwrap_or(mounted.mode);
  let shots = u32::from(mode.shots());

  let (ammo, ammo_slot) = if weapon.needs_ammo() {
    let slot = request
      .ammo
      .or(mounted.linked_ammo)
      .ok_or_else(|| DispatchError::MissingAmmo {
        weapon: weapon.name.clone(),
      })?;
    let bin = attacker
      .ammo_bin(slot)
      .filter(|bin| weapon.accepts(&bin.record))
      .ok_or_else(|| DispatchError::MismatchedAmmo {
        weapon: weapon.name.clone(),
        slot,
      })?;
    if !request.landing && bin.shots_left < shots {
      return Err(DispatchError::OutOfAmmo {
        weapon: weapon.name.clone(),
        needed: shots,
        shots_left: bin.shots_left,
      });
    }
    (Some(bin.record.clone()), Some(slot))
  } else {
    (None, None)
  };

  let to_hit = request.to_hit.clone().ok_or_else(|| DispatchError::MissingToHit {
    weapon: weapon.name.clone(),
  })?;

  let kind = select_handler(&weapon, ammo.as_deref(), request.fire_mode).inspect_err(|e| {
    warn!("(Dispatch.build_handler) Catalog combination slipped past validation: {e}");
  })?;

  if !mode_allowed(&weapon, kind, mode) {
    return Err(DispatchError::InvalidMode {
      weapon: weapon.name.clone(),
      mode,
    });
  }

  let roll = roll_dice(2, rng);
  debug!(
    "(Dispatch.build_handler) {} fires {} at {} using {kind} handler, needs {} and rolls {roll}.",
    request.attacker, weapon.name, request.target, to_hit.value
  );

  Ok(AttackHandler::new(kind, request.clone(), weapon, ammo, ammo_slot, mode, to_hit, roll))
}
