//! The weapon and ammunition catalog.
//!
//! Records are plain data, built once (from JSON or through [`WeaponStatRecordBuilder`]) and validated as a whole
//! when the catalog is assembled. After that they are only ever shared through `Arc` and never mutated, so one catalog
//! can serve any number of concurrent games.
use std::collections::HashMap;
use std::sync::Arc;

use bitflags::bitflags;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use strum_macros::{Display, EnumIter};
use thiserror::Error;

use crate::action::{FireMode, RangeBand};
use crate::damage_type::DamageType;
use crate::dispatch::{select_handler, DispatchError};
use crate::{debug, info, warn};

pub static CATALOG: OnceCell<WeaponCatalog> = OnceCell::new();

pub const DEFAULT_CATALOG_FILE: &str = "./catalog/default_catalog.json";

bitflags! {
  /// Capability traits of a weapon type.
  #[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
  #[serde(transparent)]
  pub struct WeaponFlags: u32 {
    const DIRECT_FIRE = 1;
    const BALLISTIC = 1 << 1;
    const ENERGY = 1 << 2;
    const MISSILE = 1 << 3;
    const PULSE = 1 << 4;
    const BURST_FIRE = 1 << 5;
    const ONE_SHOT = 1 << 6;
    const AUTO_TARGET = 1 << 7;
    const ANTI_MISSILE = 1 << 8;
    const SPLITABLE = 1 << 9;
    const BOMB_WEAPON = 1 << 10;
    const ARTILLERY = 1 << 11;
    const ARTILLERY_CANNON = 1 << 12;
    const CAPITAL = 1 << 13;
    const PROTOTYPE = 1 << 14;
    /// Small-class weapon (e.g. a small pulse laser).
    const SMALL = 1 << 15;
  }
}

/// Flat replacement for the weapon class hierarchy: what kind of weapon a record describes.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum WeaponFamily {
  Autocannon,
  LightAutocannon,
  UltraAutocannon,
  RotaryAutocannon,
  Gauss,
  MachineGun,
  Laser,
  PulseLaser,
  InsulatedLaser,
  ReengineeredLaser,
  BombastLaser,
  Ppc,
  LaserAms,
  Ams,
  Lrm,
  Srm,
  Mrm,
  Streak,
  Artillery,
  ArtilleryCannon,
  CapitalMissile,
  NailRivetGun,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display)]
pub enum TechBase {
  #[default]
  InnerSphere,
  Clan,
}

/// The ammunition tag linking a weapon to the bins it can draw from.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display)]
pub enum AmmoKind {
  #[default]
  None,
  Autocannon,
  LightAutocannon,
  Ultra,
  Rotary,
  Gauss,
  MachineGun,
  Ams,
  Lrm,
  Srm,
  Mrm,
  StreakSrm,
  StreakLrm,
  ArrowIv,
  LongTom,
  Sniper,
  LongTomCannon,
  SniperCannon,
  CapitalMissile,
  NailRivet,
}

/// Munition sub-type of an ammunition record.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumIter)]
pub enum Munition {
  #[default]
  Standard,
  Tracer,
  Incendiary,
  Flechette,
  ArmorPiercing,
  Precision,
  Inferno,
  Fragmentation,
  Acid,
  AntiTsm,
  Swarm,
  SwarmI,
  Homing,
  Barracuda,
  WhiteShark,
  KillerWhale,
  Piranha,
}

impl Munition {
  /// The damage semantics a munition carries into a shot.
  #[must_use]
  pub fn damage_type(self) -> DamageType {
    match self {
      Munition::Incendiary => DamageType::Incendiary,
      Munition::Flechette => DamageType::Flechette,
      Munition::Inferno => DamageType::Inferno,
      Munition::Fragmentation => DamageType::Fragmentation,
      Munition::Acid => DamageType::Acid,
      Munition::AntiTsm => DamageType::AntiTsm,
      _ => DamageType::None,
    }
  }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum TechRating {
  A,
  B,
  #[default]
  C,
  D,
  E,
  F,
}

/// Range bands in hexes. `minimum` is the range inside which a to-hit penalty applies.
#[skip_serializing_none]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct RangeBands {
  #[serde(default)]
  pub minimum: u32,
  pub short: u32,
  pub medium: u32,
  pub long: u32,
  #[serde(default)]
  pub extreme: u32,
  /// Underwater short/medium/long/extreme, for weapons that can fire underwater.
  #[serde(default)]
  pub water: Option<[u32; 4]>,
}

impl RangeBands {
  #[must_use]
  pub fn new(minimum: u32, short: u32, medium: u32, long: u32, extreme: u32) -> Self {
    RangeBands {
      minimum,
      short,
      medium,
      long,
      extreme,
      water: None,
    }
  }
}

/// Capital-scale attack values per range band.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AttackValues {
  pub short: u32,
  pub medium: u32,
  pub long: u32,
  pub extreme: u32,
}

impl AttackValues {
  #[must_use]
  pub fn at(&self, range: RangeBand) -> u32 {
    match range {
      RangeBand::Short => self.short,
      RangeBand::Medium => self.medium,
      RangeBand::Long => self.long,
      RangeBand::Extreme => self.extreme,
    }
  }
}

/// Tech progression bookkeeping. Carried for completeness; resolution never reads it.
#[skip_serializing_none]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct TechProgression {
  #[serde(default)]
  pub introduced: Option<u16>,
  #[serde(default)]
  pub extinct: Option<u16>,
  #[serde(default)]
  pub reintroduced: Option<u16>,
  /// Availability per era, e.g. "C-E-D-C".
  #[serde(default)]
  pub availability: String,
  #[serde(default)]
  pub rating: TechRating,
}

#[skip_serializing_none]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct WeaponStatRecord {
  pub name: String,
  pub internal_name: String,
  #[serde(default)]
  pub lookup_names: Vec<String>,
  pub family: WeaponFamily,
  #[serde(default)]
  pub tech_base: TechBase,
  pub tonnage: f64,
  pub criticals: u32,
  pub heat: u32,
  pub damage: u32,
  #[serde(default)]
  pub rack_size: u32,
  pub ranges: RangeBands,
  #[serde(default)]
  pub attack_values: Option<AttackValues>,
  #[serde(default)]
  pub ammo: AmmoKind,
  #[serde(default)]
  pub flags: WeaponFlags,
  #[serde(default)]
  pub tech: TechProgression,
  #[serde(default)]
  pub cost: u32,
  #[serde(default)]
  pub bv: u32,
  #[serde(default)]
  pub explosion_damage: Option<u32>,
}

impl WeaponStatRecord {
  #[must_use]
  pub fn builder(name: &str, internal_name: &str, family: WeaponFamily) -> WeaponStatRecordBuilder {
    WeaponStatRecordBuilder::new(name, internal_name, family)
  }

  #[must_use]
  pub fn has_flag(&self, flag: WeaponFlags) -> bool {
    self.flags.contains(flag)
  }

  #[must_use]
  pub fn is_prototype(&self) -> bool {
    self.has_flag(WeaponFlags::PROTOTYPE)
  }

  #[must_use]
  pub fn needs_ammo(&self) -> bool {
    self.ammo != AmmoKind::None
  }

  /// Whether `ammo` can be loaded into this weapon.
  #[must_use]
  pub fn accepts(&self, ammo: &AmmoStatRecord) -> bool {
    self.needs_ammo() && ammo.kind == self.ammo && ammo.rack_size == self.rack_size
  }

  /// The ways this weapon can be fired. Artillery pieces and artillery cannons can fire both directly and indirectly.
  #[must_use]
  pub fn fire_modes(&self) -> &'static [FireMode] {
    match self.family {
      WeaponFamily::Artillery | WeaponFamily::ArtilleryCannon => &[FireMode::Direct, FireMode::Indirect],
      _ => &[FireMode::Direct],
    }
  }

  fn keys(&self) -> impl Iterator<Item = &String> {
    std::iter::once(&self.name)
      .chain(std::iter::once(&self.internal_name))
      .chain(self.lookup_names.iter())
  }
}

/// Builds an immutable [`WeaponStatRecord`]. Unset fields take the neutral value (zero, none, empty).
#[derive(Debug, Clone)]
pub struct WeaponStatRecordBuilder {
  record: WeaponStatRecord,
}

impl WeaponStatRecordBuilder {
  #[must_use]
  pub fn new(name: &str, internal_name: &str, family: WeaponFamily) -> Self {
    WeaponStatRecordBuilder {
      record: WeaponStatRecord {
        name: name.to_string(),
        internal_name: internal_name.to_string(),
        lookup_names: vec![],
        family,
        tech_base: TechBase::InnerSphere,
        tonnage: 0.0,
        criticals: 1,
        heat: 0,
        damage: 0,
        rack_size: 0,
        ranges: RangeBands::default(),
        attack_values: None,
        ammo: AmmoKind::None,
        flags: WeaponFlags::empty(),
        tech: TechProgression::default(),
        cost: 0,
        bv: 0,
        explosion_damage: None,
      },
    }
  }

  #[must_use]
  pub fn lookup_name(mut self, name: &str) -> Self {
    self.record.lookup_names.push(name.to_string());
    self
  }

  #[must_use]
  pub fn tech_base(mut self, tech_base: TechBase) -> Self {
    self.record.tech_base = tech_base;
    self
  }

  #[must_use]
  pub fn tonnage(mut self, tonnage: f64, criticals: u32) -> Self {
    self.record.tonnage = tonnage;
    self.record.criticals = criticals;
    self
  }

  #[must_use]
  pub fn heat(mut self, heat: u32) -> Self {
    self.record.heat = heat;
    self
  }

  #[must_use]
  pub fn damage(mut self, damage: u32) -> Self {
    self.record.damage = damage;
    self
  }

  #[must_use]
  pub fn rack_size(mut self, rack_size: u32) -> Self {
    self.record.rack_size = rack_size;
    self
  }

  #[must_use]
  pub fn ranges(mut self, ranges: RangeBands) -> Self {
    self.record.ranges = ranges;
    self
  }

  #[must_use]
  pub fn attack_values(mut self, attack_values: AttackValues) -> Self {
    self.record.attack_values = Some(attack_values);
    self
  }

  #[must_use]
  pub fn ammo(mut self, ammo: AmmoKind) -> Self {
    self.record.ammo = ammo;
    self
  }

  #[must_use]
  pub fn flags(mut self, flags: WeaponFlags) -> Self {
    self.record.flags |= flags;
    self
  }

  #[must_use]
  pub fn tech(mut self, tech: TechProgression) -> Self {
    self.record.tech = tech;
    self
  }

  #[must_use]
  pub fn cost(mut self, cost: u32, bv: u32) -> Self {
    self.record.cost = cost;
    self.record.bv = bv;
    self
  }

  #[must_use]
  pub fn explosion_damage(mut self, damage: u32) -> Self {
    self.record.explosion_damage = Some(damage);
    self
  }

  #[must_use]
  pub fn build(self) -> WeaponStatRecord {
    self.record
  }
}

fn default_explosive() -> bool {
  true
}

#[skip_serializing_none]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AmmoStatRecord {
  pub name: String,
  pub internal_name: String,
  pub kind: AmmoKind,
  #[serde(default)]
  pub rack_size: u32,
  #[serde(default)]
  pub munition: Munition,
  pub shots_per_ton: u32,
  #[serde(default = "default_explosive")]
  pub explosive: bool,
  /// Capital missiles: the attack value of one missile.
  #[serde(default)]
  pub attack_value: Option<u32>,
  /// Capital missiles: how much easier this missile is for point defense to destroy.
  #[serde(default)]
  pub capital_defense_modifier: i32,
}

impl AmmoStatRecord {
  #[must_use]
  pub fn new(name: &str, kind: AmmoKind, rack_size: u32, munition: Munition, shots_per_ton: u32) -> Self {
    AmmoStatRecord {
      name: name.to_string(),
      internal_name: name.replace([' ', '/', '-'], ""),
      kind,
      rack_size,
      munition,
      shots_per_ton,
      explosive: true,
      attack_value: None,
      capital_defense_modifier: 0,
    }
  }

  #[must_use]
  pub fn with_capital(mut self, attack_value: u32, capital_defense_modifier: i32) -> Self {
    self.attack_value = Some(attack_value);
    self.capital_defense_modifier = capital_defense_modifier;
    self
  }

  #[must_use]
  pub fn inert(mut self) -> Self {
    self.explosive = false;
    self
  }
}

#[derive(Error, Debug)]
pub enum CatalogError {
  #[error("unable to read catalog: {0}")]
  Io(#[from] std::io::Error),
  #[error("unable to parse catalog: {0}")]
  Parse(#[from] serde_json::Error),
  #[error("name '{0}' is used by more than one catalog record")]
  DuplicateName(String),
  #[error("weapon '{weapon}' needs {kind} ammunition (rack size {rack_size}) but the catalog has none")]
  MissingAmmo { weapon: String, kind: AmmoKind, rack_size: u32 },
  #[error("weapon '{weapon}' with ammunition '{ammo}' fired {fire_mode:?} has no attack handler: {source}")]
  Unmapped {
    weapon: String,
    ammo: String,
    fire_mode: FireMode,
    source: DispatchError,
  },
}

/// The on-disk layout of a catalog file.
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct CatalogFile {
  pub weapons: Vec<WeaponStatRecord>,
  #[serde(default)]
  pub ammo: Vec<AmmoStatRecord>,
}

/// A validated, immutable set of weapon and ammunition records.
#[derive(Debug, Clone, Default)]
pub struct WeaponCatalog {
  weapons: Vec<Arc<WeaponStatRecord>>,
  ammo: Vec<Arc<AmmoStatRecord>>,
  weapon_index: HashMap<String, usize>,
  ammo_index: HashMap<String, usize>,
}

impl WeaponCatalog {
  /// Assemble and validate a catalog.
  ///
  /// # Errors
  /// Returns `Err` on duplicate names, an ammo-fed weapon without ammunition, or any weapon/ammo/fire-mode combination
  /// that dispatch cannot map to a handler.
  pub fn from_records(weapons: Vec<WeaponStatRecord>, ammo: Vec<AmmoStatRecord>) -> Result<Self, CatalogError> {
    let mut catalog = WeaponCatalog::default();

    for record in ammo {
      let mut keys = vec![record.name.clone(), record.internal_name.clone()];
      keys.dedup();
      for key in keys {
        if catalog.ammo_index.insert(key.clone(), catalog.ammo.len()).is_some() {
          return Err(CatalogError::DuplicateName(key));
        }
      }
      catalog.ammo.push(Arc::new(record));
    }

    for record in weapons {
      let mut keys: Vec<&String> = Vec::new();
      for key in record.keys() {
        if !keys.contains(&key) {
          keys.push(key);
        }
      }
      for key in keys {
        if catalog.weapon_index.insert(key.clone(), catalog.weapons.len()).is_some() {
          return Err(CatalogError::DuplicateName(key.clone()));
        }
      }
      catalog.weapons.push(Arc::new(record));
    }

    catalog.validate()?;
    info!(
      "(WeaponCatalog.from_records) Catalog holds {} weapons and {} ammunition types.",
      catalog.weapons.len(),
      catalog.ammo.len()
    );
    Ok(catalog)
  }

  /// Load and validate a catalog from a JSON file.
  ///
  /// # Errors
  /// Returns `Err` if the file cannot be read or parsed, or if validation fails (see [`WeaponCatalog::from_records`]).
  pub fn load_from_file(file_name: &str) -> Result<Self, CatalogError> {
    debug!("(WeaponCatalog.load_from_file) Reading catalog {file_name}");
    let file = std::fs::File::open(file_name)?;
    let reader = std::io::BufReader::new(file);
    let contents: CatalogFile = serde_json::from_reader(reader)?;
    WeaponCatalog::from_records(contents.weapons, contents.ammo)
  }

  /// Every weapon must have ammunition if it needs it, and every way it can be fired with every ammunition it accepts
  /// must resolve to exactly one handler.
  fn validate(&self) -> Result<(), CatalogError> {
    for weapon in &self.weapons {
      let loads: Vec<Option<&AmmoStatRecord>> = if weapon.needs_ammo() {
        let compatible: Vec<Option<&AmmoStatRecord>> = self.ammo_for(weapon).map(|a| Some(a.as_ref())).collect();
        if compatible.is_empty() {
          return Err(CatalogError::MissingAmmo {
            weapon: weapon.name.clone(),
            kind: weapon.ammo,
            rack_size: weapon.rack_size,
          });
        }
        compatible
      } else {
        vec![None]
      };

      for ammo in loads {
        for fire_mode in weapon.fire_modes() {
          if let Err(source) = select_handler(weapon, ammo, *fire_mode) {
            return Err(CatalogError::Unmapped {
              weapon: weapon.name.clone(),
              ammo: ammo.map_or_else(|| "none".to_string(), |a| a.name.clone()),
              fire_mode: *fire_mode,
              source,
            });
          }
        }
      }
    }

    for ammo in &self.ammo {
      if !self.weapons.iter().any(|weapon| weapon.accepts(ammo)) {
        warn!(
          "(WeaponCatalog.validate) Ammunition {} ({} rack {}) fits no weapon in the catalog.",
          ammo.name, ammo.kind, ammo.rack_size
        );
      }
    }
    Ok(())
  }

  /// Find a weapon by display name, internal name or any alternate lookup name.
  #[must_use]
  pub fn weapon(&self, name: &str) -> Option<Arc<WeaponStatRecord>> {
    self.weapon_index.get(name).map(|index| self.weapons[*index].clone())
  }

  /// Find an ammunition record by display or internal name.
  #[must_use]
  pub fn ammo(&self, name: &str) -> Option<Arc<AmmoStatRecord>> {
    self.ammo_index.get(name).map(|index| self.ammo[*index].clone())
  }

  pub fn ammo_for<'a>(&'a self, weapon: &'a WeaponStatRecord) -> impl Iterator<Item = &'a Arc<AmmoStatRecord>> + 'a {
    self.ammo.iter().filter(move |ammo| weapon.accepts(ammo))
  }

  pub fn weapons(&self) -> impl Iterator<Item = &Arc<WeaponStatRecord>> {
    self.weapons.iter()
  }

  pub fn all_ammo(&self) -> impl Iterator<Item = &Arc<AmmoStatRecord>> {
    self.ammo.iter()
  }
}

// Mounted weapons and ammo bins are written to scenario files by catalog name and resolved against CATALOG on the
// way back in.
serde_with::serde_conv!(
  pub WeaponByName,
  Arc<WeaponStatRecord>,
  |weapon: &Arc<WeaponStatRecord>| weapon.name.clone(),
  |value: String| -> Result<_, String> {
    CATALOG
      .get()
      .ok_or_else(|| "weapon catalog not loaded".to_string())?
      .weapon(&value)
      .ok_or_else(|| format!("no weapon named '{value}' in the catalog"))
  }
);

serde_with::serde_conv!(
  pub AmmoByName,
  Arc<AmmoStatRecord>,
  |ammo: &Arc<AmmoStatRecord>| ammo.name.clone(),
  |value: String| -> Result<_, String> {
    CATALOG
      .get()
      .ok_or_else(|| "weapon catalog not loaded".to_string())?
      .ammo(&value)
      .ok_or_else(|| format!("no ammunition named '{value}' in the catalog"))
  }
);

/// Load the default catalog into [`CATALOG`]. Safe to call more than once; later calls are ignored.
///
/// # Panics
/// Panics if the default catalog file cannot be loaded, which only happens with a broken checkout.
pub fn config_test_catalog() {
  if CATALOG.get().is_some() {
    return;
  }
  let catalog = WeaponCatalog::load_from_file(DEFAULT_CATALOG_FILE).expect("Unable to load default catalog file.");
  CATALOG
    .set(catalog)
    .unwrap_or_else(|_e| {
      info!("(config_test_catalog) attempting to set CATALOG twice!");
    });
}
