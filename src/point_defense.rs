//! Anti-missile systems on the defending unit.
use rand::RngCore;

use crate::battlefield::Battlefield;
use crate::debug;
use crate::dice::roll_dice;
use crate::report::{Report, ReportBuffer, AMS_ENGAGES};
use crate::rules_tables::POINT_DEFENSE_CAPITAL_TARGET;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Engagement {
  pub defender: String,
  pub weapon: String,
}

/// Let the defender's first ready point-defense mount engage an incoming volley.
///
/// An engaging mount is spent for the turn, pays its heat and, if ammo-fed, one round. Returns `None` if the defender
/// is not a unit on the battlefield or has nothing ready.
pub fn engage(
  field: &mut dyn Battlefield, defender: &str, attacker: &str, reports: &mut ReportBuffer,
) -> Option<Engagement> {
  let unit = field.unit_mut(defender)?;
  let slot = unit.ready_point_defense()?;

  let (name, heat, ammo_slot) = {
    let mount = &mut unit.weapons[slot];
    mount.point_defense_used = true;
    let ammo_slot = if mount.record.needs_ammo() { mount.linked_ammo } else { None };
    (mount.record.name.clone(), mount.record.heat, ammo_slot)
  };
  if let Some(ammo_slot) = ammo_slot {
    unit.consume_ammo(ammo_slot, 1);
  }
  unit.add_heat(heat);

  debug!("(PointDefense.engage) {defender}'s {name} engages the volley from {attacker}.");
  reports.push(Report::new(AMS_ENGAGES, defender).add(name.as_str()).add(attacker).indent(2));

  Some(Engagement {
    defender: defender.to_string(),
    weapon: name,
  })
}

/// Roll to destroy an engaged capital missile volley: 2d6 plus the missile's defense modifier against a fixed target.
/// Returns the modified roll and whether the volley is destroyed.
pub fn capital_intercept(defense_modifier: i32, rng: &mut dyn RngCore) -> (i32, bool) {
  let roll = i32::from(roll_dice(2, rng)) + defense_modifier;
  (roll, roll >= POINT_DEFENSE_CAPITAL_TARGET)
}
