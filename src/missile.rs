//! Missile sub-resolution: cluster rolls, streak lock-on, swarm spill-over and capital missile volleys.
use rand::RngCore;

use crate::battlefield::Battlefield;
use crate::combat::{AttackHandler, Resolution};
use crate::combat_tables::cluster_hits;
use crate::debug;
use crate::dice::roll_dice;
use crate::families::HandlerKind;
use crate::point_defense::{capital_intercept, engage};
use crate::report::{
  Report, ReportBuffer, ATTACK_MISSES, CLUSTER_HITS, SWARM_CONTINUES, SWARM_I_CONTINUES, TO_HIT_ROLL,
  VOLLEY_DESTROYED,
};
use crate::rules_tables::{AMS_CLUSTER_MODIFIER, STREAK_CLUSTER_ROLL};

impl AttackHandler {
  /// How many missiles out of `rack` strike `target`.
  ///
  /// Point defense on the target gets first go at the volley and worsens the cluster roll. A streak launcher that
  /// locked on and meets no point defense hits with everything.
  pub(crate) fn missile_hits(
    &self, target: &str, rack: u32, field: &mut dyn Battlefield, reports: &mut ReportBuffer, rng: &mut dyn RngCore,
  ) -> u32 {
    let engaged = engage(field, target, &self.request.attacker, reports).is_some();
    let modifier = if engaged { AMS_CLUSTER_MODIFIER } else { 0 };

    let cluster_roll = match self.kind {
      HandlerKind::Streak if !engaged => STREAK_CLUSTER_ROLL,
      _ => i32::from(roll_dice(2, rng)) + modifier,
    };
    let hits = cluster_hits(rack, cluster_roll);

    debug!(
      "(AttackHandler.missile_hits) {} missiles of {} from {}'s {} hit {} (cluster roll {}).",
      hits, rack, self.request.attacker, self.weapon.name, target, cluster_roll
    );
    reports.push(Report::new(CLUSTER_HITS, &self.request.attacker).add(hits).add(rack).indent(2));
    hits
  }

  /// Resolve a capital missile volley that hit. Returns `None` if point defense destroyed it.
  pub(crate) fn capital_volley(
    &self, field: &mut dyn Battlefield, reports: &mut ReportBuffer, rng: &mut dyn RngCore,
  ) -> Option<u32> {
    let target = self.request.target.as_str();
    if engage(field, target, &self.request.attacker, reports).is_none() {
      return Some(1);
    }

    let (intercept_roll, destroyed) = capital_intercept(self.capital_defense_modifier(), rng);
    if destroyed {
      debug!(
        "(AttackHandler.capital_volley) {target}'s point defense destroys {}'s {} (roll {intercept_roll}).",
        self.request.attacker, self.weapon.name
      );
      reports.push(
        Report::new(VOLLEY_DESTROYED, target)
          .add(self.weapon.name.as_str())
          .add(intercept_roll)
          .indent(2),
      );
      return None;
    }
    Some(1)
  }

  /// How much easier this capital missile is to shoot down. Piranhas get no modifier.
  #[must_use]
  pub fn capital_defense_modifier(&self) -> i32 {
    match self.kind {
      HandlerKind::Piranha => 0,
      _ => self.ammo.as_ref().map_or(0, |ammo| ammo.capital_defense_modifier),
    }
  }

  /// Swarm missiles that miss keep flying and attack further targets until every missile has hit or no target is
  /// left. Swarm-I missiles never turn on the attacker's own side.
  pub(crate) fn resolve_swarm(
    &self, hit: bool, field: &mut dyn Battlefield, reports: &mut ReportBuffer, rng: &mut dyn RngCore,
  ) -> Resolution {
    let continues_id = if self.kind == HandlerKind::SwarmI { SWARM_I_CONTINUES } else { SWARM_CONTINUES };
    let allow_friendly = self.kind == HandlerKind::Swarm;

    let mut current = self.request.target.clone();
    let mut visited = vec![current.clone()];
    let mut remaining = self.weapon.rack_size;
    let mut hit = hit;
    let mut total_hits = 0;
    let mut total_damage = 0;

    loop {
      if hit {
        let hits = self.missile_hits(&current, remaining, field, reports, rng);
        total_damage += self.apply_hits(&current, hits, field, reports, rng);
        total_hits += hits;
        remaining -= hits;
      } else {
        reports.push(Report::new(ATTACK_MISSES, &self.request.attacker).add(current.as_str()).indent(2));
      }

      if remaining == 0 {
        break;
      }
      let Some((next, to_hit)) = field.swarm_retarget(&self.request.attacker, &visited, allow_friendly) else {
        break;
      };

      let follow_on_roll = roll_dice(2, rng);
      debug!(
        "(AttackHandler.resolve_swarm) {} swarm missiles from {} continue to {} needing {}, rolled {}.",
        remaining, self.request.attacker, next, to_hit.value, follow_on_roll
      );
      reports.push(
        Report::new(continues_id, &self.request.attacker)
          .add(remaining)
          .add(next.as_str())
          .indent(2),
      );
      reports.push(
        Report::new(TO_HIT_ROLL, &self.request.attacker)
          .add(to_hit.value)
          .add(follow_on_roll)
          .indent(3),
      );
      hit = to_hit.hits(follow_on_roll);
      visited.push(next.clone());
      current = next;
    }

    if total_hits == 0 {
      Resolution::Missed
    } else {
      Resolution::Hit {
        hits: total_hits,
        damage: total_damage,
      }
    }
  }
}
