//! Scripted scenarios: a battlefield plus a sequence of phases with the attacks declared in each.
use rand::RngCore;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use thiserror::Error;

use crate::action::{merge, AttackList, AttackRequest};
use crate::battlefield::{Battlefield, LocalBattlefield};
use crate::catalog::CATALOG;
use crate::combat::Resolution;
use crate::dispatch::build_handler;
use crate::phase::GamePhase;
use crate::report::{Report, ReportBuffer};
use crate::{debug, info, warn};

#[derive(Error, Debug)]
pub enum ScenarioError {
  #[error("unable to read scenario: {0}")]
  Io(#[from] std::io::Error),
  #[error("unable to parse scenario: {0}")]
  Parse(#[from] serde_json::Error),
  #[error("the weapon catalog must be loaded before a scenario can be read")]
  CatalogNotLoaded,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ScenarioStep {
  pub phase: GamePhase,
  /// Attacks declared this phase, in firing order. A later declaration for the same weapon replaces an earlier one.
  #[serde(default)]
  pub attacks: AttackList,
  /// Targets designated by TAG at the start of this phase.
  #[serde(default)]
  pub designate: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Scenario {
  pub battlefield: LocalBattlefield,
  pub steps: Vec<ScenarioStep>,
}

#[skip_serializing_none]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AttackOutcome {
  pub attacker: String,
  pub target: String,
  pub weapon: Option<String>,
  pub resolution: Option<Resolution>,
  /// Why the request never reached a handler.
  pub rejected: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PhaseResult {
  pub phase: GamePhase,
  pub outcomes: Vec<AttackOutcome>,
  pub reports: Vec<Report>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct UnitSummary {
  pub name: String,
  pub heat: u32,
  pub damage_taken: u32,
  pub jammed: Vec<String>,
  pub destroyed: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ScenarioResult {
  pub phases: Vec<PhaseResult>,
  pub units: Vec<UnitSummary>,
}

/// Resolve every attack of one phase in firing order.
///
/// Requests that fail validation are logged and reported as rejected; they never stop the phase.
pub fn resolve_phase(
  phase: GamePhase, attacks: &[AttackRequest], field: &mut dyn Battlefield, reports: &mut ReportBuffer,
  rng: &mut dyn RngCore,
) -> Vec<AttackOutcome> {
  let mut outcomes = Vec::with_capacity(attacks.len());
  for request in attacks {
    let outcome = match build_handler(request, field, rng) {
      Ok(mut handler) => {
        let resolution = handler.handle(phase, field, reports, rng);
        debug!(
          "(Scenario.resolve_phase) {}'s {} at {}: {:?}",
          request.attacker, handler.weapon.name, request.target, resolution
        );
        AttackOutcome {
          attacker: request.attacker.clone(),
          target: request.target.clone(),
          weapon: Some(handler.weapon.name.clone()),
          resolution: Some(resolution),
          rejected: None,
        }
      }
      Err(e) => {
        warn!("(Scenario.resolve_phase) Rejected attack by {} on {}: {e}", request.attacker, request.target);
        AttackOutcome {
          attacker: request.attacker.clone(),
          target: request.target.clone(),
          weapon: None,
          resolution: None,
          rejected: Some(e.to_string()),
        }
      }
    };
    outcomes.push(outcome);
  }
  outcomes
}

impl Scenario {
  /// Read a scenario file. Units in it name their weapons and ammunition by catalog name, so the catalog has to be
  /// loaded first.
  ///
  /// # Errors
  /// Returns `Err` if the catalog is not loaded or the file cannot be read or parsed.
  pub fn load_from_file(file_name: &str) -> Result<Self, ScenarioError> {
    if CATALOG.get().is_none() {
      return Err(ScenarioError::CatalogNotLoaded);
    }
    debug!("(Scenario.load_from_file) Reading scenario {file_name}");
    let file = std::fs::File::open(file_name)?;
    let reader = std::io::BufReader::new(file);
    let scenario: Scenario = serde_json::from_reader(reader)?;
    info!(
      "(Scenario.load_from_file) Loaded scenario {file_name} with {} units and {} steps.",
      scenario.battlefield.units().count(),
      scenario.steps.len()
    );
    Ok(scenario)
  }

  /// Play every step in order. Indirect artillery launched in one turn lands in the targeting phase of a later one.
  pub fn run(&mut self, rng: &mut dyn RngCore) -> ScenarioResult {
    let mut reports = ReportBuffer::new();
    let mut in_flight: Vec<(AttackRequest, u8)> = vec![];
    let mut phases = Vec::with_capacity(self.steps.len());

    for step in &self.steps {
      if step.phase == GamePhase::Initiative {
        self.battlefield.new_turn();
      }
      for target in &step.designate {
        self.battlefield.designate(target);
      }

      let mut attacks = AttackList::new();
      if step.phase.is_targeting() {
        for (_, turns) in &mut in_flight {
          *turns = turns.saturating_sub(1);
        }
        let (landing, flying): (Vec<_>, Vec<_>) = in_flight.drain(..).partition(|(_, turns)| *turns == 0);
        in_flight = flying;
        attacks.extend(landing.into_iter().map(|(request, _)| request));
      }
      let mut declared = AttackList::new();
      merge(&mut declared, step.attacks.clone());
      attacks.extend(declared);

      let outcomes = resolve_phase(step.phase, &attacks, &mut self.battlefield, &mut reports, rng);
      for (request, outcome) in attacks.iter().zip(&outcomes) {
        if let Some(Resolution::Pending { turns_remaining }) = outcome.resolution {
          let mut shell = request.clone();
          shell.landing = true;
          shell.flight_turns = 0;
          in_flight.push((shell, turns_remaining));
        }
      }

      phases.push(PhaseResult {
        phase: step.phase,
        outcomes,
        reports: reports.drain(),
      });
    }

    if !in_flight.is_empty() {
      info!("(Scenario.run) {} artillery shots still in flight when the scenario ended.", in_flight.len());
    }

    let units = self
      .battlefield
      .units()
      .map(|unit| UnitSummary {
        name: unit.name.clone(),
        heat: unit.heat,
        damage_taken: self.battlefield.damage_to(&unit.name),
        jammed: unit.weapons.iter().filter(|w| w.jammed).map(|w| w.record.name.clone()).collect(),
        destroyed: unit.weapons.iter().filter(|w| w.hit).map(|w| w.record.name.clone()).collect(),
      })
      .collect();

    ScenarioResult { phases, units }
  }
}
