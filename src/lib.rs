/// Lib for hardpoint
///
/// Weapon definitions and the attack handlers that resolve one weapon's fire against a target during a combat phase.
/// Most of the rules live in `combat.rs` (the resolution protocol), `families.rs` (where weapon families depart from
/// it) and `dispatch.rs` (which handler a weapon gets). The binary in `main.rs` validates catalogs and runs scripted
/// scenarios.
pub mod action;
pub mod battlefield;
pub mod catalog;
pub mod combat;
pub mod combat_tables;
pub mod damage_type;
pub mod dice;
pub mod dispatch;
pub mod families;
mod missile;
pub mod phase;
pub mod point_defense;
pub mod report;
pub mod rules_tables;
pub mod scenario;
pub mod unit;

#[macro_use]
mod cov_util;

#[cfg(test)]
pub mod unit_tests;
