//! Structured phase report records.
//!
//! Resolution never formats text. Each player-visible outcome is a message id plus parameters; turning that into
//! words (in whatever language) is the client's job.
use serde::{Deserialize, Serialize};

pub const WEAPON_FIRES: u16 = 3115;
pub const TO_HIT_ROLL: u16 = 3120;
pub const ATTACK_IMPOSSIBLE: u16 = 3135;
pub const ARTILLERY_INBOUND: u16 = 3145;
pub const WEAPON_JAMS: u16 = 3160;
pub const PROTOTYPE_JAMS: u16 = 3165;
pub const LASER_FAILURE_CHECK: u16 = 3170;
pub const LASER_BURNS_OUT: u16 = 3175;
pub const PROTOTYPE_HEAT: u16 = 3180;
pub const NO_DESIGNATION: u16 = 3188;
pub const ARTILLERY_SCATTERS: u16 = 3195;
pub const STREAK_NO_LOCK: u16 = 3215;
pub const ATTACK_MISSES: u16 = 3220;
pub const CLUSTER_HITS: u16 = 3325;
pub const AMS_ENGAGES: u16 = 3350;
pub const VOLLEY_DESTROYED: u16 = 3355;
pub const DAMAGE_DEALT: u16 = 3390;
pub const INFERNO_HEAT: u16 = 3400;
pub const SWARM_CONTINUES: u16 = 3420;
pub const SWARM_I_CONTINUES: u16 = 3425;
pub const FIRE_STARTED: u16 = 3550;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum ReportParam {
  Number(i64),
  Text(String),
}

impl From<&str> for ReportParam {
  fn from(value: &str) -> Self {
    ReportParam::Text(value.to_string())
  }
}

impl From<String> for ReportParam {
  fn from(value: String) -> Self {
    ReportParam::Text(value)
  }
}

impl From<u32> for ReportParam {
  fn from(value: u32) -> Self {
    ReportParam::Number(i64::from(value))
  }
}

impl From<u8> for ReportParam {
  fn from(value: u8) -> Self {
    ReportParam::Number(i64::from(value))
  }
}

impl From<i32> for ReportParam {
  fn from(value: i32) -> Self {
    ReportParam::Number(i64::from(value))
  }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Report {
  pub message_id: u16,
  pub subject: String,
  #[serde(default)]
  pub params: Vec<ReportParam>,
  #[serde(default)]
  pub indent: u8,
}

impl Report {
  #[must_use]
  pub fn new(message_id: u16, subject: &str) -> Self {
    Report {
      message_id,
      subject: subject.to_string(),
      params: vec![],
      indent: 0,
    }
  }

  #[must_use]
  pub fn add(mut self, param: impl Into<ReportParam>) -> Self {
    self.params.push(param.into());
    self
  }

  #[must_use]
  pub fn indent(mut self, indent: u8) -> Self {
    self.indent = indent;
    self
  }
}

/// The reports for one phase, in the order they were produced.
#[derive(Debug, Default, Clone)]
pub struct ReportBuffer {
  reports: Vec<Report>,
}

impl ReportBuffer {
  #[must_use]
  pub fn new() -> Self {
    ReportBuffer::default()
  }

  pub fn push(&mut self, report: Report) {
    self.reports.push(report);
  }

  /// Hand every buffered report to the phase engine, leaving the buffer empty.
  pub fn drain(&mut self) -> Vec<Report> {
    std::mem::take(&mut self.reports)
  }

  pub fn iter(&self) -> impl Iterator<Item = &Report> {
    self.reports.iter()
  }

  /// Buffered reports with the given message id.
  pub fn with_id(&self, message_id: u16) -> impl Iterator<Item = &Report> {
    self.reports.iter().filter(move |report| report.message_id == message_id)
  }

  #[must_use]
  pub fn len(&self) -> usize {
    self.reports.len()
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.reports.is_empty()
  }
}
