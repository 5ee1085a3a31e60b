use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, FromRepr};

/// The phases of a game turn, in order. Owned by the external turn engine; handlers only ask which phase it is.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, FromRepr)]
pub enum GamePhase {
  Initiative = 0,
  Deployment,
  Targeting,
  Movement,
  Offboard,
  PreFiring,
  Firing,
  FiringReport,
  Physical,
  End,
}

impl GamePhase {
  #[must_use]
  pub fn is_firing(self) -> bool {
    self == GamePhase::Firing
  }

  #[must_use]
  pub fn is_targeting(self) -> bool {
    self == GamePhase::Targeting
  }

  #[must_use]
  pub fn is_offboard(self) -> bool {
    self == GamePhase::Offboard
  }

  /// The phase that follows this one, wrapping from `End` back to `Initiative`.
  #[must_use]
  pub fn next(self) -> GamePhase {
    GamePhase::from_repr(self as usize + 1).unwrap_or(GamePhase::Initiative)
  }
}
