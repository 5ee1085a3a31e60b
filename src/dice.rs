//! Six-sided dice.
//!
//! Every random decision in resolution goes through [`roll`] so that a recorded stream of faces can be
//! replayed exactly with [`LoadedDice`].
use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::error;

const DIE_SIZE: u32 = 6;

/// Roll a single d6.
pub fn roll(rng: &mut dyn RngCore) -> u8 {
  u8::try_from(rng.next_u32() % DIE_SIZE + 1).unwrap_or(0)
}

/// Roll `dice` d6 and sum them.
pub fn roll_dice(dice: u8, rng: &mut dyn RngCore) -> u8 {
  if u32::from(dice) * DIE_SIZE > u32::from(u8::MAX) {
    error!("(Dice.roll_dice) Too many dice to roll.");
    return 0;
  }

  (0..dice).map(|_| roll(rng)).sum()
}

/// Half a d6, rounded down (0 to 3).
pub fn roll_half_die(rng: &mut dyn RngCore) -> u8 {
  roll(rng) / 2
}

/// A random source that produces scripted die faces first and then falls back to a seeded generator.
///
/// Used to replay a recorded game and to force specific rolls (e.g. a to-hit roll of 2) in tests.
pub struct LoadedDice {
  faces: VecDeque<u8>,
  fallback: StdRng,
}

impl LoadedDice {
  /// # Panics
  /// Panics if a face is outside 1..=6, as such a face could never be rolled.
  #[must_use]
  pub fn new(faces: &[u8]) -> Self {
    assert!(
      faces.iter().all(|face| (1..=6).contains(face)),
      "(LoadedDice.new) Die faces must be between 1 and 6: {faces:?}"
    );
    LoadedDice {
      faces: faces.iter().copied().collect(),
      fallback: StdRng::seed_from_u64(0),
    }
  }

  /// Like [`LoadedDice::new`], but once the script runs out the dice come from `fallback`.
  ///
  /// # Panics
  /// Panics if a face is outside 1..=6.
  #[must_use]
  pub fn with_fallback(faces: &[u8], fallback: StdRng) -> Self {
    LoadedDice {
      fallback,
      ..LoadedDice::new(faces)
    }
  }

  /// Number of scripted faces not yet consumed.
  #[must_use]
  pub fn remaining(&self) -> usize {
    self.faces.len()
  }
}

impl RngCore for LoadedDice {
  fn next_u32(&mut self) -> u32 {
    match self.faces.pop_front() {
      Some(face) => u32::from(face) - 1,
      None => self.fallback.next_u32(),
    }
  }

  fn next_u64(&mut self) -> u64 {
    u64::from(self.next_u32())
  }

  fn fill_bytes(&mut self, dest: &mut [u8]) {
    self.fallback.fill_bytes(dest);
  }

  fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
    self.fallback.try_fill_bytes(dest)
  }
}
