// Cluster hits table. Index by rack size (rows 1 to 20), then by 2d6 roll minus 2.
const CLUSTER_HITS: [[u32; 11]; 20] = [
  [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
  [1, 1, 1, 1, 1, 1, 2, 2, 2, 2, 2],
  [1, 1, 2, 2, 2, 2, 2, 3, 3, 3, 3],
  [1, 2, 2, 2, 2, 3, 3, 3, 3, 4, 4],
  [1, 2, 2, 3, 3, 3, 3, 4, 4, 5, 5],
  [2, 2, 3, 3, 4, 4, 4, 5, 5, 6, 6],
  [2, 2, 3, 4, 4, 4, 4, 6, 6, 7, 7],
  [3, 3, 4, 4, 5, 5, 5, 6, 6, 8, 8],
  [3, 3, 4, 5, 5, 5, 5, 7, 7, 9, 9],
  [3, 3, 4, 6, 6, 6, 6, 8, 8, 10, 10],
  [4, 4, 5, 7, 7, 7, 7, 9, 9, 11, 11],
  [4, 4, 5, 8, 8, 8, 8, 10, 10, 12, 12],
  [4, 4, 5, 8, 8, 8, 8, 11, 11, 13, 13],
  [5, 5, 6, 9, 9, 9, 9, 11, 11, 14, 14],
  [5, 5, 6, 9, 9, 9, 9, 12, 12, 15, 15],
  [5, 5, 7, 10, 10, 10, 10, 13, 13, 16, 16],
  [5, 5, 7, 10, 10, 10, 10, 14, 14, 17, 17],
  [6, 6, 8, 11, 11, 11, 11, 14, 14, 18, 18],
  [6, 6, 8, 11, 11, 11, 11, 15, 15, 19, 19],
  [6, 6, 9, 12, 12, 12, 12, 16, 16, 20, 20],
];

const CLUSTER_HITS_30: [u32; 11] = [10, 10, 12, 18, 18, 18, 18, 24, 24, 30, 30];
const CLUSTER_HITS_40: [u32; 11] = [12, 12, 18, 24, 24, 24, 24, 32, 32, 40, 40];

const MIN_CLUSTER_ROLL: i32 = 2;
const MAX_CLUSTER_ROLL: i32 = 12;

/// Number of missiles (or shots) out of `rack_size` that strike, given a modified cluster roll.
///
/// Rolls are clamped to 2..=12. Racks larger than 20 without their own row are split into 20-missile chunks
/// each read at the same roll.
#[must_use]
pub fn cluster_hits(rack_size: u32, roll: i32) -> u32 {
  #[allow(clippy::cast_sign_loss)]
  let column = (roll.clamp(MIN_CLUSTER_ROLL, MAX_CLUSTER_ROLL) - MIN_CLUSTER_ROLL) as usize;

  match rack_size {
    0 => 0,
    1..=20 => CLUSTER_HITS[rack_size as usize - 1][column],
    30 => CLUSTER_HITS_30[column],
    40 => CLUSTER_HITS_40[column],
    _ => cluster_hits(20, roll) + cluster_hits(rack_size - 20, roll),
  }
}
