// Dice thresholds and modifiers used by the weapon-family rules. Each family's jam threshold follows its own rules
// entry, so similar-looking values stay separate constants.

// A to-hit roll of exactly this value is a "natural two", the trigger for most fumbles.
pub const NATURAL_TWO: u8 = 2;

// Standard Ultra AC fired in double-shot mode jams on a natural two.
pub const ULTRA_DOUBLE_SHOTS: u8 = 2;

// Rotary AC: at this many shots or more the jam range widens to ROTARY_HIGH_RATE_JAM_ROLL.
pub const ROTARY_HIGH_RATE_SHOTS: u8 = 5;
pub const ROTARY_HIGH_RATE_JAM_ROLL: u8 = 3;
pub const ROTARY_MAX_SHOTS: u8 = 6;

// Inner Sphere prototype AC / Ultra AC jam and take a hit on a natural two, in every mode.
pub const PROTOTYPE_AC_JAM_ROLL: u8 = NATURAL_TWO;

// Clan prototype Ultra AC jams and takes a hit on this roll or less, but only when firing this many shots.
pub const PROTOTYPE_CLAN_ULTRA_JAM_ROLL: u8 = 3;
pub const PROTOTYPE_CLAN_ULTRA_JAM_SHOTS: u8 = 2;

// Prototype and insulated lasers: a natural two forces a 2d6 failure check; this or more burns the laser out.
pub const LASER_FAILURE_TARGET: u8 = 8;

pub const TRACER_DAMAGE_PENALTY: u32 = 1;

// Bombast laser power settings run from this minimum to the listed damage.
pub const BOMBAST_MIN_POWER: u8 = 8;

// AMS engagement against a missile rack shifts the cluster roll by this much.
pub const AMS_CLUSTER_MODIFIER: i32 = -4;

// Point defense destroys a capital missile volley on 2d6 + defense modifier at or above this.
pub const POINT_DEFENSE_CAPITAL_TARGET: i32 = 8;

// Streak launchers that lock on read the cluster table at this column (every missile hits).
pub const STREAK_CLUSTER_ROLL: i32 = 11;

// Each inferno missile that strikes an armored target adds this much heat to it.
pub const INFERNO_HEAT_PER_MISSILE: u32 = 2;

// Long-range missiles, MRMs and artillery apply damage in groups of this size.
pub const DAMAGE_GROUP_SIZE: u32 = 5;
