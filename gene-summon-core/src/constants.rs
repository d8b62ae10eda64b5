//! Centralized tuning constants for the summon core.
//!
//! Thresholds and ranges live here so odds can only change through
//! reviewed code, while item weights stay in the catalog asset.

// Race scoring -------------------------------------------------------------
pub const RACE_SCALE_MIN: f64 = 0.0;
pub const RACE_SCALE_MAX: f64 = 100.0;
/// Exclusive upper bound for rolled race values (0..=99).
pub const RACE_ROLL_CEILING: u8 = 100;
pub const MYTHIC_SCORE_THRESHOLD: f64 = 90.0;
pub const EPIC_SCORE_THRESHOLD: f64 = 70.0;
pub const RARE_SCORE_THRESHOLD: f64 = 50.0;

// Card stats ---------------------------------------------------------------
/// Exclusive upper bound for cosmetic card stats (0..=99).
pub const STAT_ROLL_CEILING: u8 = 100;
pub const DEFAULT_CARD_EMOJI: &str = "💧";

// Catalog ------------------------------------------------------------------
pub const CATALOG_SCHEMA_VERSION: u32 = 1;
pub(crate) const DEFAULT_TIER_WEIGHTS: [u32; 4] = [50, 30, 15, 5];
pub(crate) const DEFAULT_CAPSULE_ODDS: [[u32; 4]; 4] = [
    [70, 20, 8, 2],
    [50, 30, 15, 5],
    [30, 40, 20, 10],
    [10, 20, 30, 40],
];

// RNG stream tags ----------------------------------------------------------
pub(crate) const STREAM_RACE: &[u8] = b"race";
pub(crate) const STREAM_DRAW: &[u8] = b"draw";
pub(crate) const STREAM_STATS: &[u8] = b"stats";

// Trace pool ids -----------------------------------------------------------
pub(crate) const POOL_ID_PREFIX: &str = "gene-summon.pool";
pub(crate) const POOL_ID_TIERS: &str = "gene-summon.tiers";
pub(crate) const POOL_ID_ODDS_PREFIX: &str = "gene-summon.odds";
