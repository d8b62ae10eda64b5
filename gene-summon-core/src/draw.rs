//! Cumulative-weight selection shared by item, tier and capsule-odds draws.
use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::catalog::{PoolItem, check_pool_weights};
use crate::constants::POOL_ID_PREFIX;
use crate::error::SummonError;
use crate::numbers::{share, u64_to_f64};
use crate::tier::RarityTier;

/// Outcome of a single cumulative-weight scan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedRoll {
    pub index: usize,
    /// Scaled roll in `[0, total)` that selected `index`.
    pub roll: f64,
    pub total: u64,
}

/// One entry of a recorded weighted draw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedCandidate {
    pub id: String,
    pub weight: u32,
    pub share: f64,
}

/// Diagnostic record describing how a weighted draw resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawTrace {
    pub pool_id: String,
    pub roll: f64,
    pub total_weight: u64,
    pub candidates: Vec<WeightedCandidate>,
    pub chosen_id: String,
}

impl DrawTrace {
    pub(crate) fn new<'a>(
        pool_id: String,
        pick: WeightedRoll,
        entries: impl IntoIterator<Item = (&'a str, u32)>,
    ) -> Self {
        let candidates: Vec<WeightedCandidate> = entries
            .into_iter()
            .map(|(id, weight)| WeightedCandidate {
                id: id.to_string(),
                weight,
                share: share(u64::from(weight), pick.total),
            })
            .collect();
        let chosen_id = candidates
            .get(pick.index)
            .map(|candidate| candidate.id.clone())
            .unwrap_or_default();
        Self {
            pool_id,
            roll: pick.roll,
            total_weight: pick.total,
            candidates,
            chosen_id,
        }
    }
}

/// Scan `weights` in declaration order for the first running sum that
/// strictly exceeds `unit * total`.
///
/// `unit` is expected in `[0, 1)`; values outside are clamped. Returns `None`
/// when there is nothing with positive weight to choose from. Rounding error
/// that leaves the roll past the final boundary resolves to the last entry
/// with positive weight.
#[must_use]
pub fn scan_cumulative(weights: &[u32], unit: f64) -> Option<WeightedRoll> {
    let total: u64 = weights.iter().map(|weight| u64::from(*weight)).sum();
    if total == 0 {
        return None;
    }
    let unit = if unit.is_finite() {
        unit.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let roll = unit * u64_to_f64(total);

    let mut cumulative = 0_u64;
    for (index, weight) in weights.iter().enumerate() {
        cumulative += u64::from(*weight);
        if u64_to_f64(cumulative) > roll {
            return Some(WeightedRoll { index, roll, total });
        }
    }

    weights
        .iter()
        .rposition(|weight| *weight > 0)
        .map(|index| WeightedRoll { index, roll, total })
}

/// Draw an index proportionally to `weights` using one uniform sample from `rng`.
pub fn weighted_index<R: Rng + ?Sized>(weights: &[u32], rng: &mut R) -> Option<WeightedRoll> {
    if weights.iter().all(|weight| *weight == 0) {
        return None;
    }
    let unit: f64 = rng.r#gen();
    scan_cumulative(weights, unit)
}

/// Draw one item from `pool` with probability `weight / total_weight`.
///
/// # Errors
///
/// Returns [`SummonError::PoolConfiguration`] when the pool is empty or holds
/// an item with zero weight.
pub fn draw_item<'a, R: Rng + ?Sized>(
    tier: RarityTier,
    pool: &'a [PoolItem],
    rng: &mut R,
) -> Result<&'a PoolItem, SummonError> {
    draw_item_with_trace(tier, pool, rng).map(|(item, _)| item)
}

/// Same as [`draw_item`] but also returns the [`DrawTrace`] of the scan.
///
/// # Errors
///
/// Returns [`SummonError::PoolConfiguration`] when the pool is empty or holds
/// an item with zero weight.
pub fn draw_item_with_trace<'a, R: Rng + ?Sized>(
    tier: RarityTier,
    pool: &'a [PoolItem],
    rng: &mut R,
) -> Result<(&'a PoolItem, DrawTrace), SummonError> {
    check_pool_weights(tier, pool)?;
    let weights: Vec<u32> = pool.iter().map(|item| item.weight).collect();
    let pick = weighted_index(&weights, rng)
        .ok_or_else(|| SummonError::pool(tier, "pool has no positive weight"))?;
    let item = pool
        .get(pick.index)
        .ok_or_else(|| SummonError::pool(tier, "draw fell outside the pool"))?;

    debug!(
        "Pool draw | tier:{tier} roll:{:.3}/{} chosen:{}",
        pick.roll, pick.total, item.name
    );

    let trace = DrawTrace::new(
        format!("{POOL_ID_PREFIX}.{}", tier.name().to_ascii_lowercase()),
        pick,
        pool.iter().map(|entry| (entry.name.as_str(), entry.weight)),
    );
    Ok((item, trace))
}
