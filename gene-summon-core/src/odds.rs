//! Capsule odds: how a capsule tier biases the rarity of the card it yields.
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::constants::{DEFAULT_CAPSULE_ODDS, POOL_ID_ODDS_PREFIX};
use crate::draw::{DrawTrace, WeightedRoll, weighted_index};
use crate::error::SummonError;
use crate::tier::RarityTier;

/// Per-capsule weights over card rarities, indexed by [`RarityTier::index`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapsuleOdds {
    rows: [[u32; 4]; 4],
}

impl Default for CapsuleOdds {
    fn default() -> Self {
        Self {
            rows: DEFAULT_CAPSULE_ODDS,
        }
    }
}

impl CapsuleOdds {
    /// Build odds from explicit rows, rejecting rows with no positive weight.
    ///
    /// # Errors
    ///
    /// Returns [`SummonError::PoolConfiguration`] naming the capsule whose row
    /// sums to zero.
    pub fn from_rows(rows: [[u32; 4]; 4]) -> Result<Self, SummonError> {
        for capsule in RarityTier::ALL {
            if rows[capsule.index()].iter().all(|weight| *weight == 0) {
                return Err(SummonError::pool(
                    capsule,
                    "capsule odds must give at least one rarity a positive weight",
                ));
            }
        }
        Ok(Self { rows })
    }

    /// Overlay a `{ capsule: { rarity: weight } }` table on the defaults.
    pub(crate) fn from_table(
        table: &BTreeMap<String, BTreeMap<String, u32>>,
    ) -> Result<Self, SummonError> {
        let mut rows = DEFAULT_CAPSULE_ODDS;
        let mut seen_capsules = [false; 4];
        for (capsule_label, row) in table {
            let capsule = RarityTier::parse(capsule_label)?;
            if std::mem::replace(&mut seen_capsules[capsule.index()], true) {
                return Err(duplicate_label(capsule, capsule_label));
            }
            let mut seen_rarities = [false; 4];
            for (rarity_label, weight) in row {
                let rarity = RarityTier::parse(rarity_label)?;
                if std::mem::replace(&mut seen_rarities[rarity.index()], true) {
                    return Err(duplicate_label(capsule, rarity_label));
                }
                rows[capsule.index()][rarity.index()] = *weight;
            }
        }
        Self::from_rows(rows)
    }

    #[must_use]
    pub const fn row(&self, capsule: RarityTier) -> &[u32; 4] {
        &self.rows[capsule.index()]
    }

    #[must_use]
    pub fn weight(&self, capsule: RarityTier, rarity: RarityTier) -> u32 {
        self.row(capsule)[rarity.index()]
    }

    /// Pick the rarity a `capsule` yields.
    ///
    /// # Errors
    ///
    /// Returns [`SummonError::PoolConfiguration`] if the capsule's row has no
    /// positive weight.
    pub fn draw_rarity<R: Rng + ?Sized>(
        &self,
        capsule: RarityTier,
        rng: &mut R,
    ) -> Result<(RarityTier, DrawTrace), SummonError> {
        let row = self.row(capsule);
        let pick: WeightedRoll = weighted_index(row, rng)
            .ok_or_else(|| SummonError::pool(capsule, "capsule odds have no positive weight"))?;
        let rarity = RarityTier::ALL
            .get(pick.index)
            .copied()
            .ok_or_else(|| SummonError::pool(capsule, "capsule odds index out of range"))?;
        let trace = DrawTrace::new(
            format!(
                "{POOL_ID_ODDS_PREFIX}.{}",
                capsule.name().to_ascii_lowercase()
            ),
            pick,
            RarityTier::ALL
                .iter()
                .map(|tier| (tier.name(), row[tier.index()])),
        );
        Ok((rarity, trace))
    }

    pub(crate) fn to_table(&self) -> BTreeMap<RarityTier, BTreeMap<RarityTier, u32>> {
        RarityTier::ALL
            .into_iter()
            .map(|capsule| {
                let row = RarityTier::ALL
                    .into_iter()
                    .map(|rarity| (rarity, self.weight(capsule, rarity)))
                    .collect();
                (capsule, row)
            })
            .collect()
    }
}

fn duplicate_label(capsule: RarityTier, label: &str) -> SummonError {
    SummonError::pool(
        capsule,
        format!("capsule odds tier declared more than once (\"{label}\" folds into an existing tier)"),
    )
}
