//! Race rolls and the capsule tier they earn.
//!
//! Each race samples velocity, motility and linearity on a shared 0-100
//! scale. The capsule tier comes from the average of the three, banded with
//! exclusive lower thresholds so a score sitting exactly on a threshold stays
//! in the lower tier.
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::{
    EPIC_SCORE_THRESHOLD, MYTHIC_SCORE_THRESHOLD, RACE_ROLL_CEILING, RACE_SCALE_MAX,
    RACE_SCALE_MIN, RARE_SCORE_THRESHOLD,
};
use crate::error::SummonError;
use crate::tier::RarityTier;

/// Three performance values on the 0-100 scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RaceSample {
    pub velocity: f64,
    pub motility: f64,
    pub linearity: f64,
}

/// Race outcome handed to callers: the sample plus its capsule tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceResult {
    pub velocity: f64,
    pub motility: f64,
    pub linearity: f64,
    pub capsule_tier: RarityTier,
}

impl RaceSample {
    #[must_use]
    pub const fn new(velocity: f64, motility: f64, linearity: f64) -> Self {
        Self {
            velocity,
            motility,
            linearity,
        }
    }

    /// Roll each field uniformly as an integer in 0..=99.
    pub fn roll<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut field = || f64::from(rng.gen_range(0..RACE_ROLL_CEILING));
        let velocity = field();
        let motility = field();
        let linearity = field();
        Self::new(velocity, motility, linearity)
    }

    /// Reject non-finite or out-of-scale fields.
    ///
    /// # Errors
    ///
    /// Returns [`SummonError::InvalidSample`] naming the first offending field.
    pub fn validate(&self) -> Result<(), SummonError> {
        for (field, value) in [
            ("velocity", self.velocity),
            ("motility", self.motility),
            ("linearity", self.linearity),
        ] {
            if !value.is_finite() || !(RACE_SCALE_MIN..=RACE_SCALE_MAX).contains(&value) {
                return Err(SummonError::InvalidSample { field, value });
            }
        }
        Ok(())
    }

    /// Mean of the three fields.
    #[must_use]
    pub fn score(&self) -> f64 {
        (self.velocity + self.motility + self.linearity) / 3.0
    }
}

/// Band a score into a tier: `>90` Mythic, `>70` Epic, `>50` Rare, else Common.
///
/// # Errors
///
/// Returns [`SummonError::InvalidSample`] for a non-finite score.
pub fn tier_for_score(score: f64) -> Result<RarityTier, SummonError> {
    if !score.is_finite() {
        return Err(SummonError::InvalidSample {
            field: "score",
            value: score,
        });
    }
    let tier = if score > MYTHIC_SCORE_THRESHOLD {
        RarityTier::Mythic
    } else if score > EPIC_SCORE_THRESHOLD {
        RarityTier::Epic
    } else if score > RARE_SCORE_THRESHOLD {
        RarityTier::Rare
    } else {
        RarityTier::Common
    };
    Ok(tier)
}

/// Resolve the capsule tier earned by a pre-rolled sample.
///
/// # Errors
///
/// Returns [`SummonError::InvalidSample`] if any field is non-finite or
/// outside 0-100.
pub fn resolve_tier(sample: &RaceSample) -> Result<RarityTier, SummonError> {
    sample.validate()?;
    tier_for_score(sample.score())
}

/// Roll a fresh sample and resolve it.
///
/// # Errors
///
/// Rolled samples are always in range; the error path exists for parity with
/// [`resolve_tier`].
pub fn roll_race<R: Rng + ?Sized>(rng: &mut R) -> Result<RaceResult, SummonError> {
    let sample = RaceSample::roll(rng);
    let capsule_tier = resolve_tier(&sample)?;
    Ok(RaceResult {
        velocity: sample.velocity,
        motility: sample.motility,
        linearity: sample.linearity,
        capsule_tier,
    })
}

/// Exact probability of each tier under [`RaceSample::roll`], indexed by
/// [`RarityTier::index`].
#[must_use]
pub fn expected_tier_shares() -> [f64; 4] {
    let faces = u32::from(RACE_ROLL_CEILING);
    // Number of ways each total of three rolls can occur.
    let mut ways = vec![0_u64; (3 * (faces - 1) + 1) as usize];
    for a in 0..faces {
        for b in 0..faces {
            for c in 0..faces {
                ways[(a + b + c) as usize] += 1;
            }
        }
    }
    let mut counts = [0_u64; 4];
    for (total, count) in ways.iter().enumerate() {
        let score = crate::numbers::usize_to_f64(total) / 3.0;
        if let Ok(tier) = tier_for_score(score) {
            counts[tier.index()] += count;
        }
    }
    let outcomes: u64 = counts.iter().sum();
    counts.map(|count| crate::numbers::share(count, outcomes))
}
