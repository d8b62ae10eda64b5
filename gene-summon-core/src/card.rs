//! Drawn card records and their cosmetic stat rolls.
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::catalog::PoolItem;
use crate::constants::{DEFAULT_CARD_EMOJI, STAT_ROLL_CEILING};
use crate::tier::RarityTier;

/// Display-only stats. These never influence tiers or draw odds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct CardStats {
    pub speed: u8,
    pub focus: u8,
    pub endurance: u8,
    pub chaos: u8,
}

impl CardStats {
    /// Roll each stat uniformly in 0..=99.
    pub fn roll<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut stat = || rng.gen_range(0..STAT_ROLL_CEILING);
        let speed = stat();
        let focus = stat();
        let endurance = stat();
        let chaos = stat();
        Self {
            speed,
            focus,
            endurance,
            chaos,
        }
    }
}

/// The record returned by a summon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawnCard {
    pub name: String,
    pub quote: String,
    pub rarity: RarityTier,
    pub stats: CardStats,
    pub emoji: String,
}

impl DrawnCard {
    /// Collection key used to de-duplicate cards in display logic.
    #[must_use]
    pub fn key(&self) -> (RarityTier, &str) {
        (self.rarity, self.name.as_str())
    }
}

/// Attach freshly rolled stats to the chosen item.
pub fn assemble_card<R: Rng + ?Sized>(tier: RarityTier, item: &PoolItem, rng: &mut R) -> DrawnCard {
    DrawnCard {
        name: item.name.clone(),
        quote: item.quote.clone(),
        rarity: tier,
        stats: CardStats::roll(rng),
        emoji: DEFAULT_CARD_EMOJI.to_string(),
    }
}
