//! Summon engine: race, draw and card assembly wired over one catalog.
use log::debug;
use rand::Rng;
use std::sync::Arc;

use crate::CatalogLoader;
use crate::card::{DrawnCard, assemble_card};
use crate::catalog::{Catalog, PoolItem};
use crate::constants::POOL_ID_TIERS;
use crate::draw::{DrawTrace, draw_item, weighted_index};
use crate::error::SummonError;
use crate::race::{RaceResult, roll_race};
use crate::rng::SummonRngBundle;
use crate::tier::RarityTier;

/// Pick a tier by the catalog's aggregate tier weights.
///
/// # Errors
///
/// Returns [`SummonError::PoolConfiguration`] if every tier weight is zero.
pub fn draw_tier<R: Rng + ?Sized>(
    catalog: &Catalog,
    rng: &mut R,
) -> Result<(RarityTier, DrawTrace), SummonError> {
    let weights = catalog.tier_weights();
    let pick = weighted_index(weights, rng).ok_or_else(|| {
        SummonError::pool(RarityTier::Common, "tier weights have no positive weight")
    })?;
    let tier = RarityTier::ALL
        .get(pick.index)
        .copied()
        .ok_or_else(|| SummonError::pool(RarityTier::Common, "tier index out of range"))?;
    let trace = DrawTrace::new(
        POOL_ID_TIERS.to_string(),
        pick,
        RarityTier::ALL
            .iter()
            .map(|tier| (tier.name(), weights[tier.index()])),
    );
    Ok((tier, trace))
}

/// Legacy tier-less draw: pick a tier by aggregate weight, then an item from it.
///
/// # Errors
///
/// Returns [`SummonError::PoolConfiguration`] when the chosen pool or the
/// tier weights are unusable.
pub fn draw_any<'a, R: Rng + ?Sized>(
    catalog: &'a Catalog,
    rng: &mut R,
) -> Result<(RarityTier, &'a PoolItem), SummonError> {
    let (tier, _) = draw_tier(catalog, rng)?;
    let item = draw_item(tier, catalog.pool(tier), rng)?;
    Ok((tier, item))
}

/// Stateless summon operations over a shared, immutable catalog.
#[derive(Debug, Clone)]
pub struct SummonEngine {
    catalog: Arc<Catalog>,
}

impl SummonEngine {
    #[must_use]
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog: Arc::new(catalog),
        }
    }

    /// Create an engine from whatever catalog source the platform provides.
    ///
    /// # Errors
    ///
    /// Returns the loader's error if the catalog cannot be loaded.
    pub fn from_loader<L: CatalogLoader>(loader: &L) -> Result<Self, L::Error> {
        loader.load_catalog().map(Self::new)
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Roll a race and resolve its capsule tier.
    ///
    /// # Errors
    ///
    /// Propagates [`SummonError::InvalidSample`] from tier resolution.
    pub fn run_race<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<RaceResult, SummonError> {
        let result = roll_race(rng)?;
        debug!(
            "Race | v:{} m:{} l:{} tier:{}",
            result.velocity, result.motility, result.linearity, result.capsule_tier
        );
        Ok(result)
    }

    /// Draw a card from `tier`'s pool.
    ///
    /// # Errors
    ///
    /// Returns [`SummonError::PoolConfiguration`] if the pool is unusable.
    pub fn summon<R: Rng + ?Sized>(
        &self,
        tier: RarityTier,
        rng: &mut R,
    ) -> Result<DrawnCard, SummonError> {
        let item = draw_item(tier, self.catalog.pool(tier), rng)?;
        Ok(assemble_card(tier, item, rng))
    }

    /// Parse a caller-supplied tier label and summon from it.
    ///
    /// # Errors
    ///
    /// Returns [`SummonError::UnknownTier`] for unrecognized labels.
    pub fn summon_label<R: Rng + ?Sized>(
        &self,
        label: &str,
        rng: &mut R,
    ) -> Result<DrawnCard, SummonError> {
        let tier = RarityTier::parse(label)?;
        self.summon(tier, rng)
    }

    /// Legacy draw across every tier by aggregate tier weight.
    ///
    /// # Errors
    ///
    /// Returns [`SummonError::PoolConfiguration`] if the catalog is unusable.
    pub fn summon_any<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<DrawnCard, SummonError> {
        let (tier, item) = draw_any(&self.catalog, rng)?;
        Ok(assemble_card(tier, item, rng))
    }

    /// Let the capsule tier bias the card rarity through the catalog's capsule odds.
    ///
    /// # Errors
    ///
    /// Returns [`SummonError::PoolConfiguration`] if the odds row or the
    /// chosen pool is unusable.
    pub fn summon_with_odds<R: Rng + ?Sized>(
        &self,
        capsule: RarityTier,
        rng: &mut R,
    ) -> Result<DrawnCard, SummonError> {
        let (rarity, trace) = self.catalog.capsule_odds().draw_rarity(capsule, rng)?;
        debug!(
            "Capsule odds | capsule:{capsule} rarity:{rarity} roll:{:.3}",
            trace.roll
        );
        self.summon(rarity, rng)
    }

    /// Start a deterministic session sharing this engine's catalog.
    #[must_use]
    pub fn session(&self, seed: u64) -> SummonSession {
        SummonSession {
            catalog: Arc::clone(&self.catalog),
            rng: SummonRngBundle::from_user_seed(seed),
        }
    }
}

/// Seeded summon session: identical seeds replay identical races and cards.
#[derive(Debug, Clone)]
pub struct SummonSession {
    catalog: Arc<Catalog>,
    rng: SummonRngBundle,
}

impl SummonSession {
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub const fn rng_bundle(&self) -> &SummonRngBundle {
        &self.rng
    }

    /// Roll a race on the session's race stream.
    ///
    /// # Errors
    ///
    /// Propagates [`SummonError::InvalidSample`] from tier resolution.
    pub fn run_race(&mut self) -> Result<RaceResult, SummonError> {
        roll_race(self.rng.race())
    }

    /// Draw a card from `tier`'s pool on the session's draw and stat streams.
    ///
    /// # Errors
    ///
    /// Returns [`SummonError::PoolConfiguration`] if the pool is unusable.
    pub fn summon(&mut self, tier: RarityTier) -> Result<DrawnCard, SummonError> {
        let (draw_rng, stats_rng) = self.rng.draw_and_stats();
        let item = draw_item(tier, self.catalog.pool(tier), draw_rng)?;
        Ok(assemble_card(tier, item, stats_rng))
    }

    /// Legacy tier-less draw on the session's streams.
    ///
    /// # Errors
    ///
    /// Returns [`SummonError::PoolConfiguration`] if the catalog is unusable.
    pub fn summon_any(&mut self) -> Result<DrawnCard, SummonError> {
        let (draw_rng, stats_rng) = self.rng.draw_and_stats();
        let (tier, item) = draw_any(&self.catalog, draw_rng)?;
        Ok(assemble_card(tier, item, stats_rng))
    }

    /// Capsule-odds draw on the session's streams.
    ///
    /// # Errors
    ///
    /// Returns [`SummonError::PoolConfiguration`] if the odds row or pool is unusable.
    pub fn summon_with_odds(&mut self, capsule: RarityTier) -> Result<DrawnCard, SummonError> {
        let (rarity, _) = self
            .catalog
            .capsule_odds()
            .draw_rarity(capsule, self.rng.draw())?;
        self.summon(rarity)
    }

    /// Race, then summon from the tier the race earned.
    ///
    /// # Errors
    ///
    /// Propagates race and draw errors.
    pub fn race_and_summon(&mut self) -> Result<(RaceResult, DrawnCard), SummonError> {
        let race = self.run_race()?;
        let card = self.summon(race.capsule_tier)?;
        Ok((race, card))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::BuiltinCatalogLoader;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn engine() -> SummonEngine {
        SummonEngine::from_loader(&BuiltinCatalogLoader).unwrap()
    }

    #[test]
    fn summon_stays_in_requested_tier() {
        let engine = engine();
        let mut rng = SmallRng::seed_from_u64(1);
        for tier in RarityTier::ALL {
            for _ in 0..50 {
                let card = engine.summon(tier, &mut rng).unwrap();
                assert_eq!(card.rarity, tier);
                assert!(engine.catalog().find(tier, &card.name).is_some());
            }
        }
    }

    #[test]
    fn summon_label_rejects_unknown_and_accepts_legacy() {
        let engine = engine();
        let mut rng = SmallRng::seed_from_u64(2);
        let err = engine.summon_label("Shiny", &mut rng).unwrap_err();
        assert!(matches!(err, SummonError::UnknownTier(_)));
        let card = engine.summon_label("Legendary", &mut rng).unwrap();
        assert_eq!(card.rarity, RarityTier::Mythic);
    }

    #[test]
    fn draw_any_respects_zero_tier_weight() {
        let builtin = Catalog::builtin().unwrap();
        let json = format!(
            r#"{{"version":1,"tierWeights":{{"Common":0,"Rare":0,"Epic":0,"Mythic":1}},"tiers":{}}}"#,
            serde_json::to_string(&builtin.listing().tiers).unwrap()
        );
        let catalog = Catalog::from_json(&json).unwrap();
        let mut rng = SmallRng::seed_from_u64(3);
        for _ in 0..100 {
            let (tier, item) = draw_any(&catalog, &mut rng).unwrap();
            assert_eq!(tier, RarityTier::Mythic);
            assert!(catalog.find(tier, &item.name).is_some());
        }
    }

    #[test]
    fn sessions_replay_for_equal_seeds() {
        let engine = engine();
        let play = |seed: u64| {
            let mut session = engine.session(seed);
            (0..25)
                .map(|_| session.race_and_summon().unwrap())
                .collect::<Vec<_>>()
        };
        assert_eq!(play(0xFEED), play(0xFEED));
        assert_ne!(play(0xFEED), play(0xBEEF));
    }

    #[test]
    fn session_streams_are_independent() {
        let engine = engine();
        let mut plain = engine.session(9);
        let mut raced = engine.session(9);
        let _ = raced.run_race().unwrap();
        // Racing only consumes the race stream, so the next card is unchanged.
        assert_eq!(
            plain.summon(RarityTier::Epic).unwrap(),
            raced.summon(RarityTier::Epic).unwrap()
        );
        let [race_draws, draw_draws, _] = raced.rng_bundle().draw_counts();
        assert!(race_draws > 0);
        assert_eq!(draw_draws, 1);
    }

    #[test]
    fn odds_summon_returns_catalog_cards() {
        let engine = engine();
        let mut rng = SmallRng::seed_from_u64(4);
        for capsule in RarityTier::ALL {
            let card = engine.summon_with_odds(capsule, &mut rng).unwrap();
            assert!(engine.catalog().find(card.rarity, &card.name).is_some());
        }
        let mut session = engine.session(5);
        let card = session.summon_with_odds(RarityTier::Mythic).unwrap();
        assert!(session.catalog().find(card.rarity, &card.name).is_some());
    }
}
