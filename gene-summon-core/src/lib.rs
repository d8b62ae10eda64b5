//! Gene Summon Engine
//!
//! Platform-agnostic core for the Gene Summon gacha toy: race rolls that earn
//! a capsule tier, weighted draws from per-tier card pools, and the card
//! records handed back to callers. Transport and presentation live elsewhere.

pub mod card;
pub mod catalog;
pub mod collection;
pub mod constants;
pub mod draw;
pub mod error;
pub mod numbers;
pub mod odds;
pub mod race;
pub mod rng;
pub mod summon;
pub mod tier;

// Re-export commonly used types
pub use card::{CardStats, DrawnCard, assemble_card};
pub use catalog::{
    BuiltinCatalogLoader, Catalog, CatalogListing, FileCatalogLoader, PoolItem, validate_pool,
};
pub use collection::{Completion, Spermdex};
pub use draw::{
    DrawTrace, WeightedCandidate, WeightedRoll, draw_item, draw_item_with_trace, scan_cumulative,
    weighted_index,
};
pub use error::SummonError;
pub use odds::CapsuleOdds;
pub use race::{
    RaceResult, RaceSample, expected_tier_shares, resolve_tier, roll_race, tier_for_score,
};
pub use rng::{CountingRng, SummonRngBundle};
pub use summon::{SummonEngine, SummonSession, draw_any, draw_tier};
pub use tier::RarityTier;

/// Trait for abstracting catalog loading.
/// Platform-specific implementations should provide this
pub trait CatalogLoader {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the card catalog from the platform-specific source
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded or fails validation.
    fn load_catalog(&self) -> Result<Catalog, Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use std::convert::Infallible;

    #[derive(Clone)]
    struct FixtureLoader(Catalog);

    impl CatalogLoader for FixtureLoader {
        type Error = Infallible;

        fn load_catalog(&self) -> Result<Catalog, Self::Error> {
            Ok(self.0.clone())
        }
    }

    fn fixture_pools() -> [Vec<PoolItem>; 4] {
        RarityTier::ALL.map(|tier| {
            vec![PoolItem {
                name: format!("{tier} Solo"),
                quote: format!("Only {tier} swimmer"),
                weight: 1,
            }]
        })
    }

    #[test]
    fn engine_uses_injected_catalog() {
        let loader = FixtureLoader(Catalog::from_pools(fixture_pools()).unwrap());
        let engine = SummonEngine::from_loader(&loader).unwrap();
        let mut rng = SmallRng::seed_from_u64(0xABCD);
        let race = engine.run_race(&mut rng).unwrap();
        let card = engine.summon(race.capsule_tier, &mut rng).unwrap();
        assert_eq!(card.name, format!("{} Solo", race.capsule_tier));
        assert_eq!(card.rarity, race.capsule_tier);
    }

    #[test]
    fn file_loader_reports_missing_files() {
        let loader = FileCatalogLoader::new("/definitely/not/here/catalog.json");
        let err = SummonEngine::from_loader(&loader).unwrap_err();
        assert!(matches!(err, SummonError::CatalogIo { .. }));
        assert!(err.to_string().contains("/definitely/not/here/catalog.json"));
    }

    #[test]
    fn builtin_loader_round_trips_through_spermdex() {
        let engine = SummonEngine::from_loader(&BuiltinCatalogLoader).unwrap();
        let mut session = engine.session(0x00C0_FFEE);
        let mut dex = Spermdex::new();
        for _ in 0..10 {
            let (_, card) = session.race_and_summon().unwrap();
            dex.record(card);
        }
        assert_eq!(dex.len(), 10);
        assert!(dex.unique_count() <= 10);
        assert!(dex.completion(engine.catalog()).collected >= 1);
    }
}
