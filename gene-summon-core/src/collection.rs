//! Spermdex: the caller's append-only list of drawn cards.
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::card::DrawnCard;
use crate::catalog::Catalog;
use crate::numbers::usize_to_f64;
use crate::tier::RarityTier;

/// Ordered collection of every card drawn, duplicates included.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Spermdex {
    cards: Vec<DrawnCard>,
}

/// Progress toward collecting every catalog card.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Completion {
    pub collected: usize,
    pub total: usize,
    pub ratio: f64,
}

impl Spermdex {
    #[must_use]
    pub const fn new() -> Self {
        Self { cards: Vec::new() }
    }

    /// Load a collection previously serialized as a JSON array of cards.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is not an array of drawn cards.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn record(&mut self, card: DrawnCard) {
        self.cards.push(card);
    }

    #[must_use]
    pub fn cards(&self) -> &[DrawnCard] {
        &self.cards
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    #[must_use]
    pub fn is_collected(&self, tier: RarityTier, name: &str) -> bool {
        self.cards.iter().any(|card| card.key() == (tier, name))
    }

    /// Number of distinct `(rarity, name)` pairs drawn so far.
    #[must_use]
    pub fn unique_count(&self) -> usize {
        self.cards.iter().map(DrawnCard::key).collect::<HashSet<_>>().len()
    }

    /// Most recent copy of each distinct card, newest first.
    #[must_use]
    pub fn latest_unique(&self) -> Vec<&DrawnCard> {
        let mut seen = HashSet::new();
        self.cards
            .iter()
            .rev()
            .filter(|card| seen.insert(card.key()))
            .collect()
    }

    /// How much of `catalog` this collection covers. Cards no longer in the
    /// catalog are ignored.
    #[must_use]
    pub fn completion(&self, catalog: &Catalog) -> Completion {
        let total = catalog.total_items();
        let collected = catalog
            .iter()
            .filter(|(tier, item)| self.is_collected(*tier, &item.name))
            .count();
        let ratio = if total == 0 {
            0.0
        } else {
            usize_to_f64(collected) / usize_to_f64(total)
        };
        Completion {
            collected,
            total,
            ratio,
        }
    }

    /// Share of draws that landed in `tier`.
    #[must_use]
    pub fn tier_share(&self, tier: RarityTier) -> f64 {
        if self.cards.is_empty() {
            return 0.0;
        }
        let hits = self.cards.iter().filter(|card| card.rarity == tier).count();
        usize_to_f64(hits) / usize_to_f64(self.cards.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::CardStats;

    fn card(tier: RarityTier, name: &str) -> DrawnCard {
        DrawnCard {
            name: name.to_string(),
            quote: String::new(),
            rarity: tier,
            stats: CardStats::default(),
            emoji: "💧".to_string(),
        }
    }

    #[test]
    fn duplicates_are_kept_but_counted_once() {
        let mut dex = Spermdex::new();
        dex.record(card(RarityTier::Common, "Lazy Larry"));
        dex.record(card(RarityTier::Common, "Lazy Larry"));
        dex.record(card(RarityTier::Rare, "Turbo Tom"));
        assert_eq!(dex.len(), 3);
        assert_eq!(dex.unique_count(), 2);
        assert_eq!(dex.latest_unique().len(), 2);
        assert_eq!(dex.latest_unique()[0].name, "Turbo Tom");
    }

    #[test]
    fn same_name_in_different_tiers_is_distinct() {
        let mut dex = Spermdex::new();
        dex.record(card(RarityTier::Common, "Wiggle"));
        dex.record(card(RarityTier::Epic, "Wiggle"));
        assert_eq!(dex.unique_count(), 2);
        assert!(dex.is_collected(RarityTier::Epic, "Wiggle"));
        assert!(!dex.is_collected(RarityTier::Rare, "Wiggle"));
    }

    #[test]
    fn legacy_rarity_in_stored_json_counts_as_mythic() {
        let json = r#"[{"name":"Genezilla","quote":"","rarity":"Legendary",
            "stats":{"speed":1,"focus":2,"endurance":3,"chaos":4},"emoji":"💧"}]"#;
        let dex = Spermdex::from_json(json).unwrap();
        assert!(dex.is_collected(RarityTier::Mythic, "Genezilla"));
        let catalog = Catalog::builtin().unwrap();
        let completion = dex.completion(&catalog);
        assert_eq!(completion.collected, 1);
        assert_eq!(completion.total, 20);
        assert!((completion.ratio - 0.05).abs() < f64::EPSILON);
    }

    #[test]
    fn stored_rarity_labels_load_case_insensitively() {
        let json = r#"[{"name":"Aqua Saiyan","quote":"","rarity":"mythic",
            "stats":{"speed":9,"focus":8,"endurance":7,"chaos":6},"emoji":"💧"}]"#;
        let dex = Spermdex::from_json(json).unwrap();
        assert!(dex.is_collected(RarityTier::Mythic, "Aqua Saiyan"));
        let reserialized = serde_json::to_value(&dex).unwrap();
        assert_eq!(reserialized[0]["rarity"], "Mythic");
    }

    #[test]
    fn serializes_as_plain_array() {
        let mut dex = Spermdex::new();
        dex.record(card(RarityTier::Rare, "Turbo Tom"));
        let value = serde_json::to_value(&dex).unwrap();
        assert!(value.is_array());
        assert!((dex.tier_share(RarityTier::Rare) - 1.0).abs() < f64::EPSILON);
        assert!(Spermdex::new().tier_share(RarityTier::Rare).abs() < f64::EPSILON);
    }
}
