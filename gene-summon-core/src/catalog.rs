//! Static card catalog: per-tier weighted pools loaded once at startup.
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::hash::Hasher;
use std::path::{Path, PathBuf};
use twox_hash::XxHash64;

use crate::CatalogLoader;
use crate::constants::{CATALOG_SCHEMA_VERSION, DEFAULT_TIER_WEIGHTS};
use crate::error::SummonError;
use crate::odds::CapsuleOdds;
use crate::tier::RarityTier;

const BUILTIN_CATALOG: &str = include_str!("../assets/catalog.json");

/// A summonable card template within one tier's pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolItem {
    pub name: String,
    pub quote: String,
    pub weight: u32,
}

/// On-disk catalog layout. Tier labels are normalized after parsing.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CatalogFile {
    #[serde(default = "default_version")]
    version: u32,
    #[serde(default)]
    tier_weights: BTreeMap<String, u32>,
    #[serde(default)]
    capsule_odds: BTreeMap<String, BTreeMap<String, u32>>,
    tiers: BTreeMap<String, Vec<PoolItem>>,
}

const fn default_version() -> u32 {
    CATALOG_SCHEMA_VERSION
}

/// Immutable, validated catalog shared by every summon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    version: u32,
    pools: [Vec<PoolItem>; 4],
    tier_weights: [u32; 4],
    capsule_odds: CapsuleOdds,
}

/// Serializable view of the catalog for collection screens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogListing {
    pub version: u32,
    pub fingerprint: String,
    pub tier_weights: BTreeMap<RarityTier, u32>,
    pub capsule_odds: BTreeMap<RarityTier, BTreeMap<RarityTier, u32>>,
    pub tiers: BTreeMap<RarityTier, Vec<PoolItem>>,
}

impl Catalog {
    /// Parse and validate a catalog from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`SummonError::CatalogParse`] for malformed JSON,
    /// [`SummonError::UnknownTier`] for unrecognized tier labels and
    /// [`SummonError::PoolConfiguration`] when a pool breaks the weighting
    /// invariants.
    pub fn from_json(json: &str) -> Result<Self, SummonError> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Self::from_file(file)
    }

    /// Read a catalog file from disk.
    ///
    /// # Errors
    ///
    /// Returns [`SummonError::CatalogIo`] if the file cannot be read, plus any
    /// error from [`Catalog::from_json`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SummonError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| SummonError::CatalogIo {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_json(&json)?;
        info!(
            "Loaded catalog v{} from {} ({} cards, fingerprint {:016x})",
            catalog.version,
            path.display(),
            catalog.total_items(),
            catalog.fingerprint()
        );
        Ok(catalog)
    }

    /// The catalog bundled with this crate.
    ///
    /// # Errors
    ///
    /// Only fails if the embedded asset was edited into an invalid state.
    pub fn builtin() -> Result<Self, SummonError> {
        Self::from_json(BUILTIN_CATALOG)
    }

    /// Build a catalog from already-parsed pools using default tier weights and odds.
    ///
    /// # Errors
    ///
    /// Returns [`SummonError::PoolConfiguration`] if any pool is invalid.
    pub fn from_pools(pools: [Vec<PoolItem>; 4]) -> Result<Self, SummonError> {
        let catalog = Self {
            version: CATALOG_SCHEMA_VERSION,
            pools,
            tier_weights: DEFAULT_TIER_WEIGHTS,
            capsule_odds: CapsuleOdds::default(),
        };
        catalog.validate()?;
        Ok(catalog)
    }

    fn from_file(file: CatalogFile) -> Result<Self, SummonError> {
        if file.version != CATALOG_SCHEMA_VERSION {
            return Err(SummonError::pool(
                RarityTier::Common,
                format!(
                    "unsupported catalog version {} (expected {CATALOG_SCHEMA_VERSION})",
                    file.version
                ),
            ));
        }

        let mut pools: [Option<Vec<PoolItem>>; 4] = Default::default();
        for (label, items) in file.tiers {
            let tier = RarityTier::parse(&label)?;
            let slot = &mut pools[tier.index()];
            if slot.is_some() {
                return Err(SummonError::pool(
                    tier,
                    format!("tier declared more than once (\"{label}\" duplicates {tier})"),
                ));
            }
            *slot = Some(items);
        }
        let pools = pools.map(Option::unwrap_or_default);

        let mut tier_weights = DEFAULT_TIER_WEIGHTS;
        let mut weighted = [false; 4];
        for (label, weight) in &file.tier_weights {
            let tier = RarityTier::parse(label)?;
            if std::mem::replace(&mut weighted[tier.index()], true) {
                return Err(SummonError::pool(
                    tier,
                    format!("tier weight declared more than once (\"{label}\" duplicates {tier})"),
                ));
            }
            tier_weights[tier.index()] = *weight;
        }

        let capsule_odds = CapsuleOdds::from_table(&file.capsule_odds)?;

        let catalog = Self {
            version: file.version,
            pools,
            tier_weights,
            capsule_odds,
        };
        catalog.validate()?;
        debug!(
            "Catalog parsed | cards:{} tier_weights:{:?}",
            catalog.total_items(),
            catalog.tier_weights
        );
        Ok(catalog)
    }

    /// Check every pool and the aggregate tier weights.
    ///
    /// # Errors
    ///
    /// Returns [`SummonError::PoolConfiguration`] for the first violation found.
    pub fn validate(&self) -> Result<(), SummonError> {
        for tier in RarityTier::ALL {
            validate_pool(tier, self.pool(tier))?;
        }
        if self.tier_weights.iter().all(|weight| *weight == 0) {
            return Err(SummonError::pool(
                RarityTier::Common,
                "tier weights must include at least one positive weight",
            ));
        }
        Ok(())
    }

    #[must_use]
    pub const fn version(&self) -> u32 {
        self.version
    }

    #[must_use]
    pub fn pool(&self, tier: RarityTier) -> &[PoolItem] {
        &self.pools[tier.index()]
    }

    #[must_use]
    pub const fn tier_weights(&self) -> &[u32; 4] {
        &self.tier_weights
    }

    #[must_use]
    pub const fn tier_weight(&self, tier: RarityTier) -> u32 {
        self.tier_weights[tier.index()]
    }

    #[must_use]
    pub const fn capsule_odds(&self) -> &CapsuleOdds {
        &self.capsule_odds
    }

    #[must_use]
    pub fn total_items(&self) -> usize {
        self.pools.iter().map(Vec::len).sum()
    }

    /// Look up an item by tier and name.
    #[must_use]
    pub fn find(&self, tier: RarityTier, name: &str) -> Option<&PoolItem> {
        self.pool(tier).iter().find(|item| item.name == name)
    }

    /// Iterate `(tier, item)` pairs in tier order, then declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (RarityTier, &PoolItem)> {
        RarityTier::ALL
            .into_iter()
            .flat_map(move |tier| self.pool(tier).iter().map(move |item| (tier, item)))
    }

    /// Stable digest of the canonical catalog contents.
    #[must_use]
    pub fn fingerprint(&self) -> u64 {
        let canonical = serde_json::to_vec(&self.canonical_parts()).unwrap_or_default();
        let mut hasher = XxHash64::with_seed(0);
        hasher.write(&canonical);
        hasher.finish()
    }

    #[must_use]
    pub fn listing(&self) -> CatalogListing {
        let (tier_weights, capsule_odds, tiers) = self.canonical_parts();
        CatalogListing {
            version: self.version,
            fingerprint: format!("{:016x}", self.fingerprint()),
            tier_weights,
            capsule_odds,
            tiers,
        }
    }

    #[allow(clippy::type_complexity)]
    fn canonical_parts(
        &self,
    ) -> (
        BTreeMap<RarityTier, u32>,
        BTreeMap<RarityTier, BTreeMap<RarityTier, u32>>,
        BTreeMap<RarityTier, Vec<PoolItem>>,
    ) {
        let tier_weights = RarityTier::ALL
            .into_iter()
            .map(|tier| (tier, self.tier_weight(tier)))
            .collect();
        let tiers = RarityTier::ALL
            .into_iter()
            .map(|tier| (tier, self.pool(tier).to_vec()))
            .collect();
        (tier_weights, self.capsule_odds.to_table(), tiers)
    }
}

/// Per-draw guard: the pool must be non-empty with strictly positive weights.
pub(crate) fn check_pool_weights(tier: RarityTier, pool: &[PoolItem]) -> Result<(), SummonError> {
    if pool.is_empty() {
        return Err(SummonError::pool(tier, "pool has no items"));
    }
    if let Some(item) = pool.iter().find(|item| item.weight == 0) {
        return Err(SummonError::pool(
            tier,
            format!("item \"{}\" has non-positive weight", item.name),
        ));
    }
    Ok(())
}

/// Load-time validation: weights plus unique, non-empty names.
///
/// # Errors
///
/// Returns [`SummonError::PoolConfiguration`] describing the first problem.
pub fn validate_pool(tier: RarityTier, pool: &[PoolItem]) -> Result<(), SummonError> {
    check_pool_weights(tier, pool)?;
    let mut seen = HashSet::with_capacity(pool.len());
    for item in pool {
        if item.name.trim().is_empty() {
            return Err(SummonError::pool(tier, "item name must not be empty"));
        }
        if !seen.insert(item.name.as_str()) {
            return Err(SummonError::pool(
                tier,
                format!("item \"{}\" appears more than once", item.name),
            ));
        }
    }
    Ok(())
}

/// Loads the catalog embedded in this crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinCatalogLoader;

impl CatalogLoader for BuiltinCatalogLoader {
    type Error = SummonError;

    fn load_catalog(&self) -> Result<Catalog, Self::Error> {
        Catalog::builtin()
    }
}

/// Loads a catalog JSON file from disk.
#[derive(Debug, Clone)]
pub struct FileCatalogLoader {
    path: PathBuf,
}

impl FileCatalogLoader {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CatalogLoader for FileCatalogLoader {
    type Error = SummonError;

    fn load_catalog(&self) -> Result<Catalog, Self::Error> {
        Catalog::load(&self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool_json(tier: &str, items: &str) -> String {
        format!(r#""{tier}": [{items}]"#)
    }

    fn catalog_json(extra_tiers: &[String]) -> String {
        let mut tiers = vec![
            pool_json("Common", r#"{"name":"Lazy Larry","quote":"zzz","weight":25}"#),
            pool_json("Rare", r#"{"name":"Turbo Tom","quote":"spin","weight":30}"#),
            pool_json("Epic", r#"{"name":"Slick Rick","quote":"fast","weight":25}"#),
        ];
        tiers.extend_from_slice(extra_tiers);
        format!(r#"{{"version":1,"tiers":{{{}}}}}"#, tiers.join(","))
    }

    #[test]
    fn legendary_pool_loads_as_mythic() {
        let json = catalog_json(&[pool_json(
            "Legendary",
            r#"{"name":"Genezilla","quote":"mutated","weight":10}"#,
        )]);
        let catalog = Catalog::from_json(&json).unwrap();
        assert_eq!(catalog.pool(RarityTier::Mythic)[0].name, "Genezilla");
        assert_eq!(catalog.tier_weights(), &DEFAULT_TIER_WEIGHTS);
    }

    #[test]
    fn legendary_and_mythic_together_are_rejected() {
        let json = catalog_json(&[
            pool_json("Legendary", r#"{"name":"A","quote":"a","weight":1}"#),
            pool_json("Mythic", r#"{"name":"B","quote":"b","weight":1}"#),
        ]);
        let err = Catalog::from_json(&json).unwrap_err();
        assert!(matches!(
            err,
            SummonError::PoolConfiguration {
                tier: RarityTier::Mythic,
                ..
            }
        ));
    }

    #[test]
    fn legendary_and_mythic_tier_weights_together_are_rejected() {
        let pools = catalog_json(&[pool_json(
            "Mythic",
            r#"{"name":"Genezilla","quote":"mutated","weight":10}"#,
        )]);
        let json = pools.replacen(
            r#"{"version":1,"#,
            r#"{"version":1,"tierWeights":{"Mythic":5,"legendary":90},"#,
            1,
        );
        let err = Catalog::from_json(&json).unwrap_err();
        assert!(matches!(
            err,
            SummonError::PoolConfiguration {
                tier: RarityTier::Mythic,
                ..
            }
        ));
        assert!(err.to_string().contains("declared more than once"));
    }

    #[test]
    fn legendary_and_mythic_capsule_rows_together_are_rejected() {
        let pools = catalog_json(&[pool_json(
            "Mythic",
            r#"{"name":"Genezilla","quote":"mutated","weight":10}"#,
        )]);
        let json = pools.replacen(
            r#"{"version":1,"#,
            r#"{"version":1,"capsuleOdds":{"Mythic":{"Mythic":40},"Legendary":{"Mythic":1}},"#,
            1,
        );
        let err = Catalog::from_json(&json).unwrap_err();
        assert!(err.to_string().contains("declared more than once"));
    }

    #[test]
    fn missing_tier_is_an_empty_pool_error() {
        let err = Catalog::from_json(&catalog_json(&[])).unwrap_err();
        assert!(err.to_string().contains("Mythic"));
        assert!(err.to_string().contains("no items"));
    }

    #[test]
    fn zero_weight_is_rejected_at_load() {
        let json = catalog_json(&[pool_json(
            "Mythic",
            r#"{"name":"Ghost","quote":"boo","weight":0}"#,
        )]);
        let err = Catalog::from_json(&json).unwrap_err();
        assert!(err.to_string().contains("non-positive weight"));
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let json = catalog_json(&[pool_json(
            "Mythic",
            r#"{"name":"Twin","quote":"a","weight":1},{"name":"Twin","quote":"b","weight":2}"#,
        )]);
        let err = Catalog::from_json(&json).unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn unknown_tier_label_is_rejected() {
        let json = catalog_json(&[pool_json(
            "Uncommon",
            r#"{"name":"Meh","quote":"meh","weight":1}"#,
        )]);
        assert!(matches!(
            Catalog::from_json(&json).unwrap_err(),
            SummonError::UnknownTier(_)
        ));
    }

    #[test]
    fn unsupported_version_is_rejected() {
        let json = catalog_json(&[pool_json(
            "Mythic",
            r#"{"name":"Genezilla","quote":"m","weight":1}"#,
        )])
        .replace(r#""version":1"#, r#""version":7"#);
        let err = Catalog::from_json(&json).unwrap_err();
        assert!(err.to_string().contains("unsupported catalog version 7"));
    }

    #[test]
    fn builtin_catalog_is_valid() {
        let catalog = Catalog::builtin().unwrap();
        for tier in RarityTier::ALL {
            assert_eq!(catalog.pool(tier).len(), 5, "{tier} pool size");
        }
        assert_eq!(catalog.total_items(), 20);
        assert_eq!(catalog.iter().count(), 20);
        assert!(catalog.find(RarityTier::Mythic, "Genezilla").is_some());
    }

    #[test]
    fn fingerprint_tracks_content() {
        let catalog = Catalog::builtin().unwrap();
        let mut pools: [Vec<PoolItem>; 4] = Default::default();
        for tier in RarityTier::ALL {
            pools[tier.index()] = catalog.pool(tier).to_vec();
        }
        let same = Catalog::from_pools(pools.clone()).unwrap();
        assert_eq!(same.fingerprint(), catalog.fingerprint());

        pools[0][0].weight += 1;
        let changed = Catalog::from_pools(pools).unwrap();
        assert_ne!(changed.fingerprint(), catalog.fingerprint());
    }

    #[test]
    fn listing_serializes_canonical_tier_keys() {
        let listing = Catalog::builtin().unwrap().listing();
        let value = serde_json::to_value(&listing).unwrap();
        let tiers = value["tiers"].as_object().unwrap();
        let keys: Vec<&str> = tiers.keys().map(String::as_str).collect();
        assert_eq!(keys.len(), 4);
        assert!(tiers.contains_key("Mythic"));
        assert_eq!(value["fingerprint"].as_str().unwrap().len(), 16);
        assert_eq!(value["tierWeights"]["Common"], 50);
    }
}
