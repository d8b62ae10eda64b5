use anyhow::{Context, Result};
use colored::Colorize;
use gene_summon_core::numbers::share;
use gene_summon_core::{
    Catalog, RarityTier, Spermdex, SummonEngine, SummonSession, expected_tier_shares,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use super::checks::CheckKind;

/// Expected vs observed share for one outcome of a check.
#[derive(Debug, Clone, Serialize)]
pub struct FrequencyRow {
    pub label: String,
    pub expected: f64,
    pub observed: f64,
}

impl FrequencyRow {
    pub fn deviation(&self) -> f64 {
        (self.observed - self.expected).abs()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    pub check: CheckKind,
    pub seed: u64,
    pub draws: usize,
    pub passed: bool,
    pub max_deviation: f64,
    pub rows: Vec<FrequencyRow>,
    pub failures: Vec<String>,
    #[serde(serialize_with = "serialize_millis")]
    pub duration: Duration,
}

fn serialize_millis<S: serde::Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(value.as_secs_f64() * 1000.0)
}

pub struct DistributionTester {
    engine: SummonEngine,
    draws: usize,
    tolerance: f64,
    verbose: bool,
}

impl DistributionTester {
    pub const fn new(engine: SummonEngine, draws: usize, tolerance: f64, verbose: bool) -> Self {
        Self {
            engine,
            draws,
            tolerance,
            verbose,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        self.engine.catalog()
    }

    pub fn run_checks(&self, checks: &[CheckKind], seeds: &[u64]) -> Result<Vec<CheckResult>> {
        let mut results = Vec::with_capacity(checks.len() * seeds.len());

        for &check in checks {
            for &seed in seeds {
                if self.verbose {
                    println!(
                        "🧪 Running check: {} (seed: {seed}, draws: {})",
                        check.key().bright_white(),
                        self.draws
                    );
                }
                let result = self.run_check(check, seed)?;
                log::debug!(
                    "check {} seed {seed}: passed={} max deviation {:.4}",
                    check.key(),
                    result.passed,
                    result.max_deviation
                );
                results.push(result);
            }
        }

        Ok(results)
    }

    pub fn run_check(&self, check: CheckKind, seed: u64) -> Result<CheckResult> {
        let start = Instant::now();
        let mut session = self.engine.session(seed);

        let (rows, failures) = match check {
            CheckKind::Pools => self.check_pools(&mut session)?,
            CheckKind::Tiers => self.check_tiers(&mut session)?,
            CheckKind::Race => self.check_race(&mut session)?,
            CheckKind::Odds => self.check_odds(&mut session)?,
            CheckKind::Collection => self.check_collection(&mut session)?,
        };

        let max_deviation = rows.iter().map(FrequencyRow::deviation).fold(0.0, f64::max);

        Ok(CheckResult {
            check,
            seed,
            draws: self.draws,
            passed: failures.is_empty(),
            max_deviation,
            rows,
            failures,
            duration: start.elapsed(),
        })
    }

    fn total_draws(&self) -> u64 {
        u64::try_from(self.draws).unwrap_or(u64::MAX)
    }

    /// Compare observed rows against the tolerance, returning failure messages.
    fn judge(&self, rows: &[FrequencyRow]) -> Vec<String> {
        rows.iter()
            .filter(|row| row.deviation() > self.tolerance)
            .map(|row| {
                format!(
                    "{}: observed {:.4}, expected {:.4} (tolerance {:.4})",
                    row.label, row.observed, row.expected, self.tolerance
                )
            })
            .collect()
    }

    fn check_pools(&self, session: &mut SummonSession) -> Result<(Vec<FrequencyRow>, Vec<String>)> {
        let mut rows = Vec::new();

        for tier in RarityTier::ALL {
            let pool = self.catalog().pool(tier);
            let total_weight: u64 = pool.iter().map(|item| u64::from(item.weight)).sum();
            let mut counts: BTreeMap<String, u64> = BTreeMap::new();

            for _ in 0..self.draws {
                let card = session
                    .summon(tier)
                    .with_context(|| format!("summoning from {tier} pool"))?;
                *counts.entry(card.name).or_default() += 1;
            }

            rows.extend(pool.iter().map(|item| FrequencyRow {
                label: format!("{tier}/{}", item.name),
                expected: share(u64::from(item.weight), total_weight),
                observed: share(
                    counts.get(&item.name).copied().unwrap_or_default(),
                    self.total_draws(),
                ),
            }));
        }

        let failures = self.judge(&rows);
        Ok((rows, failures))
    }

    fn check_tiers(&self, session: &mut SummonSession) -> Result<(Vec<FrequencyRow>, Vec<String>)> {
        let mut counts = [0_u64; 4];
        for _ in 0..self.draws {
            let card = session.summon_any().context("legacy summon")?;
            counts[card.rarity.index()] += 1;
        }

        let weights = self.catalog().tier_weights();
        let total_weight: u64 = weights.iter().copied().map(u64::from).sum();
        let rows = tier_rows(
            &counts,
            |tier| share(u64::from(weights[tier.index()]), total_weight),
            self.total_draws(),
            "",
        );
        let failures = self.judge(&rows);
        Ok((rows, failures))
    }

    fn check_race(&self, session: &mut SummonSession) -> Result<(Vec<FrequencyRow>, Vec<String>)> {
        let mut counts = [0_u64; 4];
        for _ in 0..self.draws {
            let race = session.run_race().context("rolling race")?;
            counts[race.capsule_tier.index()] += 1;
        }

        let expected = expected_tier_shares();
        let rows = tier_rows(
            &counts,
            |tier| expected[tier.index()],
            self.total_draws(),
            "",
        );
        let failures = self.judge(&rows);
        Ok((rows, failures))
    }

    fn check_odds(&self, session: &mut SummonSession) -> Result<(Vec<FrequencyRow>, Vec<String>)> {
        let mut rows = Vec::new();

        for capsule in RarityTier::ALL {
            let mut counts = [0_u64; 4];
            for _ in 0..self.draws {
                let card = session
                    .summon_with_odds(capsule)
                    .with_context(|| format!("capsule-odds summon for {capsule}"))?;
                counts[card.rarity.index()] += 1;
            }

            let row = self.catalog().capsule_odds().row(capsule);
            let total_weight: u64 = row.iter().copied().map(u64::from).sum();
            rows.extend(tier_rows(
                &counts,
                |tier| share(u64::from(row[tier.index()]), total_weight),
                self.total_draws(),
                &format!("{capsule} capsule → "),
            ));
        }

        let failures = self.judge(&rows);
        Ok((rows, failures))
    }

    fn check_collection(
        &self,
        session: &mut SummonSession,
    ) -> Result<(Vec<FrequencyRow>, Vec<String>)> {
        let catalog = session.catalog().clone();
        let mut dex = Spermdex::new();

        for _ in 0..self.draws {
            dex.record(session.summon_any().context("legacy summon")?);
            if dex.unique_count() == catalog.total_items() {
                break;
            }
        }

        let rows: Vec<FrequencyRow> = RarityTier::ALL
            .into_iter()
            .map(|tier| {
                let pool = catalog.pool(tier);
                let collected = pool
                    .iter()
                    .filter(|item| dex.is_collected(tier, &item.name))
                    .count();
                FrequencyRow {
                    label: format!("{tier} collected"),
                    expected: 1.0,
                    observed: share(
                        u64::try_from(collected).unwrap_or_default(),
                        u64::try_from(pool.len()).unwrap_or_default(),
                    ),
                }
            })
            .collect();

        let completion = dex.completion(&catalog);
        let mut failures = Vec::new();
        if completion.collected < completion.total {
            let missing: Vec<String> = catalog
                .iter()
                .filter(|(tier, item)| !dex.is_collected(*tier, &item.name))
                .map(|(tier, item)| format!("{tier}/{}", item.name))
                .collect();
            failures.push(format!(
                "collected {}/{} cards after {} draws; missing {}",
                completion.collected,
                completion.total,
                dex.len(),
                missing.join(", ")
            ));
        }

        Ok((rows, failures))
    }
}

fn tier_rows(
    counts: &[u64; 4],
    expected: impl Fn(RarityTier) -> f64,
    total: u64,
    prefix: &str,
) -> Vec<FrequencyRow> {
    RarityTier::ALL
        .into_iter()
        .map(|tier| FrequencyRow {
            label: format!("{prefix}{tier}"),
            expected: expected(tier),
            observed: share(counts[tier.index()], total),
        })
        .collect()
}
