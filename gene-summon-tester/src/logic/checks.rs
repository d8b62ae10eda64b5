use serde::Serialize;

/// Statistical checks the tester knows how to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CheckKind {
    Pools,
    Tiers,
    Race,
    Odds,
    Collection,
}

impl CheckKind {
    pub const ALL: [Self; 5] = [
        Self::Pools,
        Self::Tiers,
        Self::Race,
        Self::Odds,
        Self::Collection,
    ];

    pub const fn key(self) -> &'static str {
        match self {
            Self::Pools => "pools",
            Self::Tiers => "tiers",
            Self::Race => "race",
            Self::Odds => "odds",
            Self::Collection => "collection",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::Pools => "Per-tier card frequencies match pool weights",
            Self::Tiers => "Legacy tier-less draws match catalog tier weights",
            Self::Race => "Race tiers match the theoretical three-roll distribution",
            Self::Odds => "Capsule-odds rarities match each capsule's odds row",
            Self::Collection => "Legacy draws eventually collect every catalog card",
        }
    }

    pub fn parse(key: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.key().eq_ignore_ascii_case(key.trim()))
    }
}

/// Expand CLI check names, honoring `all`. Unknown names are returned separately.
pub fn expand_checks(names: &[String]) -> (Vec<CheckKind>, Vec<String>) {
    let mut checks = Vec::new();
    let mut unknown = Vec::new();

    for name in names {
        if name.eq_ignore_ascii_case("all") {
            for kind in CheckKind::ALL {
                if !checks.contains(&kind) {
                    checks.push(kind);
                }
            }
            continue;
        }
        match CheckKind::parse(name) {
            Some(kind) if !checks.contains(&kind) => checks.push(kind),
            Some(_) => {}
            None => unknown.push(name.clone()),
        }
    }

    (checks, unknown)
}

pub fn list_checks() -> Vec<(&'static str, &'static str)> {
    CheckKind::ALL
        .into_iter()
        .map(|kind| (kind.key(), kind.description()))
        .collect()
}
