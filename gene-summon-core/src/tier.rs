//! Rarity tiers and their display metadata.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SummonError;

/// Discrete quality band of a capsule or card, ordered by desirability.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(try_from = "String")]
pub enum RarityTier {
    #[default]
    Common,
    Rare,
    Epic,
    Mythic,
}

impl RarityTier {
    pub const ALL: [Self; 4] = [Self::Common, Self::Rare, Self::Epic, Self::Mythic];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Common => "Common",
            Self::Rare => "Rare",
            Self::Epic => "Epic",
            Self::Mythic => "Mythic",
        }
    }

    /// Position in [`RarityTier::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Common => 0,
            Self::Rare => 1,
            Self::Epic => 2,
            Self::Mythic => 3,
        }
    }

    /// Hex color used by card frames and glow effects.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Common => "#9ca3af",
            Self::Rare => "#3b82f6",
            Self::Epic => "#8b5cf6",
            Self::Mythic => "#facc15",
        }
    }

    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Common => "⚪",
            Self::Rare => "🔵",
            Self::Epic => "🟣",
            Self::Mythic => "🟡",
        }
    }

    /// Normalize a tier label, folding the legacy `Legendary` name into `Mythic`.
    ///
    /// # Errors
    ///
    /// Returns [`SummonError::UnknownTier`] for anything outside the known names.
    pub fn parse(label: &str) -> Result<Self, SummonError> {
        let trimmed = label.trim();
        Self::ALL
            .into_iter()
            .find(|tier| tier.name().eq_ignore_ascii_case(trimmed))
            .or_else(|| trimmed.eq_ignore_ascii_case("legendary").then_some(Self::Mythic))
            .ok_or_else(|| SummonError::UnknownTier(label.to_string()))
    }
}

impl fmt::Display for RarityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RarityTier {
    type Err = SummonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for RarityTier {
    type Error = SummonError;

    fn try_from(label: String) -> Result<Self, Self::Error> {
        Self::parse(&label)
    }
}
