use std::path::PathBuf;
use thiserror::Error;

use crate::tier::RarityTier;

/// Errors raised by race resolution, pool draws and catalog loading.
#[derive(Debug, Error)]
pub enum SummonError {
    #[error("race sample {field} must be finite and within 0-100 (got {value})")]
    InvalidSample { field: &'static str, value: f64 },
    #[error("pool for {tier} is misconfigured: {reason}")]
    PoolConfiguration { tier: RarityTier, reason: String },
    #[error("unknown rarity tier \"{0}\"")]
    UnknownTier(String),
    #[error("catalog could not be parsed: {0}")]
    CatalogParse(#[from] serde_json::Error),
    #[error("catalog could not be read from {path}: {source}")]
    CatalogIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SummonError {
    pub(crate) fn pool(tier: RarityTier, reason: impl Into<String>) -> Self {
        Self::PoolConfiguration {
            tier,
            reason: reason.into(),
        }
    }

    /// Whether the failure was caused by caller input rather than configuration.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidSample { .. } | Self::UnknownTier(_))
    }
}
