use core::fmt;

/// Fatal configuration errors reported at construction.
///
/// Runtime misuse (stale indices, zero measurements) degrades to no-ops
/// instead; only an engine that could never run correctly refuses to start.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// `estimated_item_extent` must be positive: it is the fallback extent
    /// for every unmeasured item.
    ZeroEstimatedExtent,
    /// `batch_size` must be positive: expansion materializes in batches.
    ZeroBatchSize,
    /// `expansion_threshold_factor` must be a finite, positive number of
    /// viewport-extents.
    InvalidThreshold,
    /// `SpacerMode::FixedFiller` requires a positive filler factor.
    ZeroFillerFactor,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroEstimatedExtent => write!(f, "estimated_item_extent must be > 0"),
            Self::ZeroBatchSize => write!(f, "batch_size must be > 0"),
            Self::InvalidThreshold => {
                write!(f, "expansion_threshold_factor must be finite and > 0")
            }
            Self::ZeroFillerFactor => write!(f, "fixed-filler spacer factor must be > 0"),
        }
    }
}

impl core::error::Error for ConfigError {}
