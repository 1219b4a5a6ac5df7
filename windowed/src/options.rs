use alloc::sync::Arc;

use crate::{Alignment, ConfigError, EvictionPolicy, SpacerMode, VisibleRange};

/// A callback fired after a layout pass whose visible range differs from the
/// previous pass.
pub type OnVisibleRangeCallback = Arc<dyn Fn(VisibleRange) + Send + Sync>;

/// Configuration for [`crate::Engine`].
///
/// Cheap to clone: the callback is behind an `Arc`.
pub struct EngineOptions {
    /// Fallback extent, in pixels, for items that have never been measured.
    pub estimated_item_extent: u32,

    /// Lookahead buffer on each side of the viewport, in viewport-extents.
    ///
    /// Expansion keeps `threshold * viewport_extent` of materialized content
    /// beyond each viewport edge (where the sequence allows).
    pub expansion_threshold_factor: f32,

    /// Items materialized per expansion step.
    pub batch_size: usize,

    /// Which end of the sequence the engine anchors to.
    pub alignment: Alignment,

    /// What happens to materialized items that leave the lookahead region.
    pub eviction: EvictionPolicy,

    /// How spacer extents are derived.
    pub spacer_mode: SpacerMode,

    /// Tolerance, in pixels, for the edge-proximity queries
    /// (`is_at_top`/`is_at_bottom`) when none is passed explicitly.
    pub edge_tolerance: u64,

    /// Optional visible-range change notification.
    pub on_visible_range: Option<OnVisibleRangeCallback>,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            estimated_item_extent: 50,
            expansion_threshold_factor: 2.0,
            batch_size: 16,
            alignment: Alignment::Leading,
            eviction: EvictionPolicy::AppendOnly,
            spacer_mode: SpacerMode::Precise,
            edge_tolerance: 2,
            on_visible_range: None,
        }
    }
}

impl EngineOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_estimated_item_extent(mut self, extent: u32) -> Self {
        self.estimated_item_extent = extent;
        self
    }

    pub fn with_expansion_threshold_factor(mut self, factor: f32) -> Self {
        self.expansion_threshold_factor = factor;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn with_eviction(mut self, eviction: EvictionPolicy) -> Self {
        self.eviction = eviction;
        self
    }

    pub fn with_spacer_mode(mut self, spacer_mode: SpacerMode) -> Self {
        self.spacer_mode = spacer_mode;
        self
    }

    pub fn with_edge_tolerance(mut self, tolerance: u64) -> Self {
        self.edge_tolerance = tolerance;
        self
    }

    pub fn with_on_visible_range(
        mut self,
        f: Option<impl Fn(VisibleRange) + Send + Sync + 'static>,
    ) -> Self {
        self.on_visible_range = f.map(|f| Arc::new(f) as _);
        self
    }

    /// Rejects configurations the engine could not run correctly with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.estimated_item_extent == 0 {
            return Err(ConfigError::ZeroEstimatedExtent);
        }
        if self.batch_size == 0 {
            return Err(ConfigError::ZeroBatchSize);
        }
        if !self.expansion_threshold_factor.is_finite() || self.expansion_threshold_factor <= 0.0 {
            return Err(ConfigError::InvalidThreshold);
        }
        if let SpacerMode::FixedFiller { factor: 0 } = self.spacer_mode {
            return Err(ConfigError::ZeroFillerFactor);
        }
        Ok(())
    }

    /// Lookahead extent in pixels for a given viewport.
    pub(crate) fn lookahead(&self, viewport_extent: u32) -> u64 {
        let px = self.expansion_threshold_factor * viewport_extent as f32;
        px.max(0.0) as u64
    }
}

impl Clone for EngineOptions {
    fn clone(&self) -> Self {
        Self {
            estimated_item_extent: self.estimated_item_extent,
            expansion_threshold_factor: self.expansion_threshold_factor,
            batch_size: self.batch_size,
            alignment: self.alignment,
            eviction: self.eviction,
            spacer_mode: self.spacer_mode,
            edge_tolerance: self.edge_tolerance,
            on_visible_range: self.on_visible_range.clone(),
        }
    }
}

impl core::fmt::Debug for EngineOptions {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EngineOptions")
            .field("estimated_item_extent", &self.estimated_item_extent)
            .field(
                "expansion_threshold_factor",
                &self.expansion_threshold_factor,
            )
            .field("batch_size", &self.batch_size)
            .field("alignment", &self.alignment)
            .field("eviction", &self.eviction)
            .field("spacer_mode", &self.spacer_mode)
            .field("edge_tolerance", &self.edge_tolerance)
            .finish_non_exhaustive()
    }
}
