/// Which end of the sequence the engine anchors to.
///
/// `Trailing` is the chat/log shape: the initial seed starts at the end of
/// the sequence and short content hugs the trailing edge of the viewport.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Alignment {
    #[default]
    Leading,
    Trailing,
}

/// Mount position relative to the already-mounted window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Edge {
    Leading,
    Trailing,
}

/// The index range currently intersecting the viewport.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VisibleRange {
    pub start: usize,
    /// Exclusive.
    pub end: usize,
    /// Total sequence length at the time of the pass.
    pub count: usize,
}

impl VisibleRange {
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn contains(&self, index: usize) -> bool {
        index >= self.start && index < self.end
    }
}

/// Placeholder extents standing in for unmaterialized sequence content.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Spacers {
    pub lead: u64,
    pub trail: u64,
}

/// What happens to materialized items that leave the lookahead region.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EvictionPolicy {
    /// The window only grows. No node is ever unmounted, so previously
    /// visible content never needs re-materialization; memory grows with
    /// total scroll distance.
    #[default]
    AppendOnly,
    /// Nodes whose index falls outside `[visible.start - margin,
    /// visible.end + margin)` are unmounted. Their height records are
    /// retained, so re-entry reuses the cached extent.
    Sliding {
        /// Retain margin, in items, on each side of the visible range.
        margin: usize,
    },
}

/// How spacer extents are derived.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpacerMode {
    /// Sum cached extents on each side of the window. Scrollbar geometry is
    /// exact to within measurement accuracy.
    #[default]
    Precise,
    /// Emit `factor * viewport_extent` per side with unmaterialized content,
    /// `0` otherwise. `O(1)`, but positionally meaningless: it only keeps the
    /// scrollbar capable of emitting further scroll events.
    FixedFiller { factor: u32 },
}
