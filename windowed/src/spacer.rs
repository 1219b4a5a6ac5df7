use crate::heights::HeightCache;
use crate::{Alignment, SpacerMode, Spacers};

/// Computes the placeholder extents for content outside `[start, end)`.
///
/// Precise mode sums cached extents through the height cache's prefix-sum
/// structure, so the cost is `O(log n)` per call rather than a rescan.
/// Fixed-filler mode emits a constant `factor * viewport_extent` on any side
/// that still has unmaterialized content.
pub(crate) fn compute_spacers(
    heights: &HeightCache,
    start: usize,
    end: usize,
    count: usize,
    viewport_extent: u32,
    alignment: Alignment,
    mode: SpacerMode,
) -> Spacers {
    let mut spacers = match mode {
        SpacerMode::Precise => Spacers {
            lead: heights.extent_before(start),
            trail: heights.range_extent(end, count),
        },
        SpacerMode::FixedFiller { factor } => {
            let filler = factor as u64 * viewport_extent as u64;
            Spacers {
                lead: if start > 0 { filler } else { 0 },
                trail: if end < count { filler } else { 0 },
            }
        }
    };

    // Trailing alignment with the whole sequence materialized and shorter
    // than the viewport: pad the lead so content hugs the trailing edge.
    if alignment == Alignment::Trailing && start == 0 && end == count {
        let materialized = heights.range_extent(start, end);
        let viewport = viewport_extent as u64;
        if materialized < viewport {
            spacers.lead = spacers.lead.saturating_add(viewport - materialized);
        }
    }

    spacers
}
