use alloc::collections::VecDeque;
use core::ops::Range;

use crate::bridge::RenderBridge;
use crate::heights::HeightCache;
use crate::options::EngineOptions;
use crate::store::ItemStore;
use crate::{Edge, VisibleRange};

/// Lifecycle of the materialized window.
///
/// `Empty → Seeding → Steady ⇄ Expanding(Up|Down) → Steady`; the window
/// returns to `Empty` on data reset or teardown.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Phase {
    Empty,
    Seeding,
    Steady,
    ExpandingUp,
    ExpandingDown,
}

/// Owns the materialized index range `[start, end)` and its node handles.
///
/// Invariant: `0 <= start <= end <= item count`, and `nodes.len() == end -
/// start`. `nodes[k]` is the handle for index `start + k`. Only the engine
/// mutates the window, always from its own scheduling context.
#[derive(Debug)]
pub(crate) struct WindowTracker<H> {
    start: usize,
    end: usize,
    phase: Phase,
    nodes: VecDeque<H>,
}

impl<H> WindowTracker<H> {
    pub(crate) fn new() -> Self {
        Self {
            start: 0,
            end: 0,
            phase: Phase::Empty,
            nodes: VecDeque::new(),
        }
    }

    pub(crate) fn start(&self) -> usize {
        self.start
    }

    pub(crate) fn end(&self) -> usize {
        self.end
    }

    pub(crate) fn phase(&self) -> Phase {
        self.phase
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.phase == Phase::Empty || self.start == self.end
    }

    pub(crate) fn contains(&self, index: usize) -> bool {
        self.phase != Phase::Empty && index >= self.start && index < self.end
    }

    /// Unmounts everything and returns to `Empty`.
    pub(crate) fn clear<T, B>(&mut self, bridge: &mut B)
    where
        B: RenderBridge<T, Handle = H>,
    {
        for handle in self.nodes.drain(..) {
            bridge.unmount(&handle);
        }
        self.start = 0;
        self.end = 0;
        self.phase = Phase::Empty;
    }

    /// Materializes, measures, and mounts one contiguous run at an edge.
    ///
    /// For the leading edge the run is mounted back-to-front so the final
    /// mounted order matches index order.
    fn materialize_run<T, B>(
        &mut self,
        range: Range<usize>,
        edge: Edge,
        heights: &mut HeightCache,
        store: &ItemStore<T>,
        bridge: &mut B,
    ) where
        B: RenderBridge<T, Handle = H>,
    {
        let count = store.len();
        match edge {
            Edge::Trailing => {
                for index in range {
                    let Some(item) = store.get(index) else { break };
                    let handle = bridge.materialize(item, index, count);
                    let extent = bridge.measure(&handle);
                    heights.set(index, extent);
                    bridge.mount(&handle, Edge::Trailing);
                    self.nodes.push_back(handle);
                    self.end = index + 1;
                }
            }
            Edge::Leading => {
                for index in range.rev() {
                    let Some(item) = store.get(index) else { break };
                    let handle = bridge.materialize(item, index, count);
                    let extent = bridge.measure(&handle);
                    heights.set(index, extent);
                    bridge.mount(&handle, Edge::Leading);
                    self.nodes.push_front(handle);
                    self.start = index;
                }
            }
        }
    }

    /// Establishes a window covering `target_offset` (content coordinates)
    /// plus one viewport and the downward lookahead buffer.
    ///
    /// The starting index is the item whose cached span crosses the target
    /// offset; ties resolve by overshoot through the prefix-sum lower bound.
    pub(crate) fn seed_at_offset<T, B>(
        &mut self,
        target_offset: u64,
        viewport_extent: u32,
        heights: &mut HeightCache,
        store: &ItemStore<T>,
        bridge: &mut B,
        opts: &EngineOptions,
    ) where
        B: RenderBridge<T, Handle = H>,
    {
        debug_assert!(self.nodes.is_empty(), "seed over a live window");
        self.phase = Phase::Seeding;
        let count = store.len();
        let start = heights.index_at_offset(target_offset).min(count);
        self.start = start;
        self.end = start;

        let into_item = target_offset.saturating_sub(heights.extent_before(start));
        let needed = into_item
            .saturating_add(viewport_extent as u64)
            .saturating_add(opts.lookahead(viewport_extent));
        self.fill_down(needed, heights, store, bridge, opts);
        self.phase = Phase::Steady;
        wdebug!(
            start = self.start,
            end = self.end,
            target_offset,
            "seeded window at offset"
        );
    }

    /// Establishes a window anchored at `index`, filling forward one
    /// viewport plus lookahead, and (optionally) backward one lookahead.
    pub(crate) fn seed_at_index<T, B>(
        &mut self,
        index: usize,
        backward: bool,
        viewport_extent: u32,
        heights: &mut HeightCache,
        store: &ItemStore<T>,
        bridge: &mut B,
        opts: &EngineOptions,
    ) where
        B: RenderBridge<T, Handle = H>,
    {
        debug_assert!(self.nodes.is_empty(), "seed over a live window");
        self.phase = Phase::Seeding;
        let count = store.len();
        let index = index.min(count);
        self.start = index;
        self.end = index;

        let lookahead = opts.lookahead(viewport_extent);
        let needed = (viewport_extent as u64).saturating_add(lookahead);
        self.fill_down(needed, heights, store, bridge, opts);
        if backward {
            self.fill_up_to(lookahead, index, heights, store, bridge, opts);
        }
        self.phase = Phase::Steady;
        wdebug!(start = self.start, end = self.end, index, "seeded window at index");
    }

    /// Establishes a window covering the trailing end of the sequence.
    pub(crate) fn seed_trailing<T, B>(
        &mut self,
        viewport_extent: u32,
        heights: &mut HeightCache,
        store: &ItemStore<T>,
        bridge: &mut B,
        opts: &EngineOptions,
    ) where
        B: RenderBridge<T, Handle = H>,
    {
        debug_assert!(self.nodes.is_empty(), "seed over a live window");
        self.phase = Phase::Seeding;
        let count = store.len();
        self.start = count;
        self.end = count;

        let needed = (viewport_extent as u64).saturating_add(opts.lookahead(viewport_extent));
        self.fill_up_to(needed, count, heights, store, bridge, opts);
        self.phase = Phase::Steady;
        wdebug!(start = self.start, end = self.end, "seeded trailing window");
    }

    /// Appends batches after `end` until the materialized bottom clears the
    /// downward lookahead threshold or the sequence is exhausted.
    ///
    /// `anchor_offset` is the viewport top in content coordinates. Returns
    /// `true` when any item was materialized.
    pub(crate) fn expand_down<T, B>(
        &mut self,
        anchor_offset: u64,
        viewport_extent: u32,
        heights: &mut HeightCache,
        store: &ItemStore<T>,
        bridge: &mut B,
        opts: &EngineOptions,
    ) -> bool
    where
        B: RenderBridge<T, Handle = H>,
    {
        let count = store.len();
        let threshold = anchor_offset
            .saturating_add(viewport_extent as u64)
            .saturating_add(opts.lookahead(viewport_extent));
        let mut changed = false;
        while self.end < count && heights.extent_before(self.end) < threshold {
            self.phase = Phase::ExpandingDown;
            let to = (self.end + opts.batch_size).min(count);
            self.materialize_run(self.end..to, Edge::Trailing, heights, store, bridge);
            changed = true;
        }
        if changed {
            self.phase = Phase::Steady;
            wtrace!(start = self.start, end = self.end, "expanded down");
        }
        changed
    }

    /// Prepends batches before `start` until the materialized top clears the
    /// upward lookahead threshold or index 0 is reached.
    ///
    /// Returns `true` when any item was materialized. The caller is
    /// responsible for the no-jump scroll compensation: content mounted above
    /// the viewport moves the host's content extent, and the engine folds
    /// that delta back into the scroll offset.
    pub(crate) fn expand_up<T, B>(
        &mut self,
        anchor_offset: u64,
        viewport_extent: u32,
        heights: &mut HeightCache,
        store: &ItemStore<T>,
        bridge: &mut B,
        opts: &EngineOptions,
    ) -> bool
    where
        B: RenderBridge<T, Handle = H>,
    {
        let threshold = anchor_offset.saturating_sub(opts.lookahead(viewport_extent));
        let mut changed = false;
        while self.start > 0 && heights.extent_before(self.start) > threshold {
            self.phase = Phase::ExpandingUp;
            let from = self.start.saturating_sub(opts.batch_size);
            self.materialize_run(from..self.start, Edge::Leading, heights, store, bridge);
            changed = true;
        }
        if changed {
            self.phase = Phase::Steady;
            wtrace!(start = self.start, end = self.end, "expanded up");
        }
        changed
    }

    /// Materializes forward in batch-sized chunks, rechecking the accumulated
    /// extent per item so the window stops on the item whose measured span
    /// crosses `needed`.
    fn fill_down<T, B>(
        &mut self,
        needed: u64,
        heights: &mut HeightCache,
        store: &ItemStore<T>,
        bridge: &mut B,
        opts: &EngineOptions,
    ) where
        B: RenderBridge<T, Handle = H>,
    {
        let count = store.len();
        'chunks: while self.end < count && heights.range_extent(self.start, self.end) < needed {
            let to = (self.end + opts.batch_size).min(count);
            while self.end < to {
                if heights.range_extent(self.start, self.end) >= needed {
                    break 'chunks;
                }
                let at = self.end;
                self.materialize_run(at..at + 1, Edge::Trailing, heights, store, bridge);
            }
        }
    }

    /// Backward counterpart of `fill_down`, accumulating extent between
    /// `start` and the fixed `anchor` index.
    fn fill_up_to<T, B>(
        &mut self,
        lookahead: u64,
        anchor: usize,
        heights: &mut HeightCache,
        store: &ItemStore<T>,
        bridge: &mut B,
        opts: &EngineOptions,
    ) where
        B: RenderBridge<T, Handle = H>,
    {
        'chunks: while self.start > 0 && heights.range_extent(self.start, anchor) < lookahead {
            let from = self.start.saturating_sub(opts.batch_size);
            while self.start > from {
                if heights.range_extent(self.start, anchor) >= lookahead {
                    break 'chunks;
                }
                let at = self.start - 1;
                self.materialize_run(at..at + 1, Edge::Leading, heights, store, bridge);
            }
        }
    }

    /// Unmounts nodes outside `[visible.start - margin, visible.end +
    /// margin)`, retaining their height records. Returns `true` when the
    /// window shrank.
    pub(crate) fn evict_outside<T, B>(
        &mut self,
        visible: VisibleRange,
        margin: usize,
        bridge: &mut B,
    ) -> bool
    where
        B: RenderBridge<T, Handle = H>,
    {
        if self.phase == Phase::Empty {
            return false;
        }
        let keep_start = visible.start.saturating_sub(margin).max(self.start);
        let keep_end = visible.end.saturating_add(margin).min(self.end);
        if keep_start >= keep_end {
            return false;
        }

        let mut changed = false;
        while self.start < keep_start {
            if let Some(handle) = self.nodes.pop_front() {
                bridge.unmount(&handle);
            }
            self.start += 1;
            changed = true;
        }
        while self.end > keep_end {
            if let Some(handle) = self.nodes.pop_back() {
                bridge.unmount(&handle);
            }
            self.end -= 1;
            changed = true;
        }
        if changed {
            wtrace!(start = self.start, end = self.end, "evicted outside margin");
        }
        changed
    }

    /// Surgically removes the materialized slot at `index` after the item was
    /// removed from the store (indices above have already shifted down), then
    /// backfills one item from the nearer open edge, preferring trailing.
    pub(crate) fn remove_at<T, B>(
        &mut self,
        index: usize,
        heights: &mut HeightCache,
        store: &ItemStore<T>,
        bridge: &mut B,
    ) where
        B: RenderBridge<T, Handle = H>,
    {
        if !self.contains(index) {
            return;
        }
        if let Some(handle) = self.nodes.remove(index - self.start) {
            bridge.unmount(&handle);
        }
        self.end -= 1;

        if self.end < store.len() {
            let at = self.end;
            self.materialize_run(at..at + 1, Edge::Trailing, heights, store, bridge);
        } else if self.start > 0 {
            let at = self.start - 1;
            self.materialize_run(at..at + 1, Edge::Leading, heights, store, bridge);
        }
    }

    /// Re-renders the slot at `index` in place.
    ///
    /// The bridge only mounts at edges, so the tail of the window is
    /// detached, the slot's node is rebuilt, and the tail handles are
    /// remounted in order. Only the one slot is rematerialized.
    pub(crate) fn replace_at<T, B>(
        &mut self,
        index: usize,
        heights: &mut HeightCache,
        store: &ItemStore<T>,
        bridge: &mut B,
    ) where
        B: RenderBridge<T, Handle = H>,
    {
        if !self.contains(index) {
            return;
        }
        let k = index - self.start;
        for handle in self.nodes.iter().skip(k) {
            bridge.unmount(handle);
        }

        let Some(item) = store.get(index) else { return };
        let handle = bridge.materialize(item, index, store.len());
        let extent = bridge.measure(&handle);
        heights.invalidate(index);
        heights.set(index, extent);
        self.nodes[k] = handle;

        for handle in self.nodes.iter().skip(k) {
            bridge.mount(handle, Edge::Trailing);
        }
    }

    /// Re-reads the extent of every slot still flagged unmeasured.
    ///
    /// Returns `true` when any cached extent changed. This is the settle
    /// half of the measurement protocol: hosts that had not finalized layout
    /// at mount time report real extents one frame later.
    pub(crate) fn remeasure<T, B>(&mut self, heights: &mut HeightCache, bridge: &mut B) -> bool
    where
        B: RenderBridge<T, Handle = H>,
    {
        let mut changed = false;
        for (index, handle) in self.nodes.iter().enumerate() {
            let index = self.start + index;
            if heights.is_measured(index) {
                continue;
            }
            let extent = bridge.measure(handle);
            if extent != 0 && extent != heights.get(index) {
                changed = true;
            }
            heights.set(index, extent);
        }
        changed
    }

    /// Shifts window bounds for an insertion at `at` outside the window.
    pub(crate) fn shift_for_insert(&mut self, at: usize) {
        self.shift_for_insert_many(at, 1);
    }

    /// Shifts window bounds for `n` insertions at `at` outside the window.
    pub(crate) fn shift_for_insert_many(&mut self, at: usize, n: usize) {
        if self.phase == Phase::Empty {
            return;
        }
        if at <= self.start {
            self.start += n;
            self.end += n;
        }
    }

    /// Shifts window bounds for a removal at `at` outside the window.
    pub(crate) fn shift_for_remove(&mut self, at: usize) {
        if self.phase == Phase::Empty {
            return;
        }
        if at < self.start {
            self.start -= 1;
            self.end -= 1;
        }
    }
}
