use alloc::vec::Vec;

use crate::bridge::RenderBridge;
use crate::heights::HeightCache;
use crate::options::EngineOptions;
use crate::spacer::compute_spacers;
use crate::store::ItemStore;
use crate::window::{Phase, WindowTracker};
use crate::{Alignment, ConfigError, EvictionPolicy, Spacers, VisibleRange};

/// Deferred work that must wait for the host to apply layout before it can
/// finish. One slot: scheduling a new settle supersedes a pending one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Settle {
    /// Re-read extents of slots the host had not laid out at mount time.
    Remeasure,
    /// Second half of the two-frame jump protocol: recompute and reapply the
    /// target offset once host layout is final.
    Reapply { index: usize, align: Alignment },
}

/// The windowed-rendering engine.
///
/// Renders an arbitrarily long sequence by materializing only a contiguous
/// window of items through a [`RenderBridge`], while spacers and scroll
/// compensation make the viewport behave as if the full sequence were
/// present.
///
/// The engine is single-threaded and cooperatively scheduled: the host feeds
/// it scroll signals via [`Engine::on_scroll`] and frame boundaries via
/// [`Engine::on_frame`] (in response to [`RenderBridge::request_frame`]).
/// Mutations apply synchronously; wrap several in
/// [`Engine::begin_batch`]/[`Engine::end_batch`] to get exactly one layout
/// pass.
pub struct Engine<T, B: RenderBridge<T>> {
    bridge: B,
    store: ItemStore<T>,
    heights: HeightCache,
    window: WindowTracker<B::Handle>,
    options: EngineOptions,

    /// Spacers as last applied to the host; used to translate between host
    /// scroll offsets and content coordinates.
    applied: Spacers,

    pending_scroll: Option<u64>,
    pending_settle: Option<Settle>,
    pass_requested: bool,
    /// Last offset this engine wrote itself. The next scroll signal carrying
    /// exactly this value is the host echoing our own write and is dropped.
    programmatic_echo: Option<u64>,

    batch_depth: usize,
    batch_pending: bool,

    last_visible: VisibleRange,
    disposed: bool,
}

impl<T, B: RenderBridge<T>> Engine<T, B> {
    /// Creates an engine over `items`, driven through `bridge`.
    ///
    /// The window is seeded on the first frame the host delivers. Invalid
    /// configuration is a fatal error: the engine refuses to start rather
    /// than run half-configured.
    pub fn new(items: Vec<T>, bridge: B, options: EngineOptions) -> Result<Self, ConfigError> {
        options.validate()?;
        let count = items.len();
        let mut engine = Self {
            bridge,
            heights: HeightCache::new(count, options.estimated_item_extent),
            store: ItemStore::new(items),
            window: WindowTracker::new(),
            options,
            applied: Spacers::default(),
            pending_scroll: None,
            pending_settle: None,
            pass_requested: false,
            programmatic_echo: None,
            batch_depth: 0,
            batch_pending: false,
            last_visible: VisibleRange::default(),
            disposed: false,
        };
        wdebug!(count, "Engine::new");
        engine.request_pass();
        Ok(engine)
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn bridge(&self) -> &B {
        &self.bridge
    }

    pub fn bridge_mut(&mut self) -> &mut B {
        &mut self.bridge
    }

    pub fn heights(&self) -> &HeightCache {
        &self.heights
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.store.get(index)
    }

    /// The materialized index range `[start, end)`.
    pub fn materialized_range(&self) -> (usize, usize) {
        (self.window.start(), self.window.end())
    }

    /// The visible range as of the last completed layout pass.
    pub fn visible_range(&self) -> VisibleRange {
        self.last_visible
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    // ---- host entry points ----------------------------------------------

    /// Feeds a host scroll signal. Coalesced: only the latest offset before
    /// the next frame is processed. Echoes of the engine's own programmatic
    /// offset writes are suppressed.
    pub fn on_scroll(&mut self, offset: u64) {
        if self.disposed {
            return;
        }
        if self.programmatic_echo == Some(offset) {
            self.programmatic_echo = None;
            return;
        }
        wtrace!(offset, "on_scroll");
        self.pending_scroll = Some(offset);
        self.bridge.request_frame();
    }

    /// Delivers a frame boundary. Runs at most one settle step and at most
    /// one layout pass.
    pub fn on_frame(&mut self) {
        if self.disposed {
            return;
        }
        // An echo not consumed by now is stale; expire it so a later user
        // scroll landing on the same value is not dropped. Writes made during
        // this frame re-arm the slot below.
        self.programmatic_echo = None;
        if let Some(settle) = self.pending_settle.take() {
            self.run_settle(settle);
        }
        let scrolled = self.pending_scroll.take().is_some();
        let requested = core::mem::take(&mut self.pass_requested);
        if scrolled || requested {
            self.layout_pass();
        }
    }

    // ---- public surface --------------------------------------------------

    /// Replaces the whole sequence: clears the window and height cache and
    /// resets the scroll position to the aligned start.
    pub fn set_items(&mut self, items: Vec<T>) {
        if self.disposed {
            return;
        }
        self.window.clear::<T, B>(&mut self.bridge);
        self.store.replace_all(items);
        self.heights.reset(self.store.len());
        self.applied = Spacers::default();
        self.set_offset_programmatic(0);
        self.layout_pass();
    }

    /// Replaces one item. Materialized slots are re-rendered and remeasured
    /// in place; others only have their height record invalidated, deferring
    /// the change until the slot is next materialized.
    pub fn set_item(&mut self, index: usize, item: T) {
        if self.disposed {
            return;
        }
        if index >= self.store.len() {
            wwarn!(index, count = self.store.len(), "set_item: out-of-range index");
            return;
        }
        self.store.set(index, item);
        if self.window.contains(index) {
            self.window
                .replace_at(index, &mut self.heights, &self.store, &mut self.bridge);
            self.schedule_settle(Settle::Remeasure);
        } else {
            self.heights.invalidate(index);
        }
        self.layout_pass();
    }

    /// Inserts at `index` (`index == len` appends). Boundary and
    /// outside-window insertions shift the height cache and window bounds
    /// surgically; a strictly mid-window insertion resets the window and
    /// reseeds from the current scroll offset.
    pub fn insert(&mut self, index: usize, item: T) {
        if self.disposed {
            return;
        }
        if index > self.store.len() {
            wwarn!(index, count = self.store.len(), "insert: out-of-range index");
            return;
        }
        let mid_window = self.window.phase() != Phase::Empty
            && index > self.window.start()
            && index < self.window.end();
        if mid_window {
            let viewport = self.bridge.viewport_extent();
            let scroll = self.bridge.scroll_offset();
            let anchor = self.content_offset(scroll);
            self.window.clear::<T, B>(&mut self.bridge);
            self.store.insert(index, item);
            self.heights.shift_insert(index);
            self.window.seed_at_offset(
                anchor,
                viewport,
                &mut self.heights,
                &self.store,
                &mut self.bridge,
                &self.options,
            );
            self.schedule_settle(Settle::Remeasure);
            self.layout_pass();
        } else {
            let above = index <= self.window.start();
            self.store.insert(index, item);
            self.heights.shift_insert(index);
            self.window.shift_for_insert(index);
            if above {
                self.compensate_lead_change();
            }
            self.layout_pass();
        }
    }

    /// Appends items at the end of the sequence.
    pub fn append(&mut self, items: impl IntoIterator<Item = T>) {
        if self.disposed {
            return;
        }
        let added = self.store.append(items);
        for _ in 0..added {
            self.heights.push_estimate();
        }
        if added > 0 {
            self.layout_pass();
        }
    }

    /// Prepends items before index 0 with no-jump compensation: the
    /// currently anchored item keeps its screen position.
    pub fn prepend(&mut self, items: Vec<T>) {
        if self.disposed || items.is_empty() {
            return;
        }
        let added = self.store.prepend(items);
        self.heights.shift_insert_many(0, added);
        self.window.shift_for_insert_many(0, added);
        self.compensate_lead_change();
        self.layout_pass();
    }

    /// Removes the item at `index`.
    ///
    /// In-window removal evicts the affected node and backfills one item
    /// from the nearer open edge, preferring trailing; removals outside the
    /// window shift bookkeeping only.
    pub fn remove(&mut self, index: usize) {
        if self.disposed {
            return;
        }
        if index >= self.store.len() {
            wwarn!(index, count = self.store.len(), "remove: out-of-range index");
            return;
        }
        if self.window.contains(index) {
            self.store.remove(index);
            self.heights.shift_remove(index);
            self.window
                .remove_at(index, &mut self.heights, &self.store, &mut self.bridge);
            self.schedule_settle(Settle::Remeasure);
            self.layout_pass();
        } else {
            let above = index < self.window.start();
            self.store.remove(index);
            self.heights.shift_remove(index);
            self.window.shift_for_remove(index);
            if above {
                self.compensate_lead_change();
            }
            self.layout_pass();
        }
    }

    /// Removes the first item equal to `item`, if any.
    pub fn remove_item(&mut self, item: &T)
    where
        T: PartialEq,
    {
        if self.disposed {
            return;
        }
        let found = (0..self.store.len()).find(|&i| self.store.get(i) == Some(item));
        if let Some(index) = found {
            self.remove(index);
        }
    }

    /// Scrolls so that `index` is aligned in the viewport.
    ///
    /// When the index is already materialized, the offset is computed
    /// directly from cached geometry; otherwise the window is discarded and
    /// reseeded at the index. Either way the same offset assignment is
    /// reapplied on the following frame, since host layout may not be final
    /// synchronously after mounting.
    pub fn scroll_to_index(&mut self, index: usize, align: Alignment) {
        if self.disposed {
            return;
        }
        if index >= self.store.len() {
            wwarn!(
                index,
                count = self.store.len(),
                "scroll_to_index: out-of-range index"
            );
            return;
        }
        let viewport = self.bridge.viewport_extent();
        if !self.window.contains(index) {
            self.window.clear::<T, B>(&mut self.bridge);
            self.window.seed_at_index(
                index,
                align != Alignment::Trailing,
                viewport,
                &mut self.heights,
                &self.store,
                &mut self.bridge,
                &self.options,
            );
        }
        self.apply_spacers(viewport);
        let offset = self.target_offset_for(index, align, viewport);
        self.set_offset_programmatic(offset);
        self.schedule_settle(Settle::Reapply { index, align });
        self.layout_pass();
    }

    pub fn scroll_to_top(&mut self) {
        self.scroll_to_index(0, Alignment::Leading);
    }

    pub fn scroll_to_bottom(&mut self) {
        let count = self.store.len();
        if count > 0 {
            self.scroll_to_index(count - 1, Alignment::Trailing);
        }
    }

    /// Whether the viewport sits within `tolerance` pixels of the start.
    pub fn is_at_top(&mut self, tolerance: u64) -> bool {
        if self.disposed {
            return false;
        }
        self.bridge.scroll_offset() <= tolerance
    }

    /// Whether the viewport sits within `tolerance` pixels of the end.
    pub fn is_at_bottom(&mut self, tolerance: u64) -> bool {
        if self.disposed {
            return false;
        }
        let viewport = self.bridge.viewport_extent() as u64;
        let max_scroll = self.bridge.content_extent().saturating_sub(viewport);
        self.bridge.scroll_offset().saturating_add(tolerance) >= max_scroll
    }

    /// Edge proximity with the configured default tolerance:
    /// `(near_top, near_bottom)`. Hosts typically use this to decide whether
    /// to trigger load-more behavior.
    pub fn is_near_edge(&mut self) -> (bool, bool) {
        let tolerance = self.options.edge_tolerance;
        (self.is_at_top(tolerance), self.is_at_bottom(tolerance))
    }

    /// Remeasures every materialized slot and reruns the layout pass.
    /// Idempotent: a second refresh with no intervening mutation produces an
    /// identical window and identical cached heights.
    pub fn refresh(&mut self) {
        if self.disposed {
            return;
        }
        for index in self.window.start()..self.window.end() {
            self.heights.invalidate(index);
        }
        self.window.remeasure::<T, B>(&mut self.heights, &mut self.bridge);
        self.layout_pass();
    }

    /// Suppresses layout passes until the matching [`Engine::end_batch`].
    pub fn begin_batch(&mut self) {
        self.batch_depth += 1;
    }

    /// Closes a batch; exactly one layout pass runs when the outermost batch
    /// closes and any suppressed pass was requested.
    pub fn end_batch(&mut self) {
        if self.batch_depth == 0 {
            return;
        }
        self.batch_depth -= 1;
        if self.batch_depth == 0 && core::mem::take(&mut self.batch_pending) {
            self.layout_pass();
        }
    }

    /// Unmounts everything and permanently disables the engine.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.window.clear::<T, B>(&mut self.bridge);
        self.store.replace_all(Vec::new());
        self.heights.clear();
        self.bridge.set_spacers(0, 0);
        self.applied = Spacers::default();
        self.pending_scroll = None;
        self.pending_settle = None;
        self.pass_requested = false;
        self.disposed = true;
        wdebug!("Engine::dispose");
    }

    // ---- layout ----------------------------------------------------------

    /// One full layout pass: seed or expand the window, evict, recompute
    /// spacers, and fire the visible-range notification.
    fn layout_pass(&mut self) {
        if self.disposed {
            return;
        }
        if self.batch_depth > 0 {
            self.batch_pending = true;
            return;
        }
        let viewport = self.bridge.viewport_extent();
        let count = self.store.len();
        if count == 0 {
            self.window.clear::<T, B>(&mut self.bridge);
            self.apply_spacers(viewport);
            self.notify_visible(VisibleRange::default());
            return;
        }

        if self.window.phase() == Phase::Empty {
            match self.options.alignment {
                Alignment::Leading => {
                    let target = self.bridge.scroll_offset();
                    self.window.seed_at_offset(
                        target,
                        viewport,
                        &mut self.heights,
                        &self.store,
                        &mut self.bridge,
                        &self.options,
                    );
                    self.apply_spacers(viewport);
                }
                Alignment::Trailing => {
                    self.window.seed_trailing(
                        viewport,
                        &mut self.heights,
                        &self.store,
                        &mut self.bridge,
                        &self.options,
                    );
                    self.apply_spacers(viewport);
                    let bottom = self.bridge.content_extent().saturating_sub(viewport as u64);
                    self.set_offset_programmatic(bottom);
                }
            }
            self.schedule_settle(Settle::Remeasure);
        } else {
            // Pick up real extents for slots the host had not laid out when
            // they were mounted.
            self.window
                .remeasure::<T, B>(&mut self.heights, &mut self.bridge);
            let scroll = self.bridge.scroll_offset();
            let anchor = self.content_offset(scroll);
            if self.window.expand_down(
                anchor,
                viewport,
                &mut self.heights,
                &self.store,
                &mut self.bridge,
                &self.options,
            ) {
                self.apply_spacers(viewport);
                self.schedule_settle(Settle::Remeasure);
            }

            // Upward growth adds content above the viewport; fold the
            // host-observed content delta back into the offset so the
            // anchored item does not move.
            let before = self.bridge.content_extent();
            if self.window.expand_up(
                anchor,
                viewport,
                &mut self.heights,
                &self.store,
                &mut self.bridge,
                &self.options,
            ) {
                self.apply_spacers(viewport);
                let after = self.bridge.content_extent();
                let delta = after as i64 - before as i64;
                if delta != 0 {
                    let cur = self.bridge.scroll_offset() as i64;
                    self.set_offset_programmatic((cur + delta).max(0) as u64);
                }
                self.schedule_settle(Settle::Remeasure);
            }
        }

        if let EvictionPolicy::Sliding { margin } = self.options.eviction {
            let visible = self.compute_visible(viewport);
            self.window
                .evict_outside::<T, B>(visible, margin, &mut self.bridge);
        }

        self.apply_spacers(viewport);
        let visible = self.compute_visible(viewport);
        self.notify_visible(visible);
    }

    fn run_settle(&mut self, settle: Settle) {
        let viewport = self.bridge.viewport_extent();
        match settle {
            Settle::Remeasure => {
                if self.window.remeasure::<T, B>(&mut self.heights, &mut self.bridge) {
                    self.layout_pass();
                }
            }
            Settle::Reapply { index, align } => {
                self.window.remeasure::<T, B>(&mut self.heights, &mut self.bridge);
                self.apply_spacers(viewport);
                if index < self.store.len() {
                    let offset = self.target_offset_for(index, align, viewport);
                    self.set_offset_programmatic(offset);
                }
                let visible = self.compute_visible(viewport);
                self.notify_visible(visible);
            }
        }
    }

    fn apply_spacers(&mut self, viewport: u32) {
        let spacers = compute_spacers(
            &self.heights,
            self.window.start(),
            self.window.end(),
            self.store.len(),
            viewport,
            self.options.alignment,
            self.options.spacer_mode,
        );
        if spacers != self.applied {
            self.bridge.set_spacers(spacers.lead, spacers.trail);
            self.applied = spacers;
        }
    }

    /// Adjusts the scroll offset after a structural change above the window
    /// so the anchored item keeps its screen position.
    fn compensate_lead_change(&mut self) {
        if self.window.phase() == Phase::Empty {
            return;
        }
        let viewport = self.bridge.viewport_extent();
        let old_lead = self.applied.lead;
        self.apply_spacers(viewport);
        let delta = self.applied.lead as i64 - old_lead as i64;
        if delta != 0 {
            let cur = self.bridge.scroll_offset() as i64;
            self.set_offset_programmatic((cur + delta).max(0) as u64);
        }
    }

    /// Translates a host scroll offset into content coordinates (the height
    /// cache's coordinate space).
    fn content_offset(&mut self, host_offset: u64) -> u64 {
        if self.window.is_empty() {
            return host_offset.min(self.heights.total());
        }
        let window_top = self.heights.extent_before(self.window.start());
        let pos = window_top as i64 + (host_offset as i64 - self.applied.lead as i64);
        pos.clamp(0, self.heights.total() as i64) as u64
    }

    /// Translates a content position within the window into a host offset.
    fn host_offset_for(&self, content_pos: u64) -> u64 {
        let window_top = self.heights.extent_before(self.window.start());
        self.applied
            .lead
            .saturating_add(content_pos.saturating_sub(window_top))
    }

    fn target_offset_for(&mut self, index: usize, align: Alignment, viewport: u32) -> u64 {
        let max_scroll = self
            .bridge
            .content_extent()
            .saturating_sub(viewport as u64);
        let target = match align {
            Alignment::Leading => self.host_offset_for(self.heights.extent_before(index)),
            Alignment::Trailing => {
                if index + 1 >= self.store.len() {
                    max_scroll
                } else {
                    let end = self
                        .heights
                        .extent_before(index)
                        .saturating_add(self.heights.get(index) as u64);
                    self.host_offset_for(end).saturating_sub(viewport as u64)
                }
            }
        };
        target.min(max_scroll)
    }

    fn compute_visible(&mut self, viewport: u32) -> VisibleRange {
        let count = self.store.len();
        if count == 0 || self.window.is_empty() {
            return VisibleRange {
                start: 0,
                end: 0,
                count,
            };
        }
        let scroll = self.bridge.scroll_offset();
        let anchor = self.content_offset(scroll);
        let top = anchor;
        let bottom = anchor.saturating_add((viewport.max(1) as u64) - 1);
        let start = self
            .heights
            .index_at_offset(top)
            .clamp(self.window.start(), self.window.end());
        let end = (self.heights.index_at_offset(bottom) + 1)
            .clamp(start, self.window.end())
            .min(count);
        VisibleRange { start, end, count }
    }

    fn notify_visible(&mut self, visible: VisibleRange) {
        if visible == self.last_visible {
            return;
        }
        self.last_visible = visible;
        if let Some(cb) = self.options.on_visible_range.clone() {
            cb(visible);
        }
    }

    fn set_offset_programmatic(&mut self, offset: u64) {
        self.programmatic_echo = Some(offset);
        self.bridge.set_scroll_offset(offset);
    }

    fn schedule_settle(&mut self, settle: Settle) {
        self.pending_settle = Some(settle);
        self.bridge.request_frame();
    }

    fn request_pass(&mut self) {
        if self.batch_depth > 0 {
            self.batch_pending = true;
            return;
        }
        self.pass_requested = true;
        self.bridge.request_frame();
    }
}
