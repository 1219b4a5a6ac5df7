use alloc::vec::Vec;

use windowed::{Edge, RenderBridge};

/// An item the simulated host knows how to lay out.
pub trait SimItem {
    /// The extent, in pixels, a materialized node for this item occupies.
    fn extent(&self) -> u32;
}

/// Bare extents make convenient test items.
impl SimItem for u32 {
    fn extent(&self) -> u32 {
        *self
    }
}

impl<T: SimItem> SimItem for &T {
    fn extent(&self) -> u32 {
        (*self).extent()
    }
}

/// Handle for a node mounted in the simulated host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SimNode {
    pub id: u64,
    pub extent: u32,
}

/// An in-memory host for the engine: a scroll container with two spacers and
/// a list of mounted nodes in visual order.
///
/// With deferred layout enabled (the realistic mode), nodes created inside a
/// frame measure as zero until the next frame begins, mirroring hosts that
/// only produce extents after a layout flush. [`run_until_settled`] commits
/// layout at every frame boundary.
///
/// [`run_until_settled`]: crate::run_until_settled
#[derive(Debug)]
pub struct SimBridge {
    viewport: u32,
    scroll: u64,
    lead: u64,
    trail: u64,
    mounted: Vec<SimNode>,
    next_id: u64,
    deferred_layout: bool,
    /// Ids of nodes created since the last frame boundary; they measure as
    /// zero while deferred layout is enabled.
    pending_layout: Vec<u64>,
    frame_requested: bool,
}

impl SimBridge {
    pub fn new(viewport: u32) -> Self {
        Self {
            viewport,
            scroll: 0,
            lead: 0,
            trail: 0,
            mounted: Vec::new(),
            next_id: 0,
            deferred_layout: false,
            pending_layout: Vec::new(),
            frame_requested: false,
        }
    }

    /// Makes freshly created nodes measure as zero until the next frame.
    pub fn with_deferred_layout(mut self) -> Self {
        self.deferred_layout = true;
        self
    }

    pub fn set_viewport(&mut self, extent: u32) {
        self.viewport = extent;
    }

    /// Whether the engine has asked for a frame since the last boundary.
    pub fn frame_requested(&self) -> bool {
        self.frame_requested
    }

    /// Marks a frame boundary: clears the frame request and flushes layout,
    /// so previously created nodes now report their real extents.
    pub fn begin_frame(&mut self) {
        self.frame_requested = false;
        self.pending_layout.clear();
    }

    pub fn offset(&self) -> u64 {
        self.scroll
    }

    pub fn lead(&self) -> u64 {
        self.lead
    }

    pub fn trail(&self) -> u64 {
        self.trail
    }

    pub fn mounted_count(&self) -> usize {
        self.mounted.len()
    }

    pub fn mounted_extent(&self) -> u64 {
        self.mounted.iter().map(|n| n.extent as u64).sum()
    }

    /// Total content extent: lead spacer + mounted nodes + trail spacer.
    pub fn content(&self) -> u64 {
        self.lead + self.mounted_extent() + self.trail
    }
}

impl<T: SimItem> RenderBridge<T> for SimBridge {
    type Handle = SimNode;

    fn materialize(&mut self, item: &T, _index: usize, _count: usize) -> SimNode {
        self.next_id += 1;
        if self.deferred_layout {
            self.pending_layout.push(self.next_id);
        }
        SimNode {
            id: self.next_id,
            extent: item.extent(),
        }
    }

    fn measure(&mut self, handle: &SimNode) -> u32 {
        if self.deferred_layout && self.pending_layout.contains(&handle.id) {
            return 0;
        }
        handle.extent
    }

    fn mount(&mut self, handle: &SimNode, edge: Edge) {
        match edge {
            Edge::Leading => self.mounted.insert(0, *handle),
            Edge::Trailing => self.mounted.push(*handle),
        }
    }

    fn unmount(&mut self, handle: &SimNode) {
        self.mounted.retain(|n| n.id != handle.id);
    }

    fn set_spacers(&mut self, lead: u64, trail: u64) {
        self.lead = lead;
        self.trail = trail;
    }

    fn viewport_extent(&mut self) -> u32 {
        self.viewport
    }

    fn scroll_offset(&mut self) -> u64 {
        self.scroll
    }

    fn set_scroll_offset(&mut self, offset: u64) {
        self.scroll = offset;
    }

    fn content_extent(&mut self) -> u64 {
        self.content()
    }

    fn request_frame(&mut self) {
        self.frame_requested = true;
    }
}
