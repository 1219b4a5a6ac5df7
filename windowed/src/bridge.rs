use crate::Edge;

/// The capability interface the engine drives a host through.
///
/// Any host that can create a visual node for an item, measure it along the
/// scroll axis, and mount/unmount it at either end of the materialized run
/// can back the engine: browser DOM, terminal grid, canvas scene graph, or
/// the in-memory simulation in `windowed-adapter`.
///
/// Geometry accessors take `&mut self` so hosts that lazily flush layout can
/// do so when asked.
///
/// # Frames
///
/// The engine never blocks. Any step that must read host layout *after* the
/// host has applied a mutation (a just-mounted node's extent, the content
/// extent after a prepend) is deferred: the engine calls
/// [`RenderBridge::request_frame`] and finishes the step when the host next
/// calls `Engine::on_frame`. The engine keeps a single pending slot per
/// operation class internally, so a newer deferred operation supersedes an
/// older one of the same class; hosts only need to deliver frames, never to
/// manage cancellation tokens.
pub trait RenderBridge<T> {
    /// Host-side identity of a materialized node.
    type Handle;

    /// Produces a visual node for `item`. The result is not yet mounted.
    fn materialize(&mut self, item: &T, index: usize, count: usize) -> Self::Handle;

    /// Reads the node's rendered size along the scroll axis, in pixels.
    ///
    /// Returning `0` means "not laid out yet"; the engine keeps its current
    /// estimate and retries on the next pass.
    fn measure(&mut self, handle: &Self::Handle) -> u32;

    /// Attaches the node at the given end of the mounted run.
    fn mount(&mut self, handle: &Self::Handle, edge: Edge);

    /// Detaches the node. The handle may be mounted again later.
    fn unmount(&mut self, handle: &Self::Handle);

    /// Applies the placeholder extents standing in for unmaterialized
    /// content before and after the mounted run.
    fn set_spacers(&mut self, lead: u64, trail: u64);

    fn viewport_extent(&mut self) -> u32;

    fn scroll_offset(&mut self) -> u64;

    fn set_scroll_offset(&mut self, offset: u64);

    /// Total scrollable extent: lead spacer + mounted run + trail spacer.
    fn content_extent(&mut self) -> u64;

    /// Asks the host to call `Engine::on_frame` once, after it has applied
    /// any pending layout mutations. Requests may be coalesced by the host.
    fn request_frame(&mut self);
}
