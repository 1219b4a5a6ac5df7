use windowed::Engine;

use crate::{SimBridge, SimItem};

/// Delivers frame boundaries to `engine` while it keeps requesting them, up
/// to `max_frames`. Returns the number of frames delivered.
///
/// Each frame first commits the simulated host's layout (so extents deferred
/// from the previous frame become measurable), then runs the engine's frame
/// handler. The engine's settle protocol converges in a bounded number of
/// frames; hitting `max_frames` usually means a bridge misbehaves.
pub fn run_until_settled<T: SimItem>(engine: &mut Engine<T, SimBridge>, max_frames: usize) -> usize {
    let mut frames = 0;
    while frames < max_frames && engine.bridge().frame_requested() {
        engine.bridge_mut().begin_frame();
        engine.on_frame();
        frames += 1;
    }
    frames
}
