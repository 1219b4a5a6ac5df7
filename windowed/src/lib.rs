//! A headless windowed-rendering engine for arbitrarily long scrollable
//! lists.
//!
//! The engine materializes only a small contiguous window of items while the
//! viewport behaves as if the full sequence were present: spacers stand in
//! for unmaterialized content, per-item extents are measured once and cached
//! with an estimate fallback, and scroll-offset compensation keeps the
//! anchored item in place when content is mounted above the viewport.
//!
//! It is UI-agnostic. A host (browser DOM, terminal grid, canvas) implements
//! the [`RenderBridge`] capability interface and drives the engine with
//! scroll signals and frame boundaries. For a ready-made simulated host and
//! frame pump, see the `windowed-adapter` crate.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod bridge;
mod engine;
mod error;
mod fenwick;
mod heights;
mod options;
mod spacer;
mod store;
mod types;
mod window;


pub use bridge::RenderBridge;
pub use engine::Engine;
pub use error::ConfigError;
pub use heights::HeightCache;
pub use options::{EngineOptions, OnVisibleRangeCallback};
pub use types::{Alignment, Edge, EvictionPolicy, SpacerMode, Spacers, VisibleRange};
