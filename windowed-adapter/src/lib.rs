//! Host utilities for the `windowed` crate.
//!
//! The `windowed` crate is UI-agnostic: it drives any host that implements
//! its `RenderBridge` capability interface. This crate provides small,
//! framework-neutral pieces commonly needed around that seam:
//!
//! - [`SimBridge`]: an in-memory simulated host, useful for tests, examples,
//!   and headless drivers. It models deferred layout (extents that are not
//!   available until the next frame) the way real hosts behave.
//! - [`run_until_settled`]: a bounded frame pump that delivers frames while
//!   the engine keeps requesting them.
//! - [`Tween`]/[`TweenScroller`]: adapter-driven smooth scrolling that feeds
//!   interpolated offsets into the engine as ordinary scroll signals.
//!
//! This crate is intentionally framework-agnostic (no DOM/TUI bindings).
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

mod pump;
mod sim;
mod tween;

#[cfg(test)]
mod tests;

pub use pump::run_until_settled;
pub use sim::{SimBridge, SimItem, SimNode};
pub use tween::{Easing, Tween, TweenScroller};
