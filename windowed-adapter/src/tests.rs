use crate::*;

use std::vec::Vec;

use windowed::{Alignment, Engine, EngineOptions};

fn uniform(count: usize, extent: u32) -> Vec<u32> {
    core::iter::repeat_n(extent, count).collect()
}

#[test]
fn deferred_layout_settles_in_two_frames() {
    let bridge = SimBridge::new(500).with_deferred_layout();
    let opts = EngineOptions::new()
        .with_estimated_item_extent(50)
        .with_expansion_threshold_factor(1.0)
        .with_batch_size(10);
    let mut engine = Engine::new(uniform(200, 80), bridge, opts).unwrap();

    let frames = run_until_settled(&mut engine, 16);
    assert_eq!(frames, 2, "seed frame plus one remeasure frame");

    // First frame mounts against estimates; the settle frame picks up the
    // real extents the host produced after its layout flush.
    assert!(engine.heights().is_measured(0));
    assert_eq!(engine.heights().get(0), 80);
    assert_eq!(engine.bridge().content(), engine.heights().total());
}

#[test]
fn run_until_settled_respects_the_frame_budget() {
    let bridge = SimBridge::new(500);
    let mut engine = Engine::new(uniform(50, 40), bridge, EngineOptions::new()).unwrap();

    assert_eq!(run_until_settled(&mut engine, 0), 0);
    assert!(engine.bridge().frame_requested());

    run_until_settled(&mut engine, 16);
    assert!(!engine.bridge().frame_requested());
}

#[test]
fn chat_prepend_keeps_the_view_pinned_to_the_bottom() {
    let bridge = SimBridge::new(500);
    let opts = EngineOptions::new()
        .with_estimated_item_extent(50)
        .with_expansion_threshold_factor(2.0)
        .with_batch_size(20)
        .with_alignment(Alignment::Trailing);
    let mut engine = Engine::new(uniform(200, 50), bridge, opts).unwrap();
    run_until_settled(&mut engine, 16);

    assert!(engine.is_at_bottom(0));
    let offset = engine.bridge().offset();
    let (start, end) = engine.materialized_range();

    // Loading a page of older history must not move the visible messages.
    engine.prepend(uniform(20, 50));
    run_until_settled(&mut engine, 16);

    assert_eq!(engine.len(), 220);
    assert_eq!(engine.materialized_range(), (start + 20, end + 20));
    assert_eq!(engine.bridge().offset(), offset + 20 * 50);
    assert!(engine.is_at_bottom(0));
}

#[test]
fn tween_scrolls_the_engine_monotonically() {
    let bridge = SimBridge::new(500);
    let opts = EngineOptions::new()
        .with_estimated_item_extent(50)
        .with_expansion_threshold_factor(1.0)
        .with_batch_size(10);
    let mut engine = Engine::new(uniform(1000, 50), bridge, opts).unwrap();
    run_until_settled(&mut engine, 16);

    let mut scroller = TweenScroller::new();
    scroller.start(0, 10_000, 0, 160, Easing::SmoothStep);

    let mut last = 0u64;
    let mut now_ms = 0u64;
    while scroller.is_animating() {
        now_ms += 16;
        let offset = scroller.tick(&mut engine, now_ms).unwrap();
        assert!(offset >= last, "tween went backwards at t={now_ms}");
        last = offset;
        run_until_settled(&mut engine, 16);
    }

    assert_eq!(engine.bridge().offset(), 10_000);
    assert_eq!(engine.visible_range().start, 200);
    let (_, end) = engine.materialized_range();
    assert!(end > 200, "window did not follow the tween");
    assert!(scroller.tick(&mut engine, now_ms + 16).is_none());
}

#[test]
fn tween_sampling_and_retargeting() {
    let mut tween = Tween::new(0, 100, 0, 100, Easing::Linear);
    assert_eq!(tween.sample(0), 0);
    assert_eq!(tween.sample(50), 50);
    assert_eq!(tween.sample(100), 100);
    assert_eq!(tween.sample(1000), 100);
    assert!(!tween.is_done(99));
    assert!(tween.is_done(100));

    // Retargeting continues from the current position.
    tween.retarget(50, 200, 100);
    assert_eq!(tween.sample(50), 50);
    assert_eq!(tween.sample(150), 200);

    for easing in [Easing::Linear, Easing::SmoothStep, Easing::EaseInOutCubic] {
        assert_eq!(easing.sample(0.0), 0.0);
        assert_eq!(easing.sample(1.0), 1.0);
    }
}
