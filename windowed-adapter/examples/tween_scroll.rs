use windowed::{Engine, EngineOptions};
use windowed_adapter::{Easing, SimBridge, TweenScroller, run_until_settled};

fn main() {
    // Smooth-scroll a long list by feeding tweened offsets into the engine
    // as ordinary scroll signals: the window expands along the way exactly
    // as it would for user scrolling.
    let opts = EngineOptions::new()
        .with_estimated_item_extent(50)
        .with_expansion_threshold_factor(1.5)
        .with_batch_size(24);
    let mut engine = Engine::new(vec![50u32; 100_000], SimBridge::new(600), opts).unwrap();
    run_until_settled(&mut engine, 16);

    let target = engine.heights().extent_before(2_000);
    let mut scroller = TweenScroller::new();
    scroller.start(0, target, 0, 240, Easing::SmoothStep);
    println!("tweening to offset {target}");

    let mut now_ms = 0u64;
    while scroller.is_animating() {
        now_ms += 16;
        if let Some(offset) = scroller.tick(&mut engine, now_ms) {
            run_until_settled(&mut engine, 16);
            if now_ms % 80 == 0 {
                println!(
                    "t={now_ms} offset={offset} visible={:?} range={:?}",
                    engine.visible_range(),
                    engine.materialized_range(),
                );
            }
        }
    }

    println!(
        "done: offset={} visible={:?}",
        engine.bridge().offset(),
        engine.visible_range(),
    );
}
