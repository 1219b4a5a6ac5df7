use windowed::{Alignment, Engine, EngineOptions};
use windowed_adapter::{SimBridge, run_until_settled};

fn main() {
    // A chat timeline: anchored to the newest message, loading older pages
    // as the user nears the top. Items are bare extents for the simulated
    // host; a real host would materialize message views.
    let opts = EngineOptions::new()
        .with_estimated_item_extent(48)
        .with_expansion_threshold_factor(2.0)
        .with_batch_size(20)
        .with_alignment(Alignment::Trailing);

    let messages: Vec<u32> = (0..200).map(|i| 32 + (i % 7) * 12).collect();
    let mut engine = Engine::new(messages, SimBridge::new(600), opts).unwrap();
    run_until_settled(&mut engine, 16);

    println!(
        "seeded: range={:?} offset={} at_bottom={}",
        engine.materialized_range(),
        engine.bridge().offset(),
        engine.is_at_bottom(0),
    );

    // The user scrolls up through history; the engine expands upward and
    // compensates the offset so nothing jumps.
    let mut offset = engine.bridge().offset();
    for _ in 0..5 {
        offset = offset.saturating_sub(900);
        engine.on_scroll(offset);
        run_until_settled(&mut engine, 16);
        offset = engine.bridge().offset();

        let (near_top, _) = engine.is_near_edge();
        if near_top {
            // Load an older page. The anchored message keeps its position.
            engine.prepend((0..50).map(|i| 32 + (i % 7) * 12).collect());
            run_until_settled(&mut engine, 16);
            println!(
                "loaded older page: len={} range={:?} offset={}",
                engine.len(),
                engine.materialized_range(),
                engine.bridge().offset(),
            );
            offset = engine.bridge().offset();
        }
    }

    // A new message arrives while pinned elsewhere; jump back to it.
    engine.append([64u32]);
    engine.scroll_to_bottom();
    run_until_settled(&mut engine, 16);
    println!(
        "back at the newest message: visible={:?} at_bottom={}",
        engine.visible_range(),
        engine.is_at_bottom(0),
    );
}
