use scrollband::{Align, LineLayout, ListOptions};
use scrollband_adapter::Controller;

fn main() {
    let layout = LineLayout::new(24).expect("item size is positive");
    let mut c = Controller::new(ListOptions::new(10_000, layout));
    c.on_viewport_size(480);

    // Simulate a frame loop at ~60fps gliding toward item 5000.
    let target = c.glide_to_index(5000, Align::Center, 0);
    println!("glide target={target}");

    let mut now = 0u64;
    while let Some(offset) = {
        now += 16;
        c.tick(now)
    } {
        println!("t={now}ms offset={offset}");
    }

    println!(
        "settled at offset={} is_scrolling={}",
        c.virtualizer().scroll_offset(),
        c.virtualizer().is_scrolling()
    );
}
