use scrollband::{Align, LineLayout, ListOptions, ListVirtualizer};

fn main() {
    let layout = LineLayout::new(100).expect("item size is positive");
    let mut v = ListVirtualizer::new(ListOptions::new(1_000_000, layout));
    v.set_viewport_and_scroll(600, 123_456);

    let band = v.band();
    println!("total_size={}", band.total_size);
    println!("window={:?} band_offset={}", band.window, band.offset);

    v.for_each_virtual_item(|item| {
        println!("item {} at {}..{}", item.index, item.start, item.end());
    });

    v.scroll_to_index(999_999, Align::End);
    println!("after scroll_to_index: offset={}", v.scroll_offset());
}
