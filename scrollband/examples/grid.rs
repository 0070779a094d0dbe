use scrollband::{CellLayout, GridOptions, GridVirtualizer, Rect};

fn main() {
    // 280px tall, 320px wide cards with a 16px gap.
    let cell = CellLayout::new(280, 320)
        .expect("cell sizes are positive")
        .with_gap(16);
    let mut v = GridVirtualizer::new(GridOptions::new(1000, cell));

    v.set_scroll_rect(Rect {
        main: 600,
        cross: 1200,
    });
    println!(
        "columns={} rows={} total_size={}",
        v.columns(),
        v.total_rows(),
        v.total_size()
    );

    v.set_scroll_offset(5000);
    let band = v.band();
    println!("rows={:?} items={:?}", band.rows, band.item_window);
    v.for_each_virtual_cell(|c| {
        println!("cell {} at row {} col {} ({}, {})", c.index, c.row, c.column, c.x, c.y);
    });

    // Narrowing the viewport reflows the grid on the next read.
    v.set_scroll_rect(Rect {
        main: 600,
        cross: 700,
    });
    println!("after resize: columns={} rows={}", v.columns(), v.total_rows());
}
