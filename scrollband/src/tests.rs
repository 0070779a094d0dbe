use crate::*;

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

#[derive(Clone, Copy, Debug)]
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u64(&mut self) -> u64 {
        // Deterministic, dependency-free PRNG for tests.
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0
    }

    fn gen_range_u64(&mut self, start: u64, end_exclusive: u64) -> u64 {
        debug_assert!(start < end_exclusive);
        let span = end_exclusive - start;
        start + (self.next_u64() % span)
    }

    fn gen_range_u32(&mut self, start: u32, end_exclusive: u32) -> u32 {
        self.gen_range_u64(start as u64, end_exclusive as u64) as u32
    }

    fn gen_range_usize(&mut self, start: usize, end_exclusive: usize) -> usize {
        self.gen_range_u64(start as u64, end_exclusive as u64) as usize
    }
}

fn layout(item_size: u32) -> LineLayout {
    LineLayout::new(item_size).unwrap()
}

// ---------------------------------------------------------------------------
// Geometry engine
// ---------------------------------------------------------------------------

#[test]
fn zero_item_size_is_rejected() {
    assert_eq!(LineLayout::new(0), Err(LayoutError::ZeroItemSize));
    assert_eq!(CellLayout::new(0, 10), Err(LayoutError::ZeroItemSize));
    assert_eq!(CellLayout::new(10, 0), Err(LayoutError::ZeroItemCrossSize));
}

#[test]
fn empty_sequence_is_safe() {
    let l = layout(100);
    assert_eq!(l.total_size(0), 0);
    assert!(l.visible_window(0, 600, 0).is_empty());
    assert!(l.window(12345, 600, 0, 5).is_empty());
    assert_eq!(l.index_at_offset(0, 0), None);

    let b = l.band(0, 600, 0, 5);
    assert!(b.window.is_empty());
    assert_eq!(b.offset, 0);
    assert_eq!(b.total_size, 0);
}

#[test]
fn single_item_window() {
    let l = layout(100);
    let w = l.visible_window(0, 600, 1);
    assert_eq!(w.start_index, 0);
    assert_eq!(w.end_index, 1);
    assert_eq!(l.total_size(1), 100);
}

#[test]
fn total_size_counts_items_gaps_and_padding() {
    let l = layout(100).with_gap(16).with_padding(10, 5);
    // 3 items, 2 interior gaps.
    assert_eq!(l.total_size(3), 10 + 300 + 32 + 5);
    assert_eq!(l.item_start(0), 10);
    assert_eq!(l.item_start(2), 10 + 2 * 116);
    assert_eq!(l.item_end(2), 10 + 2 * 116 + 100);
}

#[test]
fn index_at_offset_maps_gaps_into_previous_item() {
    // layout: item0(0..2), gap(2..3), item1(3..5)
    let l = layout(2).with_gap(1);
    assert_eq!(l.index_at_offset(0, 2), Some(0));
    assert_eq!(l.index_at_offset(1, 2), Some(0));
    assert_eq!(l.index_at_offset(2, 2), Some(0));
    assert_eq!(l.index_at_offset(3, 2), Some(1));
    assert_eq!(l.index_at_offset(4, 2), Some(1));
    // past the end clamps to the last item
    assert_eq!(l.index_at_offset(500, 2), Some(1));
}

#[test]
fn windowing_with_leading_padding() {
    // item 10, padding 50: item i occupies [50+10i, 60+10i)
    let l = layout(10).with_padding(50, 0);

    // Offsets inside the padding map to item 0.
    assert_eq!(l.index_at_offset(0, 100), Some(0));
    assert_eq!(l.index_at_offset(49, 100), Some(0));
    assert_eq!(l.index_at_offset(50, 100), Some(0));
    assert_eq!(l.index_at_offset(123, 100), Some(7));

    // A viewport entirely inside the padding still anchors at item 0.
    assert_eq!(l.visible_window(0, 30, 100).start_index, 0);

    // Span [55, 85) touches items 0..=3.
    let w = l.visible_window(55, 30, 100);
    assert_eq!(w.start_index, 0);
    assert_eq!(w.end_index, 4);
    let b = l.band(55, 30, 100, 0);
    assert_eq!(b.offset, 50);
    assert_eq!(b.total_size, 50 + 1000);

    // Past the padding, the window tracks offset - padding.
    let w = l.visible_window(125, 30, 100);
    assert_eq!(w.start_index, 7); // item 7 at [120, 130)
}

#[test]
fn window_length_is_bounded_and_independent_of_count() {
    let overscans = [0usize, 5];
    let counts = [1usize, 100, 10_000, 1_000_000];
    for &item_size in &[10u32, 100, 500] {
        let l = layout(item_size);
        for &viewport in &[100u32, 600, 2000] {
            for &overscan in &overscans {
                let bound =
                    (viewport as u64).div_ceil(l.stride()) as usize + 1 + 2 * overscan;
                let mut reference_len = None;
                for &count in &counts {
                    let w = l.window(0, viewport, count, overscan);
                    assert!(w.len() <= bound, "len {} > bound {bound}", w.len());
                    // Window length must not grow with the data set.
                    if count >= 10_000 {
                        match reference_len {
                            None => reference_len = Some(w.len()),
                            Some(r) => assert_eq!(w.len(), r),
                        }
                    }
                }
            }
        }
    }
}

#[test]
fn randomized_windows_are_valid_and_cover_visible_items() {
    let mut rng = Lcg::new(0x5eed);
    for _ in 0..2000 {
        let item_size = rng.gen_range_u32(1, 500);
        let gap = rng.gen_range_u32(0, 32);
        let padding_start = rng.gen_range_u32(0, 64);
        let padding_end = rng.gen_range_u32(0, 64);
        let count = rng.gen_range_usize(1, 5000);
        let viewport = rng.gen_range_u32(1, 2000);
        let l = layout(item_size)
            .with_gap(gap)
            .with_padding(padding_start, padding_end);
        let offset = rng.gen_range_u64(0, l.total_size(count) + 100);
        let overscan = rng.gen_range_usize(0, 10);

        let w = l.window(offset, viewport, count, overscan);
        assert!(!w.is_empty());
        assert!(w.start_index < w.end_index);
        assert!(w.end_index <= count);

        // Every item that overlaps the (clamped) viewport span must be
        // inside the window.
        let off = offset.min(l.max_scroll_offset(count, viewport));
        let span_end = off + viewport as u64;
        for i in 0..count {
            let visible = l.item_start(i) < span_end && l.item_end(i) > off;
            if visible {
                assert!(
                    i >= w.start_index && i < w.end_index,
                    "item {i} visible but outside window {w:?} (off={off}, view={viewport})"
                );
            }
        }
    }
}

#[test]
fn scrolling_forward_never_moves_the_window_backward() {
    let l = layout(37).with_gap(3);
    let count = 4000;
    let viewport = 613;
    let mut prev = l.window(0, viewport, count, 4);
    let mut offset = 0u64;
    while offset < l.total_size(count) + 500 {
        let w = l.window(offset, viewport, count, 4);
        assert!(w.start_index >= prev.start_index);
        assert!(w.end_index >= prev.end_index);
        prev = w;
        offset += 29;
    }
    assert_eq!(prev.end_index, count);
}

#[test]
fn band_offset_is_exactly_the_first_windowed_item_start() {
    let mut rng = Lcg::new(42);
    for _ in 0..500 {
        let l = layout(rng.gen_range_u32(1, 300))
            .with_gap(rng.gen_range_u32(0, 8))
            .with_padding(rng.gen_range_u32(0, 40), rng.gen_range_u32(0, 40));
        let count = rng.gen_range_usize(1, 2000);
        let offset = rng.gen_range_u64(0, l.total_size(count) + 1);
        let b = l.band(offset, 600, count, 5);
        assert_eq!(b.offset, l.item_start(b.window.start_index));
        assert_eq!(b.total_size, l.total_size(count));
    }
}

#[test]
fn ten_thousand_rows_at_offset_5000() {
    // items=[0..9999], item 100px, viewport 600px, overscan 5, offset 5000.
    let l = layout(100);
    let visible = l.visible_window(5000, 600, 10_000);
    assert_eq!(visible.start_index, 50);
    assert_eq!(visible.end_index, 57);

    let b = l.band(5000, 600, 10_000, 5);
    assert_eq!(b.window.start_index, 45);
    assert_eq!(b.window.end_index, 62);
    assert_eq!(b.window.len(), 17);
    assert_eq!(b.offset, 4500);
    assert_eq!(b.total_size, 1_000_000);
}

// ---------------------------------------------------------------------------
// Linear virtualizer
// ---------------------------------------------------------------------------

#[test]
fn list_empty_data_renders_nothing() {
    let mut v = ListVirtualizer::new(ListOptions::new(0, layout(100)));
    v.set_viewport_and_scroll(600, 0);
    assert_eq!(v.total_size(), 0);
    assert!(v.window().is_empty());
    let mut n = 0;
    v.for_each_virtual_item(|_| n += 1);
    assert_eq!(n, 0);
}

#[test]
fn list_window_and_band() {
    let mut v = ListVirtualizer::new(ListOptions::new(10_000, layout(100)));
    v.set_viewport_and_scroll(600, 5000);

    let b = v.band();
    assert_eq!(b.window.start_index, 45);
    assert_eq!(b.window.end_index, 62);
    assert_eq!(b.offset, 4500);
    assert_eq!(b.total_size, 1_000_000);

    let mut items = Vec::new();
    v.collect_virtual_items(&mut items);
    assert_eq!(items.len(), 17);
    assert_eq!(items[0].index, 45);
    assert_eq!(items[0].start, 4500);
    assert_eq!(items[0].size, 100);
    assert_eq!(items.last().unwrap().index, 61);
    assert_eq!(items.last().unwrap().start, 6100);
}

#[test]
fn list_huge_offset_clamps() {
    let mut v = ListVirtualizer::new(ListOptions::new(1_000_000, layout(1)));
    v.set_viewport_and_scroll(10, u64::MAX);
    let w = v.window();
    assert!(!w.is_empty());
    assert_eq!(w.end_index, 1_000_000);
}

#[test]
fn list_item_queries() {
    let v = ListVirtualizer::new(ListOptions::new(100, layout(20).with_gap(5)));
    assert_eq!(v.item_start(0), Some(0));
    assert_eq!(v.item_start(4), Some(100));
    assert_eq!(v.item_end(4), Some(120));
    assert_eq!(v.item_size(4), Some(20));
    assert_eq!(v.item_start(100), None);
    assert_eq!(v.index_at_offset(101), Some(4));
}

#[test]
fn list_scroll_margin_shifts_items_and_gates_the_window() {
    let mut v = ListVirtualizer::new(
        ListOptions::new(100, layout(10)).with_scroll_margin(50),
    );
    v.set_viewport_size(30);

    // Viewport entirely before the list start.
    v.set_scroll_offset(10);
    assert!(v.visible_window().is_empty());

    v.set_scroll_offset(50);
    let w = v.visible_window();
    assert_eq!(w.start_index, 0);
    assert_eq!(v.item_start(0), Some(50));
    assert_eq!(v.index_at_offset(49), Some(0));
    assert_eq!(v.index_at_offset(75), Some(2));
    assert_eq!(v.max_scroll_offset(), 50 + 1000 - 30);
}

#[test]
fn list_for_each_visible_pairs_window_with_data() {
    let mut v = ListVirtualizer::new(ListOptions::new(1000, layout(10)).with_overscan(2));
    v.set_viewport_and_scroll(50, 300);

    let data: Vec<u64> = (0..1000).map(|i| i * 7).collect();
    let mut seen = Vec::new();
    v.for_each_visible(&data, |item, value| {
        assert_eq!(*value, item.index as u64 * 7);
        seen.push(item.index);
    });
    assert_eq!(seen.first(), Some(&28));
    assert!(seen.len() <= 5 + 1 + 2 * 2);

    // A data slice shorter than `count` truncates instead of panicking.
    let short: Vec<u64> = (0..20).map(|i| i * 7).collect();
    v.for_each_visible(&short, |_, _| panic!("window starts past the slice"));
}

#[test]
fn list_keyed_items_default_to_index_keys() {
    let mut v = ListVirtualizer::new(ListOptions::new(100, layout(1)));
    v.set_viewport_and_scroll(5, 50);
    let mut keys = Vec::new();
    v.for_each_virtual_item_keyed(|it| keys.push(it.key));
    assert_eq!(keys.first().copied(), Some(45));
}

#[test]
fn list_custom_keys_follow_indexes() {
    let mut v = ListVirtualizer::new(ListOptions::new_with_key(10, layout(1), |i| {
        1000u64 + i as u64
    }));
    v.set_viewport_size(3);
    let mut keys = Vec::new();
    v.for_each_virtual_item_keyed(|it| keys.push(it.key));
    assert_eq!(keys[0], 1000);
    let item = v.virtual_item_keyed_for_offset(2).unwrap();
    assert_eq!(item.key, 1002);
}

#[test]
fn list_scroll_to_index_alignments() {
    let mut v = ListVirtualizer::new(ListOptions::new(100, layout(10)));
    v.set_viewport_size(30);

    assert_eq!(v.scroll_to_index_offset(50, Align::Start), 500);
    assert_eq!(v.scroll_to_index_offset(50, Align::End), 510 - 30);
    assert_eq!(v.scroll_to_index_offset(50, Align::Center), 505 - 15);

    // Auto keeps an already-visible item in place.
    v.set_scroll_offset(500);
    assert_eq!(v.scroll_to_index_offset(51, Align::Auto), 500);
    // Auto scrolls backward to a preceding item.
    assert_eq!(v.scroll_to_index_offset(10, Align::Auto), 100);

    // Targets clamp to the scrollable extent.
    assert_eq!(v.scroll_to_index(99, Align::Start), 1000 - 30);
    assert_eq!(v.scroll_offset(), 970);
}

#[test]
fn list_scroll_padding_applies_to_scroll_to() {
    let mut v = ListVirtualizer::new(
        ListOptions::new(100, layout(10)).with_scroll_padding(2, 3),
    );
    v.set_viewport_size(30);
    assert_eq!(v.scroll_to_index_offset(50, Align::Start), 498);
    assert_eq!(v.scroll_to_index_offset(50, Align::End), 510 + 3 - 30);
}

#[test]
fn list_scroll_direction_and_debounce() {
    let mut v = ListVirtualizer::new(ListOptions::new(1000, layout(10)));
    v.set_viewport_size(100);

    v.apply_scroll_offset_event(500, 0);
    assert!(v.is_scrolling());
    assert_eq!(v.scroll_direction(), Some(ScrollDirection::Forward));

    v.apply_scroll_offset_event(300, 50);
    assert_eq!(v.scroll_direction(), Some(ScrollDirection::Backward));

    // Default reset delay is 150ms of quiet.
    v.update_scrolling(100);
    assert!(v.is_scrolling());
    v.update_scrolling(200);
    assert!(!v.is_scrolling());
    assert_eq!(v.scroll_direction(), None);
}

#[test]
fn list_scrollend_event_disables_debounce() {
    let mut v = ListVirtualizer::new(
        ListOptions::new(1000, layout(10)).with_use_scrollend_event(true),
    );
    v.set_viewport_size(100);
    v.apply_scroll_offset_event(500, 0);
    v.update_scrolling(10_000);
    assert!(v.is_scrolling());
    // The host delivers scrollend explicitly.
    v.set_is_scrolling(false);
    assert!(!v.is_scrolling());
}

#[test]
fn list_batch_update_coalesces_notifications() {
    let fired = Arc::new(AtomicUsize::new(0));
    let fired2 = Arc::clone(&fired);
    let mut v = ListVirtualizer::new(ListOptions::new(1000, layout(10)).with_on_change(
        Some(move |_: &ListVirtualizer, _| {
            fired2.fetch_add(1, Ordering::SeqCst);
        }),
    ));
    fired.store(0, Ordering::SeqCst);

    v.batch_update(|v| {
        v.set_viewport_size(100);
        v.set_scroll_offset(50);
        v.set_overscan(3);
    });
    assert_eq!(fired.load(Ordering::SeqCst), 1);

    // Nested batches still fire exactly once.
    fired.store(0, Ordering::SeqCst);
    v.batch_update(|v| {
        v.batch_update(|v| v.set_scroll_offset(60));
        v.set_scroll_offset(70);
    });
    assert_eq!(fired.load(Ordering::SeqCst), 1);

    // A no-op batch does not fire.
    fired.store(0, Ordering::SeqCst);
    v.batch_update(|_| {});
    assert_eq!(fired.load(Ordering::SeqCst), 0);
}

#[test]
fn list_snapshot_round_trip() {
    let mut v = ListVirtualizer::new(ListOptions::new(1000, layout(10)));
    v.set_scroll_rect(Rect {
        main: 120,
        cross: 80,
    });
    v.apply_scroll_offset_event(420, 7);

    let frame = v.frame_state();
    assert_eq!(frame.scroll.offset, 420);
    assert!(frame.scroll.is_scrolling);

    let mut restored = ListVirtualizer::new(ListOptions::new(1000, layout(10)));
    restored.restore_frame_state(frame, 1000);
    assert_eq!(restored.scroll_rect(), v.scroll_rect());
    assert_eq!(restored.scroll_offset(), 420);
    assert!(restored.is_scrolling());

    // Restoring an at-rest snapshot does not mark scrolling.
    let mut at_rest = frame;
    at_rest.scroll.is_scrolling = false;
    let mut restored = ListVirtualizer::new(ListOptions::new(1000, layout(10)));
    restored.restore_frame_state(at_rest, 1000);
    assert!(!restored.is_scrolling());
}

#[test]
fn list_disabled_returns_empty_results() {
    let mut v = ListVirtualizer::new(ListOptions::new(1000, layout(10)).with_enabled(false));
    v.set_viewport_and_scroll(100, 50);
    assert_eq!(v.total_size(), 0);
    assert!(v.window().is_empty());
    assert_eq!(v.item_start(0), None);
    assert_eq!(v.index_at_offset(0), None);

    v.set_enabled(true);
    v.set_viewport_and_scroll(100, 50);
    assert!(!v.window().is_empty());
}

#[test]
fn list_initial_offset_provider_is_resolved_on_construction() {
    static CALLS: AtomicU64 = AtomicU64::new(0);
    let v = ListVirtualizer::new(
        ListOptions::new(1000, layout(10)).with_initial_offset_provider(|| {
            CALLS.fetch_add(1, Ordering::SeqCst);
            230
        }),
    );
    assert_eq!(v.scroll_offset(), 230);
    assert_eq!(CALLS.load(Ordering::SeqCst), 1);
}

#[test]
fn list_update_options_keeps_scroll_state() {
    let mut v = ListVirtualizer::new(ListOptions::new(1000, layout(10)));
    v.set_viewport_and_scroll(100, 400);
    v.update_options(|o| o.count = 2000);
    assert_eq!(v.count(), 2000);
    assert_eq!(v.scroll_offset(), 400);
    assert_eq!(v.viewport_size(), 100);
}

// ---------------------------------------------------------------------------
// Grid virtualizer
// ---------------------------------------------------------------------------

fn cell_320x280_gap16() -> CellLayout {
    CellLayout::new(280, 320).unwrap().with_gap(16)
}

#[test]
fn grid_column_derivation() {
    let cell = cell_320x280_gap16();
    // floor((1200+16)/(320+16)) = floor(1216/336) = 3
    assert_eq!(cell.columns_for(1200), 3);
    assert_eq!(cell.columns_for(336 * 2 - 16), 2);
    // Narrow viewports clamp to a single column.
    assert_eq!(cell.columns_for(10), 1);
    assert_eq!(cell.columns_for(0), 1);
}

#[test]
fn grid_thousand_items_in_1200x600() {
    let mut v = GridVirtualizer::new(GridOptions::new(1000, cell_320x280_gap16()));
    v.set_scroll_rect(Rect {
        main: 600,
        cross: 1200,
    });

    assert_eq!(v.columns(), 3);
    assert_eq!(v.cell().row_layout().stride(), 296);
    assert_eq!(v.total_rows(), 334);

    let visible = v.visible_rows();
    assert_eq!(visible.start_row, 0);
    assert_eq!(visible.end_row, 4); // spans 3 rows plus the end padding row

    // Overscan widens in rows; the rendered set stays bounded.
    let b = v.band();
    assert_eq!(b.columns, 3);
    assert_eq!(b.rows.start_row, 0);
    assert_eq!(b.rows.end_row, 9);
    assert_eq!(b.offset, 0);
    assert_eq!(b.item_window.len(), 27);

    // Same geometry with 100x the items renders the same number of cells.
    let mut big = GridVirtualizer::new(GridOptions::new(100_000, cell_320x280_gap16()));
    big.set_scroll_rect(Rect {
        main: 600,
        cross: 1200,
    });
    assert_eq!(big.band().item_window.len(), 27);
}

#[test]
fn grid_cells_are_row_major_with_pixel_positions() {
    let mut v = GridVirtualizer::new(
        GridOptions::new(10, cell_320x280_gap16()).with_overscan_rows(0),
    );
    v.set_scroll_rect(Rect {
        main: 300,
        cross: 1200,
    });

    let mut cells = Vec::new();
    v.collect_virtual_cells(&mut cells);
    assert_eq!(cells[0].index, 0);
    assert_eq!((cells[0].row, cells[0].column), (0, 0));
    assert_eq!((cells[0].x, cells[0].y), (0, 0));
    assert_eq!(cells[1].column, 1);
    assert_eq!(cells[1].x, 336);
    assert_eq!(cells[3].row, 1);
    assert_eq!(cells[3].y, 296);

    // The last row is ragged: 10 items over 3 columns.
    let last = cells.last().unwrap();
    assert!(last.index < 10);
}

#[test]
fn grid_reflows_when_cross_size_changes() {
    let mut v = GridVirtualizer::new(GridOptions::new(1000, cell_320x280_gap16()));
    v.set_scroll_rect(Rect {
        main: 600,
        cross: 1200,
    });
    assert_eq!(v.columns(), 3);
    assert_eq!(v.total_rows(), 334);

    // Narrower viewport: columns and row count recompute immediately.
    v.set_scroll_rect(Rect {
        main: 600,
        cross: 800,
    });
    assert_eq!(v.columns(), 2);
    assert_eq!(v.total_rows(), 500);

    v.apply_scroll_frame(
        Rect {
            main: 600,
            cross: 400,
        },
        0,
        0,
    );
    assert_eq!(v.columns(), 1);
    assert_eq!(v.total_rows(), 1000);
}

#[test]
fn grid_empty_and_disabled_are_safe() {
    let mut v = GridVirtualizer::new(GridOptions::new(0, cell_320x280_gap16()));
    v.set_scroll_rect(Rect {
        main: 600,
        cross: 1200,
    });
    assert_eq!(v.total_size(), 0);
    assert!(v.rows().is_empty());
    let mut n = 0;
    v.for_each_virtual_cell(|_| n += 1);
    assert_eq!(n, 0);

    let mut v = GridVirtualizer::new(
        GridOptions::new(100, cell_320x280_gap16()).with_enabled(false),
    );
    v.set_scroll_rect(Rect {
        main: 600,
        cross: 1200,
    });
    assert_eq!(v.total_size(), 0);
    assert!(v.rows().is_empty());
}

#[test]
fn grid_scroll_to_index_targets_the_containing_row() {
    let mut v = GridVirtualizer::new(GridOptions::new(1000, cell_320x280_gap16()));
    v.set_scroll_rect(Rect {
        main: 600,
        cross: 1200,
    });

    // Item 7 is in row 2 (3 columns); row 2 starts at 2*296.
    assert_eq!(v.scroll_to_index_offset(7, Align::Start), 592);
    let off = v.scroll_to_index(7, Align::Start);
    assert_eq!(v.scroll_offset(), off);

    // End alignment puts the row's bottom edge at the viewport's bottom.
    assert_eq!(v.scroll_to_index_offset(7, Align::End), 592 + 280 - 600);
}

#[test]
fn grid_for_each_visible_pairs_cells_with_data() {
    let mut v = GridVirtualizer::new(
        GridOptions::new(10, cell_320x280_gap16()).with_overscan_rows(0),
    );
    v.set_scroll_rect(Rect {
        main: 300,
        cross: 1200,
    });
    let data: Vec<&str> = (0..10).map(|_| "card").collect();
    let mut n = 0;
    v.for_each_visible(&data, |cell, value| {
        assert_eq!(*value, "card");
        assert!(cell.index < 10);
        n += 1;
    });
    assert!(n > 0);
}

// ---------------------------------------------------------------------------
// Tail loader
// ---------------------------------------------------------------------------

fn counting_loader(threshold: u64) -> (TailLoader, Arc<AtomicUsize>) {
    let fired = Arc::new(AtomicUsize::new(0));
    let fired2 = Arc::clone(&fired);
    let mut loader = TailLoader::new(threshold);
    loader.attach(move || {
        fired2.fetch_add(1, Ordering::SeqCst);
    });
    (loader, fired)
}

const READY: PageState = PageState {
    has_next_page: true,
    is_loading: false,
};

#[test]
fn loader_fires_once_per_threshold_crossing() {
    let (mut loader, fired) = counting_loader(200);

    assert!(loader.observe(150, READY));
    assert_eq!(fired.load(Ordering::SeqCst), 1);

    // Still inside the threshold: no re-fire.
    assert!(!loader.observe(120, READY));
    assert!(!loader.observe(0, READY));
    assert_eq!(fired.load(Ordering::SeqCst), 1);

    // Leave and re-enter: fires again.
    assert!(!loader.observe(500, READY));
    assert!(loader.observe(190, READY));
    assert_eq!(fired.load(Ordering::SeqCst), 2);
}

#[test]
fn loader_never_fires_while_loading_or_exhausted() {
    let (mut loader, fired) = counting_loader(200);

    let loading = PageState {
        has_next_page: true,
        is_loading: true,
    };
    assert!(!loader.observe(0, loading));
    assert!(!loader.observe(0, loading));

    let exhausted = PageState {
        has_next_page: false,
        is_loading: false,
    };
    assert!(!loader.observe(0, exhausted));
    assert_eq!(fired.load(Ordering::SeqCst), 0);
}

#[test]
fn loader_rearms_after_a_loading_cycle() {
    let (mut loader, fired) = counting_loader(200);

    assert!(loader.observe(100, READY));
    assert_eq!(fired.load(Ordering::SeqCst), 1);

    // The caller starts its fetch; repeated visibility evaluations while the
    // request is in flight must not double-fire.
    let loading = PageState {
        has_next_page: true,
        is_loading: true,
    };
    assert!(!loader.observe(100, loading));
    assert!(!loader.observe(50, loading));
    assert_eq!(fired.load(Ordering::SeqCst), 1);

    // Fetch finished and appended too little to push the sentinel out:
    // the false -> true -> false cycle re-arms.
    assert!(loader.observe(180, READY));
    assert_eq!(fired.load(Ordering::SeqCst), 2);
}

#[test]
fn loader_detach_releases_the_callback() {
    let (mut loader, fired) = counting_loader(200);
    assert!(loader.is_attached());

    loader.detach();
    assert!(!loader.is_attached());
    assert!(!loader.observe(0, READY));
    assert_eq!(fired.load(Ordering::SeqCst), 0);

    // Idempotent.
    loader.detach();
}

#[test]
fn loader_observes_a_list_virtualizer() {
    let mut v = ListVirtualizer::new(ListOptions::new(1000, layout(20)));
    v.set_viewport_size(600);
    let (mut loader, fired) = counting_loader(200);

    // total = 20_000; sentinel enters at offset >= 20_000 - 600 - 200.
    v.set_scroll_offset(19_000);
    assert!(!loader.observe_list(&v, READY));

    v.set_scroll_offset(19_300);
    assert!(loader.observe_list(&v, READY));
    assert_eq!(fired.load(Ordering::SeqCst), 1);

    // Appending a page pushes the sentinel away and re-arms.
    v.set_count(2000);
    assert!(!loader.observe_list(&v, READY));
    v.set_scroll_offset(v.max_scroll_offset());
    assert!(loader.observe_list(&v, READY));
    assert_eq!(fired.load(Ordering::SeqCst), 2);
}

#[test]
fn loader_observes_a_grid_virtualizer() {
    let mut v = GridVirtualizer::new(GridOptions::new(100, cell_320x280_gap16()));
    v.set_scroll_rect(Rect {
        main: 600,
        cross: 1200,
    });
    let (mut loader, _fired) = counting_loader(200);

    assert!(!loader.observe_grid(&v, READY));
    v.set_scroll_offset(v.max_scroll_offset());
    assert!(loader.observe_grid(&v, READY));
}

// ---------------------------------------------------------------------------
// Snapshot persistence
// ---------------------------------------------------------------------------

#[cfg(feature = "serde")]
#[test]
fn serde_round_trips_snapshots_and_render_types() {
    let frame = FrameState {
        viewport: ViewportState {
            rect: Rect {
                main: 600,
                cross: 1200,
            },
        },
        scroll: ScrollState {
            offset: 4500,
            is_scrolling: true,
        },
    };
    let json = serde_json::to_string(&frame).unwrap();
    assert_eq!(serde_json::from_str::<FrameState>(&json).unwrap(), frame);

    let band = layout(100).band(5000, 600, 10_000, 5);
    let json = serde_json::to_string(&band).unwrap();
    assert_eq!(serde_json::from_str::<Band>(&json).unwrap(), band);

    // The keyed types are generic; round-tripping pins their derive bounds.
    let item = VirtualItemKeyed {
        key: 45u64,
        index: 45,
        start: 4500,
        size: 100,
    };
    let json = serde_json::to_string(&item).unwrap();
    let back: VirtualItemKeyed<u64> = serde_json::from_str(&json).unwrap();
    assert_eq!(
        (back.key, back.index, back.start, back.size),
        (item.key, item.index, item.start, item.size)
    );

    let cell = GridCellKeyed {
        key: 7u64,
        index: 7,
        row: 2,
        column: 1,
        x: 336,
        y: 592,
    };
    let json = serde_json::to_string(&cell).unwrap();
    let back: GridCellKeyed<u64> = serde_json::from_str(&json).unwrap();
    assert_eq!((back.key, back.row, back.column, back.y), (7, 2, 1, 592));
}
