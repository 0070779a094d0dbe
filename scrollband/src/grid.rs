use alloc::sync::Arc;
use alloc::vec::Vec;
use core::cell::Cell;

use crate::options::GridOptions;
use crate::scroll::ScrollCore;
use crate::{
    Align, CellLayout, FrameState, GridBand, GridCell, GridCellKeyed, InitialOffset, ItemKey,
    ItemWindow, Rect, RowWindow, ScrollDirection, ScrollState, ViewportState,
};

/// A headless windowed grid engine.
///
/// Rows are virtualized with the same fixed-size arithmetic as
/// [`crate::ListVirtualizer`]; the column count is derived from the current
/// cross-axis viewport size on every query, never cached, so a cross-axis
/// resize reported through `set_scroll_rect`/`apply_scroll_frame` reflows the
/// grid on the next read.
#[derive(Clone, Debug)]
pub struct GridVirtualizer<K = ItemKey> {
    options: GridOptions<K>,
    core: ScrollCore,

    notify_depth: Cell<usize>,
    notify_pending: Cell<bool>,
}

impl<K> GridVirtualizer<K> {
    pub fn new(options: GridOptions<K>) -> Self {
        let rect = options.initial_rect.unwrap_or_default();
        let offset = options.initial_offset.resolve();
        sbdebug!(
            count = options.count,
            enabled = options.enabled,
            overscan_rows = options.overscan_rows,
            "GridVirtualizer::new"
        );
        Self {
            core: ScrollCore::new(rect, offset),
            options,
            notify_depth: Cell::new(0),
            notify_pending: Cell::new(false),
        }
    }

    pub fn options(&self) -> &GridOptions<K> {
        &self.options
    }

    pub fn cell(&self) -> &CellLayout {
        &self.options.cell
    }

    fn reset_to_initial(&mut self) {
        let rect = self.options.initial_rect.unwrap_or_default();
        let offset = self.options.initial_offset.resolve();
        self.core = ScrollCore::new(rect, offset);
    }

    pub fn set_options(&mut self, options: GridOptions<K>) {
        let was_enabled = self.options.enabled;
        self.options = options;
        sbtrace!(
            count = self.options.count,
            enabled = self.options.enabled,
            "GridVirtualizer::set_options"
        );

        if !self.options.enabled {
            self.core = ScrollCore::new(Rect::default(), self.options.initial_offset.resolve());
        } else if !was_enabled {
            self.reset_to_initial();
        }

        self.notify();
    }

    pub fn update_options(&mut self, f: impl FnOnce(&mut GridOptions<K>)) {
        let mut next = self.options.clone();
        f(&mut next);
        self.set_options(next);
    }

    pub fn set_on_change(
        &mut self,
        on_change: Option<impl Fn(&GridVirtualizer<K>, bool) + Send + Sync + 'static>,
    ) {
        self.options.on_change = on_change.map(|f| Arc::new(f) as _);
        self.notify();
    }

    fn notify_now(&self) {
        if let Some(cb) = &self.options.on_change {
            cb(self, self.core.is_scrolling);
        }
    }

    fn notify(&self) {
        if self.notify_depth.get() > 0 {
            self.notify_pending.set(true);
            return;
        }
        self.notify_now();
    }

    /// Batches multiple updates into a single `on_change` notification.
    pub fn batch_update(&mut self, f: impl FnOnce(&mut Self)) {
        let depth = self.notify_depth.get();
        self.notify_depth.set(depth.saturating_add(1));

        f(self);

        let depth = self.notify_depth.get();
        debug_assert!(depth > 0, "notify_depth underflow");
        let next = depth.saturating_sub(1);
        self.notify_depth.set(next);

        if next == 0 && self.notify_pending.replace(false) {
            self.notify_now();
        }
    }

    pub fn count(&self) -> usize {
        self.options.count
    }

    pub fn set_count(&mut self, count: usize) {
        if self.options.count == count {
            return;
        }
        self.options.count = count;
        self.notify();
    }

    pub fn enabled(&self) -> bool {
        self.options.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        if self.options.enabled == enabled {
            return;
        }
        self.options.enabled = enabled;
        if !enabled {
            self.core = ScrollCore::new(Rect::default(), self.options.initial_offset.resolve());
        } else {
            self.reset_to_initial();
        }
        self.notify();
    }

    pub fn set_overscan_rows(&mut self, overscan_rows: usize) {
        self.options.overscan_rows = overscan_rows;
        self.notify();
    }

    /// Replaces the cell geometry.
    pub fn set_cell(&mut self, cell: CellLayout) {
        if self.options.cell == cell {
            return;
        }
        self.options.cell = cell;
        self.notify();
    }

    pub fn set_get_item_key(&mut self, f: impl Fn(usize) -> K + Send + Sync + 'static) {
        self.options.get_item_key = Arc::new(f);
        self.notify();
    }

    pub fn key_for(&self, index: usize) -> K {
        (self.options.get_item_key)(index)
    }

    pub fn set_initial_offset(&mut self, initial_offset: u64) {
        self.options.initial_offset = InitialOffset::Value(initial_offset);
        self.notify();
    }

    pub fn is_scrolling(&self) -> bool {
        self.core.is_scrolling
    }

    pub fn scroll_direction(&self) -> Option<ScrollDirection> {
        self.core.direction
    }

    pub fn set_is_scrolling(&mut self, is_scrolling: bool) {
        if self.core.set_is_scrolling(is_scrolling) {
            self.notify();
        }
    }

    pub fn notify_scroll_event(&mut self, now_ms: u64) {
        if !self.options.enabled {
            return;
        }
        self.core.mark_scroll_event(now_ms);
        self.notify();
    }

    pub fn update_scrolling(&mut self, now_ms: u64) {
        if !self.options.enabled || self.options.use_scrollend_event {
            return;
        }
        if self
            .core
            .scrolling_expired(now_ms, self.options.is_scrolling_reset_delay_ms)
        {
            self.set_is_scrolling(false);
        }
    }

    pub fn viewport_size(&self) -> u32 {
        self.core.viewport_main()
    }

    pub fn scroll_rect(&self) -> Rect {
        self.core.rect
    }

    pub fn scroll_offset(&self) -> u64 {
        self.core.offset
    }

    pub fn set_scroll_rect(&mut self, rect: Rect) {
        if self.core.set_rect(rect) {
            self.notify();
        }
    }

    pub fn set_viewport_size(&mut self, size: u32) {
        if self.core.set_viewport_main(size) {
            self.notify();
        }
    }

    pub fn set_scroll_offset(&mut self, offset: u64) {
        if self.core.set_offset(offset) {
            self.notify();
        }
    }

    pub fn set_scroll_offset_clamped(&mut self, offset: u64) {
        let clamped = self.clamp_scroll_offset(offset);
        self.set_scroll_offset(clamped);
    }

    pub fn apply_scroll_offset_event(&mut self, offset: u64, now_ms: u64) {
        sbtrace!(offset, now_ms, "grid apply_scroll_offset_event");
        self.batch_update(|v| {
            v.set_scroll_offset(offset);
            v.notify_scroll_event(now_ms);
        });
    }

    pub fn apply_scroll_offset_event_clamped(&mut self, offset: u64, now_ms: u64) {
        self.batch_update(|v| {
            v.set_scroll_offset_clamped(offset);
            v.notify_scroll_event(now_ms);
        });
    }

    /// Applies both scroll rect and scroll offset in a single coalesced
    /// update.
    ///
    /// A cross-axis size change delivered here changes `columns()` on the
    /// next query.
    pub fn apply_scroll_frame(&mut self, rect: Rect, scroll_offset: u64, now_ms: u64) {
        sbtrace!(
            rect_main = rect.main,
            rect_cross = rect.cross,
            scroll_offset,
            now_ms,
            "grid apply_scroll_frame"
        );
        self.batch_update(|v| {
            v.set_scroll_rect(rect);
            v.set_scroll_offset(scroll_offset);
            v.notify_scroll_event(now_ms);
        });
    }

    pub fn apply_scroll_frame_clamped(&mut self, rect: Rect, scroll_offset: u64, now_ms: u64) {
        self.batch_update(|v| {
            v.set_scroll_rect(rect);
            v.set_scroll_offset_clamped(scroll_offset);
            v.notify_scroll_event(now_ms);
        });
    }

    pub fn viewport_state(&self) -> ViewportState {
        ViewportState {
            rect: self.core.rect,
        }
    }

    pub fn scroll_state(&self) -> ScrollState {
        ScrollState {
            offset: self.core.offset,
            is_scrolling: self.core.is_scrolling,
        }
    }

    pub fn frame_state(&self) -> FrameState {
        FrameState {
            viewport: self.viewport_state(),
            scroll: self.scroll_state(),
        }
    }

    pub fn restore_frame_state(&mut self, frame: FrameState, now_ms: u64) {
        if frame.scroll.is_scrolling {
            self.apply_scroll_frame_clamped(frame.viewport.rect, frame.scroll.offset, now_ms);
            return;
        }
        self.batch_update(|v| {
            v.set_scroll_rect(frame.viewport.rect);
            v.set_scroll_offset_clamped(frame.scroll.offset);
            v.set_is_scrolling(false);
        });
    }

    /// Columns that fit in the current cross-axis viewport, clamped >= 1.
    ///
    /// Derived on every call so the grid reflows with the viewport.
    pub fn columns(&self) -> usize {
        self.options.cell.columns_for(self.core.rect.cross)
    }

    pub fn total_rows(&self) -> usize {
        self.options.cell.rows_for(self.options.count, self.columns())
    }

    /// Total scrollable extent of the grid.
    pub fn total_size(&self) -> u64 {
        if !self.options.enabled {
            return 0;
        }
        self.options.cell.row_layout().total_size(self.total_rows())
    }

    pub fn max_scroll_offset(&self) -> u64 {
        if !self.options.enabled {
            return self.options.initial_offset.resolve();
        }
        let view = self.core.viewport_main() as u64;
        self.total_size().saturating_sub(view)
    }

    pub fn clamp_scroll_offset(&self, offset: u64) -> u64 {
        offset.min(self.max_scroll_offset())
    }

    /// Pixels between the viewport's trailing edge and the end of the grid.
    pub fn distance_to_end(&self) -> u64 {
        let seen = self
            .core
            .offset
            .saturating_add(self.core.viewport_main() as u64);
        self.total_size().saturating_sub(seen)
    }

    /// The strictly visible row window (no overscan).
    pub fn visible_rows(&self) -> RowWindow {
        self.visible_rows_for(self.core.offset, self.core.viewport_main())
    }

    pub fn visible_rows_for(&self, scroll_offset: u64, viewport_size: u32) -> RowWindow {
        if !self.options.enabled {
            return RowWindow::EMPTY;
        }
        let window = self.options.cell.row_layout().visible_window(
            scroll_offset,
            viewport_size,
            self.total_rows(),
        );
        RowWindow {
            start_row: window.start_index,
            end_row: window.end_index,
        }
    }

    /// The overscanned row window actually rendered.
    pub fn rows(&self) -> RowWindow {
        self.rows_for(self.core.offset, self.core.viewport_main())
    }

    pub fn rows_for(&self, scroll_offset: u64, viewport_size: u32) -> RowWindow {
        let visible = self.visible_rows_for(scroll_offset, viewport_size);
        if visible.is_empty() {
            return visible;
        }
        let overscan = self.options.overscan_rows;
        RowWindow {
            start_row: visible.start_row.saturating_sub(overscan),
            end_row: visible
                .end_row
                .saturating_add(overscan)
                .min(self.total_rows()),
        }
    }

    /// The rendered row window expanded to item indexes, end clamped to
    /// `count`.
    pub fn item_window(&self) -> ItemWindow {
        self.item_window_for(self.core.offset, self.core.viewport_main())
    }

    pub fn item_window_for(&self, scroll_offset: u64, viewport_size: u32) -> ItemWindow {
        let rows = self.rows_for(scroll_offset, viewport_size);
        if rows.is_empty() {
            return ItemWindow::EMPTY;
        }
        let columns = self.columns();
        ItemWindow {
            start_index: rows.start_row.saturating_mul(columns),
            end_index: rows
                .end_row
                .saturating_mul(columns)
                .min(self.options.count),
        }
    }

    /// The full render contract for the current state.
    ///
    /// `band.offset` is the main-axis start of the first rendered row; the
    /// band lays cells out in `band.columns` tracks.
    pub fn band(&self) -> GridBand {
        self.band_for(self.core.offset, self.core.viewport_main())
    }

    pub fn band_for(&self, scroll_offset: u64, viewport_size: u32) -> GridBand {
        let rows = self.rows_for(scroll_offset, viewport_size);
        let columns = self.columns();
        let item_window = if rows.is_empty() {
            ItemWindow::EMPTY
        } else {
            ItemWindow {
                start_index: rows.start_row.saturating_mul(columns),
                end_index: rows
                    .end_row
                    .saturating_mul(columns)
                    .min(self.options.count),
            }
        };
        let offset = if rows.is_empty() {
            0
        } else {
            self.options.cell.row_layout().item_start(rows.start_row)
        };
        GridBand {
            rows,
            item_window,
            columns,
            offset,
            total_size: self.total_size(),
        }
    }

    /// Row containing the item at `index` under the current column count.
    pub fn row_of(&self, index: usize) -> usize {
        index / self.columns()
    }

    pub fn for_each_virtual_cell(&self, f: impl FnMut(GridCell)) {
        self.for_each_virtual_cell_for(self.core.offset, self.core.viewport_main(), f);
    }

    pub fn for_each_virtual_cell_for(
        &self,
        scroll_offset: u64,
        viewport_size: u32,
        mut f: impl FnMut(GridCell),
    ) {
        let rows = self.rows_for(scroll_offset, viewport_size);
        if rows.is_empty() {
            return;
        }
        let columns = self.columns();
        let row_layout = self.options.cell.row_layout();
        let count = self.options.count;

        for row in rows.start_row..rows.end_row {
            let y = row_layout.item_start(row);
            for column in 0..columns {
                let index = row * columns + column;
                if index >= count {
                    return;
                }
                f(GridCell {
                    index,
                    row,
                    column,
                    x: self.options.cell.cell_cross_offset(column),
                    y,
                });
            }
        }
    }

    pub fn for_each_virtual_cell_keyed(&self, mut f: impl FnMut(GridCellKeyed<K>)) {
        self.for_each_virtual_cell(|cell| {
            f(GridCellKeyed {
                key: self.key_for(cell.index),
                index: cell.index,
                row: cell.row,
                column: cell.column,
                x: cell.x,
                y: cell.y,
            });
        });
    }

    /// Pairs the rendered cells with the caller's data.
    ///
    /// Bounded by `min(count, items.len())`; see
    /// [`crate::ListVirtualizer::for_each_visible`].
    pub fn for_each_visible<'a, T>(&self, items: &'a [T], mut f: impl FnMut(GridCell, &'a T)) {
        let len = items.len();
        self.for_each_virtual_cell(|cell| {
            if cell.index < len {
                f(cell, &items[cell.index]);
            }
        });
    }

    /// Collects rendered cells into `out` (clears `out` first).
    pub fn collect_virtual_cells(&self, out: &mut Vec<GridCell>) {
        out.clear();
        self.for_each_virtual_cell(|cell| out.push(cell));
    }

    /// Programmatically scrolls so the row containing `index` is aligned.
    ///
    /// Returns the applied (clamped) offset.
    pub fn scroll_to_index(&mut self, index: usize, align: Align) -> u64 {
        let offset = self.scroll_to_index_offset(index, align);
        self.set_scroll_offset(offset);
        offset
    }

    pub fn scroll_to_index_offset(&self, index: usize, align: Align) -> u64 {
        if !self.options.enabled {
            return self.options.initial_offset.resolve();
        }
        if self.options.count == 0 {
            return 0;
        }
        let index = index.min(self.options.count - 1);
        let row = self.row_of(index);
        let row_layout = self.options.cell.row_layout();
        let start = row_layout.item_start(row);
        let end = row_layout.item_end(row);
        let view = self.core.viewport_main() as u64;

        let target = match align {
            Align::Start => start,
            Align::End => end.saturating_sub(view),
            Align::Center => {
                let center = start.saturating_add(self.options.cell.item_main() as u64 / 2);
                center.saturating_sub(view / 2)
            }
            Align::Auto => {
                let cur = self.core.offset;
                let cur_end = cur.saturating_add(view);
                if start >= cur && end <= cur_end {
                    cur
                } else if start < cur {
                    start
                } else {
                    end.saturating_sub(view)
                }
            }
        };

        self.clamp_scroll_offset(target)
    }
}
