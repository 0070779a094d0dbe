use alloc::sync::Arc;
use alloc::vec::Vec;
use core::cell::Cell;

use crate::options::ListOptions;
use crate::scroll::ScrollCore;
use crate::{
    Align, Band, FrameState, InitialOffset, ItemKey, ItemWindow, LineLayout, Rect, ScrollDirection,
    ScrollState, ViewportState, VirtualItem, VirtualItemKeyed,
};

/// A headless windowed list engine.
///
/// This type is intentionally UI-agnostic:
/// - It does not hold any UI objects.
/// - Your adapter drives it by reporting viewport geometry and scroll offsets.
/// - Rendering is exposed via the [`Band`] contract and zero-allocation
///   iteration APIs (`for_each_virtual_*`, `for_each_visible`).
///
/// Item sizes are fixed (validated at [`LineLayout`] construction), so every
/// query is closed-form arithmetic; recomputing the window on each scroll
/// event is O(1) regardless of item count.
#[derive(Clone, Debug)]
pub struct ListVirtualizer<K = ItemKey> {
    options: ListOptions<K>,
    core: ScrollCore,

    notify_depth: Cell<usize>,
    notify_pending: Cell<bool>,
}

impl<K> ListVirtualizer<K> {
    /// Creates a new virtualizer from options.
    ///
    /// If `options.initial_rect` and/or `options.initial_offset` are set,
    /// those values are applied immediately.
    pub fn new(options: ListOptions<K>) -> Self {
        let rect = options.initial_rect.unwrap_or_default();
        let offset = options.initial_offset.resolve();
        sbdebug!(
            count = options.count,
            enabled = options.enabled,
            overscan = options.overscan,
            "ListVirtualizer::new"
        );
        Self {
            core: ScrollCore::new(rect, offset),
            options,
            notify_depth: Cell::new(0),
            notify_pending: Cell::new(false),
        }
    }

    pub fn options(&self) -> &ListOptions<K> {
        &self.options
    }

    pub fn layout(&self) -> &LineLayout {
        &self.options.layout
    }

    fn reset_to_initial(&mut self) {
        let rect = self.options.initial_rect.unwrap_or_default();
        let offset = self.options.initial_offset.resolve();
        self.core = ScrollCore::new(rect, offset);
    }

    pub fn set_options(&mut self, options: ListOptions<K>) {
        let was_enabled = self.options.enabled;
        self.options = options;
        sbtrace!(
            count = self.options.count,
            enabled = self.options.enabled,
            overscan = self.options.overscan,
            "ListVirtualizer::set_options"
        );

        if !self.options.enabled {
            self.core = ScrollCore::new(Rect::default(), self.options.initial_offset.resolve());
        } else if !was_enabled {
            self.reset_to_initial();
        }

        self.notify();
    }

    /// Clones the current options, applies `f`, then delegates to
    /// `set_options`.
    pub fn update_options(&mut self, f: impl FnOnce(&mut ListOptions<K>)) {
        let mut next = self.options.clone();
        f(&mut next);
        self.set_options(next);
    }

    pub fn set_on_change(
        &mut self,
        on_change: Option<impl Fn(&ListVirtualizer<K>, bool) + Send + Sync + 'static>,
    ) {
        self.options.on_change = on_change.map(|f| Arc::new(f) as _);
        self.notify();
    }

    pub fn set_initial_offset(&mut self, initial_offset: u64) {
        self.options.initial_offset = InitialOffset::Value(initial_offset);
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
    ///
    /// Recommended for UI adapters: on a typical frame you might update the
    /// scroll rect, scroll offset, and `is_scrolling` state together. Without
    /// batching, each setter may trigger `on_change`, which can be expensive
    /// if the callback drives rendering.
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

    pub fn set_overscan(&mut self, overscan: usize) {
        self.options.overscan = overscan;
        self.notify();
    }

    /// Replaces the list geometry (item size, gap, padding).
    pub fn set_layout(&mut self, layout: LineLayout) {
        if self.options.layout == layout {
            return;
        }
        self.options.layout = layout;
        self.notify();
    }

    pub fn set_scroll_margin(&mut self, scroll_margin: u32) {
        self.options.scroll_margin = scroll_margin;
        self.notify();
    }

    pub fn set_scroll_padding(&mut self, scroll_padding_start: u32, scroll_padding_end: u32) {
        self.options.scroll_padding_start = scroll_padding_start;
        self.options.scroll_padding_end = scroll_padding_end;
        self.notify();
    }

    pub fn set_get_item_key(&mut self, f: impl Fn(usize) -> K + Send + Sync + 'static) {
        self.options.get_item_key = Arc::new(f);
        self.notify();
    }

    pub fn key_for(&self, index: usize) -> K {
        (self.options.get_item_key)(index)
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

    /// Debounce fallback: leaves the Scrolling state once no scroll event has
    /// arrived for `is_scrolling_reset_delay_ms`.
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

    pub fn scroll_offset_in_list(&self) -> u64 {
        self.core
            .offset
            .saturating_sub(self.options.scroll_margin as u64)
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

    pub fn set_viewport_and_scroll(&mut self, viewport_size: u32, scroll_offset: u64) {
        self.batch_update(|v| {
            v.set_viewport_size(viewport_size);
            v.set_scroll_offset(scroll_offset);
        });
    }

    pub fn set_viewport_and_scroll_clamped(&mut self, viewport_size: u32, scroll_offset: u64) {
        self.batch_update(|v| {
            v.set_viewport_size(viewport_size);
            v.set_scroll_offset_clamped(scroll_offset);
        });
    }

    /// Applies a scroll offset update from your UI layer (e.g. wheel/drag),
    /// and marks the virtualizer as scrolling.
    pub fn apply_scroll_offset_event(&mut self, offset: u64, now_ms: u64) {
        sbtrace!(offset, now_ms, "apply_scroll_offset_event");
        self.batch_update(|v| {
            v.set_scroll_offset(offset);
            v.notify_scroll_event(now_ms);
        });
    }

    /// Same as `apply_scroll_offset_event`, but clamps the offset.
    pub fn apply_scroll_offset_event_clamped(&mut self, offset: u64, now_ms: u64) {
        sbtrace!(offset, now_ms, "apply_scroll_offset_event_clamped");
        self.batch_update(|v| {
            v.set_scroll_offset_clamped(offset);
            v.notify_scroll_event(now_ms);
        });
    }

    pub fn apply_scroll_rect_event(&mut self, rect: Rect) {
        self.batch_update(|v| {
            v.set_scroll_rect(rect);
        });
    }

    /// Applies both scroll rect and scroll offset in a single coalesced
    /// update.
    ///
    /// This is the recommended entry point for UI adapters that receive
    /// scroll events along with updated viewport information.
    pub fn apply_scroll_frame(&mut self, rect: Rect, scroll_offset: u64, now_ms: u64) {
        sbtrace!(
            rect_main = rect.main,
            rect_cross = rect.cross,
            scroll_offset,
            now_ms,
            "apply_scroll_frame"
        );
        self.batch_update(|v| {
            v.set_scroll_rect(rect);
            v.set_scroll_offset(scroll_offset);
            v.notify_scroll_event(now_ms);
        });
    }

    /// Same as `apply_scroll_frame`, but clamps the offset.
    pub fn apply_scroll_frame_clamped(&mut self, rect: Rect, scroll_offset: u64, now_ms: u64) {
        self.batch_update(|v| {
            v.set_scroll_rect(rect);
            v.set_scroll_offset_clamped(scroll_offset);
            v.notify_scroll_event(now_ms);
        });
    }

    /// Returns a lightweight snapshot of the current viewport state.
    pub fn viewport_state(&self) -> ViewportState {
        ViewportState {
            rect: self.core.rect,
        }
    }

    /// Returns a lightweight snapshot of the current scroll state.
    pub fn scroll_state(&self) -> ScrollState {
        ScrollState {
            offset: self.core.offset,
            is_scrolling: self.core.is_scrolling,
        }
    }

    /// Returns a combined snapshot of viewport + scroll state.
    pub fn frame_state(&self) -> FrameState {
        FrameState {
            viewport: self.viewport_state(),
            scroll: self.scroll_state(),
        }
    }

    pub fn restore_viewport_state(&mut self, viewport: ViewportState) {
        self.set_scroll_rect(viewport.rect);
    }

    /// Restores scroll state from a previously captured snapshot.
    ///
    /// When `scroll.is_scrolling` is `true`, this updates the internal
    /// scrolling timers as if a scroll event happened at `now_ms`.
    pub fn restore_scroll_state(&mut self, scroll: ScrollState, now_ms: u64) {
        if scroll.is_scrolling {
            self.apply_scroll_offset_event_clamped(scroll.offset, now_ms);
            return;
        }
        self.batch_update(|v| {
            v.set_scroll_offset_clamped(scroll.offset);
            v.set_is_scrolling(false);
        });
    }

    /// Restores both viewport + scroll state from a previously captured
    /// snapshot.
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

    /// Total scrollable extent of the list (excludes `scroll_margin`).
    pub fn total_size(&self) -> u64 {
        if !self.options.enabled {
            return 0;
        }
        self.options.layout.total_size(self.options.count)
    }

    pub fn max_scroll_offset(&self) -> u64 {
        if !self.options.enabled {
            return self.options.initial_offset.resolve();
        }
        let margin = self.options.scroll_margin as u64;
        let view = self.core.viewport_main() as u64;
        margin.saturating_add(self.total_size().saturating_sub(view))
    }

    pub fn clamp_scroll_offset(&self, offset: u64) -> u64 {
        offset.min(self.max_scroll_offset())
    }

    /// Pixels between the viewport's trailing edge and the end of the list.
    ///
    /// This is the quantity the tail loader compares against its threshold.
    pub fn distance_to_end(&self) -> u64 {
        let margin = self.options.scroll_margin as u64;
        let extent = margin.saturating_add(self.total_size());
        let seen = self
            .core
            .offset
            .saturating_add(self.core.viewport_main() as u64);
        extent.saturating_sub(seen)
    }

    /// The strictly visible window (no overscan).
    pub fn visible_window(&self) -> ItemWindow {
        self.visible_window_for(self.core.offset, self.core.viewport_main())
    }

    pub fn visible_window_for(&self, scroll_offset: u64, viewport_size: u32) -> ItemWindow {
        if !self.options.enabled {
            return ItemWindow::EMPTY;
        }
        let margin = self.options.scroll_margin as u64;
        if scroll_offset.saturating_add(viewport_size as u64) <= margin {
            return ItemWindow::EMPTY;
        }
        self.options.layout.visible_window(
            scroll_offset.saturating_sub(margin),
            viewport_size,
            self.options.count,
        )
    }

    /// The overscanned window actually rendered.
    pub fn window(&self) -> ItemWindow {
        self.window_for(self.core.offset, self.core.viewport_main())
    }

    pub fn window_for(&self, scroll_offset: u64, viewport_size: u32) -> ItemWindow {
        let visible = self.visible_window_for(scroll_offset, viewport_size);
        if visible.is_empty() {
            return visible;
        }
        let overscan = self.options.overscan;
        ItemWindow {
            start_index: visible.start_index.saturating_sub(overscan),
            end_index: visible
                .end_index
                .saturating_add(overscan)
                .min(self.options.count),
        }
    }

    /// The full render contract for the current state.
    ///
    /// `band.offset` is absolute within the scroll element (includes
    /// `scroll_margin`), matching [`VirtualItem::start`].
    pub fn band(&self) -> Band {
        self.band_for(self.core.offset, self.core.viewport_main())
    }

    pub fn band_for(&self, scroll_offset: u64, viewport_size: u32) -> Band {
        let window = self.window_for(scroll_offset, viewport_size);
        let offset = if window.is_empty() {
            0
        } else {
            self.item_start_unchecked(window.start_index)
        };
        Band {
            window,
            offset,
            total_size: self.total_size(),
        }
    }

    pub fn item_start(&self, index: usize) -> Option<u64> {
        if !self.options.enabled || index >= self.options.count {
            return None;
        }
        Some(self.item_start_unchecked(index))
    }

    pub fn item_size(&self, index: usize) -> Option<u32> {
        if !self.options.enabled || index >= self.options.count {
            return None;
        }
        Some(self.options.layout.item_size())
    }

    pub fn item_end(&self, index: usize) -> Option<u64> {
        let start = self.item_start(index)?;
        let size = self.item_size(index)? as u64;
        Some(start.saturating_add(size))
    }

    fn item_start_unchecked(&self, index: usize) -> u64 {
        let margin = self.options.scroll_margin as u64;
        margin.saturating_add(self.options.layout.item_start(index))
    }

    fn item(&self, index: usize) -> VirtualItem {
        VirtualItem {
            index,
            start: self.item_start_unchecked(index),
            size: self.options.layout.item_size(),
        }
    }

    pub fn index_at_offset(&self, offset: u64) -> Option<usize> {
        if !self.options.enabled {
            return None;
        }
        let margin = self.options.scroll_margin as u64;
        if offset < margin {
            return (self.options.count > 0).then_some(0);
        }
        self.options
            .layout
            .index_at_offset(offset - margin, self.options.count)
    }

    pub fn virtual_item_for_offset(&self, offset: u64) -> Option<VirtualItem> {
        let index = self.index_at_offset(offset)?;
        Some(self.item(index))
    }

    pub fn virtual_item_keyed_for_offset(&self, offset: u64) -> Option<VirtualItemKeyed<K>> {
        let index = self.index_at_offset(offset)?;
        let item = self.item(index);
        Some(VirtualItemKeyed {
            key: self.key_for(index),
            index: item.index,
            start: item.start,
            size: item.size,
        })
    }

    pub fn for_each_virtual_index(&self, f: impl FnMut(usize)) {
        self.for_each_virtual_index_for(self.core.offset, self.core.viewport_main(), f);
    }

    pub fn for_each_virtual_index_for(
        &self,
        scroll_offset: u64,
        viewport_size: u32,
        mut f: impl FnMut(usize),
    ) {
        let window = self.window_for(scroll_offset, viewport_size);
        for i in window.start_index..window.end_index {
            f(i);
        }
    }

    pub fn for_each_virtual_item(&self, f: impl FnMut(VirtualItem)) {
        self.for_each_virtual_item_for(self.core.offset, self.core.viewport_main(), f);
    }

    pub fn for_each_virtual_item_for(
        &self,
        scroll_offset: u64,
        viewport_size: u32,
        mut f: impl FnMut(VirtualItem),
    ) {
        let window = self.window_for(scroll_offset, viewport_size);
        for i in window.start_index..window.end_index {
            f(self.item(i));
        }
    }

    pub fn for_each_virtual_item_keyed(&self, f: impl FnMut(VirtualItemKeyed<K>)) {
        self.for_each_virtual_item_keyed_for(self.core.offset, self.core.viewport_main(), f);
    }

    pub fn for_each_virtual_item_keyed_for(
        &self,
        scroll_offset: u64,
        viewport_size: u32,
        mut f: impl FnMut(VirtualItemKeyed<K>),
    ) {
        let window = self.window_for(scroll_offset, viewport_size);
        for i in window.start_index..window.end_index {
            let item = self.item(i);
            f(VirtualItemKeyed {
                key: self.key_for(i),
                index: item.index,
                start: item.start,
                size: item.size,
            });
        }
    }

    /// Pairs the rendered window with the caller's data.
    ///
    /// This is the render contract: `f` is called once per windowed item with
    /// its pixel geometry and a reference into `items`. The iteration is
    /// bounded by `min(count, items.len())`, so a data set shorter than
    /// `count` never panics.
    pub fn for_each_visible<'a, T>(
        &self,
        items: &'a [T],
        mut f: impl FnMut(VirtualItem, &'a T),
    ) {
        let window = self.window();
        let end = window.end_index.min(items.len());
        for i in window.start_index..end {
            f(self.item(i), &items[i]);
        }
    }

    /// Collects windowed item indexes into `out` (clears `out` first).
    ///
    /// Convenience wrapper around [`Self::for_each_virtual_index`]; prefer
    /// the iteration APIs with a reused scratch buffer in hot paths.
    pub fn collect_virtual_indexes(&self, out: &mut Vec<usize>) {
        out.clear();
        self.for_each_virtual_index(|i| out.push(i));
    }

    /// Collects windowed items into `out` (clears `out` first).
    pub fn collect_virtual_items(&self, out: &mut Vec<VirtualItem>) {
        out.clear();
        self.for_each_virtual_item(|it| out.push(it));
    }

    /// Collects keyed windowed items into `out` (clears `out` first).
    pub fn collect_virtual_items_keyed(&self, out: &mut Vec<VirtualItemKeyed<K>>) {
        out.clear();
        self.for_each_virtual_item_keyed(|it| out.push(it));
    }

    /// Programmatically scrolls to an index (no animation).
    ///
    /// This sets the internal `scroll_offset` to the computed (clamped)
    /// target and triggers `on_change`. It does **not** mark the virtualizer
    /// as "scrolling"; for user-scrolling semantics, feed the returned offset
    /// through `apply_scroll_offset_event_clamped` instead.
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
        let item = self.item(index);

        let sp_start = self.options.scroll_padding_start as u64;
        let sp_end = self.options.scroll_padding_end as u64;
        let view = self.core.viewport_main() as u64;

        let target = match align {
            Align::Start => item.start.saturating_sub(sp_start),
            Align::End => item.end().saturating_add(sp_end).saturating_sub(view),
            Align::Center => {
                let center = item.start.saturating_add(item.size as u64 / 2);
                center.saturating_sub(view / 2)
            }
            Align::Auto => {
                let cur = self.core.offset;
                let cur_end = cur.saturating_add(view);
                if item.start >= cur && item.end() <= cur_end {
                    cur
                } else if item.start < cur {
                    item.start.saturating_sub(sp_start)
                } else {
                    item.end().saturating_add(sp_end).saturating_sub(view)
                }
            }
        };

        self.clamp_scroll_offset(target)
    }
}
