use core::cmp;

use crate::{Rect, ScrollDirection};

/// Mutable scroll/viewport state shared by the linear and grid virtualizers.
///
/// Every mutator returns `true` when something actually changed, so the owning
/// virtualizer can decide whether to fire its `on_change` callback.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ScrollCore {
    pub rect: Rect,
    pub offset: u64,
    pub is_scrolling: bool,
    pub direction: Option<ScrollDirection>,
    pub last_scroll_event_ms: Option<u64>,
}

impl ScrollCore {
    pub fn new(rect: Rect, offset: u64) -> Self {
        Self {
            rect,
            offset,
            is_scrolling: false,
            direction: None,
            last_scroll_event_ms: None,
        }
    }

    pub fn viewport_main(&self) -> u32 {
        self.rect.main
    }

    pub fn set_rect(&mut self, rect: Rect) -> bool {
        if self.rect == rect {
            return false;
        }
        self.rect = rect;
        true
    }

    pub fn set_viewport_main(&mut self, main: u32) -> bool {
        if self.rect.main == main {
            return false;
        }
        self.rect.main = main;
        true
    }

    pub fn set_offset(&mut self, offset: u64) -> bool {
        if self.offset == offset {
            return false;
        }
        let prev = self.offset;
        self.offset = offset;
        self.direction = match offset.cmp(&prev) {
            cmp::Ordering::Greater => Some(ScrollDirection::Forward),
            cmp::Ordering::Less => Some(ScrollDirection::Backward),
            cmp::Ordering::Equal => self.direction,
        };
        true
    }

    pub fn set_is_scrolling(&mut self, is_scrolling: bool) -> bool {
        if self.is_scrolling == is_scrolling {
            return false;
        }
        self.is_scrolling = is_scrolling;
        if !is_scrolling {
            self.direction = None;
            self.last_scroll_event_ms = None;
        }
        true
    }

    /// Records a scroll event at `now_ms` and enters the Scrolling state.
    pub fn mark_scroll_event(&mut self, now_ms: u64) -> bool {
        self.last_scroll_event_ms = Some(now_ms);
        self.set_is_scrolling(true)
    }

    /// Whether the debounce fallback should leave the Scrolling state.
    pub fn scrolling_expired(&self, now_ms: u64, reset_delay_ms: u64) -> bool {
        if !self.is_scrolling {
            return false;
        }
        let Some(last) = self.last_scroll_event_ms else {
            return false;
        };
        now_ms.saturating_sub(last) >= reset_delay_ms
    }
}
