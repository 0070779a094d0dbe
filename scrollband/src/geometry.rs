use crate::{Band, ItemWindow, LayoutError};

/// Fixed-size layout of a single-column sequence along the scroll axis.
///
/// All queries are pure arithmetic: no allocation, no side effects, and every
/// operation saturates instead of overflowing. A `LineLayout` is the shared
/// geometry engine behind both the linear and the grid virtualizer (a grid row
/// is a line item of size `item_main`).
///
/// The item size must be positive; [`LineLayout::new`] rejects zero so that no
/// query ever divides by zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LineLayout {
    item_size: u32,
    gap: u32,
    padding_start: u32,
    padding_end: u32,
}

impl LineLayout {
    pub fn new(item_size: u32) -> Result<Self, LayoutError> {
        if item_size == 0 {
            return Err(LayoutError::ZeroItemSize);
        }
        Ok(Self {
            item_size,
            gap: 0,
            padding_start: 0,
            padding_end: 0,
        })
    }

    pub fn with_gap(mut self, gap: u32) -> Self {
        self.gap = gap;
        self
    }

    pub fn with_padding(mut self, padding_start: u32, padding_end: u32) -> Self {
        self.padding_start = padding_start;
        self.padding_end = padding_end;
        self
    }

    pub fn item_size(&self) -> u32 {
        self.item_size
    }

    pub fn gap(&self) -> u32 {
        self.gap
    }

    pub fn padding_start(&self) -> u32 {
        self.padding_start
    }

    pub fn padding_end(&self) -> u32 {
        self.padding_end
    }

    /// Distance from one item start to the next (`item_size + gap`).
    pub fn stride(&self) -> u64 {
        self.item_size as u64 + self.gap as u64
    }

    /// Total scrollable extent for `count` items.
    ///
    /// The trailing `gap` after the last item is not counted.
    pub fn total_size(&self, count: usize) -> u64 {
        let padding = self.padding_start as u64 + self.padding_end as u64;
        if count == 0 {
            return padding;
        }
        let items = (count as u64).saturating_mul(self.item_size as u64);
        let gaps = (count as u64 - 1).saturating_mul(self.gap as u64);
        padding.saturating_add(items).saturating_add(gaps)
    }

    /// Start offset of the item at `index` (includes `padding_start`).
    pub fn item_start(&self, index: usize) -> u64 {
        (self.padding_start as u64).saturating_add((index as u64).saturating_mul(self.stride()))
    }

    pub fn item_end(&self, index: usize) -> u64 {
        self.item_start(index).saturating_add(self.item_size as u64)
    }

    /// Index of the item occupying `offset`.
    ///
    /// Offsets inside the leading padding map to item 0; offsets inside an
    /// item's trailing gap map to that item; offsets past the extent clamp to
    /// the last item. `None` only when `count == 0`.
    pub fn index_at_offset(&self, offset: u64, count: usize) -> Option<usize> {
        if count == 0 {
            return None;
        }
        let rel = offset.saturating_sub(self.padding_start as u64);
        let index = (rel / self.stride()) as usize;
        Some(index.min(count - 1))
    }

    pub fn max_scroll_offset(&self, count: usize, viewport: u32) -> u64 {
        self.total_size(count).saturating_sub(viewport as u64)
    }

    /// The strictly visible window for a viewport of `viewport` pixels at
    /// `scroll_offset` (clamped to the scrollable extent), without overscan.
    ///
    /// Non-empty whenever `count > 0` and `viewport > 0`.
    pub fn visible_window(&self, scroll_offset: u64, viewport: u32, count: usize) -> ItemWindow {
        if count == 0 || viewport == 0 {
            return ItemWindow::EMPTY;
        }
        let offset = scroll_offset.min(self.max_scroll_offset(count, viewport));
        let rel = offset.saturating_sub(self.padding_start as u64);
        let stride = self.stride();
        let start = ((rel / stride) as usize).min(count - 1);
        let spanned = (viewport as u64).div_ceil(stride) as usize;
        let end = start.saturating_add(spanned).saturating_add(1).min(count);
        ItemWindow {
            start_index: start,
            end_index: end,
        }
    }

    /// The visible window widened by `overscan` items on each side.
    pub fn window(
        &self,
        scroll_offset: u64,
        viewport: u32,
        count: usize,
        overscan: usize,
    ) -> ItemWindow {
        let visible = self.visible_window(scroll_offset, viewport, count);
        if visible.is_empty() {
            return visible;
        }
        ItemWindow {
            start_index: visible.start_index.saturating_sub(overscan),
            end_index: visible.end_index.saturating_add(overscan).min(count),
        }
    }

    /// The full render contract: overscanned window, band offset, and total
    /// extent.
    pub fn band(
        &self,
        scroll_offset: u64,
        viewport: u32,
        count: usize,
        overscan: usize,
    ) -> Band {
        let window = self.window(scroll_offset, viewport, count, overscan);
        let offset = if window.is_empty() {
            0
        } else {
            self.item_start(window.start_index)
        };
        Band {
            window,
            offset,
            total_size: self.total_size(count),
        }
    }
}

/// Fixed-size layout of a uniform grid cell.
///
/// `item_main` is the cell size along the scroll axis, `item_cross` along the
/// other axis; `gap` applies between cells on both axes. Both cell sizes must
/// be positive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellLayout {
    item_main: u32,
    item_cross: u32,
    gap: u32,
}

impl CellLayout {
    pub fn new(item_main: u32, item_cross: u32) -> Result<Self, LayoutError> {
        if item_main == 0 {
            return Err(LayoutError::ZeroItemSize);
        }
        if item_cross == 0 {
            return Err(LayoutError::ZeroItemCrossSize);
        }
        Ok(Self {
            item_main,
            item_cross,
            gap: 0,
        })
    }

    pub fn with_gap(mut self, gap: u32) -> Self {
        self.gap = gap;
        self
    }

    pub fn item_main(&self) -> u32 {
        self.item_main
    }

    pub fn item_cross(&self) -> u32 {
        self.item_cross
    }

    pub fn gap(&self) -> u32 {
        self.gap
    }

    /// Columns that fit in a cross-axis viewport of `viewport_cross` pixels.
    ///
    /// `floor((viewport_cross + gap) / (item_cross + gap))`, clamped to at
    /// least 1 so a narrow viewport still lays out a single column.
    pub fn columns_for(&self, viewport_cross: u32) -> usize {
        let stride = self.item_cross as u64 + self.gap as u64;
        let fit = (viewport_cross as u64 + self.gap as u64) / stride;
        (fit as usize).max(1)
    }

    /// Rows needed for `count` items across `columns` tracks.
    pub fn rows_for(&self, count: usize, columns: usize) -> usize {
        debug_assert!(columns > 0, "columns_for never returns 0");
        count.div_ceil(columns.max(1))
    }

    /// The main-axis line layout of the grid's rows (row stride is
    /// `item_main + gap`).
    pub fn row_layout(&self) -> LineLayout {
        LineLayout {
            item_size: self.item_main,
            gap: self.gap,
            padding_start: 0,
            padding_end: 0,
        }
    }

    /// Cross-axis offset of the cell in `column`.
    pub fn cell_cross_offset(&self, column: usize) -> u32 {
        let stride = self.item_cross as u64 + self.gap as u64;
        (column as u64).saturating_mul(stride).min(u32::MAX as u64) as u32
    }
}
