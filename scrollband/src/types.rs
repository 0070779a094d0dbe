#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Align {
    Start,
    Center,
    End,
    Auto,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScrollDirection {
    Forward,
    Backward,
}

/// Viewport geometry in pixels.
///
/// `main` is the size along the scrolled axis (e.g. height for a vertical
/// list), `cross` the size along the other axis (used by the grid to derive
/// its column count).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub main: u32,
    pub cross: u32,
}

/// A half-open window of item indexes (`end_index` exclusive).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemWindow {
    pub start_index: usize,
    pub end_index: usize, // exclusive
}

impl ItemWindow {
    pub const EMPTY: Self = Self {
        start_index: 0,
        end_index: 0,
    };

    pub fn is_empty(&self) -> bool {
        self.start_index >= self.end_index
    }

    pub fn len(&self) -> usize {
        self.end_index.saturating_sub(self.start_index)
    }
}

/// A half-open window of grid rows (`end_row` exclusive).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RowWindow {
    pub start_row: usize,
    pub end_row: usize, // exclusive
}

impl RowWindow {
    pub const EMPTY: Self = Self {
        start_row: 0,
        end_row: 0,
    };

    pub fn is_empty(&self) -> bool {
        self.start_row >= self.end_row
    }

    pub fn len(&self) -> usize {
        self.end_row.saturating_sub(self.start_row)
    }
}

/// The render contract for a linear list: an outer scrollable surface of
/// extent `total_size`, with an inner band translated by `offset` that holds
/// only the items of `window`.
///
/// `offset` is always exactly the start offset of `window.start_index`
/// (0 for an empty window), so the band never drifts relative to the items.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Band {
    pub window: ItemWindow,
    pub offset: u64,
    pub total_size: u64,
}

/// The render contract for a grid: like [`Band`], but the band is laid out as
/// `columns` tracks and `item_window` is the row window expanded to item
/// indexes (end clamped to the item count).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridBand {
    pub rows: RowWindow,
    pub item_window: ItemWindow,
    pub columns: usize,
    pub offset: u64,
    pub total_size: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VirtualItem {
    pub index: usize,
    /// Start offset in the scroll axis (includes `scroll_margin` and
    /// `padding_start`).
    pub start: u64,
    /// Size in the scroll axis (excludes `gap`).
    pub size: u32,
}

impl VirtualItem {
    pub fn end(&self) -> u64 {
        self.start.saturating_add(self.size as u64)
    }
}

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VirtualItemKeyed<K> {
    pub key: K,
    pub index: usize,
    pub start: u64,
    pub size: u32,
}

impl<K> VirtualItemKeyed<K> {
    pub fn end(&self) -> u64 {
        self.start.saturating_add(self.size as u64)
    }
}

/// One rendered cell of a grid band.
///
/// `y` is the main-axis start offset within the scroll extent; `x` is the
/// cross-axis offset of the cell's column track.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridCell {
    pub index: usize,
    pub row: usize,
    pub column: usize,
    pub x: u32,
    pub y: u64,
}

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridCellKeyed<K> {
    pub key: K,
    pub index: usize,
    pub row: usize,
    pub column: usize,
    pub x: u32,
    pub y: u64,
}

/// Default item key type when callers key items by index.
pub type ItemKey = u64;

/// Captured viewport geometry, detached from any live virtualizer.
///
/// Capture with `viewport_state`, feed back through `restore_viewport_state`
/// when the surface is remounted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewportState {
    pub rect: Rect,
}

/// Captured scroll position.
///
/// `is_scrolling` is preserved so that restoring mid-scroll re-enters the
/// Scrolling state (and its debounce timers) instead of snapping to rest.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollState {
    pub offset: u64,
    pub is_scrolling: bool,
}

/// [`ViewportState`] and [`ScrollState`] captured together.
///
/// This is the unit adapters persist to keep scroll position across
/// unmount/remount, and with the `serde` feature across sessions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrameState {
    pub viewport: ViewportState,
    pub scroll: ScrollState,
}
