use alloc::sync::Arc;

use crate::grid::GridVirtualizer;
use crate::list::ListVirtualizer;
use crate::{CellLayout, ItemKey, LineLayout, Rect};

/// A callback fired when a linear virtualizer's state changes.
///
/// The second argument is `is_scrolling`.
pub type OnListChange<K> = Arc<dyn Fn(&ListVirtualizer<K>, bool) + Send + Sync>;

/// A callback fired when a grid virtualizer's state changes.
///
/// The second argument is `is_scrolling`.
pub type OnGridChange<K> = Arc<dyn Fn(&GridVirtualizer<K>, bool) + Send + Sync>;

/// Where the scroll offset starts when a virtualizer is constructed (or
/// re-enabled after `set_enabled(false)`).
///
/// `Provider` defers the value to construction time, so an adapter can hand
/// over a closure that reads a persisted offset without resolving it eagerly.
/// Defaults to `Value(0)`.
#[derive(Clone)]
pub enum InitialOffset {
    Value(u64),
    Provider(Arc<dyn Fn() -> u64 + Send + Sync>),
}

impl InitialOffset {
    pub(crate) fn resolve(&self) -> u64 {
        match self {
            Self::Value(offset) => *offset,
            Self::Provider(provider) => provider(),
        }
    }
}

impl Default for InitialOffset {
    fn default() -> Self {
        Self::Value(0)
    }
}

impl From<u64> for InitialOffset {
    fn from(offset: u64) -> Self {
        Self::Value(offset)
    }
}

impl core::fmt::Debug for InitialOffset {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Value(offset) => write!(f, "Value({offset})"),
            Self::Provider(_) => f.write_str("Provider(<closure>)"),
        }
    }
}

pub(crate) const DEFAULT_OVERSCAN: usize = 5;
pub(crate) const DEFAULT_SCROLLING_RESET_DELAY_MS: u64 = 150;

/// Configuration for [`crate::ListVirtualizer`].
///
/// Cheap to clone: closures are stored in `Arc`s so adapters can tweak a few
/// fields and call `set_options` without reallocating.
pub struct ListOptions<K = ItemKey> {
    pub count: usize,
    /// Fixed-size geometry of the list (item size, gap, padding).
    pub layout: LineLayout,
    /// Stable identity for the item at an index.
    ///
    /// Defaults to index-as-key, which breaks identity stability if the data
    /// set is reordered or filtered; supply a real key mapping in that case.
    pub get_item_key: Arc<dyn Fn(usize) -> K + Send + Sync>,

    /// Enables/disables the virtualizer. When disabled, query methods return
    /// empty results.
    pub enabled: bool,

    /// Extra items rendered beyond the visible window on each side.
    pub overscan: usize,

    /// The initial viewport rectangle, applied on construction.
    pub initial_rect: Option<Rect>,

    /// Additional padding applied when computing scroll-to offsets.
    pub scroll_padding_start: u32,
    /// Additional padding applied when computing scroll-to offsets.
    pub scroll_padding_end: u32,

    /// Where the list starts inside the scroll element.
    ///
    /// Useful when the scroll offset is measured from a larger scroll
    /// container (e.g. window scrolling) while the list begins after some
    /// header content.
    pub scroll_margin: u32,

    /// Initial scroll offset, applied on construction.
    pub initial_offset: InitialOffset,

    /// Optional callback fired when the virtualizer's internal state changes.
    pub on_change: Option<OnListChange<K>>,

    /// When `true`, leaving the Scrolling state is driven by a host-native
    /// scrollend event and the debounce fallback is disabled.
    pub use_scrollend_event: bool,

    /// Debounced fallback duration for resetting `is_scrolling` when
    /// `use_scrollend_event` is `false`.
    pub is_scrolling_reset_delay_ms: u64,
}

impl<K> Clone for ListOptions<K> {
    fn clone(&self) -> Self {
        Self {
            count: self.count,
            layout: self.layout,
            get_item_key: Arc::clone(&self.get_item_key),
            enabled: self.enabled,
            overscan: self.overscan,
            initial_rect: self.initial_rect,
            scroll_padding_start: self.scroll_padding_start,
            scroll_padding_end: self.scroll_padding_end,
            scroll_margin: self.scroll_margin,
            initial_offset: self.initial_offset.clone(),
            on_change: self.on_change.clone(),
            use_scrollend_event: self.use_scrollend_event,
            is_scrolling_reset_delay_ms: self.is_scrolling_reset_delay_ms,
        }
    }
}

impl ListOptions<ItemKey> {
    /// Creates options for a list keyed by index (`ItemKey = u64`).
    pub fn new(count: usize, layout: LineLayout) -> Self {
        Self {
            count,
            layout,
            get_item_key: Arc::new(|i| i as u64),
            enabled: true,
            overscan: DEFAULT_OVERSCAN,
            initial_rect: None,
            scroll_padding_start: 0,
            scroll_padding_end: 0,
            scroll_margin: 0,
            initial_offset: InitialOffset::default(),
            on_change: None,
            use_scrollend_event: false,
            is_scrolling_reset_delay_ms: DEFAULT_SCROLLING_RESET_DELAY_MS,
        }
    }
}

impl<K> ListOptions<K> {
    /// Creates options with a custom key mapping.
    ///
    /// Use this when the data set can be reordered or filtered:
    /// `get_item_key(i)` should return a stable identity for the item at `i`.
    pub fn new_with_key(
        count: usize,
        layout: LineLayout,
        get_item_key: impl Fn(usize) -> K + Send + Sync + 'static,
    ) -> Self {
        Self {
            count,
            layout,
            get_item_key: Arc::new(get_item_key),
            enabled: true,
            overscan: DEFAULT_OVERSCAN,
            initial_rect: None,
            scroll_padding_start: 0,
            scroll_padding_end: 0,
            scroll_margin: 0,
            initial_offset: InitialOffset::default(),
            on_change: None,
            use_scrollend_event: false,
            is_scrolling_reset_delay_ms: DEFAULT_SCROLLING_RESET_DELAY_MS,
        }
    }

    pub fn with_get_item_key(
        mut self,
        get_item_key: impl Fn(usize) -> K + Send + Sync + 'static,
    ) -> Self {
        self.get_item_key = Arc::new(get_item_key);
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_overscan(mut self, overscan: usize) -> Self {
        self.overscan = overscan;
        self
    }

    pub fn with_initial_rect(mut self, initial_rect: Option<Rect>) -> Self {
        self.initial_rect = initial_rect;
        self
    }

    pub fn with_scroll_padding(
        mut self,
        scroll_padding_start: u32,
        scroll_padding_end: u32,
    ) -> Self {
        self.scroll_padding_start = scroll_padding_start;
        self.scroll_padding_end = scroll_padding_end;
        self
    }

    pub fn with_scroll_margin(mut self, scroll_margin: u32) -> Self {
        self.scroll_margin = scroll_margin;
        self
    }

    pub fn with_initial_offset(mut self, initial_offset: InitialOffset) -> Self {
        self.initial_offset = initial_offset;
        self
    }

    pub fn with_initial_offset_value(mut self, initial_offset: u64) -> Self {
        self.initial_offset = InitialOffset::Value(initial_offset);
        self
    }

    pub fn with_initial_offset_provider(
        mut self,
        initial_offset: impl Fn() -> u64 + Send + Sync + 'static,
    ) -> Self {
        self.initial_offset = InitialOffset::Provider(Arc::new(initial_offset));
        self
    }

    pub fn with_on_change(
        mut self,
        on_change: Option<impl Fn(&ListVirtualizer<K>, bool) + Send + Sync + 'static>,
    ) -> Self {
        self.on_change = on_change.map(|f| Arc::new(f) as _);
        self
    }

    pub fn with_use_scrollend_event(mut self, use_scrollend_event: bool) -> Self {
        self.use_scrollend_event = use_scrollend_event;
        self
    }

    pub fn with_is_scrolling_reset_delay_ms(mut self, delay_ms: u64) -> Self {
        self.is_scrolling_reset_delay_ms = delay_ms;
        self
    }
}

impl<K> core::fmt::Debug for ListOptions<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ListOptions")
            .field("count", &self.count)
            .field("layout", &self.layout)
            .field("enabled", &self.enabled)
            .field("overscan", &self.overscan)
            .field("initial_rect", &self.initial_rect)
            .field("scroll_padding_start", &self.scroll_padding_start)
            .field("scroll_padding_end", &self.scroll_padding_end)
            .field("scroll_margin", &self.scroll_margin)
            .field("initial_offset", &self.initial_offset)
            .field("use_scrollend_event", &self.use_scrollend_event)
            .field(
                "is_scrolling_reset_delay_ms",
                &self.is_scrolling_reset_delay_ms,
            )
            .finish_non_exhaustive()
    }
}

/// Configuration for [`crate::GridVirtualizer`].
///
/// Like [`ListOptions`], cheap to clone via `Arc`-stored closures.
pub struct GridOptions<K = ItemKey> {
    pub count: usize,
    /// Fixed-size geometry of a grid cell (main/cross sizes and gap).
    pub cell: CellLayout,
    /// Stable identity for the item at an index (see [`ListOptions`]).
    pub get_item_key: Arc<dyn Fn(usize) -> K + Send + Sync>,

    /// Enables/disables the virtualizer.
    pub enabled: bool,

    /// Extra rows rendered beyond the visible window on each side.
    pub overscan_rows: usize,

    /// The initial viewport rectangle, applied on construction.
    ///
    /// `cross` determines the initial column count.
    pub initial_rect: Option<Rect>,

    /// Initial scroll offset, applied on construction.
    pub initial_offset: InitialOffset,

    /// Optional callback fired when the virtualizer's internal state changes.
    pub on_change: Option<OnGridChange<K>>,

    pub use_scrollend_event: bool,
    pub is_scrolling_reset_delay_ms: u64,
}

impl<K> Clone for GridOptions<K> {
    fn clone(&self) -> Self {
        Self {
            count: self.count,
            cell: self.cell,
            get_item_key: Arc::clone(&self.get_item_key),
            enabled: self.enabled,
            overscan_rows: self.overscan_rows,
            initial_rect: self.initial_rect,
            initial_offset: self.initial_offset.clone(),
            on_change: self.on_change.clone(),
            use_scrollend_event: self.use_scrollend_event,
            is_scrolling_reset_delay_ms: self.is_scrolling_reset_delay_ms,
        }
    }
}

impl GridOptions<ItemKey> {
    /// Creates options for a grid keyed by index (`ItemKey = u64`).
    pub fn new(count: usize, cell: CellLayout) -> Self {
        Self {
            count,
            cell,
            get_item_key: Arc::new(|i| i as u64),
            enabled: true,
            overscan_rows: DEFAULT_OVERSCAN,
            initial_rect: None,
            initial_offset: InitialOffset::default(),
            on_change: None,
            use_scrollend_event: false,
            is_scrolling_reset_delay_ms: DEFAULT_SCROLLING_RESET_DELAY_MS,
        }
    }
}

impl<K> GridOptions<K> {
    /// Creates options with a custom key mapping.
    pub fn new_with_key(
        count: usize,
        cell: CellLayout,
        get_item_key: impl Fn(usize) -> K + Send + Sync + 'static,
    ) -> Self {
        Self {
            count,
            cell,
            get_item_key: Arc::new(get_item_key),
            enabled: true,
            overscan_rows: DEFAULT_OVERSCAN,
            initial_rect: None,
            initial_offset: InitialOffset::default(),
            on_change: None,
            use_scrollend_event: false,
            is_scrolling_reset_delay_ms: DEFAULT_SCROLLING_RESET_DELAY_MS,
        }
    }

    pub fn with_get_item_key(
        mut self,
        get_item_key: impl Fn(usize) -> K + Send + Sync + 'static,
    ) -> Self {
        self.get_item_key = Arc::new(get_item_key);
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_overscan_rows(mut self, overscan_rows: usize) -> Self {
        self.overscan_rows = overscan_rows;
        self
    }

    pub fn with_initial_rect(mut self, initial_rect: Option<Rect>) -> Self {
        self.initial_rect = initial_rect;
        self
    }

    pub fn with_initial_offset(mut self, initial_offset: InitialOffset) -> Self {
        self.initial_offset = initial_offset;
        self
    }

    pub fn with_initial_offset_value(mut self, initial_offset: u64) -> Self {
        self.initial_offset = InitialOffset::Value(initial_offset);
        self
    }

    pub fn with_on_change(
        mut self,
        on_change: Option<impl Fn(&GridVirtualizer<K>, bool) + Send + Sync + 'static>,
    ) -> Self {
        self.on_change = on_change.map(|f| Arc::new(f) as _);
        self
    }

    pub fn with_use_scrollend_event(mut self, use_scrollend_event: bool) -> Self {
        self.use_scrollend_event = use_scrollend_event;
        self
    }

    pub fn with_is_scrolling_reset_delay_ms(mut self, delay_ms: u64) -> Self {
        self.is_scrolling_reset_delay_ms = delay_ms;
        self
    }
}

impl<K> core::fmt::Debug for GridOptions<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GridOptions")
            .field("count", &self.count)
            .field("cell", &self.cell)
            .field("enabled", &self.enabled)
            .field("overscan_rows", &self.overscan_rows)
            .field("initial_rect", &self.initial_rect)
            .field("initial_offset", &self.initial_offset)
            .field("use_scrollend_event", &self.use_scrollend_event)
            .field(
                "is_scrolling_reset_delay_ms",
                &self.is_scrolling_reset_delay_ms,
            )
            .finish_non_exhaustive()
    }
}
