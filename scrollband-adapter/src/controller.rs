use scrollband::{Align, ListOptions, ListVirtualizer, PageState, TailLoader};

use crate::Glide;

/// Default glide time constant: roughly "most of the way in a quarter
/// second".
pub const DEFAULT_GLIDE_MS: u64 = 250;

/// A framework-neutral controller that wraps a [`ListVirtualizer`] and
/// provides common adapter workflows: scroll event handling, smooth-scroll
/// glides, and tail loading.
///
/// This type does not hold any UI objects. Adapters drive it by calling:
/// - `on_viewport_size` / `on_scroll` when UI events occur
/// - `tick(now_ms)` each frame/timer tick (for glides and `is_scrolling`
///   debouncing)
/// - `poll_load(page)` after data or scroll changes, with the caller's
///   current pagination flags
///
/// For UI scroll containers (e.g. DOM), use the offset returned from
/// `tick()` to set the real scroll position, keeping the virtualizer in sync.
#[derive(Debug)]
pub struct Controller<K> {
    v: ListVirtualizer<K>,
    glide: Option<Glide>,
    glide_ms: u64,
    loader: TailLoader,
}

impl<K> Controller<K> {
    pub fn new(options: ListOptions<K>) -> Self {
        Self {
            v: ListVirtualizer::new(options),
            glide: None,
            glide_ms: DEFAULT_GLIDE_MS,
            loader: TailLoader::default(),
        }
    }

    pub fn from_virtualizer(v: ListVirtualizer<K>) -> Self {
        Self {
            v,
            glide: None,
            glide_ms: DEFAULT_GLIDE_MS,
            loader: TailLoader::default(),
        }
    }

    pub fn virtualizer(&self) -> &ListVirtualizer<K> {
        &self.v
    }

    pub fn virtualizer_mut(&mut self) -> &mut ListVirtualizer<K> {
        &mut self.v
    }

    pub fn into_virtualizer(self) -> ListVirtualizer<K> {
        self.v
    }

    pub fn is_gliding(&self) -> bool {
        self.glide.is_some()
    }

    pub fn cancel_glide(&mut self) {
        self.glide = None;
    }

    /// Sets the glide time constant used by `glide_to_*`.
    pub fn set_glide_ms(&mut self, glide_ms: u64) {
        self.glide_ms = glide_ms.max(1);
    }

    pub fn on_viewport_size(&mut self, viewport_main: u32) {
        self.v.set_viewport_size(viewport_main);
    }

    /// Call this when the UI reports a scroll offset change (e.g. user
    /// wheel/drag).
    ///
    /// This cancels any active glide: the user wins.
    pub fn on_scroll(&mut self, scroll_offset: u64, now_ms: u64) {
        self.cancel_glide();
        self.v.apply_scroll_offset_event(scroll_offset, now_ms);
    }

    /// Advances the controller.
    ///
    /// - If a glide is active, updates `scroll_offset` and returns the new
    ///   offset.
    /// - Otherwise, runs `is_scrolling` debouncing and returns `None`.
    pub fn tick(&mut self, now_ms: u64) -> Option<u64> {
        let Some(glide) = &mut self.glide else {
            self.v.update_scrolling(now_ms);
            return None;
        };

        let next = glide.step(self.v.scroll_offset(), now_ms);
        let finished = glide.is_done();
        self.v.apply_scroll_offset_event_clamped(next, now_ms);

        if finished {
            self.glide = None;
            self.v.set_is_scrolling(false);
        }

        Some(self.v.scroll_offset())
    }

    /// Computes and applies a scroll-to-index immediately (no animation).
    ///
    /// Returns the applied (clamped) offset.
    pub fn scroll_to_index(&mut self, index: usize, align: Align, now_ms: u64) -> u64 {
        self.cancel_glide();
        let off = self.v.scroll_to_index_offset(index, align);
        self.v.apply_scroll_offset_event_clamped(off, now_ms);
        self.v.scroll_offset()
    }

    /// Applies a scroll-to-offset immediately (no animation).
    pub fn scroll_to_offset(&mut self, offset: u64, now_ms: u64) -> u64 {
        self.cancel_glide();
        self.v.apply_scroll_offset_event_clamped(offset, now_ms);
        self.v.scroll_offset()
    }

    /// Starts (or retargets) a glide toward an index.
    ///
    /// Returns the clamped target offset.
    pub fn glide_to_index(&mut self, index: usize, align: Align, now_ms: u64) -> u64 {
        let to = self.v.scroll_to_index_offset(index, align);
        self.glide_to_offset(to, now_ms)
    }

    /// Starts (or retargets) a glide toward an offset.
    ///
    /// Returns the clamped target offset.
    pub fn glide_to_offset(&mut self, offset: u64, now_ms: u64) -> u64 {
        let to = self.v.clamp_scroll_offset(offset);
        match &mut self.glide {
            Some(glide) => glide.retarget(to),
            None => self.glide = Some(Glide::new(to, self.glide_ms, now_ms)),
        }
        to
    }

    /// Registers the tail-loading callback.
    pub fn set_load_more(&mut self, threshold: u64, load_more: impl Fn() + Send + Sync + 'static) {
        self.loader.set_threshold(threshold);
        self.loader.attach(load_more);
    }

    /// Releases the tail-loading callback.
    pub fn release_load_more(&mut self) {
        self.loader.detach();
    }

    /// Evaluates the tail loader against the wrapped virtualizer.
    ///
    /// Returns `true` when `load_more` fired.
    pub fn poll_load(&mut self, page: PageState) -> bool {
        self.loader.observe_list(&self.v, page)
    }
}
