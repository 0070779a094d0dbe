use alloc::sync::Arc;

use crate::{GridVirtualizer, ListVirtualizer};

/// Default proximity threshold (pixels before the end of the list).
pub const DEFAULT_LOAD_THRESHOLD: u64 = 200;

/// Caller-owned pagination flags read by [`TailLoader`].
///
/// The loader never mutates these; the caller updates them around its own
/// (possibly asynchronous) fetch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageState {
    pub has_next_page: bool,
    pub is_loading: bool,
}

/// The "load more" callback. The loader does not await it; it only consults
/// the caller-updated [`PageState`] to gate re-triggering.
pub type LoadMore = Arc<dyn Fn() + Send + Sync>;

/// Observes proximity to the end of a virtualized sequence and fires a
/// caller-supplied callback at most once per threshold crossing.
///
/// This is the explicit-resource rendition of the "observe a sentinel after
/// the last item" pattern: `attach` registers the callback and arms the
/// trigger, `observe` is the visibility evaluation, and `detach` releases
/// the callback. Double-fire is prevented structurally:
///
/// - firing disarms the trigger;
/// - the trigger re-arms when the sentinel leaves the threshold, or when the
///   caller's `is_loading` flag completes a false → true → false cycle;
/// - while `is_loading` is `true` or `has_next_page` is `false`, `observe`
///   never fires regardless of distance.
pub struct TailLoader {
    threshold: u64,
    load_more: Option<LoadMore>,
    armed: bool,
    saw_in_flight: bool,
}

impl TailLoader {
    pub fn new(threshold: u64) -> Self {
        Self {
            threshold,
            load_more: None,
            armed: false,
            saw_in_flight: false,
        }
    }

    pub fn threshold(&self) -> u64 {
        self.threshold
    }

    pub fn set_threshold(&mut self, threshold: u64) {
        self.threshold = threshold;
    }

    /// Registers the callback and arms the trigger.
    ///
    /// Attaching over an existing callback replaces it.
    pub fn attach(&mut self, load_more: impl Fn() + Send + Sync + 'static) {
        if self.load_more.is_some() {
            sbwarn!("TailLoader::attach replacing an existing callback");
        }
        self.load_more = Some(Arc::new(load_more));
        self.armed = true;
        self.saw_in_flight = false;
    }

    /// Releases the callback. Idempotent; nothing is retained afterwards.
    pub fn detach(&mut self) {
        self.load_more = None;
        self.armed = false;
        self.saw_in_flight = false;
    }

    pub fn is_attached(&self) -> bool {
        self.load_more.is_some()
    }

    /// Evaluates sentinel visibility at `distance_to_end` pixels from the
    /// viewport's trailing edge. Fires the callback (returning `true`) iff
    /// attached, armed, within threshold, and the caller's flags permit.
    pub fn observe(&mut self, distance_to_end: u64, page: PageState) -> bool {
        if page.is_loading {
            // Re-arm happens when the flag comes back down.
            self.saw_in_flight = true;
            return false;
        }
        if core::mem::take(&mut self.saw_in_flight) {
            self.armed = true;
        }
        if distance_to_end > self.threshold {
            self.armed = true;
            return false;
        }
        if !self.armed || !page.has_next_page {
            return false;
        }
        let Some(load_more) = &self.load_more else {
            return false;
        };
        sbdebug!(distance_to_end, threshold = self.threshold, "TailLoader fire");
        self.armed = false;
        load_more();
        true
    }

    /// Convenience: observes the end of a linear virtualizer.
    pub fn observe_list<K>(&mut self, v: &ListVirtualizer<K>, page: PageState) -> bool {
        self.observe(v.distance_to_end(), page)
    }

    /// Convenience: observes the end of a grid virtualizer.
    pub fn observe_grid<K>(&mut self, v: &GridVirtualizer<K>, page: PageState) -> bool {
        self.observe(v.distance_to_end(), page)
    }
}

impl Default for TailLoader {
    fn default() -> Self {
        Self::new(DEFAULT_LOAD_THRESHOLD)
    }
}

impl core::fmt::Debug for TailLoader {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TailLoader")
            .field("threshold", &self.threshold)
            .field("attached", &self.load_more.is_some())
            .field("armed", &self.armed)
            .field("saw_in_flight", &self.saw_in_flight)
            .finish()
    }
}
