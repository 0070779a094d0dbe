use crate::*;

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::sync::atomic::{AtomicUsize, Ordering};

use scrollband::{Align, LineLayout, ListOptions, PageState};

fn options(count: usize, item_size: u32) -> ListOptions {
    ListOptions::new(count, LineLayout::new(item_size).unwrap())
}

// ---------------------------------------------------------------------------
// Glide
// ---------------------------------------------------------------------------

#[test]
fn glide_converges_forward_monotonically() {
    let mut g = Glide::new(1000, 250, 0);
    let mut current = 0u64;
    let mut now = 0u64;
    let mut steps = Vec::new();
    while !g.is_done() {
        now += 16;
        let next = g.step(current, now);
        assert!(next > current, "glide stalled at {current}");
        assert!(next <= 1000);
        steps.push(next);
        current = next;
        assert!(steps.len() < 10_000, "glide did not converge");
    }
    assert_eq!(current, 1000);
    // Exponential approach: the first step covers the largest distance.
    assert!(steps[0] >= steps[1] - steps[0]);
}

#[test]
fn glide_converges_backward() {
    let mut g = Glide::new(100, 250, 0);
    let mut current = 2000u64;
    let mut now = 0u64;
    while !g.is_done() {
        now += 16;
        let next = g.step(current, now);
        assert!(next < current);
        assert!(next >= 100);
        current = next;
    }
    assert_eq!(current, 100);
}

#[test]
fn glide_snaps_when_dt_exceeds_the_time_constant() {
    let mut g = Glide::new(1000, 250, 0);
    assert_eq!(g.step(0, 250), 1000);
    assert!(g.is_done());
}

#[test]
fn glide_zero_dt_is_a_no_op() {
    let mut g = Glide::new(1000, 250, 100);
    assert_eq!(g.step(0, 100), 0);
    assert!(!g.is_done());
    // Time going backwards is also a zero-length step.
    assert_eq!(g.step(0, 50), 0);
    assert!(!g.is_done());
}

#[test]
fn glide_retarget_keeps_moving_without_a_jump() {
    let mut g = Glide::new(1000, 250, 0);
    let a = g.step(0, 16);
    let b = g.step(a, 32);
    assert!(b > a);

    // New target behind us: the next step turns around from where we are.
    g.retarget(0);
    let c = g.step(b, 48);
    assert!(c < b);
    assert!(!g.is_done());
}

#[test]
fn glide_starting_at_the_target_finishes_immediately() {
    let mut g = Glide::new(500, 250, 0);
    assert_eq!(g.step(500, 16), 500);
    assert!(g.is_done());
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

#[test]
fn controller_glide_reaches_the_target_and_settles() {
    let mut c = Controller::new(options(1000, 10));
    c.on_viewport_size(100);

    let target = c.glide_to_offset(500, 0);
    assert_eq!(target, 500);
    assert!(c.is_gliding());

    let mut now = 0u64;
    let mut last = 0u64;
    for _ in 0..10_000 {
        now += 16;
        match c.tick(now) {
            Some(off) => {
                assert!(off >= last);
                assert!(off <= 500);
                last = off;
            }
            None => break,
        }
    }
    assert!(!c.is_gliding());
    assert_eq!(c.virtualizer().scroll_offset(), 500);
    assert!(!c.virtualizer().is_scrolling());
}

#[test]
fn controller_glide_target_is_clamped() {
    let mut c = Controller::new(options(100, 10));
    c.on_viewport_size(30);
    // max scroll offset = 1000 - 30
    assert_eq!(c.glide_to_offset(1_000_000, 0), 970);
    assert_eq!(c.glide_to_index(99, Align::Start, 0), 970);
}

#[test]
fn controller_user_scroll_cancels_the_glide() {
    let mut c = Controller::new(options(1000, 10));
    c.on_viewport_size(100);

    c.glide_to_offset(5000, 0);
    assert!(c.is_gliding());
    c.tick(16);

    c.on_scroll(123, 32);
    assert!(!c.is_gliding());
    assert_eq!(c.virtualizer().scroll_offset(), 123);
    assert!(c.virtualizer().is_scrolling());

    // With no glide, tick only runs the debounce.
    assert_eq!(c.tick(48), None);
}

#[test]
fn controller_retargets_an_active_glide() {
    let mut c = Controller::new(options(1000, 10));
    c.on_viewport_size(100);

    c.glide_to_offset(5000, 0);
    c.tick(16);
    let mid = c.virtualizer().scroll_offset();
    assert!(mid > 0 && mid < 5000);

    // Issuing a new target mid-flight keeps a single glide running.
    assert_eq!(c.glide_to_offset(0, 16), 0);
    assert!(c.is_gliding());
    let back = c.tick(32).unwrap();
    assert!(back < mid);
}

#[test]
fn controller_scroll_to_is_immediate() {
    let mut c = Controller::new(options(100, 10));
    c.on_viewport_size(30);

    assert_eq!(c.scroll_to_index(50, Align::Start, 0), 500);
    assert_eq!(c.virtualizer().scroll_offset(), 500);
    assert!(!c.is_gliding());

    assert_eq!(c.scroll_to_offset(2000, 16), 970);
    assert_eq!(c.virtualizer().scroll_offset(), 970);
}

#[test]
fn controller_tick_debounces_is_scrolling() {
    let mut c = Controller::new(options(1000, 10));
    c.on_viewport_size(100);

    c.on_scroll(500, 0);
    assert!(c.virtualizer().is_scrolling());

    assert_eq!(c.tick(100), None);
    assert!(c.virtualizer().is_scrolling());

    assert_eq!(c.tick(200), None);
    assert!(!c.virtualizer().is_scrolling());
}

#[test]
fn controller_poll_load_fires_once() {
    let mut c = Controller::new(options(100, 10));
    c.on_viewport_size(100);

    let fired = Arc::new(AtomicUsize::new(0));
    let fired2 = Arc::clone(&fired);
    c.set_load_more(200, move || {
        fired2.fetch_add(1, Ordering::SeqCst);
    });

    let ready = PageState {
        has_next_page: true,
        is_loading: false,
    };

    // total = 1000; the sentinel enters at offset >= 1000 - 100 - 200.
    c.scroll_to_offset(500, 0);
    assert!(!c.poll_load(ready));

    c.scroll_to_offset(800, 16);
    assert!(c.poll_load(ready));
    assert!(!c.poll_load(ready));
    assert_eq!(fired.load(Ordering::SeqCst), 1);

    c.release_load_more();
    assert!(!c.poll_load(ready));
    assert_eq!(fired.load(Ordering::SeqCst), 1);
}
