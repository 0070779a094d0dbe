use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use scrollband::{LineLayout, ListOptions, ListVirtualizer, PageState, TailLoader};

fn main() {
    let layout = LineLayout::new(40).expect("item size is positive");
    let mut v = ListVirtualizer::new(ListOptions::new(50, layout));
    v.set_viewport_size(600);

    let requests = Arc::new(AtomicUsize::new(0));
    let mut loader = TailLoader::new(200);
    loader.attach({
        let requests = Arc::clone(&requests);
        move || {
            requests.fetch_add(1, Ordering::SeqCst);
        }
    });

    let mut page = PageState {
        has_next_page: true,
        is_loading: false,
    };

    // Scroll toward the end until the loader asks for the next page, append
    // it, and repeat. Three pages in total.
    while page.has_next_page {
        v.set_scroll_offset(v.max_scroll_offset());
        if loader.observe_list(&v, page) {
            println!(
                "page request #{} at count={}",
                requests.load(Ordering::SeqCst),
                v.count()
            );
            page.is_loading = true;
            loader.observe_list(&v, page); // in flight: never double-fires

            v.set_count(v.count() + 50);
            page.is_loading = false;
            page.has_next_page = requests.load(Ordering::SeqCst) < 3;
        }
    }

    println!(
        "done: count={} requests={}",
        v.count(),
        requests.load(Ordering::SeqCst)
    );
}
