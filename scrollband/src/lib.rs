//! A headless windowed rendering engine for large lists and grids.
//!
//! For adapter-level utilities (controllers, smooth-scroll glide), see the
//! `scrollband-adapter` crate.
//!
//! Given a scroll offset, a viewport, a fixed item size, and an overscan, this
//! crate computes the minimal window of a large (10k+ element) data set that
//! must be rendered, the pixel offset of the rendered band, and the total
//! scrollable extent. All queries are closed-form arithmetic; nothing scales
//! with the item count.
//!
//! It is UI-agnostic. A TUI/GUI layer is expected to provide:
//! - viewport size (height/width)
//! - scroll offset on every scroll event
//! - a scrollable surface that supports absolute positioning of the band
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod error;
mod geometry;
mod grid;
mod list;
mod loader;
mod options;
mod scroll;
mod types;

#[cfg(test)]
mod tests;

pub use error::LayoutError;
pub use geometry::{CellLayout, LineLayout};
pub use grid::GridVirtualizer;
pub use list::ListVirtualizer;
pub use loader::{DEFAULT_LOAD_THRESHOLD, LoadMore, PageState, TailLoader};
pub use options::{GridOptions, InitialOffset, ListOptions, OnGridChange, OnListChange};
pub use types::{
    Align, Band, FrameState, GridBand, GridCell, GridCellKeyed, ItemKey, ItemWindow, Rect,
    RowWindow, ScrollDirection, ScrollState, ViewportState, VirtualItem, VirtualItemKeyed,
};
