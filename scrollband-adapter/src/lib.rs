//! Adapter utilities for the `scrollband` crate.
//!
//! The `scrollband` crate is UI-agnostic and focuses on the core math and
//! state. This crate provides small, framework-neutral helpers commonly
//! needed by adapters:
//!
//! - A [`Controller`] that wraps a list virtualizer with a per-frame `tick`
//!   loop (scroll debouncing, smooth scrolling, tail loading)
//! - Integer-only smooth-scroll glide (no easing tables, no floats)
//!
//! This crate is intentionally framework-agnostic (no ratatui/egui bindings).
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

mod controller;
mod glide;

#[cfg(test)]
mod tests;

pub use controller::Controller;
pub use glide::Glide;
