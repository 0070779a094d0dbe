//! Logging shims used throughout the crate.
//!
//! Call sites invoke these unconditionally. With the `tracing` feature they
//! emit events under the `"scrollband"` target; without it every invocation
//! expands to nothing, so the disabled crate carries no logging cost.

#[cfg(feature = "tracing")]
macro_rules! sbtrace {
    ($($args:tt)+) => { tracing::trace!(target: "scrollband", $($args)+) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! sbtrace {
    ($($args:tt)+) => {};
}

#[cfg(feature = "tracing")]
macro_rules! sbdebug {
    ($($args:tt)+) => { tracing::debug!(target: "scrollband", $($args)+) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! sbdebug {
    ($($args:tt)+) => {};
}

#[cfg(feature = "tracing")]
macro_rules! sbwarn {
    ($($args:tt)+) => { tracing::warn!(target: "scrollband", $($args)+) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! sbwarn {
    ($($args:tt)+) => {};
}
